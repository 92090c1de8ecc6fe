use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

use super::jwks::{self, SigningKeys};
use crate::config::{ConfigError, OidcConfig};

#[derive(Debug, Error)]
pub enum OidcError {
    #[error("client secrets list no redirect URI")]
    MissingRedirectUri,

    #[error("client secrets name neither a jwks_uri nor an issuer")]
    MissingJwksUri,

    #[error("invalid URL in client secrets: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint rejected the code: {0}")]
    TokenRejected(String),

    #[error("ID token header carries no key id")]
    MissingKeyId,

    #[error("ID token signed with unknown key {0}")]
    UnknownSigningKey(String),

    #[error("invalid ID token: {0}")]
    InvalidIdToken(#[from] jsonwebtoken::errors::Error),
}

/// The `web` section of a provider-issued `client_secrets.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    #[serde(default)]
    pub issuer: Option<String>,
    /// Signing keys endpoint; discovered from `issuer` when absent
    #[serde(default)]
    pub jwks_uri: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    web: ClientSecrets,
}

impl ClientSecrets {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<ClientSecretsFile>(raw).map(|file| file.web)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ClientSecretsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::ClientSecretsParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Identity claims read from the ID token returned by the token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// The external OpenID Connect provider, as seen by the login flow
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start a login, carrying `state` back to the callback
    fn authorization_url(&self, state: &str) -> Url;

    /// Trade an authorization code for the authenticated subject's claims
    async fn exchange_code(&self, code: &str) -> Result<IdTokenClaims, OidcError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct DiscoveryDocument {
    jwks_uri: String,
}

/// Where the provider's signing keys are published
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeySource {
    Jwks(Url),
    /// `{issuer}/.well-known/openid-configuration`, read for its `jwks_uri`
    Discovery(Url),
}

impl KeySource {
    fn from_secrets(secrets: &ClientSecrets) -> Result<Self, OidcError> {
        if let Some(jwks_uri) = &secrets.jwks_uri {
            return Ok(KeySource::Jwks(jwks_uri.parse()?));
        }

        let issuer = secrets.issuer.as_deref().ok_or(OidcError::MissingJwksUri)?;
        let discovery = format!("{}/.well-known/openid-configuration", issuer.trim_end_matches('/'));
        Ok(KeySource::Discovery(discovery.parse()?))
    }
}

/// Authorization-code flow against a provider described by client secrets.
///
/// ID tokens are verified against the provider's JWKS. Keys are fetched on
/// first use and again whenever a token names a key id not yet seen.
pub struct OidcProvider {
    secrets: ClientSecrets,
    auth_uri: Url,
    token_uri: Url,
    redirect_uri: Url,
    key_source: KeySource,
    signing_keys: RwLock<SigningKeys>,
    scopes: String,
    http: reqwest::Client,
}

impl OidcProvider {
    pub fn new(secrets: ClientSecrets, config: &OidcConfig) -> Result<Self, OidcError> {
        let redirect_uri = secrets
            .redirect_uris
            .first()
            .ok_or(OidcError::MissingRedirectUri)?
            .parse::<Url>()?;

        if redirect_uri.path() != config.callback_route {
            tracing::warn!(
                redirect_uri = %redirect_uri,
                callback_route = %config.callback_route,
                "Redirect URI does not point at the callback route"
            );
        }

        Ok(Self {
            auth_uri: secrets.auth_uri.parse()?,
            token_uri: secrets.token_uri.parse()?,
            redirect_uri,
            key_source: KeySource::from_secrets(&secrets)?,
            signing_keys: RwLock::new(SigningKeys::default()),
            scopes: config.scopes.join(" "),
            http: reqwest::Client::new(),
            secrets,
        })
    }

    async fn jwks_url(&self) -> Result<Url, OidcError> {
        match &self.key_source {
            KeySource::Jwks(url) => Ok(url.clone()),
            KeySource::Discovery(url) => {
                let document: DiscoveryDocument = self
                    .http
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok(document.jwks_uri.parse()?)
            }
        }
    }

    async fn fetch_signing_keys(&self) -> Result<SigningKeys, OidcError> {
        let url = self.jwks_url().await?;
        let jwk_set: JwkSet = self.http.get(url.clone()).send().await?.error_for_status()?.json().await?;

        let keys = SigningKeys::from_jwk_set(jwk_set);
        if keys.is_empty() {
            tracing::warn!(jwks_uri = %url, "Identity provider published no usable signing keys");
        } else {
            tracing::debug!(jwks_uri = %url, keys = keys.len(), "Loaded identity provider signing keys");
        }
        Ok(keys)
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims, OidcError> {
        let kid = jwks::key_id(id_token)?;
        if !self.signing_keys.read().await.contains(&kid) {
            let fresh = self.fetch_signing_keys().await?;
            *self.signing_keys.write().await = fresh;
        }

        self.signing_keys
            .read()
            .await
            .decode(id_token, &self.secrets.client_id, self.secrets.issuer.as_deref())
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.auth_uri.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.secrets.client_id)
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("scope", &self.scopes)
            .append_pair("state", state);
        url
    }

    async fn exchange_code(&self, code: &str) -> Result<IdTokenClaims, OidcError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
        ];

        let response: TokenResponse = self
            .http
            .post(self.token_uri.clone())
            .form(&params)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            let description = response.error_description.unwrap_or_default();
            return Err(OidcError::TokenRejected(format!("{error} {description}").trim().to_string()));
        }

        let id_token = response
            .id_token
            .ok_or_else(|| OidcError::TokenRejected("response carried no id_token".to_string()))?;

        self.verify_id_token(&id_token).await
    }
}
