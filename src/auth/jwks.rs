// Provider signing keys (JWKS) and ID-token verification against them

use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use jsonwebtoken::{DecodingKey, Validation};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::oidc::OidcError;

/// Signing keys published by the identity provider, by key id
#[derive(Clone, Default)]
pub struct SigningKeys {
    keys: HashMap<String, DecodingKey>,
}

impl SigningKeys {
    /// Keep every key that has an id, is usable for signatures and that
    /// `jsonwebtoken` can load. Others are skipped.
    pub fn from_jwk_set(jwk_set: JwkSet) -> Self {
        let keys = jwk_set
            .keys
            .into_iter()
            .filter(|jwk| !matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)))
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(&jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(err) => {
                        tracing::debug!(kid = %kid, error = %err, "Skipping unusable signing key");
                        None
                    }
                }
            })
            .collect();

        Self { keys }
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.keys.contains_key(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Verify `token`'s signature with the key named in its header, then its
    /// audience, expiry and (when given) issuer.
    pub fn decode<T: DeserializeOwned>(
        &self,
        token: &str,
        audience: &str,
        issuer: Option<&str>,
    ) -> Result<T, OidcError> {
        let kid = key_id(token)?;
        let key = self.keys.get(&kid).ok_or(OidcError::UnknownSigningKey(kid))?;

        let header = jsonwebtoken::decode_header(token)?;
        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[audience]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(jsonwebtoken::decode::<T>(token, key, &validation)?.claims)
    }
}

/// The `kid` a token says it was signed with
pub fn key_id(token: &str) -> Result<String, OidcError> {
    jsonwebtoken::decode_header(token)?
        .kid
        .ok_or(OidcError::MissingKeyId)
}
