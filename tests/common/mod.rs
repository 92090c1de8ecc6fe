#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use tower::ServiceExt;
use url::Url;

use pda_journal::auth::{self, IdTokenClaims, IdentityProvider, OidcError};
use pda_journal::config::{AppConfig, DatabaseConfig};
use pda_journal::database::{DatabaseManager, Repository};
use pda_journal::directory::{Directory, DirectoryError, DirectoryUser, UserProfile};
use pda_journal::{app, AppState};

pub const AUTHORIZE_URL: &str = "https://idp.test/authorize";

/// Subject whose directory lookup fails with a server error
pub const BROKEN_SUBJECT: &str = "broken";

/// Subject the directory no longer has (deactivated or deleted)
pub const GONE_SUBJECT: &str = "gone";

/// Identity provider that accepts codes of the form `code-<subject>`
pub struct FakeProvider;

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn authorization_url(&self, state: &str) -> Url {
        let mut url = Url::parse(AUTHORIZE_URL).expect("static url");
        url.query_pairs_mut().append_pair("state", state);
        url
    }

    async fn exchange_code(&self, code: &str) -> Result<IdTokenClaims, OidcError> {
        match code.strip_prefix("code-") {
            Some(sub) => Ok(IdTokenClaims {
                sub: sub.to_string(),
                email: Some(format!("{}@example.com", sub)),
                name: None,
            }),
            None => Err(OidcError::TokenRejected("invalid_grant".to_string())),
        }
    }
}

/// Directory that knows every subject except [`BROKEN_SUBJECT`] and [`GONE_SUBJECT`]
pub struct FakeDirectory;

#[async_trait]
impl Directory for FakeDirectory {
    async fn get_user(&self, subject: &str) -> Result<DirectoryUser, DirectoryError> {
        match subject {
            BROKEN_SUBJECT => return Err(DirectoryError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)),
            GONE_SUBJECT => return Err(DirectoryError::NotFound(subject.to_string())),
            _ => {}
        }

        Ok(DirectoryUser {
            id: subject.to_string(),
            status: Some("ACTIVE".to_string()),
            profile: UserProfile {
                login: Some(format!("{}@example.com", subject)),
                email: Some(format!("{}@example.com", subject)),
                first_name: Some(format!("User {}", subject)),
                last_name: None,
            },
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: Repository,
    pub config: AppConfig,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("pda_journal=debug")
            .with_test_writer()
            .try_init();

        let mut config = AppConfig::development();
        config.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };

        let pool = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::initialize_schema(&pool).await?;
        let repo = Repository::new(pool);

        let state = AppState::new(repo.clone(), Arc::new(FakeProvider), Arc::new(FakeDirectory), config.clone());

        Ok(Self {
            router: app(state),
            repo,
            config,
        })
    }

    /// `Cookie` header value carrying a valid session for `sub`
    pub fn session_cookie(&self, sub: &str) -> String {
        let token = auth::issue_session(sub, &self.config.security.secret_key, 1).expect("sign session");
        format!("{}={}", self.config.oidc.cookie_name, token)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Result<Response<Body>> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        Ok(self.router.clone().oneshot(builder.body(Body::empty())?).await?)
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, form: &str) -> Result<Response<Body>> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        Ok(self.router.clone().oneshot(builder.body(Body::from(form.to_string()))?).await?)
    }
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `name=value` pairs from every Set-Cookie header, attributes dropped
pub fn set_cookies(response: &Response<Body>) -> Vec<(String, String)> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect()
}

pub fn set_cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v)
}

pub async fn body_text(response: Response<Body>) -> Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub fn assert_redirect(response: &Response<Body>, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "expected a redirect to {}", to);
    assert_eq!(location(response).as_deref(), Some(to));
}
