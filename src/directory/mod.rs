// Directory service lookups: subject identifier -> user record

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::DirectoryConfig;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory org URL is not configured")]
    NotConfigured,

    #[error("invalid directory URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("user {0} not found in directory")]
    NotFound(String),

    #[error("directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directory returned {0}")]
    Status(StatusCode),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// User record as held by the directory service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub profile: UserProfile,
}

impl DirectoryUser {
    /// Best human-readable name available in the profile
    pub fn display_name(&self) -> &str {
        self.profile
            .first_name
            .as_deref()
            .or(self.profile.login.as_deref())
            .or(self.profile.email.as_deref())
            .unwrap_or(&self.id)
    }
}

#[async_trait]
pub trait Directory: Send + Sync {
    async fn get_user(&self, subject: &str) -> Result<DirectoryUser, DirectoryError>;
}

/// Okta Users API client authenticated with a static SSWS API token
pub struct OktaDirectory {
    org_url: Url,
    api_token: String,
    http: reqwest::Client,
}

impl OktaDirectory {
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        if config.org_url.is_empty() {
            return Err(DirectoryError::NotConfigured);
        }

        Ok(Self {
            org_url: config.org_url.parse()?,
            api_token: config.api_token.clone(),
            http: reqwest::Client::new(),
        })
    }

    fn user_url(&self, subject: &str) -> Result<Url, DirectoryError> {
        let mut url = self.org_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["api", "v1", "users", subject]);
        Ok(url)
    }
}

#[async_trait]
impl Directory for OktaDirectory {
    async fn get_user(&self, subject: &str) -> Result<DirectoryUser, DirectoryError> {
        let response = self
            .http
            .get(self.user_url(subject)?)
            .header(header::AUTHORIZATION, format!("SSWS {}", self.api_token))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(DirectoryError::NotFound(subject.to_string())),
            status => Err(DirectoryError::Status(status)),
        }
    }
}
