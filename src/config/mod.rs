use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::routes::APP_PATHS;

/// Longest session a signed cookie may grant (one year)
pub const MAX_SESSION_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SECRET_KEY must be set outside of development")]
    MissingSecretKey,

    #[error("SESSION_EXPIRY_HOURS must be between 1 and {max}, got {hours}")]
    InvalidSessionExpiry { hours: u64, max: u64 },

    #[error("OIDC_CALLBACK_ROUTE {0:?} must be an absolute path without parameters")]
    InvalidCallbackRoute(String),

    #[error("OIDC_CALLBACK_ROUTE {0:?} is already served by the app")]
    CallbackRouteTaken(String),

    #[error("Failed to read client secrets {path}: {source}")]
    ClientSecretsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid client secrets {path}: {source}")]
    ClientSecretsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub oidc: OidcConfig,
    pub directory: DirectoryConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// Path to the provider's `client_secrets.json` document.
    pub client_secrets: PathBuf,
    pub callback_route: String,
    pub scopes: Vec<String>,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub org_url: String,
    pub api_token: String,
    /// Owner used when seeding sample data.
    pub default_user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub session_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PDA_BIND") {
            self.server.bind = v;
        }
        if let Some(port) = env::var("PDA_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        // OIDC overrides
        if let Ok(v) = env::var("OIDC_CLIENT_SECRETS") {
            self.oidc.client_secrets = PathBuf::from(v);
        }
        if let Ok(v) = env::var("OIDC_CALLBACK_ROUTE") {
            self.oidc.callback_route = v;
        }
        if let Ok(v) = env::var("OIDC_SCOPES") {
            self.oidc.scopes = v.split_whitespace().map(str::to_string).collect();
        }
        if let Ok(v) = env::var("OIDC_COOKIE_NAME") {
            self.oidc.cookie_name = v;
        }
        if let Ok(v) = env::var("OIDC_COOKIE_SECURE") {
            self.oidc.cookie_secure = v.parse().unwrap_or(self.oidc.cookie_secure);
        }

        // Directory overrides
        if let Ok(v) = env::var("OKTA_ORG_URL") {
            self.directory.org_url = v;
        }
        if let Ok(v) = env::var("OKTA_API_TOKEN") {
            self.directory.api_token = v;
        }
        if let Ok(v) = env::var("DEFAULT_USER") {
            self.directory.default_user = v;
        }

        // Security overrides
        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.security.session_expiry_hours = v.parse().unwrap_or(self.security.session_expiry_hours);
        }

        self
    }

    /// Reject configurations that would sign sessions with a guessable key
    /// or that the router cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.secret_key.is_empty() {
            return Err(ConfigError::MissingSecretKey);
        }

        let hours = self.security.session_expiry_hours;
        if hours == 0 || hours > MAX_SESSION_EXPIRY_HOURS {
            return Err(ConfigError::InvalidSessionExpiry {
                hours,
                max: MAX_SESSION_EXPIRY_HOURS,
            });
        }

        self.oidc.validate_callback_route()
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite:///tmp/pda.db".to_string(),
                max_connections: 5,
            },
            oidc: OidcConfig::defaults(false),
            directory: DirectoryConfig::defaults(),
            security: SecurityConfig {
                secret_key: "development-only-secret".to_string(),
                session_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite:///var/lib/pda/pda.db".to_string(),
                max_connections: 10,
            },
            oidc: OidcConfig::defaults(true),
            directory: DirectoryConfig::defaults(),
            security: SecurityConfig {
                secret_key: String::new(),
                session_expiry_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite:///var/lib/pda/pda.db".to_string(),
                max_connections: 10,
            },
            oidc: OidcConfig::defaults(true),
            directory: DirectoryConfig::defaults(),
            security: SecurityConfig {
                secret_key: String::new(),
                session_expiry_hours: 8,
            },
        }
    }
}

impl OidcConfig {
    fn defaults(cookie_secure: bool) -> Self {
        Self {
            client_secrets: PathBuf::from("client_secrets.json"),
            callback_route: "/oidc/callback".to_string(),
            scopes: vec!["openid".to_string(), "email".to_string(), "profile".to_string()],
            cookie_name: "oidc_token".to_string(),
            cookie_secure,
        }
    }
}

impl OidcConfig {
    fn validate_callback_route(&self) -> Result<(), ConfigError> {
        let route = self.callback_route.as_str();
        let well_formed = route.len() > 1
            && route.starts_with('/')
            && !route.starts_with("//")
            && !route.contains([':', '*', '?', '#', '{', '}']);
        if !well_formed {
            return Err(ConfigError::InvalidCallbackRoute(route.to_string()));
        }

        let first_segment = route.split('/').nth(1).unwrap_or_default();
        let taken = APP_PATHS.iter().any(|path| {
            *path == route || (path.ends_with("/:ident") && path.split('/').nth(1) == Some(first_segment))
        });
        if taken {
            return Err(ConfigError::CallbackRouteTaken(route.to_string()));
        }
        Ok(())
    }
}

impl DirectoryConfig {
    fn defaults() -> Self {
        Self {
            org_url: String::new(),
            api_token: String::new(),
            default_user: String::new(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
