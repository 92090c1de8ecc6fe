use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::AppConfig;
use crate::database::Repository;
use crate::directory::Directory;

/// Shared, immutable dependencies handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub provider: Arc<dyn IdentityProvider>,
    pub directory: Arc<dyn Directory>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        repo: Repository,
        provider: Arc<dyn IdentityProvider>,
        directory: Arc<dyn Directory>,
        config: AppConfig,
    ) -> Self {
        Self {
            repo,
            provider,
            directory,
            config: Arc::new(config),
        }
    }
}
