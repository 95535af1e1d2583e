//! Configuration port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for user preference storage
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load preferences. A missing file yields an empty config.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist preferences, creating the parent directory if needed
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the preference file
    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write the defaults. Fails if the file already exists.
    async fn init(&self) -> Result<(), ConfigError>;

    /// Load preferences, degrading to an empty config on any error
    async fn load_or_empty(&self) -> AppConfig {
        match self.load().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path().display(), "ignoring unreadable config");
                AppConfig::empty()
            }
        }
    }
}
