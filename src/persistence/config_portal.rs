//! # Configuration Portal
//!
//! Thread-safe access to the application configuration plus its on-disk
//! form. The portal is created once at startup, shared via `Arc`, and read
//! or replaced from the UI thread and background tasks alike.
//!
//! ## Locking Strategy
//! A single tokio `RwLock` guards the configuration: reads are frequent and
//! concurrent (status line, settings page), writes happen only when the
//! user applies a settings change. Lock hold times are a clone or an
//! assignment, so contention is a non-issue.
//!
//! ## Fail-Safe Loading
//! Loading never fails the application: a missing file is replaced by a
//! written default on first run, and a corrupt file degrades to in-memory
//! defaults with a warning so the dashboard still comes up.

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::DashConfig;

/// Central hub for the application configuration.
#[derive(Debug)]
pub struct ConfigPortal {
    config: RwLock<DashConfig>,
    path: PathBuf,
}

impl ConfigPortal {
    /// Location of the configuration file:
    /// `<user config dir>/opendash/config.toml`.
    fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| eyre!("no user configuration directory"))?;
        Ok(dir.join("opendash").join("config.toml"))
    }

    /// Writes a default configuration file if none exists yet.
    pub async fn ensure_default_config() -> Result<()> {
        let path = Self::config_path()?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = toml::to_string_pretty(&DashConfig::default())?;
        tokio::fs::write(&path, text).await?;
        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }

    /// Loads the portal from disk. Unreadable or corrupt files degrade to
    /// defaults; only a missing config directory is a hard error.
    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Corrupt configuration {} ({}), using defaults",
                        path.display(),
                        e
                    );
                    DashConfig::default()
                }
            },
            Err(e) => {
                warn!("Unable to read {} ({}), using defaults", path.display(), e);
                DashConfig::default()
            }
        };

        Ok(Self {
            config: RwLock::new(config),
            path,
        })
    }

    /// Clone of the current configuration.
    pub async fn snapshot(&self) -> DashConfig {
        self.config.read().await.clone()
    }

    /// Replaces the configuration and persists it to disk.
    pub async fn replace(&self, new_config: DashConfig) -> Result<()> {
        {
            let mut guard = self.config.write().await;
            *guard = new_config;
        }
        self.save().await
    }

    /// Writes the current configuration to disk.
    pub async fn save(&self) -> Result<()> {
        let text = toml::to_string_pretty(&*self.config.read().await)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, text).await?;
        info!("Configuration saved to {}", self.path.display());
        Ok(())
    }
}
