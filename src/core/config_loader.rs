//! Persisted settings store for the toolchain configuration
//!
//! The store is the only component that touches the settings file; the rest
//! of the core receives an owned [`ToolchainConfig`] per call and never
//! reads global state.

use crate::core::config::{DEFAULT_OUTPUT_FOLDER, ToolchainConfig};
use crate::core::error::PublishError;
use crate::core::traits::ConfigSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Settings file name, relative to the workspace root
const CONFIG_FILENAME: &str = ".dita-publisher.yaml";

/// Reads and writes the persisted toolchain configuration
///
/// Reads always succeed: a missing or partial settings file yields the
/// documented defaults, with `output_root` derived from the workspace root.
/// Writes are last-write-wins; there is no transactional guarantee across a
/// read-then-use sequence.
pub struct ConfigStore {
    workspace_root: PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at the given workspace directory
    pub fn new<P: AsRef<Path>>(workspace_root: P) -> Self {
        Self {
            workspace_root: workspace_root.as_ref().to_path_buf(),
        }
    }

    /// Path of the settings file this store manages
    pub fn settings_path(&self) -> PathBuf {
        self.workspace_root.join(CONFIG_FILENAME)
    }

    /// Load the configuration, falling back to defaults when unset
    pub async fn get(&self) -> Result<ToolchainConfig, PublishError> {
        let path = self.settings_path();

        let mut config = match fs::read_to_string(&path).await {
            Ok(contents) => serde_yaml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ToolchainConfig::default(),
            Err(e) => return Err(PublishError::Io(e)),
        };

        if config.output_root.trim().is_empty() {
            config.output_root = self
                .workspace_root
                .join(DEFAULT_OUTPUT_FOLDER)
                .to_string_lossy()
                .into_owned();
        }
        if config.timeout_minutes == 0 {
            config.timeout_minutes = ToolchainConfig::default().timeout_minutes;
        }

        Ok(config)
    }

    /// Persist a full configuration
    pub async fn save(&self, config: &ToolchainConfig) -> Result<(), PublishError> {
        let yaml = serde_yaml::to_string(config)?;
        fs::write(self.settings_path(), yaml).await?;
        Ok(())
    }

    /// Set the toolchain binary path
    ///
    /// Rejects empty or whitespace-only paths. Other fields are preserved.
    pub async fn set_toolchain_path(&self, path: &str) -> Result<(), PublishError> {
        if path.trim().is_empty() {
            return Err(PublishError::Configuration {
                message: "toolchain path must not be empty".to_string(),
            });
        }

        let mut config = self.get().await?;
        config.toolchain_path = path.trim().to_string();
        self.save(&config).await
    }
}

#[async_trait]
impl ConfigSource for ConfigStore {
    async fn load(&self) -> Result<ToolchainConfig, PublishError> {
        self.get().await
    }
}
