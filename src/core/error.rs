//! Error handling for toolchain orchestration
//!
//! This module provides the error taxonomy for the publishing core using
//! the thiserror crate for ergonomic error handling.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for toolchain orchestration operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Configuration errors
    #[error("toolchain is not configured: {message}")]
    Configuration { message: String },

    // Input validation errors
    #[error("input is not publishable: {message}")]
    Validation { message: String },

    // Installation errors
    #[error("toolchain installation check failed: {message}")]
    Installation { message: String },

    // Process spawn errors (the binary could not be started at all)
    #[error("failed to start '{executable}': {message}")]
    Spawn {
        executable: PathBuf,
        message: String,
    },

    // Wall-clock budget exceeded; the process was force-terminated
    #[error("process exceeded the {0:?} time budget")]
    Timeout(Duration),

    // The process ran and exited nonzero
    #[error("process exited with code {code}: {stderr_tail}")]
    Process { code: i32, stderr_tail: String },

    // Settings store I/O
    #[error("settings store error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is malformed: {0}")]
    Serde(#[from] serde_yaml::Error),
}

impl PublishError {
    /// Check if this error is recoverable by the calling layer
    /// (e.g. by prompting for configuration and re-invoking).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Installation { .. } | Self::Validation { .. }
        )
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Installation { .. } => "INSTALLATION_ERROR",
            Self::Spawn { .. } => "SPAWN_ERROR",
            Self::Timeout(_) => "TIMEOUT_ERROR",
            Self::Process { .. } => "PROCESS_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serde(_) => "SETTINGS_PARSE_ERROR",
        }
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::Configuration { .. } => vec![
                "Set the toolchain path with `dita-publisher config --set-path <path>`",
                "Verify the DITA-OT installation directory",
            ],
            Self::Validation { .. } => vec![
                "Check that the input file exists",
                "Use a .dita, .ditamap, or .bookmap input",
            ],
            Self::Installation { .. } => vec![
                "Run `dita-publisher check` to diagnose the installation",
                "Reconfigure the toolchain path if the binary moved",
            ],
            Self::Spawn { .. } => vec![
                "Confirm the configured path points at an executable",
                "Check file permissions on the toolchain binary",
            ],
            Self::Timeout(_) => vec![
                "Increase timeout_minutes in the configuration",
                "Check whether the toolchain is waiting for input",
            ],
            Self::Process { .. } => vec![
                "Inspect the captured stderr output",
                "Re-run the toolchain manually with the same arguments",
            ],
            Self::Io(_) | Self::Serde(_) => {
                vec!["Check the settings file permissions and syntax"]
            }
        }
    }
}
