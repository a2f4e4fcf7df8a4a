//! Configuration structures for the toolchain orchestrator
//!
//! This module provides type-safe configuration management with serde support.

use serde::{Deserialize, Serialize};

/// Default per-run timeout for a full publish, in minutes
pub const DEFAULT_TIMEOUT_MINUTES: u32 = 10;

/// Default transtype requested when the caller does not specify one
pub const DEFAULT_TRANSTYPE: &str = "html5";

/// Workspace-relative folder used as the output root when unset
pub const DEFAULT_OUTPUT_FOLDER: &str = "output";

/// Persisted toolchain configuration
///
/// All fields have defaults so a missing or partial settings file still
/// yields a usable configuration. An empty `toolchain_path` means
/// "not configured".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolchainConfig {
    /// Path to the toolchain binary (empty = not configured)
    #[serde(default, rename = "toolchainPath")]
    pub toolchain_path: String,

    /// Wall-clock budget for a full publish, in minutes (positive)
    #[serde(default = "default_timeout_minutes", rename = "timeoutMinutes")]
    pub timeout_minutes: u32,

    /// Extra arguments appended after the canonical publish arguments,
    /// so user-supplied overrides win on conflicting flags
    #[serde(default, rename = "extraArgs")]
    pub extra_args: Vec<String>,

    /// Root directory under which per-(file, transtype) output folders live
    #[serde(default, rename = "outputRoot")]
    pub output_root: String,

    /// Transtype used when a publish request does not name one
    #[serde(default = "default_transtype", rename = "defaultTranstype")]
    pub default_transtype: String,
}

fn default_timeout_minutes() -> u32 {
    DEFAULT_TIMEOUT_MINUTES
}

fn default_transtype() -> String {
    DEFAULT_TRANSTYPE.to_string()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            toolchain_path: String::new(),
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            extra_args: Vec::new(),
            output_root: String::new(),
            default_transtype: DEFAULT_TRANSTYPE.to_string(),
        }
    }
}

impl ToolchainConfig {
    /// Whether a toolchain binary has been configured at all
    pub fn is_configured(&self) -> bool {
        !self.toolchain_path.trim().is_empty()
    }
}
