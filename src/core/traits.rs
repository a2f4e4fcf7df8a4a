//! Core traits and types for toolchain orchestration
//!
//! This module defines the collaborator interfaces (validator, verifier,
//! discovery, runner) and the value types they exchange. The orchestrator is
//! constructed against these interfaces so test doubles are substituted by
//! normal parameter passing, never by mutating shared state.

use crate::core::config::ToolchainConfig;
use crate::core::error::PublishError;
use crate::core::state_machine::{PublishState, PublishStateMachine, StateTransition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Input validation
// ============================================================================

/// Result of validating a candidate input document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }
}

/// Decides whether a path is an acceptable input document
pub trait InputValidator: Send + Sync {
    fn validate(&self, path: &Path) -> ValidationOutcome;
}

// ============================================================================
// Installation verification
// ============================================================================

/// Result of probing the configured toolchain installation
///
/// Invariant: `installed == false` implies `version` is absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallationStatus {
    pub installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InstallationStatus {
    pub fn installed(version: Option<String>) -> Self {
        Self {
            installed: true,
            version,
            error: None,
        }
    }

    pub fn not_installed(message: impl Into<String>) -> Self {
        Self {
            installed: false,
            version: None,
            error: Some(message.into()),
        }
    }
}

/// Probes whether the configured toolchain can run at all
#[async_trait]
pub trait InstallationVerifier: Send + Sync {
    async fn verify(&self, config: &ToolchainConfig) -> InstallationStatus;
}

// ============================================================================
// Transtype discovery
// ============================================================================

/// Enumerates the output formats the installed toolchain supports
///
/// Result ordering follows the binary's own output order; an installed
/// toolchain reporting no formats yields an empty list, not an error.
#[async_trait]
pub trait TranstypeDiscovery: Send + Sync {
    async fn list_formats(
        &self,
        config: &ToolchainConfig,
    ) -> Result<Vec<String>, PublishError>;
}

// ============================================================================
// Process execution
// ============================================================================

/// One external invocation: executable, arguments, working dir, time budget
///
/// Immutable once handed to the runner. Arguments are passed as a vector,
/// never interpolated into a shell string.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            working_dir: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Terminal outcome of one process invocation
///
/// `exit_code` is absent when the process was killed (timeout or
/// cancellation). `timed_out` and `cancelled` are mutually exclusive;
/// cancellation wins a near-simultaneous race.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessOutcome {
    #[serde(skip_serializing_if = "Option::is_none", rename = "exitCode")]
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    #[serde(rename = "timedOut")]
    pub timed_out: bool,
    pub cancelled: bool,
    #[serde(rename = "wallClockMs")]
    pub wall_clock_ms: u64,
}

impl ProcessOutcome {
    /// Normal termination with exit code zero
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out && !self.cancelled
    }

    /// Last `max_lines` lines of stderr, for bounded diagnostics
    pub fn stderr_tail(&self, max_lines: usize) -> String {
        let lines: Vec<&str> = self.stderr.lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Spawns an external process and waits on the race of natural exit,
/// wall-clock timeout, and cooperative cancellation
///
/// A nonzero exit code is a normal outcome, not a runner failure; the only
/// error is a spawn failure (binary missing or not startable). The runner
/// returns only after the process's termination is observed, so no process
/// outlives the call.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        spec: CommandSpec,
        cancel: CancellationToken,
    ) -> Result<ProcessOutcome, PublishError>;
}

// ============================================================================
// Publishing
// ============================================================================

/// Fully resolved publish invocation, built by the orchestrator from
/// validated inputs; immutable once constructed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishRequest {
    #[serde(rename = "inputPath")]
    pub input_path: PathBuf,
    pub transtype: String,
    #[serde(rename = "outputDir")]
    pub output_dir: PathBuf,
    #[serde(rename = "extraArgs")]
    pub extra_args: Vec<String>,
    #[serde(rename = "timeoutMinutes")]
    pub timeout_minutes: u32,
}

/// Final result of a publish invocation
///
/// Invariant: success implies `output_path` present and `error` absent;
/// failure implies `error` present. `transitions` is the timestamped
/// state history of the run, ending in the terminal state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    pub state: PublishState,
    #[serde(rename = "stateTransitions")]
    pub transitions: Vec<StateTransition>,
}

impl PublishResult {
    /// Seal the machine in `Succeeded` and take its history into the report
    pub fn succeeded(
        output_path: String,
        duration_ms: u64,
        mut machine: PublishStateMachine,
    ) -> Self {
        machine.transition(PublishState::Succeeded);
        Self {
            success: true,
            output_path: Some(output_path),
            error: None,
            duration_ms,
            state: machine.state(),
            transitions: machine.into_history(),
        }
    }

    /// Seal the machine in `Failed` and take its history into the report
    pub fn failed(
        error: impl Into<String>,
        duration_ms: u64,
        mut machine: PublishStateMachine,
    ) -> Self {
        machine.transition(PublishState::Failed);
        Self {
            success: false,
            output_path: None,
            error: Some(error.into()),
            duration_ms,
            state: machine.state(),
            transitions: machine.into_history(),
        }
    }
}

// ============================================================================
// Configuration access
// ============================================================================

/// Loads the effective toolchain configuration
///
/// The persisted settings store implements this at the system boundary;
/// the orchestrator re-loads through it after a configuration-request
/// callback reports "retry now". Last-write-wins, no re-validation mid-run.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<ToolchainConfig, PublishError>;
}

// ============================================================================
// Host callbacks
// ============================================================================

/// Coarse progress reporting: percentage is monotonically non-decreasing
/// within one publish, messages are short status strings
pub trait ProgressReporter: Send + Sync {
    fn report(&self, percent: u8, message: &str);
}

/// Progress sink that discards all reports
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _percent: u8, _message: &str) {}
}

/// Invoked when the core finds the toolchain unconfigured, letting the
/// calling layer prompt the user; returns true to retry now
pub trait ConfigurationPrompt: Send + Sync {
    fn request_configuration(&self) -> bool;
}

/// Prompt that never retries (non-interactive hosts)
pub struct NoConfigurationPrompt;

impl ConfigurationPrompt for NoConfigurationPrompt {
    fn request_configuration(&self) -> bool {
        false
    }
}
