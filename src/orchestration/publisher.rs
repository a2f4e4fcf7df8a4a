//! Publish orchestrator
//!
//! Composes input validation, installation verification, output-path
//! resolution, and process execution into one linear workflow with
//! early-exit failure states. Collaborators are injected at construction so
//! tests substitute doubles through normal parameter passing.
//!
//! No retries are attempted automatically: external-tool failures are
//! frequently deterministic for the same inputs, so a failed publish must be
//! re-invoked explicitly by the caller.

use crate::core::config::ToolchainConfig;
use crate::core::error::PublishError;
use crate::core::state_machine::{PublishState, PublishStateMachine};
use crate::core::traits::{
    CommandSpec, ConfigSource, ConfigurationPrompt, InputValidator, InstallationVerifier,
    ProcessRunner, ProgressReporter, PublishRequest, PublishResult,
};
use crate::process::ToolProcessRunner;
use crate::toolchain::{
    DitaInputValidator, FORMAT_FLAG, INPUT_FLAG, OUTPUT_FLAG, OtInstallationVerifier,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Lines of stderr included in failure diagnostics
const STDERR_TAIL_LINES: usize = 8;

/// What the caller wants published, before resolution against configuration
#[derive(Debug, Clone)]
pub struct PublishIntent {
    pub input_path: PathBuf,

    /// Requested transtype; falls back to the configured default when absent
    pub transtype: Option<String>,

    /// Caller-supplied arguments, appended after the configured extras
    pub extra_args: Vec<String>,
}

impl PublishIntent {
    pub fn new<P: AsRef<Path>>(input_path: P) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            transtype: None,
            extra_args: Vec::new(),
        }
    }

    pub fn transtype(mut self, transtype: impl Into<String>) -> Self {
        self.transtype = Some(transtype.into());
        self
    }
}

/// Orchestrates one publish invocation end to end
pub struct PublishOrchestrator {
    validator: Arc<dyn InputValidator>,
    verifier: Arc<dyn InstallationVerifier>,
    runner: Arc<dyn ProcessRunner>,
}

impl PublishOrchestrator {
    /// Construct against explicit collaborator interfaces
    pub fn new(
        validator: Arc<dyn InputValidator>,
        verifier: Arc<dyn InstallationVerifier>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            validator,
            verifier,
            runner,
        }
    }

    /// Wire up the real toolchain collaborators
    pub fn with_defaults() -> Self {
        let runner: Arc<dyn ProcessRunner> = Arc::new(ToolProcessRunner::new());
        Self {
            validator: Arc::new(DitaInputValidator::new()),
            verifier: Arc::new(OtInstallationVerifier::new(Arc::clone(&runner))),
            runner,
        }
    }

    /// Resolve the per-(file, transtype) output directory:
    /// `outputRoot/transtype/<input stem>`. Distinct locations per pair
    /// prevent cross-format clobbering.
    fn resolve_output_dir(config: &ToolchainConfig, input: &Path, transtype: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        PathBuf::from(&config.output_root).join(transtype).join(stem)
    }

    /// Run a full publish
    ///
    /// Every failure path produces a terminal [`PublishResult`]; this method
    /// never panics and never surfaces an error type to the host.
    pub async fn publish(
        &self,
        config_source: &dyn ConfigSource,
        intent: PublishIntent,
        progress: &dyn ProgressReporter,
        prompt: &dyn ConfigurationPrompt,
        cancel: CancellationToken,
    ) -> PublishResult {
        let started = Instant::now();
        let mut machine = PublishStateMachine::new();

        let fail = |machine: PublishStateMachine, error: String| {
            PublishResult::failed(error, started.elapsed().as_millis() as u64, machine)
        };

        // 1. Validate
        machine.transition(PublishState::Validating);
        progress.report(0, "Validating input");
        let outcome = self.validator.validate(&intent.input_path);
        if !outcome.valid {
            let message = outcome
                .error
                .unwrap_or_else(|| "input validation failed".to_string());
            return fail(machine, message);
        }

        // 2. Verify installation, allowing one configuration prompt and
        // reload when the toolchain path is unset
        machine.transition(PublishState::Verifying);
        progress.report(10, "Verifying toolchain installation");

        let mut config = match config_source.load().await {
            Ok(config) => config,
            Err(e) => return fail(machine, e.to_string()),
        };

        if !config.is_configured() {
            if !prompt.request_configuration() {
                return fail(
                    machine,
                    "toolchain is not configured; configuration is required before publishing"
                        .to_string(),
                );
            }
            config = match config_source.load().await {
                Ok(config) => config,
                Err(e) => return fail(machine, e.to_string()),
            };
            if !config.is_configured() {
                return fail(
                    machine,
                    "toolchain is still not configured after the configuration request"
                        .to_string(),
                );
            }
        }

        let status = self.verifier.verify(&config).await;
        if !status.installed {
            let detail = status
                .error
                .unwrap_or_else(|| "unknown installation failure".to_string());
            return fail(
                machine,
                format!("toolchain is not usable ({detail}); reconfigure and try again"),
            );
        }

        // 3. Resolve output directory
        machine.transition(PublishState::ResolvingOutput);
        let transtype = intent
            .transtype
            .clone()
            .unwrap_or_else(|| config.default_transtype.clone());
        let output_dir =
            Self::resolve_output_dir(&config, &intent.input_path, &transtype);

        // 4. Run
        machine.transition(PublishState::Running);
        progress.report(30, &format!("Publishing to {transtype}"));

        // Configured extras first, caller extras last, so caller-supplied
        // overrides win on conflicting flags.
        let mut extra_args = config.extra_args.clone();
        extra_args.extend(intent.extra_args.iter().cloned());

        let request = PublishRequest {
            input_path: intent.input_path.clone(),
            transtype: transtype.clone(),
            output_dir: output_dir.clone(),
            extra_args,
            timeout_minutes: config.timeout_minutes,
        };

        let spec = CommandSpec::new(
            config.toolchain_path.trim(),
            Duration::from_secs(u64::from(request.timeout_minutes) * 60),
        )
        .arg(INPUT_FLAG)
        .arg(request.input_path.to_string_lossy())
        .arg(OUTPUT_FLAG)
        .arg(request.output_dir.to_string_lossy())
        .arg(FORMAT_FLAG)
        .arg(&request.transtype)
        .args(request.extra_args.iter().cloned());

        let outcome = match self.runner.run(spec, cancel).await {
            Ok(outcome) => outcome,
            Err(e) => return fail(machine, e.to_string()),
        };

        // 5. Classify
        if outcome.cancelled {
            return fail(machine, "publish was cancelled".to_string());
        }
        if outcome.timed_out {
            return fail(
                machine,
                PublishError::Timeout(Duration::from_secs(
                    u64::from(request.timeout_minutes) * 60,
                ))
                .to_string(),
            );
        }

        match outcome.exit_code {
            Some(0) => {
                progress.report(100, "Publish complete");
                PublishResult::succeeded(
                    output_dir.to_string_lossy().into_owned(),
                    started.elapsed().as_millis() as u64,
                    machine,
                )
            }
            Some(code) => fail(
                machine,
                PublishError::Process {
                    code,
                    stderr_tail: outcome.stderr_tail(STDERR_TAIL_LINES),
                }
                .to_string(),
            ),
            None => fail(
                machine,
                "toolchain process terminated abnormally".to_string(),
            ),
        }
    }
}
