//! Toolchain installation verification
//!
//! Probes the configured binary in version-query mode and classifies the
//! result. A binary that runs cleanly but prints nothing version-like is
//! still installed; "ran successfully" is not conflated with "parseable
//! version".

use crate::core::config::ToolchainConfig;
use crate::core::error::PublishError;
use crate::core::traits::{
    CommandSpec, InstallationStatus, InstallationVerifier, ProcessRunner,
};
use crate::toolchain::{PROBE_TIMEOUT, VERSION_ARG};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

lazy_static! {
    /// Version-like pattern: digits separated by dots
    static ref VERSION_PATTERN: Regex = Regex::new(r"\d+(?:\.\d+)+").unwrap();
}

/// Extract the first version-like token from probe output
pub fn parse_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find_map(|line| VERSION_PATTERN.find(line))
        .map(|m| m.as_str().to_string())
}

/// Verifies the configured toolchain by running its version query
///
/// The probe uses the fixed [`PROBE_TIMEOUT`], never the user-configured
/// publish timeout. The status is recomputed on every call; callers decide
/// whether to cache it.
pub struct OtInstallationVerifier {
    runner: Arc<dyn ProcessRunner>,
}

impl OtInstallationVerifier {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl InstallationVerifier for OtInstallationVerifier {
    async fn verify(&self, config: &ToolchainConfig) -> InstallationStatus {
        if !config.is_configured() {
            return InstallationStatus::not_installed("toolchain is not configured");
        }

        let spec =
            CommandSpec::new(config.toolchain_path.trim(), PROBE_TIMEOUT).arg(VERSION_ARG);

        let outcome = match self.runner.run(spec, CancellationToken::new()).await {
            Ok(outcome) => outcome,
            Err(PublishError::Spawn { message, .. }) => {
                return InstallationStatus::not_installed(format!(
                    "toolchain binary could not be started: {message}"
                ));
            }
            Err(e) => return InstallationStatus::not_installed(e.to_string()),
        };

        if outcome.timed_out {
            return InstallationStatus::not_installed("version probe timed out");
        }
        if outcome.cancelled {
            return InstallationStatus::not_installed("version probe was cancelled");
        }

        match outcome.exit_code {
            Some(0) => InstallationStatus::installed(parse_version(&outcome.stdout)),
            Some(code) => InstallationStatus::not_installed(format!(
                "version probe exited with code {code}"
            )),
            None => InstallationStatus::not_installed("version probe was killed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::ProcessOutcome;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Runner double returning a canned result per call
    struct StubRunner {
        results: Mutex<Vec<Result<ProcessOutcome, PublishError>>>,
    }

    impl StubRunner {
        fn returning(result: Result<ProcessOutcome, PublishError>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(vec![result]),
            })
        }
    }

    #[async_trait]
    impl ProcessRunner for StubRunner {
        async fn run(
            &self,
            _spec: CommandSpec,
            _cancel: CancellationToken,
        ) -> Result<ProcessOutcome, PublishError> {
            self.results.lock().unwrap().pop().expect("unexpected run call")
        }
    }

    fn outcome(exit_code: Option<i32>, stdout: &str) -> ProcessOutcome {
        ProcessOutcome {
            exit_code,
            stdout: stdout.to_string(),
            stderr: String::new(),
            timed_out: false,
            cancelled: false,
            wall_clock_ms: 5,
        }
    }

    fn configured() -> ToolchainConfig {
        ToolchainConfig {
            toolchain_path: "/opt/dita-ot/bin/dita".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_version_first_matching_line() {
        let stdout = "DITA Open Toolkit\nversion 4.2.1 (build 1234)\n4.0.0\n";
        assert_eq!(parse_version(stdout).as_deref(), Some("4.2.1"));
    }

    #[test]
    fn test_parse_version_none_when_absent() {
        assert_eq!(parse_version("no digits here\n"), None);
        // A lone integer is not digits-separated-by-dots
        assert_eq!(parse_version("build 1234\n"), None);
    }

    #[tokio::test]
    async fn test_unconfigured_fails_fast() {
        // The stub would panic if the runner were invoked
        let runner = Arc::new(StubRunner {
            results: Mutex::new(vec![]),
        });
        let verifier = OtInstallationVerifier::new(runner);

        let status = verifier.verify(&ToolchainConfig::default()).await;
        assert!(!status.installed);
        assert!(status.error.as_deref().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_clean_exit_with_version() {
        let runner = StubRunner::returning(Ok(outcome(Some(0), "DITA-OT version 4.2.1\n")));
        let verifier = OtInstallationVerifier::new(runner);

        let status = verifier.verify(&configured()).await;
        assert!(status.installed);
        assert_eq!(status.version.as_deref(), Some("4.2.1"));
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn test_clean_exit_without_parseable_version() {
        let runner = StubRunner::returning(Ok(outcome(Some(0), "ready\n")));
        let verifier = OtInstallationVerifier::new(runner);

        let status = verifier.verify(&configured()).await;
        assert!(status.installed);
        assert!(status.version.is_none());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_installed() {
        let runner = StubRunner::returning(Ok(outcome(Some(2), "")));
        let verifier = OtInstallationVerifier::new(runner);

        let status = verifier.verify(&configured()).await;
        assert!(!status.installed);
        assert!(status.version.is_none());
        assert!(status.error.as_deref().unwrap().contains("code 2"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_not_installed() {
        let runner = StubRunner::returning(Err(PublishError::Spawn {
            executable: PathBuf::from("/opt/dita-ot/bin/dita"),
            message: "Permission denied".to_string(),
        }));
        let verifier = OtInstallationVerifier::new(runner);

        let status = verifier.verify(&configured()).await;
        assert!(!status.installed);
        assert!(status.error.as_deref().unwrap().contains("Permission denied"));
    }

    #[tokio::test]
    async fn test_probe_timeout_is_not_installed() {
        let timed_out = ProcessOutcome {
            timed_out: true,
            exit_code: None,
            ..outcome(None, "")
        };
        let runner = StubRunner::returning(Ok(timed_out));
        let verifier = OtInstallationVerifier::new(runner);

        let status = verifier.verify(&configured()).await;
        assert!(!status.installed);
        assert!(status.error.as_deref().unwrap().contains("timed out"));
    }
}
