//! Transtype discovery
//!
//! Asks the installed toolchain which output formats it supports, one
//! format name per output line. Ordering follows the binary's own output;
//! presentation-layer sorting is a caller concern.

use crate::core::config::ToolchainConfig;
use crate::core::error::PublishError;
use crate::core::traits::{CommandSpec, ProcessRunner, TranstypeDiscovery};
use crate::toolchain::{PROBE_TIMEOUT, TRANSTYPES_ARG};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Lists supported output formats via the toolchain's list-formats mode
pub struct OtTranstypeDiscovery {
    runner: Arc<dyn ProcessRunner>,
}

impl OtTranstypeDiscovery {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl TranstypeDiscovery for OtTranstypeDiscovery {
    async fn list_formats(
        &self,
        config: &ToolchainConfig,
    ) -> Result<Vec<String>, PublishError> {
        if !config.is_configured() {
            return Err(PublishError::Installation {
                message: "toolchain is not configured".to_string(),
            });
        }

        let spec =
            CommandSpec::new(config.toolchain_path.trim(), PROBE_TIMEOUT).arg(TRANSTYPES_ARG);

        let outcome = self
            .runner
            .run(spec, CancellationToken::new())
            .await
            .map_err(|e| match e {
                PublishError::Spawn { message, .. } => PublishError::Installation {
                    message: format!("toolchain binary could not be started: {message}"),
                },
                other => other,
            })?;

        if !outcome.succeeded() {
            return Err(PublishError::Installation {
                message: match outcome.exit_code {
                    Some(code) => format!(
                        "transtype listing exited with code {code}: {}",
                        outcome.stderr_tail(8)
                    ),
                    None => "transtype listing did not terminate normally".to_string(),
                },
            });
        }

        // An installed toolchain reporting no formats is an empty list,
        // not an error.
        Ok(outcome
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
