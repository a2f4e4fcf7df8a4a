//! Core types for toolchain orchestration: configuration, errors, the
//! publish state machine, and the collaborator interfaces.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod state_machine;
pub mod traits;

pub use config::ToolchainConfig;
pub use config_loader::ConfigStore;
pub use error::PublishError;
pub use state_machine::{PublishState, PublishStateMachine, StateTransition};
pub use traits::{
    CommandSpec, ConfigSource, ConfigurationPrompt, InputValidator, InstallationStatus,
    InstallationVerifier, NoConfigurationPrompt, NoopProgress, ProcessOutcome, ProcessRunner,
    ProgressReporter, PublishRequest, PublishResult, TranstypeDiscovery, ValidationOutcome,
};
