pub mod core;
pub mod orchestration;
pub mod process;
pub mod toolchain;

pub use crate::core::*;
pub use orchestration::{PublishIntent, PublishOrchestrator};
pub use process::ToolProcessRunner;
pub use toolchain::{DitaInputValidator, OtInstallationVerifier, OtTranstypeDiscovery};
