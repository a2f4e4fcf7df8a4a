//! Integration boundary with the external DITA toolchain binary.
//!
//! The exact command-line flags the toolchain understands live here as
//! constants so the rest of the core stays free of toolchain-specific
//! strings.

pub mod transtypes;
pub mod validator;
pub mod verifier;

pub use transtypes::OtTranstypeDiscovery;
pub use validator::DitaInputValidator;
pub use verifier::OtInstallationVerifier;

use std::time::Duration;

/// Version-query mode argument
pub const VERSION_ARG: &str = "--version";

/// List-formats mode argument
pub const TRANSTYPES_ARG: &str = "transtypes";

/// Publish mode: input file flag
pub const INPUT_FLAG: &str = "-i";

/// Publish mode: output directory flag
pub const OUTPUT_FLAG: &str = "-o";

/// Publish mode: transtype flag
pub const FORMAT_FLAG: &str = "-f";

/// Fixed timeout for installation probes (version query, transtype
/// listing), independent of the user-configured publish timeout. An
/// installation check must not hang as long as a full publish.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(30);
