//! dita-publisher CLI
//!
//! Drives an external DITA toolchain binary: validate inputs, check the
//! installation, list supported transtypes, and run publishes with a
//! bounded timeout and Ctrl-C cancellation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dita_publisher::{
    ConfigStore, DitaInputValidator, InputValidator, InstallationVerifier, NoConfigurationPrompt,
    OtInstallationVerifier, OtTranstypeDiscovery, ProcessRunner, ProgressReporter, PublishIntent,
    PublishOrchestrator, ToolProcessRunner, TranstypeDiscovery,
};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// DITA toolchain publishing assistant
#[derive(Parser)]
#[command(name = "dita-publisher")]
#[command(version = "0.1.0")]
#[command(about = "DITA toolchain publishing assistant", long_about = None)]
struct Cli {
    /// Workspace root holding the settings file (defaults to current directory)
    #[arg(long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a document with the configured toolchain
    Publish {
        /// Input document (.dita, .ditamap, or .bookmap)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output format (defaults to the configured transtype)
        #[arg(short, long)]
        transtype: Option<String>,

        /// Extra toolchain argument (repeatable, appended last)
        #[arg(long = "arg", value_name = "ARG")]
        extra_args: Vec<String>,
    },

    /// Validate an input document without publishing
    Validate {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Check the toolchain installation
    Check,

    /// List output formats the installed toolchain supports
    Transtypes,

    /// Show or update the persisted configuration
    Config {
        /// Set the toolchain binary path
        #[arg(long, value_name = "PATH")]
        set_path: Option<String>,
    },
}

/// Progress sink printing coarse step updates to stderr
struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, percent: u8, message: &str) {
        eprintln!("[{percent:>3}%] {message}");
    }
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let workspace = cli.workspace.unwrap_or_else(|| PathBuf::from("."));
    let store = ConfigStore::new(&workspace);

    match cli.command {
        Commands::Publish {
            input,
            transtype,
            extra_args,
        } => publish_command(store, input, transtype, extra_args, cli.json).await,
        Commands::Validate { input } => validate_command(input, cli.json),
        Commands::Check => check_command(store, cli.json).await,
        Commands::Transtypes => transtypes_command(store, cli.json).await,
        Commands::Config { set_path } => config_command(store, set_path, cli.json).await,
    }
}

async fn publish_command(
    store: ConfigStore,
    input: PathBuf,
    transtype: Option<String>,
    extra_args: Vec<String>,
    json: bool,
) -> Result<i32> {
    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling publish...");
            ctrl_c_token.cancel();
        }
    });

    let mut intent = PublishIntent::new(&input);
    intent.transtype = transtype;
    intent.extra_args = extra_args;

    let orchestrator = PublishOrchestrator::with_defaults();
    let result = orchestrator
        .publish(
            &store,
            intent,
            &ConsoleProgress,
            &NoConfigurationPrompt,
            cancel,
        )
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(if result.success { 0 } else { 1 });
    }

    if result.success {
        println!("✅ Published in {} ms", result.duration_ms);
        if let Some(ref path) = result.output_path {
            println!("   Output: {path}");
        }
        Ok(0)
    } else {
        eprintln!(
            "❌ Publish failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        Ok(1)
    }
}

fn validate_command(input: PathBuf, json: bool) -> Result<i32> {
    let outcome = DitaInputValidator::new().validate(&input);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(if outcome.valid { 0 } else { 1 });
    }

    if outcome.valid {
        println!("✅ {} is publishable", input.display());
        Ok(0)
    } else {
        eprintln!("❌ {}", outcome.error.as_deref().unwrap_or("invalid input"));
        Ok(1)
    }
}

async fn check_command(store: ConfigStore, json: bool) -> Result<i32> {
    let config = store.get().await?;
    let runner: Arc<dyn ProcessRunner> = Arc::new(ToolProcessRunner::new());
    let status = OtInstallationVerifier::new(runner).verify(&config).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(if status.installed { 0 } else { 1 });
    }

    if status.installed {
        match status.version {
            Some(version) => println!("✅ Toolchain installed (version {version})"),
            None => println!("✅ Toolchain installed (version unknown)"),
        }
        Ok(0)
    } else {
        eprintln!(
            "❌ Toolchain not usable: {}",
            status.error.as_deref().unwrap_or("unknown failure")
        );
        Ok(1)
    }
}

async fn transtypes_command(store: ConfigStore, json: bool) -> Result<i32> {
    let config = store.get().await?;
    let runner: Arc<dyn ProcessRunner> = Arc::new(ToolProcessRunner::new());
    let formats = OtTranstypeDiscovery::new(runner).list_formats(&config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&formats)?);
        return Ok(0);
    }

    if formats.is_empty() {
        println!("The toolchain reports no transtypes");
    } else {
        for format in formats {
            println!("{format}");
        }
    }
    Ok(0)
}

async fn config_command(
    store: ConfigStore,
    set_path: Option<String>,
    json: bool,
) -> Result<i32> {
    if let Some(path) = set_path {
        store.set_toolchain_path(&path).await?;
        if !json {
            println!("✅ Toolchain path set to {path}");
        }
    }

    let config = store.get().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("Toolchain path:    {}", if config.is_configured() {
            config.toolchain_path.as_str()
        } else {
            "(not configured)"
        });
        println!("Output root:       {}", config.output_root);
        println!("Default transtype: {}", config.default_transtype);
        println!("Timeout (min):     {}", config.timeout_minutes);
        println!("Extra args:        {:?}", config.extra_args);
    }
    Ok(0)
}
