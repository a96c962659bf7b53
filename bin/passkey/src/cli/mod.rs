use crate::utils::run_until_ctrl_c;
use clap::{value_parser, Parser, Subcommand};

pub mod args;
pub mod commands;

/// The passkey onboarding CLI
#[derive(Debug, Parser)]
#[command(author, version, about = "Passkey onboarding for modular smart accounts", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision the smart account of the owner
    #[command(name = "provision")]
    Provision(commands::ProvisionCommand),

    /// Create (or reload) the passkey credential
    #[command(name = "create-credential")]
    CreateCredential(commands::CreateCredentialCommand),

    /// Install the WebAuthn validator module
    #[command(name = "install-module")]
    InstallModule(commands::InstallModuleCommand),

    /// Send a passkey-signed user operation
    #[command(name = "send")]
    Send(commands::SendCommand),

    /// Run all onboarding steps
    #[command(name = "run")]
    Run(commands::RunCommand),

    /// Print the onboarding status
    #[command(name = "status")]
    Status(commands::StatusCommand),
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    let log_level = cli.get_log_level();
    let directives = ["passkey", "passkey_account", "passkey_onboarding"]
        .map(|target| format!("{target}={log_level}"))
        .join(",");
    let rust_log = match std::env::var("RUST_LOG") {
        Ok(val) => format!("{val},{directives}"),
        Err(_) => directives,
    };
    std::env::set_var("RUST_LOG", rust_log);
    tracing_subscriber::fmt::init();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    let task = async move {
        match cli.command {
            Commands::Provision(command) => command.execute().await,
            Commands::CreateCredential(command) => command.execute().await,
            Commands::InstallModule(command) => command.execute().await,
            Commands::Send(command) => command.execute().await,
            Commands::Run(command) => command.execute().await,
            Commands::Status(command) => command.execute().await,
        }
    };

    rt.block_on(run_until_ctrl_c(task))
}
