use super::args::FlowArgs;
use crate::launch::create_flow;
use clap::Parser;
use passkey_onboarding::{OnboardingError, OnboardingFlow, Precondition};
use tracing::info;

fn print_status(flow: &OnboardingFlow) {
    let session = flow.session();
    for line in session.status_lines() {
        println!("{line}");
    }
    if session.smart_account().is_some() {
        println!("{}", session.count_line());
    }
}

/// Provision the smart account of the owner
#[derive(Debug, Parser)]
pub struct ProvisionCommand {
    #[clap(flatten)]
    flow: FlowArgs,
}

impl ProvisionCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let mut flow = create_flow(self.flow).await?;
        flow.provision_account().await?;
        print_status(&flow);
        Ok(())
    }
}

/// Create the passkey credential (provisions the account first)
#[derive(Debug, Parser)]
pub struct CreateCredentialCommand {
    #[clap(flatten)]
    flow: FlowArgs,
}

impl CreateCredentialCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let mut flow = create_flow(self.flow).await?;
        let credential = flow.create_credential().await?;
        info!("Passkey credential {}", credential.id);
        print_status(&flow);
        Ok(())
    }
}

/// Install the WebAuthn validator bound to the passkey credential
#[derive(Debug, Parser)]
pub struct InstallModuleCommand {
    #[clap(flatten)]
    flow: FlowArgs,
}

impl InstallModuleCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let mut flow = create_flow(self.flow).await?;
        if flow.session().credential().is_none() {
            return Err(OnboardingError::MissingPrecondition(Precondition::Credential).into());
        }
        flow.provision_account().await?;
        if flow.session().validator_installed() {
            info!("WebAuthn validator already installed");
        } else {
            flow.install_validator().await?;
        }
        print_status(&flow);
        Ok(())
    }
}

/// Send a passkey-signed user operation incrementing the counter
#[derive(Debug, Parser)]
pub struct SendCommand {
    #[clap(flatten)]
    flow: FlowArgs,
}

impl SendCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let mut flow = create_flow(self.flow).await?;
        flow.provision_account().await?;
        let outcome = flow.send_operation().await?;
        info!(
            "User operation {} included in transaction {:?}",
            outcome.user_op_hash, outcome.transaction_hash
        );
        print_status(&flow);
        Ok(())
    }
}

/// Run the whole onboarding: account, credential, validator and a first operation
#[derive(Debug, Parser)]
pub struct RunCommand {
    #[clap(flatten)]
    flow: FlowArgs,
}

impl RunCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let mut flow = create_flow(self.flow).await?;
        flow.create_credential().await?;
        if flow.session().controls().install_module && !flow.install_validator().await? {
            return Err(eyre::eyre!("WebAuthn validator is not installed"));
        }
        flow.send_operation().await?;
        print_status(&flow);
        Ok(())
    }
}

/// Print the onboarding status of the owner
#[derive(Debug, Parser)]
pub struct StatusCommand {
    #[clap(flatten)]
    flow: FlowArgs,
}

impl StatusCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let mut flow = create_flow(self.flow).await?;
        if let Some(credential) = flow.session().credential() {
            println!("Stored credential: {}", credential.id);
        }
        flow.provision_account().await?;
        print_status(&flow);
        info!("Onboarding state: {}", flow.session().state());
        Ok(())
    }
}
