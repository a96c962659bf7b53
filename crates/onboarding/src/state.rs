//! Onboarding state machine
use crate::error::OnboardingError;
use std::fmt::Display;

/// User facing actions of the onboarding flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ProvisionAccount,
    CreateCredential,
    InstallValidator,
    SendOperation,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::ProvisionAccount => "provision account",
            Action::CreateCredential => "create credential",
            Action::InstallValidator => "install validator module",
            Action::SendOperation => "send user operation",
        };
        write!(f, "{name}")
    }
}

/// Where a session is in the onboarding sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// No smart account handle yet
    Disconnected,
    /// Account handle present, no passkey credential
    Provisioned,
    /// Account and credential present, WebAuthn validator not installed
    CredentialReady,
    /// Validator installation submitted and awaiting confirmation
    Installing,
    /// WebAuthn validator installed, no passkey-signed operation sent yet
    ValidatorInstalled,
    /// Passkey-signed operation submitted and awaiting its receipt
    OperationInFlight,
    /// At least one passkey-signed operation landed
    Ready,
}

impl Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowState::Disconnected => "disconnected",
            FlowState::Provisioned => "provisioned",
            FlowState::CredentialReady => "credential ready",
            FlowState::Installing => "installing validator",
            FlowState::ValidatorInstalled => "validator installed",
            FlowState::OperationInFlight => "operation in flight",
            FlowState::Ready => "ready",
        };
        write!(f, "{name}")
    }
}

impl FlowState {
    /// Whether an action of the flow is awaiting chain confirmation
    pub fn is_busy(&self) -> bool {
        matches!(self, FlowState::Installing | FlowState::OperationInFlight)
    }

    /// Validates `action` against the current state and returns the state the flow enters while
    /// the action runs.
    ///
    /// Provisioning and credential creation are accepted from every idle state. Validator
    /// installation requires an account with a credential and no installed validator; sending
    /// requires the validator.
    pub fn transition(self, action: Action) -> Result<FlowState, OnboardingError> {
        use Action::*;
        use FlowState::*;

        match (self, action) {
            (state, _) if state.is_busy() => {
                Err(OnboardingError::InvalidTransition { state, action })
            }
            (state, ProvisionAccount | CreateCredential) => Ok(state),
            (CredentialReady, InstallValidator) => Ok(Installing),
            (ValidatorInstalled | Ready, SendOperation) => Ok(OperationInFlight),
            (state, action) => Err(OnboardingError::InvalidTransition { state, action }),
        }
    }
}

/// Which actions a front end should offer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub create_credential: bool,
    pub install_module: bool,
    pub send_user_op: bool,
}

impl From<FlowState> for Controls {
    fn from(state: FlowState) -> Self {
        Self {
            create_credential: !state.is_busy(),
            install_module: state.transition(Action::InstallValidator).is_ok(),
            send_user_op: state.transition(Action::SendOperation).is_ok(),
        }
    }
}
