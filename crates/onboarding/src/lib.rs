//! Passkey onboarding flow
//!
//! Drives a user from a connected EOA to a modular smart account that accepts user operations
//! signed with a passkey:
//!
//! 1. [provision the account](OnboardingFlow::provision_account) (bound to the EOA through the
//!    ownable validator),
//! 2. [create or reload the passkey credential](OnboardingFlow::create_credential),
//! 3. [install the WebAuthn validator](OnboardingFlow::install_validator) bound to the credential,
//! 4. [send a passkey-signed user operation](OnboardingFlow::send_operation) incrementing a
//!    counter.
//!
//! Smart account SDK, bundler, chain and authenticator are consumed through the traits in
//! [traits]; the flow itself only sequences them and tracks the [Session].

pub mod authenticator;
pub mod connector;
mod error;
mod flow;
mod session;
mod state;
pub mod storage;
pub mod traits;

pub use error::{AuthenticatorError, OnboardingError, Precondition, StorageError};
pub use flow::{ConfirmationStrategy, FlowConfig, OnboardingFlow, OperationOutcome};
pub use session::Session;
pub use state::{Action, Controls, FlowState};
