use crate::state::{Action, FlowState};
use passkey_primitives::{AccountError, PublicKeyError};
use std::fmt::Display;
use thiserror::Error;

/// A piece of state an action needs before it does any work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Connected owner (EOA) address
    Owner,
    /// Signer of the connected owner
    OwnerSigner,
    /// Chain RPC client
    RpcClient,
    /// Passkey credential
    Credential,
    /// Smart account handle
    AccountHandle,
    /// Smart account address
    AccountAddress,
}

impl Display for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Precondition::Owner => "connected owner",
            Precondition::OwnerSigner => "owner signer",
            Precondition::RpcClient => "rpc client",
            Precondition::Credential => "passkey credential",
            Precondition::AccountHandle => "smart account handle",
            Precondition::AccountAddress => "smart account address",
        };
        write!(f, "{name}")
    }
}

/// Errors of the authenticator ceremonies
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// The user dismissed or declined the ceremony
    #[error("ceremony cancelled by the user")]
    Cancelled,

    /// No authenticator can serve the request
    #[error("authenticator not available: {0}")]
    NotAvailable(String),

    #[error("authenticator error: {0}")]
    Other(String),
}

/// Errors of the credential store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("credential storage i/o error: {0}")]
    Io(String),

    /// A stored entry exists but cannot be decoded
    #[error("stored entry {key} is corrupt: {inner}")]
    Corrupt {
        key: String,
        /// The inner error message
        inner: String,
    },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Errors of the onboarding flow actions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    /// The action was refused before doing any work
    #[error("missing {0}")]
    MissingPrecondition(Precondition),

    /// The connected wallet is on another chain than the flow targets
    #[error("wallet connected to chain {connected}, expected {expected}")]
    WrongChain { expected: u64, connected: u64 },

    #[error(transparent)]
    Authenticator(#[from] AuthenticatorError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored credential carries an undecodable public key
    #[error("invalid credential public key: {0}")]
    PublicKey(#[from] PublicKeyError),

    /// The action is not allowed in the current state of the flow
    #[error("cannot {action} while {state}")]
    InvalidTransition { state: FlowState, action: Action },
}
