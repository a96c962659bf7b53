//! Errors of smart account collaborators (provisioning, bundler, chain reads)
use crate::UserOperationHash;
use thiserror::Error;

/// Smart account errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Contract call failed (reverted, ABI or provider error)
    #[error("contract call failed: {inner}")]
    Contract {
        /// The inner error message
        inner: String,
    },

    /// Bundler JSON-RPC request failed
    #[error("bundler error: {inner}")]
    Bundler {
        /// The inner error message
        inner: String,
    },

    /// No receipt was returned before the timeout
    #[error("timed out waiting for receipt of user operation {0}")]
    ReceiptTimeout(UserOperationHash),

    /// The user operation was included but its execution reverted
    #[error("user operation {hash} reverted: {reason}")]
    Reverted {
        hash: UserOperationHash,
        /// Revert reason
        reason: String,
    },

    /// The owner could not sign
    #[error("signer error: {inner}")]
    Signer {
        /// The inner error message
        inner: String,
    },

    /// The account cannot perform the requested operation in its current state
    #[error("invalid account state: {inner}")]
    InvalidState {
        /// The inner error message
        inner: String,
    },
}
