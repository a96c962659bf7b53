//! Passkey account primitive types
//!
//! This crate contains the types shared by the onboarding flow and its collaborators: ERC-4337
//! (v0.7) user operations, the persisted passkey credential, P-256 public key decoding and the
//! byte layout expected by the on-chain WebAuthn validator module.

pub mod chain;
pub mod constants;
mod credential;
mod error;
pub mod provider;
mod user_operation;
mod utils;
mod wallet;
pub mod webauthn;

pub use chain::NetworkConfig;
pub use credential::{authenticator_id_hash, Credential, PublicKey, PublicKeyError};
pub use error::AccountError;
pub use user_operation::{
    Execution, UserOperation, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt,
};
pub use utils::pack_uint128;
pub use wallet::Wallet;
pub use webauthn::{P256Signature, WebAuthnAssertion, WebAuthnMetadata};
