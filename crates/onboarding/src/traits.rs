//! Collaborators of the onboarding flow
use crate::error::{AuthenticatorError, StorageError};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use passkey_primitives::{
    AccountError, Credential, Execution, NetworkConfig, PublicKey, UserOperation,
    UserOperationHash, UserOperationReceipt, Wallet, WebAuthnAssertion,
};
use std::sync::Arc;

/// Snapshot of the wallet connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connection {
    /// Connected owner (EOA), if any
    pub owner: Option<Address>,
    /// Chain the wallet is connected to
    pub chain_id: Option<u64>,
}

/// Source of the connected owner and its signer
pub trait WalletConnector: Send + Sync {
    fn connection(&self) -> Connection;

    /// Signer of the connected owner
    fn signer(&self) -> Option<Arc<Wallet>>;
}

/// Read access to the chain
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Reads the demo counter of an account
    async fn count(&self, account: Address) -> Result<U256, AccountError>;
}

/// Parameters of a smart account for an owner
#[derive(Debug, Clone)]
pub struct ProvisionParams {
    pub owner: Address,
    pub signer: Arc<Wallet>,
    /// Validator selecting the nonce key of the account's operations
    pub validator: Address,
    pub network: NetworkConfig,
}

/// Creates handles of modular smart accounts
#[async_trait]
pub trait AccountProvisioner: Send + Sync {
    /// Creates a handle of the owner's account.
    ///
    /// The account address is deterministic in the owner; the account may not be deployed yet.
    async fn create_account(
        &self,
        params: ProvisionParams,
    ) -> Result<Arc<dyn AccountHandle>, AccountError>;
}

/// A modular (ERC-7579) smart account reachable through a bundler
#[async_trait]
pub trait AccountHandle: Send + Sync {
    /// Counterfactual address of the account
    fn address(&self) -> Address;

    /// Makes sure the ownable validator is active with the given owners and threshold.
    ///
    /// Deploys the account when it is not deployed yet. Returns once the validator is usable.
    async fn install_ownable_validator(
        &self,
        owners: &[Address],
        threshold: u64,
    ) -> Result<(), AccountError>;

    /// Submits the installation of the WebAuthn validator bound to a passkey
    ///
    /// # Arguments
    /// * `pub_key` - Public key of the passkey
    /// * `authenticator_id` - Credential id of the passkey
    ///
    /// # Returns
    /// * `Ok(UserOperationHash)` - Hash of the submitted installation operation
    /// * `Err(AccountError)` - If the operation could not be built or was rejected
    async fn install_webauthn_validator(
        &self,
        pub_key: PublicKey,
        authenticator_id: &str,
    ) -> Result<UserOperationHash, AccountError>;

    async fn is_webauthn_validator_installed(&self) -> Result<bool, AccountError>;

    /// Builds an unsigned operation executing the calls
    ///
    /// # Arguments
    /// * `executions` - Calls made by the account
    /// * `mock_signature` - Placeholder signature used for gas estimation
    ///
    /// # Returns
    /// * `Ok(UserOperation)` - The operation carrying the placeholder signature
    /// * `Err(AccountError)` - If nonce, fees or gas could not be determined
    async fn get_user_op(
        &self,
        executions: Vec<Execution>,
        mock_signature: Bytes,
    ) -> Result<UserOperation, AccountError>;

    async fn get_user_op_hash(&self, uo: &UserOperation) -> Result<UserOperationHash, AccountError>;

    async fn send_user_op(&self, uo: UserOperation) -> Result<UserOperationHash, AccountError>;

    /// Waits for the receipt of an operation.
    ///
    /// Fails when no receipt arrives in time or the operation reverted.
    async fn wait_for_receipt(
        &self,
        hash: UserOperationHash,
    ) -> Result<UserOperationReceipt, AccountError>;
}

/// WebAuthn authenticator (platform passkey or a software one)
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Runs the registration ceremony
    async fn create_credential(&self, name: &str) -> Result<Credential, AuthenticatorError>;

    /// Runs the assertion ceremony over `challenge`
    async fn sign(
        &self,
        credential_id: &str,
        challenge: &[u8],
    ) -> Result<WebAuthnAssertion, AuthenticatorError>;
}

/// Durable key-value storage of the credential
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
