use crate::{
    error::{OnboardingError, Precondition},
    session::Session,
    state::Action,
    storage,
    traits::{
        AccountHandle, AccountProvisioner, Authenticator, ChainReader, CredentialStore,
        ProvisionParams, WalletConnector,
    },
};
use ethers::types::{Address, H256, U256};
use passkey_contracts::utils::increment_execution;
use passkey_primitives::{
    constants::{credential::DISPLAY_NAME, modules::OWNABLE_THRESHOLD},
    webauthn::{encode_signature, mock_signature},
    Credential, NetworkConfig, UserOperationHash,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How the outcome of the validator installation is confirmed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmationStrategy {
    /// Wait for the receipt but ignore a failed wait; the installed status read from the account
    /// afterwards is authoritative.
    #[default]
    VerifyAfterWait,
    /// A failed wait fails the installation
    RequireReceipt,
}

/// Static configuration of the flow
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub network: NetworkConfig,
    pub webauthn_validator: Address,
    /// Counter incremented by the passkey-signed operation
    pub counter: Address,
    /// Display name of created credentials
    pub credential_name: String,
    /// Verify P-256 signatures with the RIP-7212 precompile
    pub use_precompiled: bool,
    pub confirmation: ConfirmationStrategy,
}

impl FlowConfig {
    pub fn new(network: NetworkConfig, webauthn_validator: Address, counter: Address) -> Self {
        Self {
            network,
            webauthn_validator,
            counter,
            credential_name: DISPLAY_NAME.into(),
            use_precompiled: false,
            confirmation: ConfirmationStrategy::default(),
        }
    }
}

/// Result of a passkey-signed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub user_op_hash: UserOperationHash,
    pub transaction_hash: H256,
    /// Counter value after the operation
    pub count: U256,
}

/// Onboarding flow of one session
pub struct OnboardingFlow {
    connector: Arc<dyn WalletConnector>,
    rpc: Option<Arc<dyn ChainReader>>,
    provisioner: Arc<dyn AccountProvisioner>,
    authenticator: Arc<dyn Authenticator>,
    store: Arc<dyn CredentialStore>,
    config: FlowConfig,
    session: Session,
}

impl OnboardingFlow {
    /// Creates the flow and opens its session, loading a stored credential
    pub fn new(
        connector: Arc<dyn WalletConnector>,
        rpc: Option<Arc<dyn ChainReader>>,
        provisioner: Arc<dyn AccountProvisioner>,
        authenticator: Arc<dyn Authenticator>,
        store: Arc<dyn CredentialStore>,
        config: FlowConfig,
    ) -> Result<Self, OnboardingError> {
        let session = Session::open(store.as_ref())?;
        if let Some(credential) = session.credential() {
            info!(id = %credential.id, "Loaded stored passkey credential");
        }

        Ok(Self { connector, rpc, provisioner, authenticator, store, config, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Creates the owner's smart account handle, makes sure the ownable validator is active and
    /// refreshes the counter and validator status of the session.
    pub async fn provision_account(&mut self) -> Result<Address, OnboardingError> {
        let connection = self.connector.connection();
        let owner =
            connection.owner.ok_or(OnboardingError::MissingPrecondition(Precondition::Owner))?;
        let signer = self
            .connector
            .signer()
            .ok_or(OnboardingError::MissingPrecondition(Precondition::OwnerSigner))?;
        let rpc = self.require_rpc()?;

        let expected = self.config.network.chain_id();
        match connection.chain_id {
            Some(connected) if connected != expected => {
                return Err(OnboardingError::WrongChain { expected, connected })
            }
            _ => {}
        }
        self.session.state().transition(Action::ProvisionAccount)?;

        let handle = self
            .provisioner
            .create_account(ProvisionParams {
                owner,
                signer,
                validator: self.config.webauthn_validator,
                network: self.config.network.clone(),
            })
            .await?;
        let address = handle.address();
        self.session.set_account(handle.clone());
        info!(?owner, account = ?address, "Smart account provisioned");

        handle.install_ownable_validator(&[owner], OWNABLE_THRESHOLD).await?;

        let count = rpc.count(address).await?;
        self.session.set_count(count);

        if handle.is_webauthn_validator_installed().await? {
            debug!(account = ?address, "WebAuthn validator already installed");
            self.session.set_validator_installed(true);
        }

        Ok(address)
    }

    /// Provisions the account and returns the session credential, running the registration
    /// ceremony only when no credential exists yet.
    pub async fn create_credential(&mut self) -> Result<Credential, OnboardingError> {
        self.session.state().transition(Action::CreateCredential)?;
        self.provision_account().await?;

        if let Some(credential) = self.session.credential() {
            debug!(id = %credential.id, "Reusing passkey credential");
            return Ok(credential.clone());
        }

        let credential = self.authenticator.create_credential(&self.config.credential_name).await?;
        storage::save_credential(self.store.as_ref(), &credential)?;
        self.session.set_credential(credential.clone());
        info!(id = %credential.id, "Passkey credential created");

        Ok(credential)
    }

    /// Installs the WebAuthn validator bound to the session credential.
    ///
    /// Returns whether the account reports the validator installed afterwards.
    pub async fn install_validator(&mut self) -> Result<bool, OnboardingError> {
        let credential = self
            .session
            .credential()
            .cloned()
            .ok_or(OnboardingError::MissingPrecondition(Precondition::Credential))?;
        let handle = self.require_handle()?;
        self.session.state().transition(Action::InstallValidator)?;

        let _loading = self.session.installing.raise();

        let pub_key = credential.decode_public_key()?;
        let hash = handle.install_webauthn_validator(pub_key, &credential.id).await?;
        info!(%hash, "WebAuthn validator installation submitted");

        match (handle.wait_for_receipt(hash).await, self.config.confirmation) {
            (Ok(receipt), _) => {
                let tx = receipt.tx_receipt.transaction_hash;
                debug!(?tx, "Validator installation included")
            }
            (Err(err), ConfirmationStrategy::VerifyAfterWait) => {
                warn!(%hash, "Waiting for validator installation failed: {err}")
            }
            (Err(err), ConfirmationStrategy::RequireReceipt) => return Err(err.into()),
        }

        let installed = handle.is_webauthn_validator_installed().await?;
        if installed {
            self.session.set_validator_installed(true);
            info!(account = ?handle.address(), "WebAuthn validator installed");
        } else {
            warn!(account = ?handle.address(), "WebAuthn validator not installed");
        }

        Ok(installed)
    }

    /// Sends a passkey-signed operation incrementing the counter and returns the new count
    pub async fn send_operation(&mut self) -> Result<OperationOutcome, OnboardingError> {
        let credential = self
            .session
            .credential()
            .cloned()
            .ok_or(OnboardingError::MissingPrecondition(Precondition::Credential))?;
        let rpc = self.require_rpc()?;
        let handle = self.require_handle()?;
        self.session.state().transition(Action::SendOperation)?;

        let _loading = self.session.sending.raise();

        let mut uo = handle
            .get_user_op(vec![increment_execution(self.config.counter)], mock_signature())
            .await?;
        let hash = handle.get_user_op_hash(&uo).await?;
        debug!(%hash, "Signing user operation with passkey");

        let assertion = self.authenticator.sign(&credential.id, hash.as_fixed_bytes()).await?;
        let use_precompiled = self.config.use_precompiled;
        uo.signature = encode_signature(&assertion.metadata, &assertion.signature, use_precompiled);

        let user_op_hash = handle.send_user_op(uo).await?;
        info!(%user_op_hash, "Passkey-signed user operation sent");
        let receipt = handle.wait_for_receipt(user_op_hash).await?;

        let count = rpc.count(handle.address()).await?;
        self.session.set_count(count);
        self.session.record_operation();
        info!(%count, tx = ?receipt.tx_receipt.transaction_hash, "Counter incremented");

        Ok(OperationOutcome {
            user_op_hash,
            transaction_hash: receipt.tx_receipt.transaction_hash,
            count,
        })
    }

    fn require_rpc(&self) -> Result<Arc<dyn ChainReader>, OnboardingError> {
        self.rpc.clone().ok_or(OnboardingError::MissingPrecondition(Precondition::RpcClient))
    }

    fn require_handle(&self) -> Result<Arc<dyn AccountHandle>, OnboardingError> {
        let handle = self
            .session
            .handle()
            .ok_or(OnboardingError::MissingPrecondition(Precondition::AccountHandle))?;
        self.session
            .smart_account()
            .ok_or(OnboardingError::MissingPrecondition(Precondition::AccountAddress))?;
        Ok(handle)
    }
}
