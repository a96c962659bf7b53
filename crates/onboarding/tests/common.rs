#![allow(dead_code)]

use alloy_chains::{Chain, NamedChain};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, H256, U256};
use parking_lot::Mutex;
use passkey_contracts::utils::encode_executions;
use passkey_onboarding::{
    authenticator::{SoftwareAuthenticator, DEFAULT_ORIGIN, DEFAULT_RP_ID},
    traits::{
        AccountHandle, AccountProvisioner, Authenticator, ChainReader, Connection,
        CredentialStore, ProvisionParams, WalletConnector,
    },
    AuthenticatorError, FlowConfig, OnboardingFlow,
};
use passkey_primitives::{
    webauthn::mock_signature, AccountError, Credential, Execution, NetworkConfig, PublicKey,
    UserOperation, UserOperationHash, UserOperationReceipt, Wallet, WebAuthnAssertion,
};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

pub const KEY_PHRASE: &str = "test test test test test test test test test test test junk";
pub const CHAIN_ID: u64 = 84532;

pub fn owner() -> Address {
    Address::repeat_byte(0xa1)
}

pub fn account() -> Address {
    Address::repeat_byte(0xb2)
}

pub fn network() -> NetworkConfig {
    NetworkConfig {
        chain: Chain::from(NamedChain::BaseSepolia),
        eth_client_address: "http://127.0.0.1:8545".into(),
        bundler_url: "http://127.0.0.1:4337".into(),
        entry_point: "0x0000000071727De22E5E9d8BAf0edAc6f37da032".parse().unwrap(),
    }
}

pub fn config() -> FlowConfig {
    FlowConfig::new(network(), Address::repeat_byte(0x2f), Address::repeat_byte(0xc0))
}

/// On-chain state shared by the fake account and chain reader
#[derive(Debug, Default)]
pub struct ChainState {
    pub count: U256,
    pub deployed: bool,
    pub validator_installed: bool,
    pub ownable_owners: Vec<Address>,
    pub installs: Vec<(PublicKey, String)>,
    pub sent: Vec<UserOperation>,
    pub fail_receipt_wait: bool,
    /// Installation operations are accepted but leave the validator uninstalled
    pub install_ignored: bool,
}

#[derive(Debug, Default)]
pub struct FakeChain {
    pub state: Mutex<ChainState>,
    pub network_calls: AtomicUsize,
}

impl FakeChain {
    pub fn calls(&self) -> usize {
        self.network_calls.load(Ordering::SeqCst)
    }

    fn call(&self) {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeConnector {
    pub owner: Option<Address>,
    pub chain_id: Option<u64>,
    pub wallet: Option<Arc<Wallet>>,
}

impl FakeConnector {
    pub fn connected() -> Self {
        Self {
            owner: Some(owner()),
            chain_id: Some(CHAIN_ID),
            wallet: Some(Arc::new(Wallet::from_phrase(KEY_PHRASE, CHAIN_ID).unwrap())),
        }
    }
}

impl WalletConnector for FakeConnector {
    fn connection(&self) -> Connection {
        Connection { owner: self.owner, chain_id: self.chain_id }
    }

    fn signer(&self) -> Option<Arc<Wallet>> {
        self.wallet.clone()
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn count(&self, _account: Address) -> Result<U256, AccountError> {
        self.call();
        Ok(self.state.lock().count)
    }
}

pub struct FakeProvisioner {
    pub chain: Arc<FakeChain>,
    pub provisioned: AtomicUsize,
}

#[async_trait]
impl AccountProvisioner for FakeProvisioner {
    async fn create_account(
        &self,
        params: ProvisionParams,
    ) -> Result<Arc<dyn AccountHandle>, AccountError> {
        self.chain.call();
        self.provisioned.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeAccount { chain: self.chain.clone(), network: params.network }))
    }
}

pub struct FakeAccount {
    chain: Arc<FakeChain>,
    network: NetworkConfig,
}

fn receipt(hash: UserOperationHash) -> UserOperationReceipt {
    UserOperationReceipt {
        user_operation_hash: hash,
        entry_point: Address::zero(),
        sender: account(),
        nonce: U256::zero(),
        paymaster: None,
        actual_gas_cost: U256::zero(),
        actual_gas_used: U256::zero(),
        success: true,
        reason: String::new(),
        logs: vec![],
        tx_receipt: TransactionReceipt {
            transaction_hash: H256::repeat_byte(0x7e),
            ..Default::default()
        },
    }
}

#[async_trait]
impl AccountHandle for FakeAccount {
    fn address(&self) -> Address {
        account()
    }

    async fn install_ownable_validator(
        &self,
        owners: &[Address],
        _threshold: u64,
    ) -> Result<(), AccountError> {
        self.chain.call();
        let mut state = self.chain.state.lock();
        state.deployed = true;
        state.ownable_owners = owners.to_vec();
        Ok(())
    }

    async fn install_webauthn_validator(
        &self,
        pub_key: PublicKey,
        authenticator_id: &str,
    ) -> Result<UserOperationHash, AccountError> {
        self.chain.call();
        let mut state = self.chain.state.lock();
        state.installs.push((pub_key, authenticator_id.into()));
        if !state.install_ignored {
            state.validator_installed = true;
        }
        Ok(UserOperationHash::repeat_byte(0x11))
    }

    async fn is_webauthn_validator_installed(&self) -> Result<bool, AccountError> {
        self.chain.call();
        Ok(self.chain.state.lock().validator_installed)
    }

    async fn get_user_op(
        &self,
        executions: Vec<Execution>,
        mock_signature: Bytes,
    ) -> Result<UserOperation, AccountError> {
        self.chain.call();
        Ok(UserOperation::default()
            .sender(account())
            .nonce(U256::from(self.chain.state.lock().sent.len()))
            .call_data(encode_executions(&executions))
            .signature(mock_signature))
    }

    async fn get_user_op_hash(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationHash, AccountError> {
        Ok(uo.hash(&self.network.entry_point, self.network.chain_id()))
    }

    async fn send_user_op(&self, uo: UserOperation) -> Result<UserOperationHash, AccountError> {
        self.chain.call();
        if uo.signature == mock_signature() {
            return Err(AccountError::Bundler { inner: "AA24 signature error".into() });
        }
        let hash = uo.hash(&self.network.entry_point, self.network.chain_id());
        let mut state = self.chain.state.lock();
        state.sent.push(uo);
        state.count += U256::one();
        Ok(hash)
    }

    async fn wait_for_receipt(
        &self,
        hash: UserOperationHash,
    ) -> Result<UserOperationReceipt, AccountError> {
        self.chain.call();
        if self.chain.state.lock().fail_receipt_wait {
            return Err(AccountError::ReceiptTimeout(hash));
        }
        Ok(receipt(hash))
    }
}

/// Software authenticator counting ceremonies, optionally declining them
pub struct FakeAuthenticator {
    pub inner: SoftwareAuthenticator,
    pub cancel: AtomicBool,
    pub registrations: AtomicUsize,
    pub assertions: AtomicUsize,
}

impl Default for FakeAuthenticator {
    fn default() -> Self {
        Self {
            inner: SoftwareAuthenticator::random(DEFAULT_RP_ID, DEFAULT_ORIGIN),
            cancel: AtomicBool::new(false),
            registrations: AtomicUsize::new(0),
            assertions: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn create_credential(&self, name: &str) -> Result<Credential, AuthenticatorError> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        if self.cancel.load(Ordering::SeqCst) {
            return Err(AuthenticatorError::Cancelled);
        }
        self.inner.create_credential(name).await
    }

    async fn sign(
        &self,
        credential_id: &str,
        challenge: &[u8],
    ) -> Result<WebAuthnAssertion, AuthenticatorError> {
        self.assertions.fetch_add(1, Ordering::SeqCst);
        if self.cancel.load(Ordering::SeqCst) {
            return Err(AuthenticatorError::Cancelled);
        }
        self.inner.sign(credential_id, challenge).await
    }
}

/// Collaborators of a flow under test
pub struct Harness {
    pub chain: Arc<FakeChain>,
    pub provisioner: Arc<FakeProvisioner>,
    pub authenticator: Arc<FakeAuthenticator>,
    pub store: Arc<dyn CredentialStore>,
}

impl Harness {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let chain = Arc::new(FakeChain::default());
        Self {
            provisioner: Arc::new(FakeProvisioner {
                chain: chain.clone(),
                provisioned: AtomicUsize::new(0),
            }),
            chain,
            authenticator: Arc::new(FakeAuthenticator::default()),
            store,
        }
    }

    pub fn flow(&self, connector: FakeConnector, with_rpc: bool) -> OnboardingFlow {
        self.flow_with(connector, with_rpc, config())
    }

    pub fn flow_with(
        &self,
        connector: FakeConnector,
        with_rpc: bool,
        config: FlowConfig,
    ) -> OnboardingFlow {
        let rpc: Option<Arc<dyn ChainReader>> =
            if with_rpc { Some(self.chain.clone()) } else { None };
        OnboardingFlow::new(
            Arc::new(connector),
            rpc,
            self.provisioner.clone(),
            self.authenticator.clone(),
            self.store.clone(),
            config,
        )
        .unwrap()
    }

    pub fn provisioned(&self) -> usize {
        self.provisioner.provisioned.load(Ordering::SeqCst)
    }

    pub fn registrations(&self) -> usize {
        self.authenticator.registrations.load(Ordering::SeqCst)
    }
}
