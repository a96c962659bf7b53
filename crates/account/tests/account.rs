mod common;

use alloy_chains::Chain;
use common::{entry_point, start_node, BundlerState, ChainState, MockNode, CHAIN_ID};
use ethers::{
    abi::{self, ParamType, Token},
    providers::{Http, Provider},
    types::{Address, Signature, H256, U256},
    utils::id,
};
use parking_lot::Mutex;
use passkey_account::{AccountConfig, CounterReader, Erc7579Provisioner};
use passkey_contracts::utils::{
    account_salt, bootstrap_init_code, encode_executions, encode_install_validator,
    increment_execution, ownable_validator_init_data, validator_nonce_key,
    webauthn_validator_init_data,
};
use passkey_onboarding::traits::{AccountHandle, AccountProvisioner, ChainReader, ProvisionParams};
use passkey_primitives::{
    authenticator_id_hash, webauthn::mock_signature, AccountError, NetworkConfig, PublicKey,
    UserOperationHash, Wallet,
};
use std::sync::Arc;

const KEY_PHRASE: &str = "test test test test test test test test test test test junk";

fn config() -> AccountConfig {
    AccountConfig {
        factory: Address::repeat_byte(0xfa),
        bootstrap: Address::repeat_byte(0xbb),
        ownable_validator: Address::repeat_byte(0x24),
    }
}

fn webauthn_validator() -> Address {
    Address::repeat_byte(0x2f)
}

fn account() -> Address {
    Address::repeat_byte(0xb2)
}

struct Setup {
    node: MockNode,
    bundler: Arc<Mutex<BundlerState>>,
    chain: Arc<Mutex<ChainState>>,
    wallet: Arc<Wallet>,
}

impl Setup {
    async fn new(chain: ChainState) -> eyre::Result<Self> {
        let bundler = Arc::new(Mutex::new(BundlerState::default()));
        let chain = Arc::new(Mutex::new(ChainState { account: account(), ..chain }));
        let node = start_node(bundler.clone(), chain.clone()).await?;
        let wallet = Arc::new(Wallet::from_phrase(KEY_PHRASE, CHAIN_ID)?);
        Ok(Self { node, bundler, chain, wallet })
    }

    fn owner(&self) -> Address {
        self.wallet.address()
    }

    fn provisioner(&self) -> Erc7579Provisioner<Provider<Http>> {
        Erc7579Provisioner::new(self.node.eth_client.clone(), self.node.bundler.clone(), config())
    }

    async fn account(&self) -> Result<Arc<dyn AccountHandle>, AccountError> {
        self.provisioner()
            .create_account(ProvisionParams {
                owner: self.owner(),
                signer: self.wallet.clone(),
                validator: webauthn_validator(),
                network: NetworkConfig {
                    chain: Chain::from_id(CHAIN_ID),
                    eth_client_address: self.node.url.clone(),
                    bundler_url: self.node.url.clone(),
                    entry_point: entry_point(),
                },
            })
            .await
    }

    fn init_code(&self) -> Vec<u8> {
        let init_data = ownable_validator_init_data(1, &[self.owner()]);
        bootstrap_init_code(config().bootstrap, config().ownable_validator, init_data).to_vec()
    }
}

fn deployed_with(installed: Vec<Address>) -> ChainState {
    ChainState { deployed: true, installed, ..Default::default() }
}

#[tokio::test]
async fn provisioning_resolves_counterfactual_address() -> eyre::Result<()> {
    let setup = Setup::new(ChainState::default()).await?;
    let handle = setup.account().await?;

    assert_eq!(handle.address(), account());
    let chain = setup.chain.lock();
    assert_eq!(
        chain.address_requests,
        vec![(account_salt(setup.owner()).to_vec(), setup.init_code())]
    );
    // resolving the address sends nothing
    assert!(setup.bundler.lock().sent.is_empty());

    Ok(())
}

#[tokio::test]
async fn deployment_bootstraps_ownable_validator() -> eyre::Result<()> {
    let setup = Setup::new(ChainState::default()).await?;
    let handle = setup.account().await?;

    handle.install_ownable_validator(&[setup.owner()], 1).await?;

    let bundler = setup.bundler.lock();
    assert_eq!(bundler.sent.len(), 1);
    let (uo, sent_to) = &bundler.sent[0];
    assert_eq!(*sent_to, entry_point());
    assert_eq!(uo.sender, account());
    assert!(uo.call_data.is_empty());

    // the factory creates the account with the owner salt and the bootstrap init code
    assert_eq!(uo.factory, Some(config().factory));
    let factory_data = uo.factory_data.clone().unwrap_or_default();
    assert_eq!(&factory_data[0..4], &id("createAccount(bytes32,bytes)")[..]);
    let args = abi::decode(&[ParamType::FixedBytes(32), ParamType::Bytes], &factory_data[4..])?;
    assert_eq!(args[0], Token::FixedBytes(account_salt(setup.owner()).to_vec()));
    assert_eq!(args[1], Token::Bytes(setup.init_code()));

    // owner operations use the ownable validator's nonce sequence
    let ownable_key = validator_nonce_key(config().ownable_validator);
    assert_eq!(setup.chain.lock().nonce_keys, vec![ownable_key]);

    // bundler estimation with headroom and network fees (1 gwei base fee)
    assert_eq!(uo.pre_verification_gas, U256::from(51_000));
    assert_eq!(uo.verification_gas_limit, U256::from(200_000));
    assert_eq!(uo.call_gas_limit, U256::from(60_000));
    assert_eq!(uo.max_priority_fee_per_gas, U256::from(3_000_000_000u64));
    assert_eq!(uo.max_fee_per_gas, U256::from(5_000_000_000u64));

    // estimated with a placeholder, sent with the owner's EIP-191 signature
    assert_eq!(bundler.estimated[0].signature.len(), 65);
    assert_ne!(bundler.estimated[0].signature, uo.signature);
    let signature = Signature::try_from(uo.signature.as_ref())?;
    let hash = uo.hash(&entry_point(), CHAIN_ID);
    let recovered = signature.recover(hash.as_fixed_bytes().to_vec())?;
    assert_eq!(recovered, setup.owner());

    // waited for the deployment receipt
    assert_eq!(bundler.polls, 1);

    Ok(())
}

#[tokio::test]
async fn deployed_account_with_ownable_validator_is_left_alone() -> eyre::Result<()> {
    let setup = Setup::new(deployed_with(vec![config().ownable_validator])).await?;
    let handle = setup.account().await?;

    handle.install_ownable_validator(&[setup.owner()], 1).await?;
    assert!(setup.bundler.lock().sent.is_empty());
    assert!(setup.chain.lock().nonce_keys.is_empty());

    Ok(())
}

#[tokio::test]
async fn deployed_account_without_ownable_validator_is_invalid() -> eyre::Result<()> {
    let setup = Setup::new(deployed_with(vec![])).await?;
    let handle = setup.account().await?;

    let result = handle.install_ownable_validator(&[setup.owner()], 1).await;
    assert!(matches!(result, Err(AccountError::InvalidState { .. })));
    assert!(setup.bundler.lock().sent.is_empty());

    Ok(())
}

#[tokio::test]
async fn other_owners_than_the_bootstrap_are_invalid() -> eyre::Result<()> {
    let setup = Setup::new(ChainState::default()).await?;
    let handle = setup.account().await?;

    let result = handle.install_ownable_validator(&[Address::repeat_byte(0x99)], 1).await;
    assert!(matches!(result, Err(AccountError::InvalidState { .. })));
    assert!(setup.chain.lock().nonce_keys.is_empty());
    assert!(setup.bundler.lock().estimated.is_empty());

    Ok(())
}

#[tokio::test]
async fn webauthn_validator_is_installed_by_the_owner() -> eyre::Result<()> {
    let setup = Setup::new(deployed_with(vec![config().ownable_validator])).await?;
    let handle = setup.account().await?;
    assert!(!handle.is_webauthn_validator_installed().await?);

    let pub_key = PublicKey { prefix: 4, x: 7.into(), y: 9.into() };
    let hash = handle.install_webauthn_validator(pub_key, "cred-1").await?;

    {
        let bundler = setup.bundler.lock();
        let (uo, _) = &bundler.sent[0];
        assert_eq!(hash, uo.hash(&entry_point(), CHAIN_ID));
        assert_eq!(uo.factory, None);
        assert_eq!(
            uo.call_data,
            encode_install_validator(
                webauthn_validator(),
                webauthn_validator_init_data(&pub_key, authenticator_id_hash("cred-1"))
            )
        );
        assert_eq!(
            setup.chain.lock().nonce_keys,
            vec![validator_nonce_key(config().ownable_validator)]
        );
    }

    setup.chain.lock().installed.push(webauthn_validator());
    assert!(handle.is_webauthn_validator_installed().await?);

    Ok(())
}

#[tokio::test]
async fn passkey_operation_uses_webauthn_nonce_sequence() -> eyre::Result<()> {
    let setup = Setup::new(ChainState {
        nonce: U256::from(3),
        user_op_hash: H256::repeat_byte(0x5a),
        ..deployed_with(vec![config().ownable_validator, webauthn_validator()])
    })
    .await?;
    let handle = setup.account().await?;

    let executions = vec![increment_execution(Address::repeat_byte(0xc0))];
    let uo = handle.get_user_op(executions.clone(), mock_signature()).await?;

    assert_eq!(uo.sender, account());
    assert_eq!(uo.nonce, U256::from(3));
    assert_eq!(uo.factory, None);
    assert_eq!(uo.call_data, encode_executions(&executions));
    assert_eq!(uo.signature, mock_signature());
    assert_eq!(uo.call_gas_limit, U256::from(60_000));
    assert_eq!(setup.chain.lock().nonce_keys, vec![validator_nonce_key(webauthn_validator())]);
    // building does not submit
    assert!(setup.bundler.lock().sent.is_empty());

    // the challenge comes from the entry point
    assert_eq!(
        handle.get_user_op_hash(&uo).await?,
        UserOperationHash::from(H256::repeat_byte(0x5a))
    );

    let hash = handle.send_user_op(uo.clone()).await?;
    let receipt = handle.wait_for_receipt(hash).await?;
    assert_eq!(receipt.user_operation_hash, hash);
    assert_eq!(setup.bundler.lock().sent[0].0, uo);

    Ok(())
}

#[tokio::test]
async fn counter_is_read_from_chain() -> eyre::Result<()> {
    let setup = Setup::new(ChainState { count: U256::from(2), ..Default::default() }).await?;
    let reader = CounterReader::new(setup.node.eth_client.clone(), Address::repeat_byte(0xc0));

    assert_eq!(reader.count(account()).await?, U256::from(2));

    Ok(())
}
