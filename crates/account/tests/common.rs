#![allow(dead_code)]

use async_trait::async_trait;
use ethers::{
    abi::{self, ParamType, Token},
    providers::{Http, Provider},
    types::{Address, Block, Bytes, FeeHistory, TransactionReceipt, H256, U256},
    utils::id,
};
use jsonrpsee::{
    core::RpcResult,
    proc_macros::rpc,
    server::{ServerBuilder, ServerHandle},
    types::ErrorObjectOwned,
};
use parking_lot::Mutex;
use passkey_account::BundlerClient;
use passkey_primitives::{
    UserOperation, UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

pub const CHAIN_ID: u64 = 84532;

/// Base fee of the latest block (1 gwei)
pub const BASE_FEE: u64 = 1_000_000_000;

pub fn entry_point() -> Address {
    "0x0000000071727De22E5E9d8BAf0edAc6f37da032".parse().unwrap()
}

#[rpc(server, namespace = "eth")]
pub trait MockBundlerApi {
    #[method(name = "supportedEntryPoints")]
    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>>;

    #[method(name = "estimateUserOperationGas")]
    async fn estimate_user_operation_gas(
        &self,
        uo: UserOperation,
        entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation>;

    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        uo: UserOperation,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash>;

    #[method(name = "getUserOperationReceipt")]
    async fn get_user_operation_receipt(
        &self,
        hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>>;
}

#[rpc(server, namespace = "eth")]
pub trait MockEthApi {
    #[method(name = "call")]
    async fn call(&self, tx: CallRequest, block: Option<String>) -> RpcResult<Bytes>;

    #[method(name = "getCode")]
    async fn get_code(&self, address: Address, block: Option<String>) -> RpcResult<Bytes>;

    #[method(name = "getBlockByNumber")]
    async fn get_block_by_number(
        &self,
        block: String,
        full: bool,
    ) -> RpcResult<Option<Block<H256>>>;

    #[method(name = "feeHistory")]
    async fn fee_history(
        &self,
        block_count: U256,
        last_block: String,
        reward_percentiles: Vec<f64>,
    ) -> RpcResult<FeeHistory>;
}

/// What the mock bundler has seen and how it answers
#[derive(Debug, Default)]
pub struct BundlerState {
    pub estimated: Vec<UserOperation>,
    pub sent: Vec<(UserOperation, Address)>,
    /// Receipt polls answered with `null` before the receipt shows up
    pub pending_polls: usize,
    pub polls: usize,
    /// Execution outcome reported in receipts
    pub reverted: bool,
    /// Never produce a receipt
    pub dropped: bool,
}

/// Contract state behind the mock execution client
#[derive(Debug, Default)]
pub struct ChainState {
    /// Counterfactual address returned by the factory
    pub account: Address,
    /// Whether the account has code
    pub deployed: bool,
    /// Validators reported by `isModuleInstalled`
    pub installed: Vec<Address>,
    pub nonce: U256,
    pub count: U256,
    /// Hash returned by `getUserOpHash`
    pub user_op_hash: H256,
    /// Keys passed to `getNonce`
    pub nonce_keys: Vec<U256>,
    /// Salt and init code passed to the factory's `getAddress`
    pub address_requests: Vec<(Vec<u8>, Vec<u8>)>,
}

/// Transaction fields of `eth_call` the mock reads
#[derive(Debug, Deserialize)]
pub struct CallRequest {
    pub to: Address,
    #[serde(alias = "input")]
    pub data: Bytes,
}

pub struct MockBundler {
    pub state: Arc<Mutex<BundlerState>>,
}

pub struct MockChain {
    pub state: Arc<Mutex<ChainState>>,
}

fn invalid_call(message: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(-32000, message.into(), None::<()>)
}

fn decode_args(types: &[ParamType], data: &[u8]) -> RpcResult<Vec<Token>> {
    abi::decode(types, &data[4..]).map_err(|err| invalid_call(err.to_string()))
}

#[async_trait]
impl MockBundlerApiServer for MockBundler {
    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>> {
        Ok(vec![entry_point()])
    }

    async fn estimate_user_operation_gas(
        &self,
        uo: UserOperation,
        _entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation> {
        self.state.lock().estimated.push(uo);
        Ok(UserOperationGasEstimation {
            pre_verification_gas: 50_000.into(),
            verification_gas_limit: 100_000.into(),
            call_gas_limit: 30_000.into(),
            paymaster_verification_gas_limit: None,
        })
    }

    async fn send_user_operation(
        &self,
        uo: UserOperation,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash> {
        let hash = uo.hash(&entry_point, CHAIN_ID);
        self.state.lock().sent.push((uo, entry_point));
        Ok(hash)
    }

    async fn get_user_operation_receipt(
        &self,
        hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>> {
        let mut state = self.state.lock();
        state.polls += 1;
        if state.dropped || state.polls <= state.pending_polls {
            return Ok(None);
        }

        let sender = state.sent.last().map(|(uo, _)| uo.sender).unwrap_or_default();
        Ok(Some(UserOperationReceipt {
            user_operation_hash: hash,
            entry_point: entry_point(),
            sender,
            nonce: U256::zero(),
            paymaster: None,
            actual_gas_cost: 1_000.into(),
            actual_gas_used: 100.into(),
            success: !state.reverted,
            reason: if state.reverted { "0x".into() } else { String::new() },
            logs: vec![],
            tx_receipt: TransactionReceipt {
                transaction_hash: H256::repeat_byte(0x7e),
                ..Default::default()
            },
        }))
    }
}

#[async_trait]
impl MockEthApiServer for MockChain {
    async fn call(&self, tx: CallRequest, _block: Option<String>) -> RpcResult<Bytes> {
        if tx.data.len() < 4 {
            return Err(invalid_call("missing selector"));
        }
        let selector = &tx.data[0..4];
        let mut state = self.state.lock();

        let output = if selector == &id("getNonce(address,uint192)")[..] {
            let args = decode_args(&[ParamType::Address, ParamType::Uint(192)], &tx.data)?;
            if let Token::Uint(key) = args[1] {
                state.nonce_keys.push(key);
            }
            abi::encode(&[Token::Uint(state.nonce)])
        } else if selector == &id("isModuleInstalled(uint256,address,bytes)")[..] {
            let args = decode_args(
                &[ParamType::Uint(256), ParamType::Address, ParamType::Bytes],
                &tx.data,
            )?;
            let installed = match args[1] {
                Token::Address(module) => state.installed.contains(&module),
                _ => false,
            };
            abi::encode(&[Token::Bool(installed)])
        } else if selector == &id("getAddress(bytes32,bytes)")[..] {
            let args = decode_args(&[ParamType::FixedBytes(32), ParamType::Bytes], &tx.data)?;
            if let (Token::FixedBytes(salt), Token::Bytes(init_code)) = (&args[0], &args[1]) {
                state.address_requests.push((salt.clone(), init_code.clone()));
            }
            abi::encode(&[Token::Address(state.account)])
        } else if selector == &id("count(address)")[..] {
            abi::encode(&[Token::Uint(state.count)])
        } else if tx.to == entry_point() {
            // getUserOpHash, its packed tuple argument is not inspected
            abi::encode(&[Token::FixedBytes(state.user_op_hash.as_bytes().to_vec())])
        } else {
            return Err(invalid_call(format!("unknown call to {:?}", tx.to)));
        };

        Ok(output.into())
    }

    async fn get_code(&self, address: Address, _block: Option<String>) -> RpcResult<Bytes> {
        let state = self.state.lock();
        if state.deployed && address == state.account {
            Ok(Bytes::from(vec![0x60, 0x80, 0x60, 0x40]))
        } else {
            Ok(Bytes::default())
        }
    }

    async fn get_block_by_number(
        &self,
        _block: String,
        _full: bool,
    ) -> RpcResult<Option<Block<H256>>> {
        Ok(Some(Block {
            number: Some(1.into()),
            base_fee_per_gas: Some(BASE_FEE.into()),
            ..Default::default()
        }))
    }

    async fn fee_history(
        &self,
        block_count: U256,
        _last_block: String,
        _reward_percentiles: Vec<f64>,
    ) -> RpcResult<FeeHistory> {
        Ok(FeeHistory {
            base_fee_per_gas: vec![BASE_FEE.into(); block_count.as_usize() + 1],
            gas_used_ratio: vec![0.5; block_count.as_usize()],
            oldest_block: 1.into(),
            reward: vec![],
        })
    }
}

/// Mock bundler and execution client served from one endpoint
pub struct MockNode {
    pub bundler: BundlerClient,
    pub eth_client: Arc<Provider<Http>>,
    pub url: String,
    pub handle: ServerHandle,
}

/// Starts the mock node; its bundler client polls every few milliseconds
pub async fn start_node(
    bundler: Arc<Mutex<BundlerState>>,
    chain: Arc<Mutex<ChainState>>,
) -> eyre::Result<MockNode> {
    let server = ServerBuilder::default().build("127.0.0.1:0").await?;
    let address = server.local_addr()?;

    let mut module = MockBundler { state: bundler }.into_rpc();
    module.merge(MockChain { state: chain }.into_rpc())?;
    let handle = server.start(module);

    let url = format!("http://{address}");
    let provider = Arc::new(Provider::<Http>::try_from(url.as_str())?);
    let client = BundlerClient::new(provider.clone(), entry_point())
        .with_receipt_polling(Duration::from_millis(5), Duration::from_millis(200));

    Ok(MockNode { bundler: client, eth_client: provider, url, handle })
}

/// Starts the mock node and returns its bundler client
pub async fn start_bundler(
    state: Arc<Mutex<BundlerState>>,
) -> eyre::Result<(BundlerClient, ServerHandle)> {
    let node = start_node(state, Arc::new(Mutex::new(ChainState::default()))).await?;
    Ok((node.bundler, node.handle))
}
