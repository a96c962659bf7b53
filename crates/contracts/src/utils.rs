//! Calldata and module init data builders
use crate::gen::{
    counter_api::IncrementCall,
    entry_point_api::PackedUserOperation,
    modular_account_api::{ExecuteCall, InstallModuleCall},
};
use ethers::{
    abi::{self, AbiEncode, Token},
    types::{Address, Bytes, H256, U256},
    utils::id,
};
use passkey_primitives::{
    constants::modules::TYPE_VALIDATOR, Execution, PublicKey, UserOperation,
};

/// `singleInitMSA(address,bytes)` of the account bootstrap
const SINGLE_INIT_SIGNATURE: &str = "singleInitMSA(address,bytes)";

impl From<UserOperation> for PackedUserOperation {
    fn from(uo: UserOperation) -> Self {
        Self {
            sender: uo.sender,
            nonce: uo.nonce,
            init_code: uo.init_code(),
            call_data: uo.call_data.clone(),
            account_gas_limits: uo.account_gas_limits(),
            pre_verification_gas: uo.pre_verification_gas,
            gas_fees: uo.gas_fees(),
            paymaster_and_data: uo.paymaster_and_data(),
            signature: uo.signature,
        }
    }
}

/// Execution calldata of a single call: `execute(0x00.., abi.encodePacked(target, value, data))`
pub fn encode_single_execution(execution: &Execution) -> Bytes {
    let mut value = [0u8; 32];
    execution.value.to_big_endian(&mut value);
    let execution_calldata =
        [execution.target.as_bytes(), &value[..], execution.call_data.as_ref()].concat();

    ExecuteCall { mode: [0u8; 32], execution_calldata: execution_calldata.into() }.encode().into()
}

/// Execution calldata of a batch: `execute(0x01.., abi.encode((address,uint256,bytes)[]))`
pub fn encode_batch_execution(executions: &[Execution]) -> Bytes {
    let mut mode = [0u8; 32];
    mode[0] = 0x01;
    let execution_calldata = abi::encode(&[Token::Array(
        executions
            .iter()
            .map(|e| {
                Token::Tuple(vec![
                    Token::Address(e.target),
                    Token::Uint(e.value),
                    Token::Bytes(e.call_data.to_vec()),
                ])
            })
            .collect(),
    )]);

    ExecuteCall { mode, execution_calldata: execution_calldata.into() }.encode().into()
}

/// Execution calldata of one or more calls (single call mode when there is exactly one)
pub fn encode_executions(executions: &[Execution]) -> Bytes {
    match executions {
        [execution] => encode_single_execution(execution),
        executions => encode_batch_execution(executions),
    }
}

/// Calldata installing a validator module on the account
pub fn encode_install_validator(module: Address, init_data: Bytes) -> Bytes {
    InstallModuleCall { module_type_id: U256::from(TYPE_VALIDATOR), module, init_data }
        .encode()
        .into()
}

/// Init data of the ownable validator: `abi.encode(uint256 threshold, address[] owners)`.
///
/// The module requires owners in ascending order.
pub fn ownable_validator_init_data(threshold: u64, owners: &[Address]) -> Bytes {
    let mut owners = owners.to_vec();
    owners.sort();
    owners.dedup();
    abi::encode(&[
        Token::Uint(U256::from(threshold)),
        Token::Array(owners.into_iter().map(Token::Address).collect()),
    ])
    .into()
}

/// Init data of the WebAuthn validator:
/// `abi.encode((uint256 x, uint256 y) pubKey, bytes32 authenticatorIdHash)`
pub fn webauthn_validator_init_data(pub_key: &PublicKey, authenticator_id_hash: H256) -> Bytes {
    abi::encode(&[
        Token::Tuple(vec![Token::Uint(pub_key.x), Token::Uint(pub_key.y)]),
        Token::FixedBytes(authenticator_id_hash.as_bytes().to_vec()),
    ])
    .into()
}

/// Account init code installing a single validator at deployment:
/// `abi.encode(address bootstrap, bytes singleInitMSA(validator, data))`
pub fn bootstrap_init_code(bootstrap: Address, validator: Address, data: Bytes) -> Bytes {
    let call = [
        &id(SINGLE_INIT_SIGNATURE)[..],
        &abi::encode(&[Token::Address(validator), Token::Bytes(data.to_vec())]),
    ]
    .concat();
    abi::encode(&[Token::Address(bootstrap), Token::Bytes(call)]).into()
}

/// Deterministic account salt of an owner
pub fn account_salt(owner: Address) -> [u8; 32] {
    H256::from(owner).to_fixed_bytes()
}

/// Entry point nonce key selecting a validator (`validator << 32`)
pub fn validator_nonce_key(validator: Address) -> U256 {
    U256::from_big_endian(validator.as_bytes()) << 32
}

/// The execution incrementing the demo counter
pub fn increment_execution(counter: Address) -> Execution {
    Execution { target: counter, value: U256::zero(), call_data: IncrementCall {}.encode().into() }
}
