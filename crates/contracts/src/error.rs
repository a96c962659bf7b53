use ethers::{
    abi::AbiDecode,
    prelude::ContractError,
    providers::{Middleware, ProviderError},
    types::Bytes,
};
use passkey_primitives::AccountError;
use thiserror::Error;

/// Errors of calls into the account, factory, entry point and counter contracts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractCallError {
    /// execution reverted
    #[error("execution reverted: {0}")]
    ExecutionReverted(String),

    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// ABI error
    #[error("abi error: {inner}")]
    ABI {
        /// The inner error message
        inner: String,
    },

    /// Data decoding error
    #[error("decode error: {inner}")]
    Decode {
        /// The inner error message
        inner: String,
    },

    /// Any other error
    #[error("other error: {inner}")]
    Other {
        /// The inner error message
        inner: String,
    },
}

impl ContractCallError {
    pub fn from_contract_error<M: Middleware>(err: ContractError<M>) -> Self {
        match err {
            ContractError::DecodingError(e) => Self::Decode { inner: e.to_string() },
            ContractError::AbiError(e) => Self::ABI { inner: e.to_string() },
            ContractError::MiddlewareError { e } => Self::Provider { inner: e.to_string() },
            ContractError::ProviderError { e } => Self::from_provider_error(&e),
            ContractError::Revert(data) => Self::ExecutionReverted(
                decode_revert_string(data.clone()).unwrap_or_else(|| data.to_string()),
            ),
            _ => Self::Other { inner: err.to_string() },
        }
    }

    pub fn from_provider_error(err: &ProviderError) -> Self {
        match err {
            ProviderError::JsonRpcClientError(err) => match err.as_error_response() {
                Some(resp) => Self::Provider { inner: resp.message.clone() },
                None => Self::Provider { inner: format!("unknown json-rpc client error: {err:?}") },
            },
            ProviderError::HTTPError(err) => {
                Self::Provider { inner: format!("HTTP error: {err:?}") }
            }
            _ => Self::Provider { inner: format!("unknown provider error: {err:?}") },
        }
    }
}

impl From<ContractCallError> for AccountError {
    fn from(err: ContractCallError) -> Self {
        AccountError::Contract { inner: err.to_string() }
    }
}

/// Decodes `Error(string)` revert data
pub fn decode_revert_string(data: Bytes) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (error_sig, reason) = data.split_at(4);
    if error_sig == [0x08, 0xc3, 0x79, 0xa0] {
        <String as AbiDecode>::decode(reason).ok()
    } else {
        None
    }
}
