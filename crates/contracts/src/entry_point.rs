use crate::{
    error::ContractCallError,
    gen::{entry_point_api::PackedUserOperation, EntryPointAPI},
    utils::validator_nonce_key,
};
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use passkey_primitives::{UserOperation, UserOperationHash};
use std::sync::Arc;

/// Read-only view of the v0.7 entry point
#[derive(Clone)]
pub struct EntryPoint<M: Middleware + 'static> {
    entry_point_api: EntryPointAPI<M>,
}

impl<M: Middleware + 'static> EntryPoint<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        let entry_point_api = EntryPointAPI::new(address, eth_client);
        Self { entry_point_api }
    }

    /// Next nonce of the account in the sequence selected by the validator
    pub async fn get_nonce(
        &self,
        sender: Address,
        validator: Address,
    ) -> Result<U256, ContractCallError> {
        self.entry_point_api
            .get_nonce(sender, validator_nonce_key(validator))
            .call()
            .await
            .map_err(ContractCallError::from_contract_error)
    }

    /// User operation hash as computed on-chain
    pub async fn get_user_op_hash(
        &self,
        uo: UserOperation,
    ) -> Result<UserOperationHash, ContractCallError> {
        self.entry_point_api
            .get_user_op_hash(PackedUserOperation::from(uo))
            .call()
            .await
            .map(UserOperationHash::from)
            .map_err(ContractCallError::from_contract_error)
    }
}
