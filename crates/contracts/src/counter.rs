use crate::{error::ContractCallError, gen::CounterAPI};
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use std::sync::Arc;

/// Counter contract incremented by the onboarding demo operation
#[derive(Clone)]
pub struct Counter<M: Middleware + 'static> {
    counter_api: CounterAPI<M>,
}

impl<M: Middleware + 'static> Counter<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        let counter_api = CounterAPI::new(address, eth_client);
        Self { counter_api }
    }

    /// Counter value of an account
    pub async fn count(&self, account: Address) -> Result<U256, ContractCallError> {
        self.counter_api.count(account).call().await.map_err(ContractCallError::from_contract_error)
    }
}
