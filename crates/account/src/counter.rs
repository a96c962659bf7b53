use async_trait::async_trait;
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use passkey_contracts::Counter;
use passkey_onboarding::traits::ChainReader;
use passkey_primitives::AccountError;
use std::sync::Arc;

/// Reads the demo counter through the chain RPC
pub struct CounterReader<M: Middleware + 'static> {
    counter: Counter<M>,
}

impl<M: Middleware + 'static> CounterReader<M> {
    pub fn new(eth_client: Arc<M>, counter: Address) -> Self {
        Self { counter: Counter::new(eth_client, counter) }
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainReader for CounterReader<M> {
    async fn count(&self, account: Address) -> Result<U256, AccountError> {
        Ok(self.counter.count(account).await?)
    }
}
