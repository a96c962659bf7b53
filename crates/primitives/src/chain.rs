//! Network configuration of the onboarding flow
use crate::constants::supported_chains::CHAINS;
use alloy_chains::Chain;
use ethers::types::Address;

/// Target network of the smart account (chain, RPC endpoints and entry point)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Chain the account lives on
    pub chain: Chain,
    /// Ethereum execution client RPC endpoint
    pub eth_client_address: String,
    /// Bundler (user operation relay) RPC endpoint
    pub bundler_url: String,
    /// Entry point contract address
    pub entry_point: Address,
}

impl NetworkConfig {
    pub fn chain_id(&self) -> u64 {
        self.chain.id()
    }

    /// Whether the configured chain is one the flow has module deployments for
    pub fn is_supported(&self) -> bool {
        self.chain.named().map(|named| CHAINS.contains(&named)).unwrap_or(false)
    }
}
