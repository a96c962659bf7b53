//! Utils for creating ethers providers

use ethers::{
    providers::{Http, Middleware, Provider},
    types::Chain,
};
use std::time::Duration;

/// Creates ethers provider with HTTP connection
pub async fn create_http_provider(
    addr: &str,
    poll_interval: Duration,
) -> eyre::Result<Provider<Http>> {
    let provider = Provider::<Http>::try_from(addr)?;

    let chain_id = provider.get_chainid().await?;

    Ok(provider.interval(if chain_id == Chain::Dev.into() {
        Duration::from_millis(5u64)
    } else {
        poll_interval
    }))
}

/// Creates ethers provider for a bundler endpoint (no chain id round trip, bundlers may not
/// serve `eth_chainId`)
pub fn create_bundler_provider(
    addr: &str,
    poll_interval: Duration,
) -> eyre::Result<Provider<Http>> {
    Ok(Provider::<Http>::try_from(addr)?.interval(poll_interval))
}
