use crate::{cli::args::FlowArgs, utils::unwrap_path_or_home};
use alloy_chains::Chain;
use ethers::providers::Middleware;
use passkey_account::{AccountConfig, BundlerClient, CounterReader, Erc7579Provisioner};
use passkey_onboarding::{
    authenticator::SoftwareAuthenticator, storage::FileCredentialStore, ConfirmationStrategy,
    FlowConfig, OnboardingFlow,
};
use passkey_primitives::{
    constants::credential::AUTHENTICATOR_KEY_FILE_NAME,
    provider::{create_bundler_provider, create_http_provider},
    NetworkConfig,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Connects the flow to the chain, the bundler, the local authenticator and credential storage
pub async fn create_flow(args: FlowArgs) -> eyre::Result<OnboardingFlow> {
    let FlowArgs { network: network_args, modules, wallet, authenticator } = args;

    let eth_client = Arc::new(
        create_http_provider(&network_args.eth_client_address, network_args.poll_interval)
            .await?,
    );
    check_connected_chain(eth_client.clone(), network_args.chain).await?;

    let network = NetworkConfig {
        chain: network_args.chain,
        eth_client_address: network_args.eth_client_address,
        bundler_url: network_args.bundler_url,
        entry_point: network_args.entry_point,
    };
    if !network.is_supported() {
        warn!("Chain {} has no known module deployments", network.chain);
    }

    let bundler = BundlerClient::new(
        Arc::new(create_bundler_provider(&network.bundler_url, network_args.poll_interval)?),
        network.entry_point,
    );
    let entry_points = bundler.supported_entry_points().await?;
    if !entry_points.contains(&network.entry_point) {
        warn!("Bundler does not list entry point {:?} ({entry_points:?})", network.entry_point);
    }

    let datadir = unwrap_path_or_home(authenticator.datadir)?;
    let store = FileCredentialStore::new(datadir.to_path_buf());
    let authenticator = SoftwareAuthenticator::load_or_create(
        &datadir.join(AUTHENTICATOR_KEY_FILE_NAME),
        authenticator.rp_id,
        authenticator.origin,
    )?;
    info!(datadir = %datadir.display(), "Using passkey data directory");

    let connector = wallet.connector(network.chain_id())?;
    let provisioner = Erc7579Provisioner::new(
        eth_client.clone(),
        bundler,
        AccountConfig {
            factory: modules.factory,
            bootstrap: modules.bootstrap,
            ownable_validator: modules.ownable_validator,
        },
    );
    let counter = CounterReader::new(eth_client, modules.counter);

    let mut config = FlowConfig::new(network, modules.webauthn_validator, modules.counter);
    config.use_precompiled = modules.use_precompiled;
    if modules.require_receipt {
        config.confirmation = ConfirmationStrategy::RequireReceipt;
    }

    Ok(OnboardingFlow::new(
        Arc::new(connector),
        Some(Arc::new(counter)),
        Arc::new(provisioner),
        Arc::new(authenticator),
        Arc::new(store),
        config,
    )?)
}

async fn check_connected_chain<M>(eth_client: Arc<M>, chain: Chain) -> eyre::Result<()>
where
    M: Middleware + 'static,
{
    let chain_id = eth_client.get_chainid().await?;
    let chain_conn = Chain::from(chain_id.as_u64());

    if chain_conn != chain {
        return Err(eyre::format_err!(
            "Tried to connect to the execution client of different chain: {} != {}",
            chain,
            chain_conn
        ));
    }

    Ok(())
}
