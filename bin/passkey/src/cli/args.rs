use crate::utils::{parse_address, parse_chain, parse_duration, validate_private_key};
use alloy_chains::Chain;
use clap::Parser;
use ethers::types::Address;
use expanded_pathbuf::ExpandedPathBuf;
use passkey_onboarding::{
    authenticator::{DEFAULT_ORIGIN, DEFAULT_RP_ID},
    connector::LocalConnector,
};
use passkey_primitives::{
    constants::{
        entry_point,
        modules::{OWNABLE_VALIDATOR_ADDRESS, WEBAUTHN_VALIDATOR_ADDRESS},
        supported_chains::DEFAULT_CHAIN,
    },
    Wallet,
};
use std::time::Duration;

/// Network CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct NetworkArgs {
    /// Ethereum execution client RPC endpoint.
    #[clap(long, default_value = "http://127.0.0.1:8545")]
    pub eth_client_address: String,

    /// Bundler RPC endpoint.
    #[clap(long, default_value = "http://127.0.0.1:4337")]
    pub bundler_url: String,

    /// Chain the smart account lives on.
    ///
    /// By default, this option is set to `base-sepolia`.
    #[clap(long, default_value_t = Chain::from(DEFAULT_CHAIN), value_parser = parse_chain)]
    pub chain: Chain,

    /// Entry point address.
    #[clap(long, default_value = entry_point::ADDRESS, value_parser = parse_address)]
    pub entry_point: Address,

    /// Poll interval of the RPC clients in milliseconds.
    #[clap(long, default_value = "500", value_parser = parse_duration)]
    pub poll_interval: Duration,
}

/// Smart account modules CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct ModuleArgs {
    /// Factory deploying the modular account.
    #[clap(long, value_parser = parse_address)]
    pub factory: Address,

    /// Bootstrap contract initializing the account modules.
    #[clap(long, value_parser = parse_address)]
    pub bootstrap: Address,

    /// Ownable (ECDSA) validator module.
    #[clap(long, default_value = OWNABLE_VALIDATOR_ADDRESS, value_parser = parse_address)]
    pub ownable_validator: Address,

    /// WebAuthn (P-256) validator module.
    #[clap(long, default_value = WEBAUTHN_VALIDATOR_ADDRESS, value_parser = parse_address)]
    pub webauthn_validator: Address,

    /// Counter contract incremented by the passkey-signed user operation.
    #[clap(long, value_parser = parse_address)]
    pub counter: Address,

    /// Verify passkey signatures with the RIP-7212 precompile.
    #[clap(long)]
    pub use_precompiled: bool,

    /// Fail the module installation when its receipt cannot be fetched, instead of checking
    /// the account afterwards.
    #[clap(long)]
    pub require_receipt: bool,
}

/// Owner wallet CLI args
#[derive(Debug, Clone, Parser)]
pub struct WalletArgs {
    /// Path to the mnemonic file of the owner.
    #[clap(long, conflicts_with_all = ["mnemonic", "private_key"])]
    pub mnemonic_file: Option<ExpandedPathBuf>,

    /// Mnemonic phrase of the owner.
    #[clap(long, conflicts_with = "private_key")]
    pub mnemonic: Option<String>,

    /// Hex encoded private key of the owner.
    #[clap(long, value_parser = validate_private_key)]
    pub private_key: Option<String>,
}

impl WalletArgs {
    /// Connector of the configured owner, disconnected when no owner is configured
    pub fn connector(&self, chain_id: u64) -> eyre::Result<LocalConnector> {
        let wallet = match (&self.mnemonic_file, &self.mnemonic, &self.private_key) {
            (Some(path), _, _) => Wallet::from_file(path.clone(), chain_id)?,
            (_, Some(phrase), _) => Wallet::from_phrase(phrase, chain_id)?,
            (_, _, Some(key)) => Wallet::from_private_key(key, chain_id)?,
            _ => return Ok(LocalConnector::disconnected()),
        };
        Ok(LocalConnector::new(wallet))
    }
}

/// Authenticator and credential storage CLI args
#[derive(Debug, Clone, Parser)]
pub struct AuthenticatorArgs {
    /// Data directory (credential and authenticator key).
    ///
    /// By default, this option is set to `~/.passkey`.
    #[clap(long)]
    pub datadir: Option<ExpandedPathBuf>,

    /// Relying party id the authenticator signs for.
    #[clap(long, default_value = DEFAULT_RP_ID)]
    pub rp_id: String,

    /// Origin reported in the client data.
    #[clap(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,
}

/// Args shared by every onboarding command
#[derive(Debug, Clone, Parser)]
pub struct FlowArgs {
    #[clap(flatten)]
    pub network: NetworkArgs,

    #[clap(flatten)]
    pub modules: ModuleArgs,

    #[clap(flatten)]
    pub wallet: WalletArgs,

    #[clap(flatten)]
    pub authenticator: AuthenticatorArgs,
}
