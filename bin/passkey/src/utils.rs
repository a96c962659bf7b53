use alloy_chains::{Chain, NamedChain};
use dirs::home_dir;
use ethers::types::Address;
use expanded_pathbuf::ExpandedPathBuf;
use passkey_primitives::constants::{credential::DATA_DIR_NAME, supported_chains::CHAINS};
use pin_utils::pin_mut;
use std::{future::Future, str::FromStr, time::Duration};
use tracing::info;

/// Unwrap path or returns the default data directory under home
pub fn unwrap_path_or_home(path: Option<ExpandedPathBuf>) -> eyre::Result<ExpandedPathBuf> {
    if let Some(path) = path {
        Ok(path)
    } else {
        home_dir()
            .map(|h| h.join(DATA_DIR_NAME))
            .ok_or_else(|| eyre::eyre!("Get Home directory error"))
            .map(ExpandedPathBuf)
    }
}

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Parses one of the supported chains from its name (e.g. `base-sepolia`)
pub fn parse_chain(s: &str) -> Result<Chain, String> {
    let named = NamedChain::from_str(s).map_err(|_| format!("String {s} is not a valid chain"))?;
    if !CHAINS.contains(&named) {
        return Err(format!("Chain {s} is not supported"));
    }
    Ok(Chain::from(named))
}

pub fn parse_duration(duration: &str) -> Result<Duration, String> {
    let millis: u64 = duration.parse().map_err(|_| format!("{duration} must be unsigned int"))?;
    Ok(Duration::from_millis(millis))
}

pub fn validate_private_key(hex_string: &str) -> Result<String, String> {
    let key = hex_string.strip_prefix("0x").unwrap_or(hex_string);

    if key.chars().count() != 64 {
        return Err(format!("{hex_string} is not a valid private key"));
    }
    if !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{hex_string} is not a valid hexadecimal string"));
    }

    Ok(String::from(key))
}

/// Runs the future to completion or until:
/// - `ctrl-c` is received.
/// - `SIGTERM` is received (unix only).
pub async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: Send + Sync + 'static + From<std::io::Error>,
{
    let ctrl_c = tokio::signal::ctrl_c();

    let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let sigterm = stream.recv();
    pin_mut!(sigterm, ctrl_c, fut);

    tokio::select! {
        _ = ctrl_c => {
            info!("Received ctrl-c signal.");
        },
        _ = sigterm => {
            info!("Received SIGTERM signal.");
        },
        res = fut => res?,
    }

    Ok(())
}
