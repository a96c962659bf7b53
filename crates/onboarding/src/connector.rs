//! Wallet connector backed by a local key
use crate::traits::{Connection, WalletConnector};
use passkey_primitives::Wallet;
use std::sync::Arc;

/// Connector of a wallet held by the process (mnemonic or private key)
#[derive(Debug, Clone, Default)]
pub struct LocalConnector {
    wallet: Option<Arc<Wallet>>,
}

impl LocalConnector {
    pub fn new(wallet: Wallet) -> Self {
        Self { wallet: Some(Arc::new(wallet)) }
    }

    /// Connector with no wallet connected
    pub fn disconnected() -> Self {
        Self::default()
    }
}

impl WalletConnector for LocalConnector {
    fn connection(&self) -> Connection {
        match &self.wallet {
            Some(wallet) => Connection {
                owner: Some(wallet.address()),
                chain_id: Some(ethers::signers::Signer::chain_id(&wallet.signer)),
            },
            None => Connection::default(),
        }
    }

    fn signer(&self) -> Option<Arc<Wallet>> {
        self.wallet.clone()
    }
}
