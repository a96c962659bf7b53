//! A `Wallet` is the connected owner (EOA) of the smart account
use crate::{UserOperation, UserOperationHash};
use ethers::{
    prelude::k256::ecdsa::SigningKey,
    signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer},
    types::{Address, Bytes},
};
use expanded_pathbuf::ExpandedPathBuf;

/// Wrapper around ethers wallet signing on behalf of the smart account owner
#[derive(Clone, Debug)]
pub struct Wallet {
    /// Signing key of the wallet
    pub signer: ethers::signers::Wallet<SigningKey>,
}

impl Wallet {
    /// Create a new wallet from the given file containing the mnemonic phrase
    ///
    /// # Arguments
    /// * `path` - The path to the file where the mnemonic phrase is stored
    /// * `chain_id` - The chain id of the blockchain network to be used
    pub fn from_file(path: ExpandedPathBuf, chain_id: u64) -> eyre::Result<Self> {
        let wallet = MnemonicBuilder::<English>::default()
            .phrase(path.to_path_buf())
            .derivation_path("m/44'/60'/0'/0/0")?
            .build()?;

        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Create a new wallet from the given mnemonic phrase
    pub fn from_phrase(phrase: &str, chain_id: u64) -> eyre::Result<Self> {
        let wallet = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .derivation_path("m/44'/60'/0'/0/0")?
            .build()?;

        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Create a new wallet from a hex encoded private key
    pub fn from_private_key(key: &str, chain_id: u64) -> eyre::Result<Self> {
        let wallet = key.parse::<LocalWallet>()?;
        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Address of the owner
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signs a user operation hash (EIP-191 personal message, as ECDSA owner validators expect)
    pub async fn sign_hash(&self, hash: &UserOperationHash) -> eyre::Result<Bytes> {
        let sig = self.signer.sign_message(hash.as_fixed_bytes()).await?;
        Ok(sig.to_vec().into())
    }

    /// Signs the user operation
    ///
    /// # Arguments
    /// * `uo` - The [UserOperation](UserOperation) to be signed
    /// * `ep` - The entry point contract address
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `UserOperation` - The signed [UserOperation](UserOperation)
    pub async fn sign_uo(
        &self,
        uo: &UserOperation,
        ep: &Address,
        chain_id: u64,
    ) -> eyre::Result<UserOperation> {
        let h = uo.hash(ep, chain_id);
        let signature = self.sign_hash(&h).await?;
        Ok(UserOperation { signature, ..uo.clone() })
    }
}
