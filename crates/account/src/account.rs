use crate::bundler::{with_slack, BundlerClient};
use async_trait::async_trait;
use ethers::{
    providers::Middleware,
    types::{Address, Bytes},
};
use passkey_contracts::{
    utils::{
        encode_executions, encode_install_validator, ownable_validator_init_data,
        webauthn_validator_init_data,
    },
    ContractCallError, EntryPoint, ModularAccount,
};
use passkey_onboarding::traits::AccountHandle;
use passkey_primitives::{
    authenticator_id_hash, AccountError, Execution, NetworkConfig, PublicKey, UserOperation,
    UserOperationHash, UserOperationReceipt, Wallet,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Owner signature placeholder for gas estimation (65 bytes, never recovers to an owner)
fn dummy_owner_signature() -> Bytes {
    let mut signature = [[0xffu8; 32], [0x7fu8; 32]].concat();
    signature.push(0x1c);
    signature.into()
}

/// Modular (ERC-7579) account operated through a bundler.
///
/// Operations signed by the owner go through the ownable validator; passkey operations use the
/// nonce sequence of the WebAuthn validator.
pub struct Erc7579Account<M: Middleware + 'static> {
    pub(crate) eth_client: Arc<M>,
    pub(crate) bundler: BundlerClient,
    pub(crate) network: NetworkConfig,
    pub(crate) signer: Arc<Wallet>,
    pub(crate) account: ModularAccount<M>,
    pub(crate) entry_point: EntryPoint<M>,
    /// Factory and its calldata, sent along the first operation of an undeployed account
    pub(crate) factory: (Address, Bytes),
    pub(crate) ownable_validator: Address,
    /// Ownable validator init data the account is bootstrapped with
    pub(crate) ownable_init_data: Bytes,
    pub(crate) webauthn_validator: Address,
}

impl<M: Middleware + 'static> Erc7579Account<M> {
    /// Builds a complete unsigned operation: nonce of the validator sequence, factory while
    /// undeployed, network fees and bundler-estimated gas with headroom
    async fn build_user_op(
        &self,
        call_data: Bytes,
        validator: Address,
        signature: Bytes,
    ) -> Result<UserOperation, AccountError> {
        let address = self.account.address();
        let nonce = self.entry_point.get_nonce(address, validator).await?;

        let mut uo = UserOperation::default()
            .sender(address)
            .nonce(nonce)
            .call_data(call_data)
            .signature(signature);
        if !self.account.is_deployed().await? {
            let (factory, factory_data) = self.factory.clone();
            uo = uo.factory(factory, factory_data);
        }

        let (max_fee_per_gas, max_priority_fee_per_gas) = self
            .eth_client
            .estimate_eip1559_fees(None)
            .await
            .map_err(|err| ContractCallError::Provider { inner: err.to_string() })?;
        let uo = uo
            .max_fee_per_gas(max_fee_per_gas)
            .max_priority_fee_per_gas(max_priority_fee_per_gas);

        let estimation = self.bundler.estimate_user_operation_gas(&uo).await?;
        debug!(?estimation, %nonce, "Estimated user operation gas");

        Ok(uo.with_gas_estimation(&with_slack(estimation)))
    }

    /// Sends an operation signed by the owner through the ownable validator
    async fn send_owner_op(&self, call_data: Bytes) -> Result<UserOperationHash, AccountError> {
        let uo =
            self.build_user_op(call_data, self.ownable_validator, dummy_owner_signature()).await?;
        let uo = self
            .signer
            .sign_uo(&uo, &self.network.entry_point, self.network.chain_id())
            .await
            .map_err(|err| AccountError::Signer { inner: err.to_string() })?;

        self.bundler.send_user_operation(&uo).await
    }
}

#[async_trait]
impl<M: Middleware + 'static> AccountHandle for Erc7579Account<M> {
    fn address(&self) -> Address {
        self.account.address()
    }

    async fn install_ownable_validator(
        &self,
        owners: &[Address],
        threshold: u64,
    ) -> Result<(), AccountError> {
        let init_data = ownable_validator_init_data(threshold, owners);
        if init_data != self.ownable_init_data {
            return Err(AccountError::InvalidState {
                inner: "ownable validator owners differ from the account bootstrap".into(),
            });
        }

        if self.account.is_deployed().await? {
            if self.account.is_validator_installed(self.ownable_validator).await? {
                debug!(account = ?self.address(), "Ownable validator already installed");
                return Ok(());
            }
            return Err(AccountError::InvalidState {
                inner: format!(
                    "account {:?} is deployed without the ownable validator",
                    self.address()
                ),
            });
        }

        // the factory bootstraps the ownable validator, deploying installs it
        let hash = self.send_owner_op(Bytes::default()).await?;
        info!(%hash, account = ?self.address(), "Deploying smart account");
        self.bundler.wait_for_receipt(hash).await?;

        Ok(())
    }

    async fn install_webauthn_validator(
        &self,
        pub_key: PublicKey,
        authenticator_id: &str,
    ) -> Result<UserOperationHash, AccountError> {
        let init_data =
            webauthn_validator_init_data(&pub_key, authenticator_id_hash(authenticator_id));
        self.send_owner_op(encode_install_validator(self.webauthn_validator, init_data)).await
    }

    async fn is_webauthn_validator_installed(&self) -> Result<bool, AccountError> {
        Ok(self.account.is_validator_installed(self.webauthn_validator).await?)
    }

    async fn get_user_op(
        &self,
        executions: Vec<Execution>,
        mock_signature: Bytes,
    ) -> Result<UserOperation, AccountError> {
        self.build_user_op(encode_executions(&executions), self.webauthn_validator, mock_signature)
            .await
    }

    async fn get_user_op_hash(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationHash, AccountError> {
        Ok(self.entry_point.get_user_op_hash(uo.clone()).await?)
    }

    async fn send_user_op(&self, uo: UserOperation) -> Result<UserOperationHash, AccountError> {
        self.bundler.send_user_operation(&uo).await
    }

    async fn wait_for_receipt(
        &self,
        hash: UserOperationHash,
    ) -> Result<UserOperationReceipt, AccountError> {
        self.bundler.wait_for_receipt(hash).await
    }
}
