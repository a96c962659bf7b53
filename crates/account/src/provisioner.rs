use crate::{account::Erc7579Account, bundler::BundlerClient};
use async_trait::async_trait;
use ethers::{providers::Middleware, types::Address};
use passkey_contracts::{
    utils::{account_salt, bootstrap_init_code, ownable_validator_init_data},
    AccountFactory, ContractCallError, EntryPoint, ModularAccount,
};
use passkey_onboarding::traits::{AccountHandle, AccountProvisioner, ProvisionParams};
use passkey_primitives::{constants::modules::OWNABLE_THRESHOLD, AccountError};
use std::sync::Arc;
use tracing::debug;

/// Deployment of the account stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountConfig {
    /// Factory deploying the account
    pub factory: Address,
    /// Bootstrap initializing the account modules at deployment
    pub bootstrap: Address,
    pub ownable_validator: Address,
}

/// Provisions ERC-7579 accounts at their counterfactual factory address
pub struct Erc7579Provisioner<M: Middleware + 'static> {
    eth_client: Arc<M>,
    bundler: BundlerClient,
    config: AccountConfig,
}

impl<M: Middleware + 'static> Erc7579Provisioner<M> {
    pub fn new(eth_client: Arc<M>, bundler: BundlerClient, config: AccountConfig) -> Self {
        Self { eth_client, bundler, config }
    }
}

#[async_trait]
impl<M: Middleware + 'static> AccountProvisioner for Erc7579Provisioner<M> {
    async fn create_account(
        &self,
        params: ProvisionParams,
    ) -> Result<Arc<dyn AccountHandle>, AccountError> {
        let ownable_init_data = ownable_validator_init_data(OWNABLE_THRESHOLD, &[params.owner]);
        let init_code = bootstrap_init_code(
            self.config.bootstrap,
            self.config.ownable_validator,
            ownable_init_data.clone(),
        );
        let salt = account_salt(params.owner);

        let factory = AccountFactory::new(self.eth_client.clone(), self.config.factory);
        let address = factory.get_address(salt, init_code.clone()).await?;
        let factory_data = factory.create_account_data(salt, init_code).ok_or_else(|| {
            ContractCallError::ABI { inner: "cannot encode createAccount calldata".into() }
        })?;
        debug!(owner = ?params.owner, account = ?address, "Resolved counterfactual account");

        Ok(Arc::new(Erc7579Account {
            eth_client: self.eth_client.clone(),
            bundler: self.bundler.clone(),
            account: ModularAccount::new(self.eth_client.clone(), address),
            entry_point: EntryPoint::new(self.eth_client.clone(), params.network.entry_point),
            network: params.network,
            signer: params.signer,
            factory: (self.config.factory, factory_data),
            ownable_validator: self.config.ownable_validator,
            ownable_init_data,
            webauthn_validator: params.validator,
        }))
    }
}
