use crate::{
    error::ContractCallError,
    gen::{AccountFactoryAPI, ModularAccountAPI},
};
use ethers::{
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use passkey_primitives::constants::modules::TYPE_VALIDATOR;
use std::sync::Arc;

/// Modular (ERC-7579) smart account
#[derive(Clone)]
pub struct ModularAccount<M: Middleware + 'static> {
    eth_client: Arc<M>,
    address: Address,
    account_api: ModularAccountAPI<M>,
}

impl<M: Middleware + 'static> ModularAccount<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        let account_api = ModularAccountAPI::new(address, eth_client.clone());
        Self { eth_client, address, account_api }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether account code exists at the address
    pub async fn is_deployed(&self) -> Result<bool, ContractCallError> {
        let code = self
            .eth_client
            .get_code(self.address, None)
            .await
            .map_err(|e| ContractCallError::Provider { inner: e.to_string() })?;
        Ok(!code.is_empty())
    }

    /// Whether the validator module is installed (false for undeployed accounts)
    pub async fn is_validator_installed(&self, module: Address) -> Result<bool, ContractCallError> {
        if !self.is_deployed().await? {
            return Ok(false);
        }

        self.account_api
            .is_module_installed(U256::from(TYPE_VALIDATOR), module, Bytes::default())
            .call()
            .await
            .map_err(ContractCallError::from_contract_error)
    }
}

/// Factory deploying modular accounts at deterministic addresses
#[derive(Clone)]
pub struct AccountFactory<M: Middleware + 'static> {
    factory_api: AccountFactoryAPI<M>,
}

impl<M: Middleware + 'static> AccountFactory<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        let factory_api = AccountFactoryAPI::new(address, eth_client);
        Self { factory_api }
    }

    /// Counterfactual address of the account created with the salt and init code
    pub async fn get_address(
        &self,
        salt: [u8; 32],
        init_code: Bytes,
    ) -> Result<Address, ContractCallError> {
        self.factory_api
            .get_address(salt, init_code)
            .call()
            .await
            .map_err(ContractCallError::from_contract_error)
    }

    /// Factory data deploying the account (passed as `factoryData` of the first user operation)
    pub fn create_account_data(&self, salt: [u8; 32], init_code: Bytes) -> Option<Bytes> {
        self.factory_api.create_account(salt, init_code).calldata()
    }
}
