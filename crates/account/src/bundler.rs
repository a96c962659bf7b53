use ethers::{
    providers::{Http, Provider},
    types::{Address, U256},
};
use passkey_primitives::{
    constants::bundler::{
        GAS_LIMIT_MULTIPLIER, PRE_VERIFICATION_GAS_SLACK, RECEIPT_POLL_INTERVAL, RECEIPT_TIMEOUT,
    },
    AccountError, UserOperation, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, trace};

/// JSON-RPC client of an ERC-4337 bundler (`eth_*UserOperation*` namespace)
#[derive(Clone, Debug)]
pub struct BundlerClient {
    provider: Arc<Provider<Http>>,
    entry_point: Address,
    poll_interval: Duration,
    timeout: Duration,
}

impl BundlerClient {
    pub fn new(provider: Arc<Provider<Http>>, entry_point: Address) -> Self {
        Self {
            provider,
            entry_point,
            poll_interval: Duration::from_millis(RECEIPT_POLL_INTERVAL),
            timeout: Duration::from_secs(RECEIPT_TIMEOUT),
        }
    }

    /// Sets how often and how long [wait_for_receipt](Self::wait_for_receipt) polls
    pub fn with_receipt_polling(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
        self
    }

    async fn request<T, R>(&self, method: &str, params: T) -> Result<R, AccountError>
    where
        T: Debug + Serialize + Send + Sync,
        R: Debug + Serialize + DeserializeOwned + Send,
    {
        trace!("Bundler request {method} {params:?}");
        self.provider
            .request(method, params)
            .await
            .map_err(|err| AccountError::Bundler { inner: format!("{method}: {err}") })
    }

    pub async fn supported_entry_points(&self) -> Result<Vec<Address>, AccountError> {
        self.request("eth_supportedEntryPoints", ()).await
    }

    pub async fn estimate_user_operation_gas(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationGasEstimation, AccountError> {
        self.request("eth_estimateUserOperationGas", (uo, self.entry_point)).await
    }

    pub async fn send_user_operation(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationHash, AccountError> {
        let hash = self.request("eth_sendUserOperation", (uo, self.entry_point)).await?;
        debug!(%hash, sender = ?uo.sender, "User operation sent to bundler");
        Ok(hash)
    }

    pub async fn get_user_operation_receipt(
        &self,
        hash: &UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, AccountError> {
        self.request("eth_getUserOperationReceipt", [hash]).await
    }

    /// Polls for the receipt of the user operation
    ///
    /// # Returns
    /// * `Ok(UserOperationReceipt)` - The receipt of the successfully executed operation
    /// * `Err(AccountError::Reverted)` - If the operation was included but its execution reverted
    /// * `Err(AccountError::ReceiptTimeout)` - If no receipt showed up in time
    pub async fn wait_for_receipt(
        &self,
        hash: UserOperationHash,
    ) -> Result<UserOperationReceipt, AccountError> {
        let started = Instant::now();
        loop {
            if let Some(receipt) = self.get_user_operation_receipt(&hash).await? {
                if !receipt.success {
                    return Err(AccountError::Reverted { hash, reason: receipt.reason });
                }
                return Ok(receipt);
            }

            if started.elapsed() >= self.timeout {
                return Err(AccountError::ReceiptTimeout(hash));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Bundler estimation with headroom: extra pre-verification gas and multiplied limits
pub(crate) fn with_slack(estimation: UserOperationGasEstimation) -> UserOperationGasEstimation {
    UserOperationGasEstimation {
        pre_verification_gas: estimation.pre_verification_gas
            + U256::from(PRE_VERIFICATION_GAS_SLACK),
        verification_gas_limit: estimation.verification_gas_limit * GAS_LIMIT_MULTIPLIER,
        call_gas_limit: estimation.call_gas_limit * GAS_LIMIT_MULTIPLIER,
        paymaster_verification_gas_limit: estimation.paymaster_verification_gas_limit,
    }
}
