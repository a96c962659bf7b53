//! Process scoped onboarding session
use crate::{
    error::StorageError,
    state::{Controls, FlowState},
    storage,
    traits::{AccountHandle, CredentialStore},
};
use ethers::{
    types::{Address, U256},
    utils::to_checksum,
};
use passkey_primitives::Credential;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Loading indicator of an in-flight action
#[derive(Debug, Clone, Default)]
pub(crate) struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    /// Raises the flag until the returned guard is dropped
    pub(crate) fn raise(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(self.0.clone())
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// State of one onboarding session.
///
/// Created once per process with [Session::open] and owned by the flow driving it.
#[derive(Default)]
pub struct Session {
    credential: Option<Credential>,
    handle: Option<Arc<dyn AccountHandle>>,
    smart_account: Option<Address>,
    validator_installed: bool,
    count: U256,
    operations: u64,
    pub(crate) installing: LoadingFlag,
    pub(crate) sending: LoadingFlag,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("credential", &self.credential)
            .field("smart_account", &self.smart_account)
            .field("validator_installed", &self.validator_installed)
            .field("count", &self.count)
            .field("operations", &self.operations)
            .finish()
    }
}

impl Session {
    /// Opens a session, loading a previously created credential from the store
    pub fn open(store: &dyn CredentialStore) -> Result<Self, StorageError> {
        Ok(Self { credential: storage::load_credential(store)?, ..Default::default() })
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn handle(&self) -> Option<Arc<dyn AccountHandle>> {
        self.handle.clone()
    }

    pub fn smart_account(&self) -> Option<Address> {
        self.smart_account
    }

    pub fn validator_installed(&self) -> bool {
        self.validator_installed
    }

    pub fn count(&self) -> U256 {
        self.count
    }

    pub fn installing(&self) -> bool {
        self.installing.is_raised()
    }

    pub fn sending(&self) -> bool {
        self.sending.is_raised()
    }

    pub(crate) fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    pub(crate) fn set_account(&mut self, handle: Arc<dyn AccountHandle>) {
        self.smart_account = Some(handle.address());
        self.handle = Some(handle);
    }

    pub(crate) fn set_validator_installed(&mut self, installed: bool) {
        self.validator_installed = installed;
    }

    pub(crate) fn set_count(&mut self, count: U256) {
        self.count = count;
    }

    pub(crate) fn record_operation(&mut self) {
        self.operations += 1;
    }

    pub fn state(&self) -> FlowState {
        if self.handle.is_none() {
            FlowState::Disconnected
        } else if self.sending() {
            FlowState::OperationInFlight
        } else if self.installing() {
            FlowState::Installing
        } else if self.validator_installed {
            if self.operations > 0 {
                FlowState::Ready
            } else {
                FlowState::ValidatorInstalled
            }
        } else if self.credential.is_some() {
            FlowState::CredentialReady
        } else {
            FlowState::Provisioned
        }
    }

    pub fn controls(&self) -> Controls {
        self.state().into()
    }

    /// Status lines of the session: the account, the credential bound to it and whether the
    /// validator is installed. Nothing is reported before an account exists.
    pub fn status_lines(&self) -> Vec<String> {
        let Some(account) = self.smart_account else {
            return vec![];
        };

        let mut lines = vec![format!("Smart account: {}", to_checksum(&account, None))];
        if let Some(credential) = &self.credential {
            lines.push(format!("Webauthn credential: {}", credential.id));
        }
        lines.push(
            if self.validator_installed { "Validator installed" } else { "Validator not installed" }
                .into(),
        );
        lines
    }

    /// The counter line
    pub fn count_line(&self) -> String {
        format!("Count: {}", self.count)
    }
}
