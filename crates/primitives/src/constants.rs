//! Passkey account constants

/// Entry point (v0.7)
pub mod entry_point {
    pub const ADDRESS: &str = "0x0000000071727De22E5E9d8BAf0edAc6f37da032";
}

/// ERC-7579 modules
pub mod modules {
    /// Module type id of validators
    pub const TYPE_VALIDATOR: u64 = 1;
    /// Ownable (ECDSA, k-of-n owners) validator
    pub const OWNABLE_VALIDATOR_ADDRESS: &str = "0x2483DA3A338895199E5e538530213157e931Bf06";
    /// WebAuthn (P-256) validator
    pub const WEBAUTHN_VALIDATOR_ADDRESS: &str = "0x2f167e55d42584f65e2e30a748f41ee75a311414";
    /// Threshold of the ownable validator installed at provisioning
    pub const OWNABLE_THRESHOLD: u64 = 1;
}

/// Credential
pub mod credential {
    /// Storage key holding the serialized credential
    pub const STORAGE_KEY: &str = "credential";
    /// Display name of the credential created during onboarding
    pub const DISPLAY_NAME: &str = "Wallet Owner";
    /// The default data directory name (under home)
    pub const DATA_DIR_NAME: &str = ".passkey";
    /// File holding the software authenticator P-256 key
    pub const AUTHENTICATOR_KEY_FILE_NAME: &str = "authenticator.key";
}

/// Bundler client
pub mod bundler {
    /// Interval between `eth_getUserOperationReceipt` polls (milliseconds)
    pub const RECEIPT_POLL_INTERVAL: u64 = 2000;
    /// Time after which waiting for a receipt gives up (seconds)
    pub const RECEIPT_TIMEOUT: u64 = 120;
    /// Added to the estimated pre-verification gas
    pub const PRE_VERIFICATION_GAS_SLACK: u64 = 1000;
    /// Estimated verification and call gas limits are multiplied by this
    pub const GAS_LIMIT_MULTIPLIER: u64 = 2;
}

/// Supported chains
pub mod supported_chains {
    use alloy_chains::NamedChain;

    pub const CHAINS: [NamedChain; 6] = [
        NamedChain::Dev,
        NamedChain::Sepolia,
        NamedChain::BaseSepolia,
        NamedChain::OptimismSepolia,
        NamedChain::ArbitrumSepolia,
        NamedChain::Base,
    ];

    /// The chain the onboarding flow targets by default
    pub const DEFAULT_CHAIN: NamedChain = NamedChain::BaseSepolia;
}
