use ethers::contract::abigen;

abigen!(
    EntryPointAPI,
    r#"[
        struct PackedUserOperation {address sender;uint256 nonce;bytes initCode;bytes callData;bytes32 accountGasLimits;uint256 preVerificationGas;bytes32 gasFees;bytes paymasterAndData;bytes signature;}
        function getNonce(address sender, uint192 key) external view returns (uint256 nonce)
        function getUserOpHash(PackedUserOperation calldata userOp) external view returns (bytes32)
    ]"#
);

abigen!(
    ModularAccountAPI,
    r#"[
        function execute(bytes32 mode, bytes calldata executionCalldata) external payable
        function installModule(uint256 moduleTypeId, address module, bytes calldata initData) external payable
        function isModuleInstalled(uint256 moduleTypeId, address module, bytes calldata additionalContext) external view returns (bool)
    ]"#
);

abigen!(
    AccountFactoryAPI,
    r#"[
        function createAccount(bytes32 salt, bytes calldata initCode) external payable returns (address)
        function getAddress(bytes32 salt, bytes calldata initCode) external view returns (address)
    ]"#
);

abigen!(
    CounterAPI,
    r#"[
        function count(address account) external view returns (uint256)
        function increment() external
    ]"#
);
