//! WebAuthn assertion types and the signature layout expected by the WebAuthn validator module
use ethers::{
    abi::{self, Token},
    types::{Bytes, U256},
};
use serde::{Deserialize, Serialize};

/// Authenticator metadata returned alongside a WebAuthn assertion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAuthnMetadata {
    /// Authenticator data (rp id hash, flags, signature counter)
    pub authenticator_data: Bytes,
    /// Client data JSON the authenticator signed over
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    /// Offset of `"challenge":` in the client data JSON
    pub challenge_index: usize,
    /// Offset of `"type":` in the client data JSON
    pub type_index: usize,
    pub user_verification_required: bool,
}

/// P-256 ECDSA signature
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct P256Signature {
    pub r: U256,
    pub s: U256,
}

/// Result of the WebAuthn signing ceremony
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAuthnAssertion {
    pub signature: P256Signature,
    pub metadata: WebAuthnMetadata,
}

/// Encodes an assertion into the validator signature:
/// `abi.encode(bytes authenticatorData, string clientDataJSON, uint256 responseTypeLocation,
/// uint256 r, uint256 s, bool usePrecompiled)`.
///
/// `use_precompiled` selects the RIP-7212 precompile on chains that have it; the solidity
/// verifier is used otherwise.
pub fn encode_signature(
    metadata: &WebAuthnMetadata,
    signature: &P256Signature,
    use_precompiled: bool,
) -> Bytes {
    abi::encode(&[
        Token::Bytes(metadata.authenticator_data.to_vec()),
        Token::String(metadata.client_data_json.clone()),
        Token::Uint(U256::from(metadata.type_index)),
        Token::Uint(signature.r),
        Token::Uint(signature.s),
        Token::Bool(use_precompiled),
    ])
    .into()
}

// rp id hash of localhost, user present + user verified flags, zero counter
const MOCK_AUTHENTICATOR_DATA: &str =
    "0x49960de5880e8c687434170f6476605b8fe4aeb9a28632c7995cf3ba831d97630500000000";
const MOCK_CLIENT_DATA_JSON: &str = r#"{"type":"webauthn.get","challenge":"tbxXNFS9X_4Byr1cMwqKrIGB-_30a0QhZ6y7ucM0BOE","origin":"http://localhost:3000","crossOrigin":false}"#;

/// Placeholder signature with the shape of a real one, used for gas estimation.
///
/// It does not verify; bundlers only need its length to price calldata and verification.
pub fn mock_signature() -> Bytes {
    let metadata = WebAuthnMetadata {
        authenticator_data: MOCK_AUTHENTICATOR_DATA.parse().unwrap_or_default(),
        client_data_json: MOCK_CLIENT_DATA_JSON.into(),
        challenge_index: 23,
        type_index: 1,
        user_verification_required: true,
    };
    let signature = P256Signature { r: U256::MAX >> 1, s: U256::MAX >> 1 };
    encode_signature(&metadata, &signature, false)
}
