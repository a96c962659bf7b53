//! Passkey (WebAuthn P-256) credential and its public key
use ethers::{
    types::{Bytes, H256, U256},
    utils::keccak256,
};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WebAuthn credential bound to a device authenticator.
///
/// The JSON representation (`{ "id": ..., "publicKey": "0x..." }`) is the persisted layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Credential identifier assigned by the authenticator (base64url)
    pub id: String,
    /// Raw P-256 public key
    #[serde(rename = "publicKey")]
    pub public_key: Bytes,
}

impl Credential {
    pub fn new(id: impl Into<String>, public_key: Bytes) -> Self {
        Self { id: id.into(), public_key }
    }

    /// Decodes the public key into curve coordinates
    pub fn decode_public_key(&self) -> Result<PublicKey, PublicKeyError> {
        PublicKey::from_bytes(&self.public_key)
    }

    /// Hash of the authenticator id, as stored by the WebAuthn validator module
    pub fn authenticator_id_hash(&self) -> H256 {
        authenticator_id_hash(&self.id)
    }
}

/// `keccak256` of the credential id, the key the WebAuthn validator binds a passkey to
pub fn authenticator_id_hash(id: &str) -> H256 {
    keccak256(id.as_bytes()).into()
}

/// Public key decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublicKeyError {
    #[error("public key has unexpected length {0}")]
    Length(usize),

    #[error("public key has unexpected prefix {0:#04x}")]
    Prefix(u8),

    #[error("public key is not a point on the P-256 curve")]
    NotOnCurve,
}

/// P-256 public key in the coordinate representation used by validator install data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    /// SEC1 prefix byte (`0x04` uncompressed, `0x02`/`0x03` compressed)
    pub prefix: u8,
    pub x: U256,
    pub y: U256,
}

impl PublicKey {
    /// Decodes a raw public key.
    ///
    /// Accepts 64 bytes (`x || y`, as WebAuthn libraries export it), 65 bytes SEC1 uncompressed
    /// and 33 bytes SEC1 compressed keys. The point must lie on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PublicKeyError> {
        let (prefix, sec1) = match bytes.len() {
            64 => (0x04, [&[0x04u8][..], bytes].concat()),
            65 | 33 => (bytes[0], bytes.to_vec()),
            len => return Err(PublicKeyError::Length(len)),
        };

        match (bytes.len(), prefix) {
            (64, _) | (65, 0x04) | (33, 0x02) | (33, 0x03) => {}
            (_, prefix) => return Err(PublicKeyError::Prefix(prefix)),
        }

        let key =
            p256::PublicKey::from_sec1_bytes(&sec1).map_err(|_| PublicKeyError::NotOnCurve)?;
        let point = key.to_encoded_point(false);
        let (x, y) = match (point.x(), point.y()) {
            (Some(x), Some(y)) => (U256::from_big_endian(x), U256::from_big_endian(y)),
            _ => return Err(PublicKeyError::NotOnCurve),
        };

        Ok(Self { prefix, x, y })
    }

    /// SEC1 uncompressed encoding (`0x04 || x || y`)
    pub fn to_uncompressed(&self) -> Bytes {
        let mut out = vec![0x04u8; 65];
        self.x.to_big_endian(&mut out[1..33]);
        self.y.to_big_endian(&mut out[33..65]);
        out.into()
    }
}
