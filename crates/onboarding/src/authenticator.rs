//! Software WebAuthn authenticator
//!
//! A virtual P-256 authenticator producing the same assertions a platform passkey would:
//! `authenticatorData = sha256(rpId) || flags || signCount`, a `webauthn.get` client data JSON
//! carrying the base64url challenge, and an ECDSA signature over
//! `sha256(authenticatorData || sha256(clientDataJSON))`.
use crate::{error::AuthenticatorError, traits::Authenticator};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ethers::{prelude::rand, types::U256, utils::hex};
use p256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};
use passkey_primitives::{Credential, P256Signature, WebAuthnAssertion, WebAuthnMetadata};
use sha2::{Digest, Sha256};
use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicU32, Ordering},
};
use tracing::{debug, info};

/// User present
const FLAG_UP: u8 = 0x01;
/// User verified
const FLAG_UV: u8 = 0x04;

pub const DEFAULT_RP_ID: &str = "localhost";
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

pub struct SoftwareAuthenticator {
    key: SigningKey,
    rp_id: String,
    origin: String,
    sign_count: AtomicU32,
}

impl std::fmt::Debug for SoftwareAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareAuthenticator")
            .field("credential_id", &self.credential_id())
            .field("rp_id", &self.rp_id)
            .field("origin", &self.origin)
            .finish()
    }
}

impl SoftwareAuthenticator {
    pub fn new(key: SigningKey, rp_id: impl Into<String>, origin: impl Into<String>) -> Self {
        Self { key, rp_id: rp_id.into(), origin: origin.into(), sign_count: AtomicU32::new(0) }
    }

    /// Authenticator with a fresh random key
    pub fn random(rp_id: impl Into<String>, origin: impl Into<String>) -> Self {
        let mut rng = rand::thread_rng();
        Self::new(SigningKey::random(&mut rng), rp_id, origin)
    }

    /// Loads the key from a hex file, generating and saving one when the file does not exist
    pub fn load_or_create(
        path: &Path,
        rp_id: impl Into<String>,
        origin: impl Into<String>,
    ) -> Result<Self, AuthenticatorError> {
        if path.exists() {
            let encoded = fs::read_to_string(path).map_err(other)?;
            let bytes = hex::decode(encoded.trim()).map_err(other)?;
            let key = SigningKey::from_slice(&bytes).map_err(other)?;
            debug!(path = %path.display(), "Loaded authenticator key");
            return Ok(Self::new(key, rp_id, origin));
        }

        let authenticator = Self::random(rp_id, origin);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(other)?;
        }
        fs::write(path, hex::encode(authenticator.key.to_bytes())).map_err(other)?;
        info!(path = %path.display(), "Generated authenticator key");
        Ok(authenticator)
    }

    /// Raw public key (`x || y`)
    pub fn public_key(&self) -> Vec<u8> {
        self.key.verifying_key().to_encoded_point(false).as_bytes()[1..].to_vec()
    }

    /// Credential id: base64url of the first 16 bytes of `sha256(public key)`
    pub fn credential_id(&self) -> String {
        URL_SAFE_NO_PAD.encode(&Sha256::digest(self.public_key())[..16])
    }

    fn authenticator_data(&self) -> Vec<u8> {
        let count = self.sign_count.fetch_add(1, Ordering::SeqCst) + 1;
        [
            Sha256::digest(self.rp_id.as_bytes()).as_slice(),
            &[FLAG_UP | FLAG_UV],
            &count.to_be_bytes(),
        ]
        .concat()
    }

    fn client_data_json(&self, challenge: &[u8]) -> Result<String, AuthenticatorError> {
        let origin = serde_json::to_string(&self.origin).map_err(other)?;
        Ok(format!(
            r#"{{"type":"webauthn.get","challenge":"{}","origin":{origin},"crossOrigin":false}}"#,
            URL_SAFE_NO_PAD.encode(challenge)
        ))
    }
}

fn other(err: impl ToString) -> AuthenticatorError {
    AuthenticatorError::Other(err.to_string())
}

#[async_trait]
impl Authenticator for SoftwareAuthenticator {
    async fn create_credential(&self, name: &str) -> Result<Credential, AuthenticatorError> {
        let credential = Credential::new(self.credential_id(), self.public_key().into());
        info!(name, id = %credential.id, "Created software credential");
        Ok(credential)
    }

    async fn sign(
        &self,
        credential_id: &str,
        challenge: &[u8],
    ) -> Result<WebAuthnAssertion, AuthenticatorError> {
        if credential_id != self.credential_id() {
            return Err(AuthenticatorError::NotAvailable(format!(
                "no key for credential {credential_id}"
            )));
        }

        let authenticator_data = self.authenticator_data();
        let client_data_json = self.client_data_json(challenge)?;

        let mut hasher = Sha256::new();
        hasher.update(&authenticator_data);
        hasher.update(Sha256::digest(client_data_json.as_bytes()));
        let digest = hasher.finalize();

        // the validator rejects high-s signatures
        let signature: Signature = self.key.sign_prehash(&digest).map_err(other)?;
        let signature = signature.normalize_s().unwrap_or(signature);

        let metadata = WebAuthnMetadata {
            authenticator_data: authenticator_data.into(),
            challenge_index: client_data_json.find("\"challenge\":").unwrap_or_default(),
            type_index: client_data_json.find("\"type\":").unwrap_or_default(),
            client_data_json,
            user_verification_required: true,
        };

        Ok(WebAuthnAssertion {
            signature: P256Signature {
                r: U256::from_big_endian(signature.r().to_bytes().as_slice()),
                s: U256::from_big_endian(signature.s().to_bytes().as_slice()),
            },
            metadata,
        })
    }
}
