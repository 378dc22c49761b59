//! Entity secret encryption for ledger write requests.
//!
//! The ledger refuses a ciphertext it has already seen, so every transfer
//! request carries a fresh RSA-OAEP (SHA-256) encryption of the raw
//! secret under the entity public key, base64 encoded.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;

use super::settings::ENTITY_SECRET_ENV;
use crate::error::{ConfigError, LedgerError};

/// Raw entity secret size in bytes.
pub const ENTITY_SECRET_LEN: usize = 32;

/// Raw entity secret decoded from hex.
#[derive(Clone)]
pub struct EntitySecret([u8; ENTITY_SECRET_LEN]);

impl EntitySecret {
    /// Decode a 64 character hex secret, with or without `0x`.
    pub fn from_hex(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|e| ConfigError::InvalidValue {
            field: ENTITY_SECRET_ENV,
            reason: format!("not valid hex: {e}"),
        })?;
        let bytes: [u8; ENTITY_SECRET_LEN] =
            bytes.try_into().map_err(|b: Vec<u8>| ConfigError::InvalidValue {
                field: ENTITY_SECRET_ENV,
                reason: format!("expected {ENTITY_SECRET_LEN} bytes, got {}", b.len()),
            })?;
        Ok(Self(bytes))
    }

    /// Encrypt the secret under `key`. OAEP padding is randomized, so each
    /// call yields a different ciphertext.
    pub fn encrypt(&self, key: &RsaPublicKey) -> Result<String, LedgerError> {
        let mut rng = rand::thread_rng();
        let ciphertext = key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), &self.0)
            .map_err(|e| LedgerError::Encryption(e.to_string()))?;
        Ok(STANDARD.encode(ciphertext))
    }
}

impl fmt::Debug for EntitySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntitySecret(<redacted>)")
    }
}

/// Parse the entity public key as served by the ledger.
///
/// Accepts PKCS#1 (`BEGIN RSA PUBLIC KEY`) and SPKI (`BEGIN PUBLIC KEY`).
pub fn parse_public_key(pem: &str) -> Result<RsaPublicKey, LedgerError> {
    let pem = pem.trim();
    RsaPublicKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPublicKey::from_public_key_pem(pem))
        .map_err(|e| LedgerError::Encryption(format!("invalid entity public key: {e}")))
}
