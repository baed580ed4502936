//! Owner-token codec
//!
//! Reversibly encodes lock record identifiers into opaque owner tokens
//! using AES-256-GCM with a fixed, configuration-supplied key and nonce.
//! The output is base64 encoded.
//!
//! This is obfuscation, not authentication: any party holding the key can
//! forge tokens. Its purpose is solely to keep raw storage identifiers out
//! of API responses.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit, OsRng, rand_core::RngCore},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use uuid::Uuid;

use crate::OwnerToken;

/// Error types for owner-token codec operations
#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(String),
}

/// Result type for codec operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Codec abstraction between the lock coordinator and token encoding.
///
/// A single concrete implementation exists (`AesTokenCodec`); the trait is
/// the seam used for constructor injection and test substitution.
pub trait OwnerTokenCodec: Send + Sync {
    /// Encode a lock record identifier into an opaque owner token.
    fn encode(&self, id: Uuid) -> CryptoResult<OwnerToken>;

    /// Decode an owner token back into the lock record identifier.
    fn decode(&self, token: &str) -> CryptoResult<Uuid>;
}

/// AES-256-GCM owner-token codec with a fixed key and nonce.
///
/// Both key and nonce come from configuration, so the transform is
/// deterministic and reversible process-wide: `decode(encode(id)) == id`.
pub struct AesTokenCodec {
    cipher: Aes256Gcm,
    nonce: [u8; 12],
}

impl AesTokenCodec {
    /// Create a codec from a 32-byte key and a 12-byte nonce.
    pub fn new(key: &[u8; 32], nonce: [u8; 12]) -> Self {
        let cipher = Aes256Gcm::new(key.into());
        Self { cipher, nonce }
    }

    /// Create a codec from base64-encoded key and nonce, as supplied by
    /// configuration.
    pub fn from_base64(key: &str, nonce: &str) -> CryptoResult<Self> {
        let key_bytes = BASE64
            .decode(key)
            .map_err(|e| CryptoError::Base64Error(e.to_string()))?;
        if key_bytes.len() != 32 {
            return Err(CryptoError::InvalidKey(format!(
                "Key must be 32 bytes, got {}",
                key_bytes.len()
            )));
        }
        let key_array: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Failed to convert key".to_string()))?;

        let nonce_bytes = BASE64
            .decode(nonce)
            .map_err(|e| CryptoError::Base64Error(e.to_string()))?;
        if nonce_bytes.len() != 12 {
            return Err(CryptoError::InvalidKey(format!(
                "Nonce must be 12 bytes, got {}",
                nonce_bytes.len()
            )));
        }
        let nonce_array: [u8; 12] = nonce_bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Failed to convert nonce".to_string()))?;

        Ok(Self::new(&key_array, nonce_array))
    }

    /// Generate a new random 256-bit key as base64 (for provisioning).
    pub fn generate_base64_key() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        BASE64.encode(key)
    }

    /// Generate a new random 12-byte nonce as base64 (for provisioning).
    pub fn generate_base64_nonce() -> String {
        let mut nonce = [0u8; 12];
        OsRng.fill_bytes(&mut nonce);
        BASE64.encode(nonce)
    }
}

impl OwnerTokenCodec for AesTokenCodec {
    fn encode(&self, id: Uuid) -> CryptoResult<OwnerToken> {
        let nonce = Nonce::from_slice(&self.nonce);
        let ciphertext = self
            .cipher
            .encrypt(nonce, id.as_bytes().as_slice())
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        Ok(OwnerToken::new(BASE64.encode(ciphertext)))
    }

    fn decode(&self, token: &str) -> CryptoResult<Uuid> {
        let ciphertext = BASE64
            .decode(token)
            .map_err(|e| CryptoError::Base64Error(e.to_string()))?;

        let nonce = Nonce::from_slice(&self.nonce);
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext.as_slice())
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

        let bytes: [u8; 16] = plaintext
            .try_into()
            .map_err(|_| CryptoError::InvalidToken("Decoded token is not a 128-bit id".to_string()))?;
        Ok(Uuid::from_bytes(bytes))
    }
}
