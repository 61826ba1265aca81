//! AES-256-GCM encryption for provider access tokens.
//!
//! Each token is encrypted with a unique random nonce. The nonce is prepended
//! to the ciphertext and the whole blob is base64-encoded, so the store only
//! ever sees a single opaque string. The master key must be 32 bytes
//! (256 bits), supplied base64-encoded at startup.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Size of the encryption key in bytes (256 bits)
const KEY_SIZE: usize = 32;

/// Size of the nonce in bytes (96 bits, standard for GCM)
const NONCE_SIZE: usize = 12;

/// Encryption errors. `Decrypt` deliberately carries no detail: the
/// distinction between wrong key, truncation and tampering must not be
/// observable by a caller-facing error message.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("encryption key must be 32 bytes (256 bits), got {0} bytes")]
    KeyLength(usize),
    #[error("encryption key is not valid base64")]
    KeyEncoding,
    #[error("encryption failed")]
    Encrypt,
    #[error("decryption failed")]
    Decrypt,
}

/// Authenticated symmetric cipher holding the process-wide master key.
///
/// Constructed once at startup and shared by reference; never rebuilt from
/// request data.
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Builds a cipher from a base64-encoded 32-byte master key.
    pub fn new(key_base64: &str) -> Result<Self, CryptoError> {
        let key_bytes = BASE64
            .decode(key_base64)
            .map_err(|_| CryptoError::KeyEncoding)?;

        if key_bytes.len() != KEY_SIZE {
            return Err(CryptoError::KeyLength(key_bytes.len()));
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes).map_err(|_| CryptoError::Encrypt)?;
        Ok(Self { cipher })
    }

    /// Encrypts a plaintext token. Returns base64(nonce || ciphertext).
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        // Random nonce per call, never reused
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(blob))
    }

    /// Decrypts a blob produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails on malformed base64, truncated input, tampered ciphertext, or a
    /// key mismatch. Authenticated encryption guarantees a wrong plaintext is
    /// never silently returned.
    pub fn decrypt(&self, blob_base64: &str) -> Result<String, CryptoError> {
        let blob = BASE64
            .decode(blob_base64)
            .map_err(|_| CryptoError::Decrypt)?;

        if blob.len() <= NONCE_SIZE {
            return Err(CryptoError::Decrypt);
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::Decrypt)
    }
}
