//! Per-block encryption.
//!
//! Envelope: `base64(salt[16] || nonce[12] || ciphertext)` with AES-256-GCM and
//! key = `SHA-256(password || salt)`. The layout is fixed so existing `.jdat`
//! files stay readable.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const SALT_SIZE: usize = 16;
pub const NONCE_SIZE: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Any decryption failure.
    #[error("wrong password or corrupted data")]
    WrongPasswordOrCorrupt,

    #[error("encryption failed")]
    EncryptFailed,
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    hasher.finalize().into()
}

fn cipher_for(password: &str, salt: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    let key = derive_key(password, salt);
    Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::EncryptFailed)
}

/// Encrypt `plaintext` under `password`. Salt and nonce are fresh per call.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);
    seal(plaintext, password, &salt, &nonce)
}

fn seal(
    plaintext: &str,
    password: &str,
    salt: &[u8; SALT_SIZE],
    nonce: &[u8; NONCE_SIZE],
) -> Result<String, CryptoError> {
    let cipher = cipher_for(password, salt)?;
    let ct = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext.as_bytes())
        .map_err(|_| CryptoError::EncryptFailed)?;

    let mut raw = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ct.len());
    raw.extend_from_slice(salt);
    raw.extend_from_slice(nonce);
    raw.extend_from_slice(&ct);
    Ok(STANDARD.encode(raw))
}

/// Decrypt an envelope produced by [`encrypt`].
pub fn decrypt(envelope: &str, password: &str) -> Result<String, CryptoError> {
    let compact: String = envelope.split_whitespace().collect();
    let raw = STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| CryptoError::WrongPasswordOrCorrupt)?;
    if raw.len() < SALT_SIZE + NONCE_SIZE {
        return Err(CryptoError::WrongPasswordOrCorrupt);
    }
    let (salt, rest) = raw.split_at(SALT_SIZE);
    let (nonce, ct) = rest.split_at(NONCE_SIZE);

    let cipher = cipher_for(password, salt).map_err(|_| CryptoError::WrongPasswordOrCorrupt)?;
    let pt = cipher
        .decrypt(Nonce::from_slice(nonce), ct)
        .map_err(|_| CryptoError::WrongPasswordOrCorrupt)?;
    String::from_utf8(pt).map_err(|_| CryptoError::WrongPasswordOrCorrupt)
}
