//! XChaCha20-Poly1305 seal/open under a derived frame key
//!
//! Sealed payload format:
//! ```text
//! [N bytes: ciphertext][16 bytes: Poly1305 tag]
//! ```
//! No associated data is bound; the nonce and salt travel in the frame header.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};

use crate::kdf::DerivedKey;
use crate::{CipherError, CipherResult, NONCE_SIZE};

/// Seal `plaintext` with XChaCha20-Poly1305.
///
/// Returns `[ciphertext][16-byte tag]`.
pub fn seal(key: &DerivedKey, nonce: &[u8], plaintext: &[u8]) -> CipherResult<Vec<u8>> {
    let nonce = xnonce(nonce)?;
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CipherError::Configuration(format!("chunk encryption failed: {e}")))
}

/// Open a sealed payload.
///
/// Any failure, including a payload too short to hold a tag, is reported as
/// [`CipherError::Authentication`] with no further detail.
pub fn open(key: &DerivedKey, nonce: &[u8], sealed: &[u8]) -> CipherResult<Vec<u8>> {
    let nonce = xnonce(nonce).map_err(|_| CipherError::Authentication)?;
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(nonce, sealed)
        .map_err(|_| CipherError::Authentication)
}

fn xnonce(nonce: &[u8]) -> CipherResult<&XNonce> {
    if nonce.len() != NONCE_SIZE {
        return Err(CipherError::Configuration(format!(
            "nonce must be {NONCE_SIZE} bytes, got {}",
            nonce.len()
        )));
    }
    Ok(XNonce::from_slice(nonce))
}
