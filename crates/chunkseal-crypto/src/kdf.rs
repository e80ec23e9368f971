//! Key derivation: scrypt(key material, per-frame salt) → 256-bit AEAD key

use std::time::Instant;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{CipherError, CipherResult, KEY_SIZE};

/// The 256-bit AEAD key for one frame. Wiped when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// scrypt cost parameters.
///
/// The default is the fixed protocol value (N = 2^15, r = 8, p = 1). Frames
/// sealed under any other value only open under that same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N (default: 15)
    pub log_n: u8,
    /// Block size (default: 8)
    pub r: u32,
    /// Parallelism (default: 1)
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 15,
            r: 8,
            p: 1,
        }
    }
}

/// Derive a 256-bit AEAD key from `key_material` and `salt` using scrypt.
///
/// Deterministic: the same material, salt and params always give the same key.
pub fn derive_key(key_material: &[u8], salt: &[u8], params: &KdfParams) -> CipherResult<DerivedKey> {
    let scrypt_params = scrypt::Params::new(params.log_n, params.r, params.p, KEY_SIZE)
        .map_err(|e| CipherError::Kdf(format!("invalid scrypt params: {e}")))?;

    let started = Instant::now();
    let mut key = [0u8; KEY_SIZE];
    scrypt::scrypt(key_material, salt, &scrypt_params, &mut key)
        .map_err(|e| CipherError::Kdf(e.to_string()))?;

    tracing::trace!(
        log_n = params.log_n,
        elapsed_us = started.elapsed().as_micros() as u64,
        "derived frame key"
    );

    Ok(DerivedKey::from_bytes(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Use fast params for testing
    const FAST: KdfParams = KdfParams {
        log_n: 4,
        r: 8,
        p: 1,
    };

    #[test]
    fn test_kdf_deterministic() {
        let salt = [1u8; 32];

        let key1 = derive_key(b"test-passphrase-0123456789abcdef", &salt, &FAST).unwrap();
        let key2 = derive_key(b"test-passphrase-0123456789abcdef", &salt, &FAST).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
    }

    #[test]
    fn test_kdf_different_key_material() {
        let salt = [1u8; 32];

        let key1 = derive_key(&[0xAA; 32], &salt, &FAST).unwrap();
        let key2 = derive_key(&[0xBB; 32], &salt, &FAST).unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different key material must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_salts() {
        let material = [7u8; 32];

        let key1 = derive_key(&material, &[1u8; 32], &FAST).unwrap();
        let key2 = derive_key(&material, &[2u8; 32], &FAST).unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different salts must produce different keys"
        );
    }

    #[test]
    fn test_kdf_params_affect_output() {
        let material = [7u8; 32];
        let salt = [3u8; 32];
        let slower = KdfParams { log_n: 5, ..FAST };

        let key1 = derive_key(&material, &salt, &FAST).unwrap();
        let key2 = derive_key(&material, &salt, &slower).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_kdf_rejects_invalid_params() {
        let bad = KdfParams { log_n: 4, r: 0, p: 1 };
        let err = derive_key(&[7u8; 32], &[3u8; 32], &bad).unwrap_err();
        assert!(matches!(err, CipherError::Kdf(_)), "got {err:?}");
    }

    #[test]
    fn test_default_params_are_protocol_constants() {
        let params = KdfParams::default();
        assert_eq!(1u32 << params.log_n, 32768);
        assert_eq!(params.r, 8);
        assert_eq!(params.p, 1);
    }

    #[test]
    fn test_derived_key_zeroize_clears_bytes() {
        let mut key = derive_key(&[7u8; 32], &[3u8; 32], &FAST).unwrap();
        assert_ne!(key.as_bytes(), &[0u8; KEY_SIZE]);

        key.zeroize();
        assert_eq!(key.as_bytes(), &[0u8; KEY_SIZE]);
    }

    #[test]
    fn test_derived_key_debug_is_redacted() {
        let key = DerivedKey::from_bytes([0x42; KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("66"));
    }
}
