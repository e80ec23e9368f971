//! Cipher options as supplied by callers, and the resolved parameter set

use secrecy::SecretSlice;

use crate::kdf::KdfParams;
use crate::{CipherError, CipherResult, KEY_SIZE, LEN_PREFIX_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// Caller-supplied cipher configuration.
///
/// Any size left at zero is replaced by its default when the cipher is
/// initialized. `key` has no default.
pub struct CipherOptions {
    /// Salt length in bytes (0 = 32)
    pub salt_size: usize,
    /// Nonce length in bytes (0 = 24, the only value XChaCha20-Poly1305 accepts)
    pub nonce_size: usize,
    /// Minimum key material length, and the prefix of it fed to the KDF (0 = 32)
    pub key_size: usize,
    /// Long-term key material
    pub key: Option<SecretSlice<u8>>,
    /// scrypt cost; leave at the default for interoperable frames
    pub kdf: KdfParams,
}

impl CipherOptions {
    /// Default sizes with the given key material.
    pub fn with_key(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: Some(SecretSlice::from(key.into())),
            ..Self::default()
        }
    }
}

impl Default for CipherOptions {
    fn default() -> Self {
        Self {
            salt_size: SALT_SIZE,
            nonce_size: NONCE_SIZE,
            key_size: KEY_SIZE,
            key: None,
            kdf: KdfParams::default(),
        }
    }
}

impl std::fmt::Debug for CipherOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherOptions")
            .field("salt_size", &self.salt_size)
            .field("nonce_size", &self.nonce_size)
            .field("key_size", &self.key_size)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("kdf", &self.kdf)
            .finish()
    }
}

/// Resolved sizes of an initialized cipher. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherParams {
    pub salt_size: usize,
    pub nonce_size: usize,
    pub key_size: usize,
}

impl CipherParams {
    /// Apply defaults to zero sizes and reject sizes the AEAD cannot use.
    pub fn resolve(options: &CipherOptions) -> CipherResult<Self> {
        let params = Self {
            salt_size: or_default(options.salt_size, SALT_SIZE),
            nonce_size: or_default(options.nonce_size, NONCE_SIZE),
            key_size: or_default(options.key_size, KEY_SIZE),
        };

        if params.nonce_size != NONCE_SIZE {
            return Err(CipherError::Configuration(format!(
                "unsupported nonce size {} (XChaCha20-Poly1305 requires {NONCE_SIZE})",
                params.nonce_size
            )));
        }

        let fits_prefix = params
            .nonce_size
            .checked_add(params.salt_size)
            .and_then(|len| len.checked_add(TAG_SIZE))
            .is_some_and(|len| len as u64 <= u64::from(u32::MAX));
        if !fits_prefix {
            return Err(CipherError::Configuration(format!(
                "salt size {} does not fit a frame with a u32 length prefix",
                params.salt_size
            )));
        }

        Ok(params)
    }

    /// Bytes between the length prefix and the sealed payload.
    pub fn body_header_len(&self) -> usize {
        self.nonce_size + self.salt_size
    }

    /// Bytes a frame adds on top of the plaintext.
    pub fn overhead(&self) -> usize {
        (self.body_header_len() + TAG_SIZE).saturating_add(LEN_PREFIX_SIZE)
    }
}

fn or_default(value: usize, default: usize) -> usize {
    if value == 0 {
        default
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeroed() -> CipherOptions {
        CipherOptions {
            salt_size: 0,
            nonce_size: 0,
            key_size: 0,
            key: None,
            kdf: KdfParams::default(),
        }
    }

    #[test]
    fn test_zero_sizes_take_defaults() {
        let params = CipherParams::resolve(&zeroed()).unwrap();
        assert_eq!(params.salt_size, 32);
        assert_eq!(params.nonce_size, 24);
        assert_eq!(params.key_size, 32);
    }

    #[test]
    fn test_explicit_sizes_are_kept() {
        let options = CipherOptions {
            salt_size: 16,
            key_size: 64,
            ..zeroed()
        };
        let params = CipherParams::resolve(&options).unwrap();
        assert_eq!(params.salt_size, 16);
        assert_eq!(params.nonce_size, 24);
        assert_eq!(params.key_size, 64);
    }

    #[test]
    fn test_rejects_non_xchacha_nonce() {
        let options = CipherOptions {
            nonce_size: 12,
            ..zeroed()
        };
        let err = CipherParams::resolve(&options).unwrap_err();
        assert!(matches!(err, CipherError::Configuration(_)), "got {err:?}");
    }

    #[test]
    fn test_rejects_salt_that_overflows_prefix() {
        for salt_size in [usize::MAX, usize::MAX - NONCE_SIZE, u32::MAX as usize] {
            let options = CipherOptions {
                salt_size,
                ..zeroed()
            };
            let err = CipherParams::resolve(&options).unwrap_err();
            assert!(
                matches!(err, CipherError::Configuration(_)),
                "salt_size {salt_size}: got {err:?}"
            );
        }
    }

    #[test]
    fn test_accepts_largest_salt_that_fits_prefix() {
        let salt_size = u32::MAX as usize - NONCE_SIZE - TAG_SIZE;
        let options = CipherOptions {
            salt_size,
            ..zeroed()
        };
        let params = CipherParams::resolve(&options).unwrap();
        assert_eq!(params.body_header_len() + TAG_SIZE, u32::MAX as usize);
    }

    #[test]
    fn test_default_overhead() {
        let params = CipherParams::resolve(&CipherOptions::default()).unwrap();
        // prefix (4) + nonce (24) + salt (32) + tag (16)
        assert_eq!(params.body_header_len(), 56);
        assert_eq!(params.overhead(), 76);
    }

    #[test]
    fn test_options_debug_hides_key() {
        let options = CipherOptions::with_key(vec![0x5A; 32]);
        let rendered = format!("{options:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("90"));
    }
}
