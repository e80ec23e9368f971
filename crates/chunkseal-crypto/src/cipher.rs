//! The chunk cipher: initialize once, then encrypt/decrypt frames
//!
//! ```text
//! encrypt: salt ← CSPRNG → scrypt(key[..key_size], salt) → nonce ← CSPRNG → seal → frame
//! decrypt: parse frame → scrypt(key[..key_size], salt) → open
//! ```
//!
//! A [`ChunkCipher`] is immutable after [`ChunkCipher::init`] and can be
//! shared between threads; every call draws its own salt and nonce.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secrecy::{ExposeSecret, SecretSlice};

use crate::envelope;
use crate::frame::{self, FrameHeader};
use crate::kdf::{derive_key, KdfParams};
use crate::params::{CipherOptions, CipherParams};
use crate::{CipherError, CipherResult, TAG_SIZE};

pub struct ChunkCipher {
    params: CipherParams,
    kdf: KdfParams,
    key: SecretSlice<u8>,
}

impl ChunkCipher {
    /// Resolve defaults and take ownership of the key material.
    ///
    /// Fails with [`CipherError::Configuration`] when no key is set. The key
    /// length is checked on each encrypt/decrypt, not here.
    pub fn init(options: CipherOptions) -> CipherResult<Self> {
        let params = CipherParams::resolve(&options)?;
        let key = options
            .key
            .ok_or_else(|| CipherError::Configuration("key is not set".into()))?;

        Ok(Self {
            params,
            kdf: options.kdf,
            key,
        })
    }

    pub fn params(&self) -> &CipherParams {
        &self.params
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// Bytes a frame adds on top of its plaintext.
    pub fn overhead(&self) -> usize {
        self.params.overhead()
    }

    /// Total frame size for a plaintext of `plaintext_len` bytes.
    pub fn frame_len(&self, plaintext_len: usize) -> usize {
        plaintext_len.saturating_add(self.overhead())
    }

    /// Largest plaintext whose frame length still fits the u32 prefix.
    pub fn max_plaintext_len(&self) -> usize {
        (u32::MAX as usize).saturating_sub(self.params.body_header_len() + TAG_SIZE)
    }

    /// Encrypt one chunk into a self-contained frame, using the OS CSPRNG.
    pub fn encrypt(&self, plaintext: &[u8]) -> CipherResult<Vec<u8>> {
        self.encrypt_with_rng(&mut OsRng, plaintext)
    }

    /// Encrypt one chunk, drawing salt and nonce from `rng`.
    pub fn encrypt_with_rng<R>(&self, rng: &mut R, plaintext: &[u8]) -> CipherResult<Vec<u8>>
    where
        R: RngCore + CryptoRng,
    {
        let key_material = self.key_material()?;

        let max = self.max_plaintext_len();
        if plaintext.len() > max {
            return Err(CipherError::PayloadTooLarge {
                len: plaintext.len(),
                max,
            });
        }

        let mut salt = vec![0u8; self.params.salt_size];
        rng.try_fill_bytes(&mut salt)
            .map_err(CipherError::Randomness)?;

        let derived = derive_key(key_material, &salt, &self.kdf)?;

        let mut nonce = vec![0u8; self.params.nonce_size];
        rng.try_fill_bytes(&mut nonce)
            .map_err(CipherError::Randomness)?;

        let sealed = envelope::seal(&derived, &nonce, plaintext)?;
        let frame = frame::encode(&nonce, &salt, &sealed)?;

        tracing::debug!(
            plaintext_len = plaintext.len(),
            frame_len = frame.len(),
            "sealed chunk"
        );
        Ok(frame)
    }

    /// Decrypt a frame produced by [`ChunkCipher::encrypt`] under the same
    /// key material and sizes.
    pub fn decrypt(&self, frame: &[u8]) -> CipherResult<Vec<u8>> {
        let key_material = self.key_material()?;

        let header = FrameHeader::parse(frame, self.params.nonce_size, self.params.salt_size)?;
        let derived = derive_key(key_material, header.salt, &self.kdf)?;
        let plaintext = envelope::open(&derived, header.nonce, header.sealed)?;

        tracing::debug!(
            frame_len = frame.len(),
            plaintext_len = plaintext.len(),
            "opened chunk"
        );
        Ok(plaintext)
    }

    /// The first `key_size` bytes of the key material.
    fn key_material(&self) -> CipherResult<&[u8]> {
        let key = self.key.expose_secret();
        if key.len() < self.params.key_size {
            return Err(CipherError::KeyTooShort {
                required: self.params.key_size,
            });
        }
        Ok(&key[..self.params.key_size])
    }
}

impl std::fmt::Debug for ChunkCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkCipher")
            .field("params", &self.params)
            .field("kdf", &self.kdf)
            .field("key", &"[REDACTED]")
            .finish()
    }
}
