//! chunkseal-crypto: passphrase-derived encryption of discrete byte chunks
//!
//! Architecture: scrypt-derived per-frame key + XChaCha20-Poly1305
//!
//! Pipeline: key material + random salt → scrypt → derived key → seal with random nonce → frame
//!
//! Frame layout:
//! ```text
//! [4 bytes: u32 BE length of everything that follows]
//! [nonce_size bytes: random nonce]      (default 24)
//! [salt_size bytes: random scrypt salt] (default 32)
//! [N bytes: ciphertext][16 bytes: Poly1305 tag]
//! ```
//!
//! Every frame carries its own salt, so every frame is sealed under a
//! different derived key even when the key material never changes.

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod kdf;
pub mod params;

pub use cipher::ChunkCipher;
pub use error::{CipherError, CipherResult};
pub use frame::FrameHeader;
pub use kdf::{derive_key, DerivedKey, KdfParams};
pub use params::{CipherOptions, CipherParams};

/// Size of the AEAD key produced by the KDF (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Default size of the per-frame scrypt salt
pub const SALT_SIZE: usize = 32;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Size of the big-endian length prefix
pub const LEN_PREFIX_SIZE: usize = 4;
