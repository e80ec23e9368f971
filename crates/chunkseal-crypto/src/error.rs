use thiserror::Error;

pub type CipherResult<T> = Result<T, CipherError>;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("key is too short, expecting {required} bytes")]
    KeyTooShort { required: usize },

    #[error("data chunk is too big: {len} bytes, max size is {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("secure random source failed: {0}")]
    Randomness(#[source] rand::Error),

    #[error("scrypt KDF failed: {0}")]
    Kdf(String),

    /// The frame is shorter than its header or its declared length.
    #[error("truncated or corrupt frame: {0}")]
    TruncatedFrame(String),

    /// Wrong key, wrong parameters, or tampered data; never says which.
    #[error("authentication failed")]
    Authentication,
}

impl CipherError {
    /// True for AEAD verification failures, which callers must treat as
    /// security-significant rather than operational.
    pub fn is_authentication(&self) -> bool {
        matches!(self, CipherError::Authentication)
    }
}
