//! Length-prefixed frame encoding and decoding
//!
//! Frame format (binary):
//! ```text
//! [4 bytes: frame_length, u32 BE]
//! [nonce_size bytes: nonce]
//! [salt_size bytes: salt]
//! [frame_length - nonce_size - salt_size bytes: ciphertext ‖ tag]
//! ```
//!
//! `frame_length` counts every byte after the prefix and must match exactly.

use crate::{CipherError, CipherResult, LEN_PREFIX_SIZE};

/// A borrowed view over the parts of a frame.
///
/// Parsing needs the nonce and salt sizes the frame was written with; the
/// frame does not record them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader<'a> {
    /// Value of the length prefix
    pub declared_len: u32,
    pub nonce: &'a [u8],
    pub salt: &'a [u8],
    /// Ciphertext followed by the authentication tag
    pub sealed: &'a [u8],
}

impl<'a> FrameHeader<'a> {
    /// Split a frame into its parts, checking the length prefix.
    ///
    /// Every length problem is reported as [`CipherError::TruncatedFrame`].
    pub fn parse(frame: &'a [u8], nonce_size: usize, salt_size: usize) -> CipherResult<Self> {
        if frame.len() < LEN_PREFIX_SIZE {
            return Err(CipherError::TruncatedFrame(format!(
                "{} bytes, length prefix needs {LEN_PREFIX_SIZE}",
                frame.len()
            )));
        }

        let (prefix, body) = frame.split_at(LEN_PREFIX_SIZE);
        let declared_len = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);

        if body.len() as u64 != u64::from(declared_len) {
            return Err(CipherError::TruncatedFrame(format!(
                "declared length {declared_len}, found {} bytes",
                body.len()
            )));
        }

        let header_len = nonce_size.checked_add(salt_size).ok_or_else(|| {
            CipherError::TruncatedFrame(format!(
                "nonce size {nonce_size} and salt size {salt_size} exceed any frame"
            ))
        })?;
        if body.len() < header_len {
            return Err(CipherError::TruncatedFrame(format!(
                "body is {} bytes, nonce and salt need {header_len}",
                body.len()
            )));
        }

        let (nonce, rest) = body.split_at(nonce_size);
        let (salt, sealed) = rest.split_at(salt_size);

        Ok(Self {
            declared_len,
            nonce,
            salt,
            sealed,
        })
    }
}

/// Assemble `[len][nonce][salt][sealed]`.
///
/// Fails with [`CipherError::PayloadTooLarge`] when the body length does not
/// fit the u32 prefix.
pub fn encode(nonce: &[u8], salt: &[u8], sealed: &[u8]) -> CipherResult<Vec<u8>> {
    let body_len = nonce.len() + salt.len() + sealed.len();
    let declared = u32::try_from(body_len).map_err(|_| CipherError::PayloadTooLarge {
        len: body_len,
        max: u32::MAX as usize,
    })?;

    let mut frame = Vec::with_capacity(LEN_PREFIX_SIZE + body_len);
    frame.extend_from_slice(&declared.to_be_bytes());
    frame.extend_from_slice(nonce);
    frame.extend_from_slice(salt);
    frame.extend_from_slice(sealed);
    Ok(frame)
}
