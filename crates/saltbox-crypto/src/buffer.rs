//! Fixed-length sensitive buffers and size validation
//!
//! [`SealedBuffer`] is the unit of ownership for every sensitive byte region
//! in this crate: keys, nonces, ciphertexts, and MACs. Its length is fixed at
//! construction and its contents are wiped on drop. The validation helpers
//! enforce the fixed-size invariants before any primitive call is made.

use zeroize::Zeroize;

use crate::error::BoxError;

/// An owned, fixed-length byte buffer that is zeroized on drop.
///
/// The logical length is set at construction and never changes. Contents may
/// be overwritten in place (encryption output, nonce regeneration) but the
/// buffer never grows or shrinks. [`SealedBuffer::wipe`] zeroizes the
/// contents eagerly and may be called any number of times; drop wipes
/// whatever is left.
#[derive(Clone)]
pub struct SealedBuffer {
    bytes: Vec<u8>,
}

impl SealedBuffer {
    /// Create a zero-filled buffer of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        Self { bytes: vec![0u8; len] }
    }

    /// Create a buffer holding a copy of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec() }
    }

    /// Take ownership of an existing byte vector.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the buffer holds zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the contents.
    ///
    /// # Security
    ///
    /// Do not log or persist the returned bytes when the buffer holds key
    /// material.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Overwrite every byte with zero, keeping the length intact.
    ///
    /// The write is guaranteed observable (`zeroize` inserts the necessary
    /// barriers). Idempotent: wiping an already-wiped or empty buffer is a
    /// no-op.
    pub fn wipe(&mut self) {
        self.bytes.as_mut_slice().zeroize();
    }
}

impl Drop for SealedBuffer {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl AsRef<[u8]> for SealedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SealedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SealedBuffer({} bytes, [REDACTED])", self.bytes.len())
    }
}

/// Fail with [`BoxError::SizeMismatch`] unless `buffer` is exactly
/// `expected` bytes long.
pub fn check_length(buffer: &SealedBuffer, expected: usize, name: &'static str) -> Result<(), BoxError> {
    if buffer.len() != expected {
        return Err(BoxError::SizeMismatch { name, expected, actual: buffer.len() });
    }
    Ok(())
}

/// Unwrap a required buffer, failing with [`BoxError::NullKey`] if absent.
pub fn check_required<'a>(
    buffer: Option<&'a SealedBuffer>,
    name: &'static str,
) -> Result<&'a SealedBuffer, BoxError> {
    buffer.ok_or(BoxError::NullKey { name })
}

/// Fail with [`BoxError::EmptyInput`] unless `bytes` is non-empty.
pub fn check_non_empty(bytes: &[u8], name: &'static str) -> Result<(), BoxError> {
    if bytes.is_empty() {
        return Err(BoxError::EmptyInput { name });
    }
    Ok(())
}
