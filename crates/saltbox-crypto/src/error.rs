//! Error types for box operations

use thiserror::Error;

/// Errors from envelope encryption and decryption.
///
/// Two categories share this enum: validation failures (a caller passed a
/// buffer of the wrong shape — a programming error) and cryptographic
/// failures (expected at runtime when handling untrusted input). Use
/// [`BoxError::is_validation`] to tell them apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoxError {
    /// A required buffer was not supplied
    #[error("{name} must be present")]
    NullKey {
        /// Name of the missing buffer
        name: &'static str,
    },

    /// A buffer was supplied with the wrong fixed length
    #[error("{name} expected length = {expected}, actual length = {actual}")]
    SizeMismatch {
        /// Name of the offending buffer
        name: &'static str,
        /// Required length in bytes
        expected: usize,
        /// Length the caller supplied
        actual: usize,
    },

    /// A buffer that must be non-empty was empty
    #[error("{name} must not be empty")]
    EmptyInput {
        /// Name of the offending buffer
        name: &'static str,
    },

    /// Verification failed: wrong key, tampered ciphertext, wrong nonce, or
    /// forged MAC. Deliberately undifferentiated.
    #[error("failed decryption")]
    AuthenticationFailure,

    /// The seal primitive reported failure. Unreachable under correct usage;
    /// treat as a bug in the caller, not attacker action.
    #[error("failed encryption")]
    EncryptionFailure,

    /// Decrypt attempted on a box that holds no private key
    #[error("cannot decrypt with this box")]
    CapabilityDenied,
}

impl BoxError {
    /// Returns true if this error signals caller misuse (wrong buffer shape,
    /// missing capability) rather than a routine cryptographic rejection.
    ///
    /// Validation errors indicate a bug at the call site. Authentication
    /// failures are expected when handling untrusted input and should be
    /// treated as routine (e.g. reject a malformed network message).
    pub fn is_validation(&self) -> bool {
        match self {
            Self::NullKey { .. }
            | Self::SizeMismatch { .. }
            | Self::EmptyInput { .. }
            | Self::CapabilityDenied => true,

            // Runtime outcomes, not caller bugs
            Self::AuthenticationFailure | Self::EncryptionFailure => false,
        }
    }
}
