//! Secret-key box (XSalsa20-Poly1305)

use crypto_secretbox::aead::KeyInit;
use crypto_secretbox::{Key, XSalsa20Poly1305};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::buffer::{check_length, check_required, SealedBuffer};
use crate::envelope::{Envelope, MacMode};
use crate::error::BoxError;

use super::{decrypt_alloc, decrypt_reuse, encrypt_alloc, encrypt_reuse};

/// Symmetric key length in bytes.
pub const KEY_SIZE: usize = 32;

/// Nonce length in bytes (XSalsa20 extended nonce).
pub const NONCE_SIZE: usize = 24;

/// Poly1305 authentication tag length in bytes.
pub const MAC_SIZE: usize = 16;

/// Secret-key authenticated encryption with one 32-byte symmetric key.
///
/// Both peers hold the same key. Supports combined and detached MAC
/// encodings.
#[derive(Debug)]
pub struct SecretBox {
    key: Option<SealedBuffer>,
}

impl SecretBox {
    /// Construct from a 32-byte symmetric key, taking ownership.
    ///
    /// # Errors
    ///
    /// [`BoxError::SizeMismatch`] when the key is not exactly
    /// [`KEY_SIZE`] bytes.
    pub fn new(key: SealedBuffer) -> Result<Self, BoxError> {
        check_length(&key, KEY_SIZE, "secret key")?;
        Ok(Self { key: Some(key) })
    }

    /// Nonce length this variant requires.
    pub fn nonce_bytes(&self) -> usize {
        NONCE_SIZE
    }

    /// Detached MAC length this variant produces.
    pub fn mac_bytes(&self) -> usize {
        MAC_SIZE
    }

    fn cipher(&self) -> Result<XSalsa20Poly1305, BoxError> {
        let key = check_required(self.key.as_ref(), "secret key")?;
        Ok(XSalsa20Poly1305::new(Key::from_slice(key.as_slice())))
    }

    /// Encrypt into a freshly allocated [`Envelope`], drawing the nonce from
    /// the operating system CSPRNG.
    pub fn encrypt(&self, message: &[u8], mode: MacMode) -> Result<Envelope, BoxError> {
        self.encrypt_with_rng(&mut OsRng, message, mode)
    }

    /// [`SecretBox::encrypt`] with a caller-supplied CSPRNG.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
        mode: MacMode,
    ) -> Result<Envelope, BoxError> {
        encrypt_alloc(&self.cipher()?, rng, message, mode, NONCE_SIZE, MAC_SIZE)
    }

    /// Encrypt in place, reusing the envelope's buffers after re-validating
    /// their sizes. The nonce is regenerated.
    pub fn encrypt_into(&self, envelope: &mut Envelope, message: &[u8]) -> Result<(), BoxError> {
        self.encrypt_into_with_rng(&mut OsRng, envelope, message)
    }

    /// [`SecretBox::encrypt_into`] with a caller-supplied CSPRNG.
    pub fn encrypt_into_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        envelope: &mut Envelope,
        message: &[u8],
    ) -> Result<(), BoxError> {
        encrypt_reuse(&self.cipher()?, rng, envelope, message, NONCE_SIZE, MAC_SIZE)
    }

    /// Validate the envelope and decrypt into a freshly zero-initialized
    /// buffer.
    ///
    /// # Errors
    ///
    /// [`BoxError::AuthenticationFailure`] when verification fails, for any
    /// reason.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<SealedBuffer, BoxError> {
        decrypt_alloc(&self.cipher()?, envelope, NONCE_SIZE, MAC_SIZE)
    }

    /// Decrypt into a caller-supplied buffer sized exactly for the
    /// plaintext.
    pub fn decrypt_into(&self, message: &mut SealedBuffer, envelope: &Envelope) -> Result<(), BoxError> {
        decrypt_reuse(&self.cipher()?, message, envelope, NONCE_SIZE, MAC_SIZE)
    }

    /// Wipe the key. Idempotent; later operations fail with
    /// [`BoxError::NullKey`].
    pub fn destroy(&mut self) {
        if let Some(mut key) = self.key.take() {
            key.wipe();
        }
    }
}
