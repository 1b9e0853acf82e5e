//! Anonymous sealed box (ephemeral X25519 key embedded in the ciphertext)

use crypto_box::{PublicKey, SecretKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::buffer::{check_length, check_non_empty, check_required, SealedBuffer};
use crate::envelope::Envelope;
use crate::error::BoxError;

use super::key_array;
use super::public::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};

/// Bytes a sealed ciphertext grows by: the 32-byte ephemeral public key plus
/// the 16-byte authentication tag.
pub const SEAL_OVERHEAD: usize = 48;

/// Anonymous public-key encryption to a recipient.
///
/// The sender's identity is never revealed: each encryption generates an
/// ephemeral key pair whose public half is embedded in the ciphertext along
/// with the tag, so sealed envelopes carry no separate nonce or MAC.
///
/// Constructed with only the recipient's public key, the box can encrypt but
/// not decrypt; add the private key via [`SealedBox::with_private`] for the
/// full capability.
#[derive(Debug)]
pub struct SealedBox {
    recipient_public: Option<SealedBuffer>,
    recipient_private: Option<SealedBuffer>,
}

impl SealedBox {
    /// Encrypt-only sealed box for a recipient, taking ownership of the
    /// public key copy.
    ///
    /// # Errors
    ///
    /// [`BoxError::SizeMismatch`] when the key is not exactly 32 bytes.
    pub fn new(recipient_public: SealedBuffer) -> Result<Self, BoxError> {
        check_length(&recipient_public, PUBLIC_KEY_SIZE, "recipient public key")?;
        Ok(Self { recipient_public: Some(recipient_public), recipient_private: None })
    }

    /// Sealed box holding both halves of the recipient's key pair, able to
    /// decrypt as well as encrypt.
    pub fn with_private(
        recipient_public: SealedBuffer,
        recipient_private: SealedBuffer,
    ) -> Result<Self, BoxError> {
        check_length(&recipient_public, PUBLIC_KEY_SIZE, "recipient public key")?;
        check_length(&recipient_private, PRIVATE_KEY_SIZE, "recipient private key")?;
        Ok(Self { recipient_public: Some(recipient_public), recipient_private: Some(recipient_private) })
    }

    /// Sealed boxes carry no nonce; always 0.
    pub fn nonce_bytes(&self) -> usize {
        0
    }

    /// Sealed boxes carry no detached MAC; always 0.
    pub fn mac_bytes(&self) -> usize {
        0
    }

    /// True if this box holds the recipient private key and can decrypt.
    pub fn can_decrypt(&self) -> bool {
        self.recipient_private.is_some()
    }

    /// Seal `message` into a freshly allocated envelope whose ciphertext is
    /// `message.len() + SEAL_OVERHEAD` bytes.
    pub fn encrypt(&self, message: &[u8]) -> Result<Envelope, BoxError> {
        self.encrypt_with_rng(&mut OsRng, message)
    }

    /// [`SealedBox::encrypt`] with a caller-supplied CSPRNG for the
    /// ephemeral key pair.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
    ) -> Result<Envelope, BoxError> {
        let ciphertext = self.seal(rng, message)?;
        Ok(Envelope::sealed(SealedBuffer::from_vec(ciphertext)))
    }

    /// Seal in place, reusing the envelope's ciphertext buffer. The
    /// envelope must carry no nonce or MAC buffer and its ciphertext must be
    /// exactly `message.len() + SEAL_OVERHEAD` bytes.
    pub fn encrypt_into(&self, envelope: &mut Envelope, message: &[u8]) -> Result<(), BoxError> {
        self.encrypt_into_with_rng(&mut OsRng, envelope, message)
    }

    /// [`SealedBox::encrypt_into`] with a caller-supplied CSPRNG.
    pub fn encrypt_into_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        envelope: &mut Envelope,
        message: &[u8],
    ) -> Result<(), BoxError> {
        check_non_empty(message, "message")?;
        if envelope.nonce_len() != 0 {
            return Err(BoxError::SizeMismatch { name: "nonce", expected: 0, actual: envelope.nonce_len() });
        }
        if envelope.mac_len() != 0 {
            return Err(BoxError::SizeMismatch { name: "mac", expected: 0, actual: envelope.mac_len() });
        }
        let expected = message.len() + SEAL_OVERHEAD;
        if envelope.ciphertext_len() != expected {
            return Err(BoxError::SizeMismatch {
                name: "ciphertext",
                expected,
                actual: envelope.ciphertext_len(),
            });
        }

        let ciphertext = self.seal(rng, message)?;
        let (_, out, _) = envelope.parts_mut();
        out.as_mut_slice().copy_from_slice(&ciphertext);
        Ok(())
    }

    fn seal<R: RngCore + CryptoRng>(&self, rng: &mut R, message: &[u8]) -> Result<Vec<u8>, BoxError> {
        check_non_empty(message, "message")?;
        let public = check_required(self.recipient_public.as_ref(), "recipient public key")?;
        let public = PublicKey::from(key_array(public, "recipient public key")?);
        public.seal(rng, message).map_err(|_| BoxError::EncryptionFailure)
    }

    /// Open a sealed envelope into a freshly allocated buffer of
    /// `ciphertext_len() - SEAL_OVERHEAD` bytes.
    ///
    /// # Errors
    ///
    /// [`BoxError::CapabilityDenied`] when this box was constructed without
    /// the recipient private key. The check runs before any buffer
    /// validation and the primitive is never reached.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<SealedBuffer, BoxError> {
        let message = self.unseal(envelope)?;
        Ok(SealedBuffer::from_vec(message))
    }

    /// Open into a caller-supplied buffer sized exactly for the plaintext.
    pub fn decrypt_into(&self, message: &mut SealedBuffer, envelope: &Envelope) -> Result<(), BoxError> {
        // Capability first; output shape only matters if we may decrypt at all.
        if self.recipient_private.is_none() {
            return Err(BoxError::CapabilityDenied);
        }
        let expected = envelope.ciphertext_len().saturating_sub(SEAL_OVERHEAD);
        if message.len() != expected {
            return Err(BoxError::SizeMismatch { name: "message", expected, actual: message.len() });
        }
        let plaintext = self.unseal(envelope)?;
        message.as_mut_slice().copy_from_slice(&plaintext);
        Ok(())
    }

    fn unseal(&self, envelope: &Envelope) -> Result<Vec<u8>, BoxError> {
        let private = self.recipient_private.as_ref().ok_or(BoxError::CapabilityDenied)?;

        check_non_empty(envelope.ciphertext().as_slice(), "ciphertext")?;
        if envelope.ciphertext_len() < SEAL_OVERHEAD {
            return Err(BoxError::SizeMismatch {
                name: "ciphertext",
                expected: SEAL_OVERHEAD,
                actual: envelope.ciphertext_len(),
            });
        }

        let mut private = key_array(private, "recipient private key")?;
        let secret = SecretKey::from(private);
        private.zeroize();
        secret.unseal(envelope.ciphertext().as_slice()).map_err(|_| BoxError::AuthenticationFailure)
    }

    /// Wipe both held keys. Idempotent; later operations fail closed
    /// ([`BoxError::NullKey`] for encrypt, [`BoxError::CapabilityDenied`]
    /// for decrypt).
    pub fn destroy(&mut self) {
        if let Some(mut key) = self.recipient_public.take() {
            key.wipe();
        }
        if let Some(mut key) = self.recipient_private.take() {
            key.wipe();
        }
    }
}
