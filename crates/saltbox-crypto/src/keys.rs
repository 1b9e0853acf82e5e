//! Key material generation
//!
//! Produces the fixed-length [`SealedBuffer`]s the box constructors consume:
//! X25519 key pairs for [`crate::PublicBox`] / [`crate::SealedBox`] and
//! 32-byte symmetric keys for [`crate::SecretBox`]. Persistence is the
//! caller's concern; externally-loaded keys enter through
//! [`KeyPair::from_parts`], which validates lengths.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::boxes::public::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
use crate::boxes::secret::KEY_SIZE;
use crate::buffer::{check_length, SealedBuffer};
use crate::error::BoxError;

/// An X25519 public/private key pair.
///
/// Created once per identity and owned by the caller. Call
/// [`KeyPair::destroy`] at end-of-life to wipe the private half eagerly;
/// drop wipes it regardless.
#[derive(Debug)]
pub struct KeyPair {
    public_key: SealedBuffer,
    private_key: SealedBuffer,
}

impl KeyPair {
    /// Generate a fresh key pair from the operating system CSPRNG.
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generate a fresh key pair from a caller-supplied CSPRNG.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = crypto_box::SecretKey::generate(rng);
        let public = secret.public_key();
        let mut private_bytes = secret.to_bytes();
        let private_key = SealedBuffer::from_slice(&private_bytes);
        private_bytes.zeroize();
        Self { public_key: SealedBuffer::from_slice(public.as_bytes()), private_key }
    }

    /// Assemble a key pair from externally-loaded buffers.
    ///
    /// # Errors
    ///
    /// [`BoxError::SizeMismatch`] if either buffer is not exactly 32 bytes.
    pub fn from_parts(public_key: SealedBuffer, private_key: SealedBuffer) -> Result<Self, BoxError> {
        check_length(&public_key, PUBLIC_KEY_SIZE, "public key")?;
        check_length(&private_key, PRIVATE_KEY_SIZE, "private key")?;
        Ok(Self { public_key, private_key })
    }

    /// The public half.
    pub fn public_key(&self) -> &SealedBuffer {
        &self.public_key
    }

    /// The private half.
    ///
    /// # Security
    ///
    /// Keep secret. Hand it only to box constructors or a trusted key store.
    pub fn private_key(&self) -> &SealedBuffer {
        &self.private_key
    }

    /// Wipe both halves. Idempotent.
    pub fn destroy(&mut self) {
        self.public_key.wipe();
        self.private_key.wipe();
    }
}

/// Generate a 32-byte symmetric key for [`crate::SecretBox`] from the
/// operating system CSPRNG.
pub fn generate_secret_key() -> SealedBuffer {
    generate_secret_key_with_rng(&mut OsRng)
}

/// Generate a 32-byte symmetric key from a caller-supplied CSPRNG.
pub fn generate_secret_key_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> SealedBuffer {
    let mut key = SealedBuffer::zeroed(KEY_SIZE);
    rng.fill_bytes(key.as_mut_slice());
    key
}
