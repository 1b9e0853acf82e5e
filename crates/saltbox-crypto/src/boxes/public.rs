//! Public-key box with a precomputed shared key (X25519 + XSalsa20-Poly1305)

use crypto_box::{PublicKey, SalsaBox, SecretKey};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::buffer::SealedBuffer;
use crate::envelope::{Envelope, MacMode};
use crate::error::BoxError;

use super::{decrypt_alloc, decrypt_reuse, encrypt_alloc, encrypt_reuse, key_array};

/// X25519 public key length in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// X25519 private key length in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Nonce length in bytes.
pub const NONCE_SIZE: usize = 24;

/// Poly1305 authentication tag length in bytes.
pub const MAC_SIZE: usize = 16;

/// Public-key authenticated encryption between two identities.
///
/// Construction derives the shared key from the peer's public key and our
/// private key once; every subsequent encrypt/decrypt reuses it, avoiding a
/// key agreement per message. The caller keeps ownership of the original
/// keys; this box owns only the derived shared state.
pub struct PublicBox {
    shared: Option<SalsaBox>,
}

impl PublicBox {
    /// Derive and store the shared key for `(their_public, our_private)`.
    ///
    /// Both key sizes are validated before any derivation happens.
    ///
    /// # Errors
    ///
    /// [`BoxError::SizeMismatch`] when either key is not exactly 32 bytes.
    pub fn new(their_public: &SealedBuffer, our_private: &SealedBuffer) -> Result<Self, BoxError> {
        let public = key_array(their_public, "public key")?;
        let mut private = key_array(our_private, "private key")?;

        let public = PublicKey::from(public);
        let secret = SecretKey::from(private);
        private.zeroize();

        Ok(Self { shared: Some(SalsaBox::new(&public, &secret)) })
    }

    /// Nonce length this variant requires.
    pub fn nonce_bytes(&self) -> usize {
        NONCE_SIZE
    }

    /// Detached MAC length this variant produces.
    pub fn mac_bytes(&self) -> usize {
        MAC_SIZE
    }

    fn cipher(&self) -> Result<&SalsaBox, BoxError> {
        self.shared.as_ref().ok_or(BoxError::NullKey { name: "shared key" })
    }

    /// Encrypt into a freshly allocated [`Envelope`], drawing the nonce from
    /// the operating system CSPRNG.
    pub fn encrypt(&self, message: &[u8], mode: MacMode) -> Result<Envelope, BoxError> {
        self.encrypt_with_rng(&mut OsRng, message, mode)
    }

    /// [`PublicBox::encrypt`] with a caller-supplied CSPRNG.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
        mode: MacMode,
    ) -> Result<Envelope, BoxError> {
        encrypt_alloc(self.cipher()?, rng, message, mode, NONCE_SIZE, MAC_SIZE)
    }

    /// Encrypt in place, reusing the envelope's buffers after re-validating
    /// their sizes. The nonce is regenerated.
    pub fn encrypt_into(&self, envelope: &mut Envelope, message: &[u8]) -> Result<(), BoxError> {
        self.encrypt_into_with_rng(&mut OsRng, envelope, message)
    }

    /// [`PublicBox::encrypt_into`] with a caller-supplied CSPRNG.
    pub fn encrypt_into_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        envelope: &mut Envelope,
        message: &[u8],
    ) -> Result<(), BoxError> {
        encrypt_reuse(self.cipher()?, rng, envelope, message, NONCE_SIZE, MAC_SIZE)
    }

    /// Validate the envelope and decrypt into a freshly zero-initialized
    /// buffer.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<SealedBuffer, BoxError> {
        decrypt_alloc(self.cipher()?, envelope, NONCE_SIZE, MAC_SIZE)
    }

    /// Decrypt into a caller-supplied buffer sized exactly for the
    /// plaintext.
    pub fn decrypt_into(&self, message: &mut SealedBuffer, envelope: &Envelope) -> Result<(), BoxError> {
        decrypt_reuse(self.cipher()?, message, envelope, NONCE_SIZE, MAC_SIZE)
    }

    /// Drop the shared key (its key schedule is zeroized on drop). The
    /// original key pair stays untouched; it belongs to the caller.
    /// Idempotent; later operations fail with [`BoxError::NullKey`].
    pub fn destroy(&mut self) {
        self.shared = None;
    }
}

impl std::fmt::Debug for PublicBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicBox(shared key {})", if self.shared.is_some() { "present" } else { "destroyed" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    fn peers() -> (PublicBox, PublicBox) {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let alice_box = PublicBox::new(bob.public_key(), alice.private_key()).unwrap();
        let bob_box = PublicBox::new(alice.public_key(), bob.private_key()).unwrap();
        (alice_box, bob_box)
    }

    #[test]
    fn shared_key_is_symmetric() {
        let (alice_box, bob_box) = peers();

        let to_bob = alice_box.encrypt(b"hello bob", MacMode::Combined).unwrap();
        assert_eq!(bob_box.decrypt(&to_bob).unwrap().as_slice(), b"hello bob");

        let to_alice = bob_box.encrypt(b"hello alice", MacMode::Detached).unwrap();
        assert_eq!(alice_box.decrypt(&to_alice).unwrap().as_slice(), b"hello alice");
    }

    #[test]
    fn construction_validates_key_sizes_before_derivation() {
        let good = SealedBuffer::zeroed(32);
        let result = PublicBox::new(&SealedBuffer::zeroed(31), &good);
        assert_eq!(
            result.err(),
            Some(BoxError::SizeMismatch { name: "public key", expected: 32, actual: 31 })
        );

        let result = PublicBox::new(&good, &SealedBuffer::zeroed(33));
        assert_eq!(
            result.err(),
            Some(BoxError::SizeMismatch { name: "private key", expected: 32, actual: 33 })
        );
    }

    #[test]
    fn unrelated_peer_cannot_decrypt() {
        let (alice_box, _) = peers();
        let mallory = KeyPair::generate();
        let eve = KeyPair::generate();
        let mallory_box = PublicBox::new(eve.public_key(), mallory.private_key()).unwrap();

        let envelope = alice_box.encrypt(b"for bob only", MacMode::Combined).unwrap();
        assert_eq!(mallory_box.decrypt(&envelope).err(), Some(BoxError::AuthenticationFailure));
    }

    #[test]
    fn tampered_mac_fails_decryption() {
        let (alice_box, bob_box) = peers();
        let envelope = alice_box.encrypt(b"payload", MacMode::Detached).unwrap();

        let mut mac = envelope.mac().unwrap().as_slice().to_vec();
        mac[0] ^= 0x80;
        let tampered = Envelope::detached(
            envelope.nonce().unwrap().clone(),
            envelope.ciphertext().clone(),
            SealedBuffer::from_vec(mac),
        );
        assert_eq!(bob_box.decrypt(&tampered).err(), Some(BoxError::AuthenticationFailure));
    }

    #[test]
    fn destroyed_box_fails_closed() {
        let (mut alice_box, _) = peers();
        alice_box.destroy();
        alice_box.destroy();
        assert_eq!(
            alice_box.encrypt(b"late", MacMode::Combined).err(),
            Some(BoxError::NullKey { name: "shared key" })
        );
    }
}
