//! The box core: one contract, three variants
//!
//! [`Saltbox`] is a closed sum over the three box variants. Each variant
//! validates every buffer length before touching a primitive, generates
//! nonces from a CSPRNG, and supports both MAC encodings (except
//! [`SealedBox`], whose construction embeds the ephemeral key and tag in the
//! ciphertext itself).
//!
//! The seal/open plumbing shared by [`SecretBox`] and [`PublicBox`] lives
//! here, generic over `aead::AeadInPlace`, so the two variants differ only
//! in how their cipher state is constructed.

pub mod public;
pub mod sealed;
pub mod secret;

use crypto_secretbox::aead::{AeadInPlace, Nonce, Tag};
use rand::{CryptoRng, RngCore};

use crate::buffer::{check_length, check_non_empty, check_required, SealedBuffer};
use crate::envelope::{Envelope, MacMode};
use crate::error::BoxError;

pub use public::PublicBox;
pub use sealed::SealedBox;
pub use secret::SecretBox;

/// A box capability: secret-key, public-key, or anonymous sealed encryption.
///
/// The variants share one contract: `encrypt` allocates a fresh
/// [`Envelope`], `encrypt_into` reuses caller buffers, `decrypt` allocates
/// the plaintext, `decrypt_into` writes into a caller buffer, and `destroy`
/// wipes internal key material. Construction validates all key sizes, so a
/// `Saltbox` in hand always holds well-formed keys.
#[derive(Debug)]
pub enum Saltbox {
    /// Symmetric authenticated encryption with one shared secret key.
    Secret(SecretBox),
    /// Public-key authenticated encryption with a precomputed shared key.
    Public(PublicBox),
    /// Anonymous public-key encryption; no nonce or MAC surface.
    Sealed(SealedBox),
}

impl Saltbox {
    /// Secret-key box from a 32-byte symmetric key.
    pub fn secret(key: SealedBuffer) -> Result<Self, BoxError> {
        Ok(Self::Secret(SecretBox::new(key)?))
    }

    /// Public-key box from the peer's public key and our private key.
    pub fn public(their_public: &SealedBuffer, our_private: &SealedBuffer) -> Result<Self, BoxError> {
        Ok(Self::Public(PublicBox::new(their_public, our_private)?))
    }

    /// Encrypt-only sealed box for a recipient's public key.
    pub fn sealed(recipient_public: SealedBuffer) -> Result<Self, BoxError> {
        Ok(Self::Sealed(SealedBox::new(recipient_public)?))
    }

    /// Sealed box that can also decrypt, given the recipient's private key.
    pub fn sealed_with_private(
        recipient_public: SealedBuffer,
        recipient_private: SealedBuffer,
    ) -> Result<Self, BoxError> {
        Ok(Self::Sealed(SealedBox::with_private(recipient_public, recipient_private)?))
    }

    /// Nonce length this variant requires, 0 for sealed boxes.
    pub fn nonce_bytes(&self) -> usize {
        match self {
            Self::Secret(b) => b.nonce_bytes(),
            Self::Public(b) => b.nonce_bytes(),
            Self::Sealed(b) => b.nonce_bytes(),
        }
    }

    /// Detached MAC length this variant produces, 0 for sealed boxes.
    pub fn mac_bytes(&self) -> usize {
        match self {
            Self::Secret(b) => b.mac_bytes(),
            Self::Public(b) => b.mac_bytes(),
            Self::Sealed(b) => b.mac_bytes(),
        }
    }

    /// Encrypt `message` into a freshly allocated [`Envelope`], drawing the
    /// nonce from the operating system CSPRNG.
    ///
    /// Sealed boxes have no MAC surface and ignore `mode`.
    pub fn encrypt(&self, message: &[u8], mode: MacMode) -> Result<Envelope, BoxError> {
        match self {
            Self::Secret(b) => b.encrypt(message, mode),
            Self::Public(b) => b.encrypt(message, mode),
            Self::Sealed(b) => b.encrypt(message),
        }
    }

    /// [`Saltbox::encrypt`] with a caller-supplied CSPRNG.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        message: &[u8],
        mode: MacMode,
    ) -> Result<Envelope, BoxError> {
        match self {
            Self::Secret(b) => b.encrypt_with_rng(rng, message, mode),
            Self::Public(b) => b.encrypt_with_rng(rng, message, mode),
            Self::Sealed(b) => b.encrypt_with_rng(rng, message),
        }
    }

    /// Encrypt `message` in place, reusing the caller-supplied envelope's
    /// buffers. Re-validates every buffer length against this variant's
    /// fixed sizes, then regenerates the nonce.
    pub fn encrypt_into(&self, envelope: &mut Envelope, message: &[u8]) -> Result<(), BoxError> {
        match self {
            Self::Secret(b) => b.encrypt_into(envelope, message),
            Self::Public(b) => b.encrypt_into(envelope, message),
            Self::Sealed(b) => b.encrypt_into(envelope, message),
        }
    }

    /// [`Saltbox::encrypt_into`] with a caller-supplied CSPRNG.
    pub fn encrypt_into_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        envelope: &mut Envelope,
        message: &[u8],
    ) -> Result<(), BoxError> {
        match self {
            Self::Secret(b) => b.encrypt_into_with_rng(rng, envelope, message),
            Self::Public(b) => b.encrypt_into_with_rng(rng, envelope, message),
            Self::Sealed(b) => b.encrypt_into_with_rng(rng, envelope, message),
        }
    }

    /// Validate the envelope, then decrypt into a freshly zero-initialized
    /// buffer sized for the plaintext.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<SealedBuffer, BoxError> {
        match self {
            Self::Secret(b) => b.decrypt(envelope),
            Self::Public(b) => b.decrypt(envelope),
            Self::Sealed(b) => b.decrypt(envelope),
        }
    }

    /// Decrypt into a caller-supplied buffer, which must be sized exactly
    /// for the plaintext.
    pub fn decrypt_into(&self, message: &mut SealedBuffer, envelope: &Envelope) -> Result<(), BoxError> {
        match self {
            Self::Secret(b) => b.decrypt_into(message, envelope),
            Self::Public(b) => b.decrypt_into(message, envelope),
            Self::Sealed(b) => b.decrypt_into(message, envelope),
        }
    }

    /// Wipe all internally-held key material. Idempotent. Operations on a
    /// destroyed box fail closed.
    pub fn destroy(&mut self) {
        match self {
            Self::Secret(b) => b.destroy(),
            Self::Public(b) => b.destroy(),
            Self::Sealed(b) => b.destroy(),
        }
    }
}

/// Copy a validated 32-byte key out of a buffer.
pub(crate) fn key_array(buffer: &SealedBuffer, name: &'static str) -> Result<[u8; 32], BoxError> {
    check_length(buffer, 32, name)?;
    let mut array = [0u8; 32];
    array.copy_from_slice(buffer.as_slice());
    Ok(array)
}

/// Seal `message` in combined encoding: `ciphertext` receives the
/// transformed message with the tag appended, and must be exactly
/// `message.len() + mac` bytes.
fn seal_combined<C: AeadInPlace>(
    cipher: &C,
    nonce: &[u8],
    message: &[u8],
    ciphertext: &mut [u8],
) -> Result<(), BoxError> {
    let (body, tag_out) = ciphertext.split_at_mut(message.len());
    body.copy_from_slice(message);
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<C>::from_slice(nonce), b"", body)
        .map_err(|_| BoxError::EncryptionFailure)?;
    tag_out.copy_from_slice(tag.as_slice());
    Ok(())
}

/// Seal `message` in detached encoding: transformed message into
/// `ciphertext` (same length as the message), tag into `mac`.
fn seal_detached<C: AeadInPlace>(
    cipher: &C,
    nonce: &[u8],
    message: &[u8],
    ciphertext: &mut [u8],
    mac: &mut [u8],
) -> Result<(), BoxError> {
    ciphertext.copy_from_slice(message);
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<C>::from_slice(nonce), b"", ciphertext)
        .map_err(|_| BoxError::EncryptionFailure)?;
    mac.copy_from_slice(tag.as_slice());
    Ok(())
}

/// Open a combined-encoding ciphertext (trailing `mac_size` tag bytes) into
/// `message`, which must be `ciphertext.len() - mac_size` bytes.
fn open_combined<C: AeadInPlace>(
    cipher: &C,
    nonce: &[u8],
    ciphertext: &[u8],
    mac_size: usize,
    message: &mut [u8],
) -> Result<(), BoxError> {
    let (body, tag) = ciphertext.split_at(ciphertext.len() - mac_size);
    message.copy_from_slice(body);
    cipher
        .decrypt_in_place_detached(Nonce::<C>::from_slice(nonce), b"", message, Tag::<C>::from_slice(tag))
        .map_err(|_| BoxError::AuthenticationFailure)
}

/// Open a detached-encoding ciphertext into `message`, which must match the
/// ciphertext length.
fn open_detached<C: AeadInPlace>(
    cipher: &C,
    nonce: &[u8],
    ciphertext: &[u8],
    mac: &[u8],
    message: &mut [u8],
) -> Result<(), BoxError> {
    message.copy_from_slice(ciphertext);
    cipher
        .decrypt_in_place_detached(Nonce::<C>::from_slice(nonce), b"", message, Tag::<C>::from_slice(mac))
        .map_err(|_| BoxError::AuthenticationFailure)
}

/// Check an envelope against the variant's fixed sizes before any primitive
/// call: non-empty ciphertext, exact nonce length, exact MAC length when
/// detached, and room for the trailing tag when combined.
fn validate_envelope(envelope: &Envelope, nonce_size: usize, mac_size: usize) -> Result<(), BoxError> {
    check_non_empty(envelope.ciphertext().as_slice(), "ciphertext")?;
    let nonce = check_required(envelope.nonce(), "nonce")?;
    check_length(nonce, nonce_size, "nonce")?;
    match envelope.mac() {
        Some(mac) => check_length(mac, mac_size, "mac")?,
        None => {
            if envelope.ciphertext_len() < mac_size {
                return Err(BoxError::SizeMismatch {
                    name: "ciphertext",
                    expected: mac_size,
                    actual: envelope.ciphertext_len(),
                });
            }
        },
    }
    Ok(())
}

/// Plaintext length an envelope decrypts to.
fn plaintext_len(envelope: &Envelope, mac_size: usize) -> usize {
    match envelope.mode() {
        MacMode::Detached => envelope.ciphertext_len(),
        MacMode::Combined => envelope.ciphertext_len() - mac_size,
    }
}

/// Allocating encrypt shared by the secret and public variants.
pub(crate) fn encrypt_alloc<C, R>(
    cipher: &C,
    rng: &mut R,
    message: &[u8],
    mode: MacMode,
    nonce_size: usize,
    mac_size: usize,
) -> Result<Envelope, BoxError>
where
    C: AeadInPlace,
    R: RngCore + CryptoRng,
{
    check_non_empty(message, "message")?;

    let mut nonce = SealedBuffer::zeroed(nonce_size);
    rng.fill_bytes(nonce.as_mut_slice());

    match mode {
        MacMode::Combined => {
            let mut ciphertext = SealedBuffer::zeroed(message.len() + mac_size);
            seal_combined(cipher, nonce.as_slice(), message, ciphertext.as_mut_slice())?;
            Ok(Envelope::combined(nonce, ciphertext))
        },
        MacMode::Detached => {
            let mut ciphertext = SealedBuffer::zeroed(message.len());
            let mut mac = SealedBuffer::zeroed(mac_size);
            seal_detached(cipher, nonce.as_slice(), message, ciphertext.as_mut_slice(), mac.as_mut_slice())?;
            Ok(Envelope::detached(nonce, ciphertext, mac))
        },
    }
}

/// In-place encrypt shared by the secret and public variants: re-validates
/// the envelope's buffer sizes, regenerates the nonce, seals.
pub(crate) fn encrypt_reuse<C, R>(
    cipher: &C,
    rng: &mut R,
    envelope: &mut Envelope,
    message: &[u8],
    nonce_size: usize,
    mac_size: usize,
) -> Result<(), BoxError>
where
    C: AeadInPlace,
    R: RngCore + CryptoRng,
{
    check_non_empty(message, "message")?;
    let nonce = check_required(envelope.nonce(), "nonce")?;
    check_length(nonce, nonce_size, "nonce")?;

    let expected_ct = match envelope.mode() {
        MacMode::Combined => message.len() + mac_size,
        MacMode::Detached => {
            let mac = check_required(envelope.mac(), "mac")?;
            check_length(mac, mac_size, "mac")?;
            message.len()
        },
    };
    if envelope.ciphertext_len() != expected_ct {
        return Err(BoxError::SizeMismatch {
            name: "ciphertext",
            expected: expected_ct,
            actual: envelope.ciphertext_len(),
        });
    }

    let (nonce, ciphertext, mac) = envelope.parts_mut();
    let nonce = nonce.ok_or(BoxError::NullKey { name: "nonce" })?;
    rng.fill_bytes(nonce.as_mut_slice());

    match mac {
        Some(mac) => {
            seal_detached(cipher, nonce.as_slice(), message, ciphertext.as_mut_slice(), mac.as_mut_slice())
        },
        None => seal_combined(cipher, nonce.as_slice(), message, ciphertext.as_mut_slice()),
    }
}

/// Allocating decrypt shared by the secret and public variants. The output
/// buffer is freshly zero-initialized in either mode.
pub(crate) fn decrypt_alloc<C: AeadInPlace>(
    cipher: &C,
    envelope: &Envelope,
    nonce_size: usize,
    mac_size: usize,
) -> Result<SealedBuffer, BoxError> {
    validate_envelope(envelope, nonce_size, mac_size)?;
    let mut message = SealedBuffer::zeroed(plaintext_len(envelope, mac_size));
    open_envelope(cipher, envelope, mac_size, message.as_mut_slice())?;
    Ok(message)
}

/// In-place decrypt shared by the secret and public variants.
pub(crate) fn decrypt_reuse<C: AeadInPlace>(
    cipher: &C,
    message: &mut SealedBuffer,
    envelope: &Envelope,
    nonce_size: usize,
    mac_size: usize,
) -> Result<(), BoxError> {
    validate_envelope(envelope, nonce_size, mac_size)?;
    let expected = plaintext_len(envelope, mac_size);
    check_length(message, expected, "message")?;
    open_envelope(cipher, envelope, mac_size, message.as_mut_slice())
}

fn open_envelope<C: AeadInPlace>(
    cipher: &C,
    envelope: &Envelope,
    mac_size: usize,
    message: &mut [u8],
) -> Result<(), BoxError> {
    // validate_envelope has already run; nonce is present and sized.
    let nonce = check_required(envelope.nonce(), "nonce")?;
    match envelope.mac() {
        Some(mac) => {
            open_detached(cipher, nonce.as_slice(), envelope.ciphertext().as_slice(), mac.as_slice(), message)
        },
        None => open_combined(cipher, nonce.as_slice(), envelope.ciphertext().as_slice(), mac_size, message),
    }
}
