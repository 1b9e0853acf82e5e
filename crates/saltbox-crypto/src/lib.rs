//! Saltbox Envelope Encryption
//!
//! A small, safety-oriented envelope API over NaCl-style authenticated
//! encryption. Three box variants share one contract:
//!
//! - [`SecretBox`] — secret-key encryption (XSalsa20-Poly1305)
//! - [`PublicBox`] — public-key encryption with a precomputed shared key
//!   (X25519 + XSalsa20-Poly1305)
//! - [`SealedBox`] — anonymous public-key encryption with an ephemeral
//!   sender key embedded in the ciphertext
//!
//! Every encryption produces an [`Envelope`] holding nonce, ciphertext, and
//! (in detached mode) a separate MAC. The authentication tag is either
//! appended to the ciphertext ([`MacMode::Combined`]) or kept in its own
//! buffer ([`MacMode::Detached`]); the mode is an explicit choice at encrypt
//! time, never inferred from a missing field.
//!
//! # Security
//!
//! Buffer discipline:
//! - Every key, nonce, and MAC length is validated before any primitive call
//! - Decrypt output buffers are freshly zero-initialized in every mode
//! - Authentication failure is a single undifferentiated error; callers
//!   never learn whether the key, nonce, MAC, or ciphertext was wrong
//!
//! Key lifecycle:
//! - Keys live in [`SealedBuffer`]s, wiped on drop via `zeroize`
//! - `destroy()` wipes a box's internal key material eagerly and is
//!   idempotent; a destroyed box fails closed instead of encrypting with a
//!   wiped key
//!
//! Nonces:
//! - 24-byte nonces are drawn fresh from a CSPRNG on every encryption;
//!   `*_with_rng` forms accept a caller-supplied RNG for deterministic tests
//! - A nonce must never repeat under the same key; random 24-byte nonces
//!   make collisions negligible

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod boxes;
pub mod buffer;
pub mod envelope;
pub mod error;
pub mod keys;

pub use boxes::{
    public::{PublicBox, PUBLIC_KEY_SIZE},
    sealed::{SealedBox, SEAL_OVERHEAD},
    secret::{SecretBox, KEY_SIZE, MAC_SIZE, NONCE_SIZE},
    Saltbox,
};
pub use buffer::SealedBuffer;
pub use envelope::{Envelope, MacMode};
pub use error::BoxError;
pub use keys::{generate_secret_key, generate_secret_key_with_rng, KeyPair};
