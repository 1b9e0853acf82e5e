//! The Envelope value type
//!
//! An [`Envelope`] groups the three buffers an encryption produces: nonce,
//! ciphertext, and (in detached mode) a separate MAC. It owns no
//! cryptographic logic; the box variants read and write it. The MAC encoding
//! is chosen explicitly through the constructors rather than inferred from a
//! field that happens to be missing.

use crate::buffer::SealedBuffer;

/// Where the authentication tag lives relative to the ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacMode {
    /// MAC bytes are appended to the transformed message in one buffer.
    Combined,
    /// MAC is stored in its own buffer; the ciphertext holds only the
    /// transformed message.
    Detached,
}

/// Nonce, ciphertext, and optional detached MAC produced by one encryption.
///
/// Sealed-box envelopes carry neither nonce nor MAC; the ephemeral key and
/// tag are embedded in the enlarged ciphertext.
#[derive(Debug, Clone)]
pub struct Envelope {
    nonce: Option<SealedBuffer>,
    ciphertext: SealedBuffer,
    mac: Option<SealedBuffer>,
}

impl Envelope {
    /// Envelope in combined encoding: the ciphertext carries the trailing
    /// MAC bytes.
    pub fn combined(nonce: SealedBuffer, ciphertext: SealedBuffer) -> Self {
        Self { nonce: Some(nonce), ciphertext, mac: None }
    }

    /// Envelope in detached encoding: MAC in its own buffer.
    pub fn detached(nonce: SealedBuffer, ciphertext: SealedBuffer, mac: SealedBuffer) -> Self {
        Self { nonce: Some(nonce), ciphertext, mac: Some(mac) }
    }

    /// Sealed-box envelope: ciphertext only.
    pub fn sealed(ciphertext: SealedBuffer) -> Self {
        Self { nonce: None, ciphertext, mac: None }
    }

    /// The MAC encoding this envelope was constructed with.
    pub fn mode(&self) -> MacMode {
        if self.mac.is_some() { MacMode::Detached } else { MacMode::Combined }
    }

    /// Nonce buffer, absent for sealed boxes.
    pub fn nonce(&self) -> Option<&SealedBuffer> {
        self.nonce.as_ref()
    }

    /// Ciphertext buffer. Includes the trailing MAC in combined encoding and
    /// the full seal overhead for sealed boxes.
    pub fn ciphertext(&self) -> &SealedBuffer {
        &self.ciphertext
    }

    /// Detached MAC buffer, present only in detached encoding.
    pub fn mac(&self) -> Option<&SealedBuffer> {
        self.mac.as_ref()
    }

    /// Nonce length in bytes, 0 when absent.
    pub fn nonce_len(&self) -> usize {
        self.nonce.as_ref().map_or(0, SealedBuffer::len)
    }

    /// Ciphertext length in bytes.
    pub fn ciphertext_len(&self) -> usize {
        self.ciphertext.len()
    }

    /// Detached MAC length in bytes, 0 when absent.
    pub fn mac_len(&self) -> usize {
        self.mac.as_ref().map_or(0, SealedBuffer::len)
    }

    /// Wipe every held buffer. Idempotent; the envelope keeps its shape but
    /// all contents read as zero afterwards.
    pub fn destroy(&mut self) {
        if let Some(nonce) = self.nonce.as_mut() {
            nonce.wipe();
        }
        self.ciphertext.wipe();
        if let Some(mac) = self.mac.as_mut() {
            mac.wipe();
        }
    }

    /// Disjoint mutable borrows of all three buffers, for in-place
    /// encryption.
    pub(crate) fn parts_mut(
        &mut self,
    ) -> (Option<&mut SealedBuffer>, &mut SealedBuffer, Option<&mut SealedBuffer>) {
        (self.nonce.as_mut(), &mut self.ciphertext, self.mac.as_mut())
    }
}
