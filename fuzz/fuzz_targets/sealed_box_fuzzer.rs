//! Fuzz target for the anonymous sealed box variant
//!
//! # Strategy
//!
//! - Deterministic recipient key pairs from arbitrary seeds
//! - Encrypt-only and full-capability boxes side by side
//! - Arbitrary messages, arbitrary ciphertexts fed straight to decrypt
//! - Single-bit corruption of sealed ciphertexts
//!
//! # Invariants
//!
//! - No operation ever panics, even on garbage ciphertexts
//! - Sealed ciphertexts are exactly message length plus 48 bytes
//! - An encrypt-only box always reports CapabilityDenied on decrypt
//! - The recipient opens every untampered envelope exactly
//! - Any single-bit corruption fails authentication

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;
use saltbox_crypto::{BoxError, Envelope, KeyPair, SealedBox, SealedBuffer, SEAL_OVERHEAD};

#[derive(Debug, Arbitrary)]
struct SealedScenario {
    /// Seed for the recipient key pair
    recipient_seed: u64,
    /// Operations to perform in order
    operations: Vec<SealedOperation>,
}

#[derive(Debug, Arbitrary)]
enum SealedOperation {
    /// Seal with the writer box, open with the reader box
    Roundtrip { message: Vec<u8> },
    /// Seal, flip one bit, assert the reader rejects it
    Corrupt { message: Vec<u8>, index: u16, bit: u8 },
    /// Feed raw attacker-chosen bytes to the reader
    OpenGarbage { ciphertext: Vec<u8> },
}

fuzz_target!(|scenario: SealedScenario| {
    let mut rng = StdRng::seed_from_u64(scenario.recipient_seed);
    let recipient = KeyPair::generate_with_rng(&mut rng);

    let writer = match SealedBox::new(recipient.public_key().clone()) {
        Ok(sbox) => sbox,
        Err(err) => panic!("generated public key rejected: {err}"),
    };
    let reader = match SealedBox::with_private(
        recipient.public_key().clone(),
        recipient.private_key().clone(),
    ) {
        Ok(sbox) => sbox,
        Err(err) => panic!("generated key pair rejected: {err}"),
    };
    assert!(!writer.can_decrypt());
    assert!(reader.can_decrypt());

    for op in scenario.operations {
        match op {
            SealedOperation::Roundtrip { message } => {
                let result = writer.encrypt(&message);
                if message.is_empty() {
                    assert_eq!(result.err(), Some(BoxError::EmptyInput { name: "message" }));
                    continue;
                }
                let envelope = match result {
                    Ok(envelope) => envelope,
                    Err(err) => panic!("seal failed: {err}"),
                };

                assert_eq!(envelope.ciphertext_len(), message.len() + SEAL_OVERHEAD);
                assert_eq!(envelope.nonce_len(), 0);
                assert_eq!(envelope.mac_len(), 0);

                assert_eq!(
                    writer.decrypt(&envelope).err(),
                    Some(BoxError::CapabilityDenied),
                    "writer must never be able to open"
                );
                match reader.decrypt(&envelope) {
                    Ok(decrypted) => assert_eq!(decrypted.as_slice(), message.as_slice()),
                    Err(err) => panic!("unseal of valid envelope failed: {err}"),
                }
            },

            SealedOperation::Corrupt { message, index, bit } => {
                if message.is_empty() {
                    continue;
                }
                let envelope = match writer.encrypt(&message) {
                    Ok(envelope) => envelope,
                    Err(err) => panic!("seal failed: {err}"),
                };

                let mut bytes = envelope.ciphertext().as_slice().to_vec();
                let i = index as usize % bytes.len();
                bytes[i] ^= 1 << (bit % 8);

                let tampered = Envelope::sealed(SealedBuffer::from_vec(bytes));
                assert_eq!(
                    reader.decrypt(&tampered).err(),
                    Some(BoxError::AuthenticationFailure),
                    "corrupted sealed envelope must fail authentication"
                );
            },

            SealedOperation::OpenGarbage { ciphertext } => {
                let len = ciphertext.len();
                let garbage = Envelope::sealed(SealedBuffer::from_vec(ciphertext));
                let result = reader.decrypt(&garbage);

                // Attacker bytes never open; only the failure kind varies.
                if len == 0 {
                    assert_eq!(result.err(), Some(BoxError::EmptyInput { name: "ciphertext" }));
                } else if len < SEAL_OVERHEAD {
                    assert!(matches!(result.err(), Some(BoxError::SizeMismatch { .. })));
                } else {
                    assert_eq!(result.err(), Some(BoxError::AuthenticationFailure));
                }
            },
        }
    }
});
