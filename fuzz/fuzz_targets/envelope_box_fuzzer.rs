//! Fuzz target for the secret and public box variants
//!
//! Drives random operation sequences against both symmetric-key and
//! public-key boxes, in both MAC encodings.
//!
//! # Strategy
//!
//! - Arbitrary 32-byte keys (including all-zero)
//! - Arbitrary messages up to a few KB
//! - Both combined and detached MAC encodings
//! - Single-bit corruption of nonce, ciphertext, and MAC
//! - Destroy mid-sequence
//!
//! # Invariants
//!
//! - No operation ever panics
//! - Encrypt of a non-empty message always succeeds on a live box
//! - Decrypt of an untampered envelope roundtrips exactly
//! - Any single-bit corruption fails with AuthenticationFailure
//! - Operations after destroy fail closed with NullKey

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;
use saltbox_crypto::{
    BoxError, Envelope, KeyPair, MacMode, Saltbox, SealedBuffer, MAC_SIZE, NONCE_SIZE,
};

#[derive(Debug, Arbitrary)]
struct BoxScenario {
    /// Which variant to drive
    variant: Variant,
    /// Seed for key pair generation in the public-key variant
    keypair_seed: u64,
    /// Operations to perform in order
    operations: Vec<BoxOperation>,
}

#[derive(Debug, Arbitrary)]
enum Variant {
    Secret { key: [u8; 32] },
    Public,
}

#[derive(Debug, Arbitrary)]
enum BoxOperation {
    /// Encrypt and roundtrip through decrypt
    Roundtrip { message: Vec<u8>, detached: bool },
    /// Encrypt, flip one bit, assert decryption fails
    Corrupt { message: Vec<u8>, detached: bool, target: CorruptTarget, index: u16, bit: u8 },
    /// Wipe the box keys
    Destroy,
}

#[derive(Debug, Arbitrary)]
enum CorruptTarget {
    Nonce,
    Ciphertext,
    Mac,
}

fn build_box(scenario: &BoxScenario) -> Saltbox {
    match scenario.variant {
        Variant::Secret { key } => {
            // 32 bytes is always a valid key; construction cannot fail.
            match Saltbox::secret(SealedBuffer::from_slice(&key)) {
                Ok(sbox) => sbox,
                Err(err) => panic!("32-byte key rejected: {err}"),
            }
        },
        Variant::Public => {
            let mut rng = StdRng::seed_from_u64(scenario.keypair_seed);
            let ours = KeyPair::generate_with_rng(&mut rng);
            let theirs = KeyPair::generate_with_rng(&mut rng);
            match Saltbox::public(theirs.public_key(), ours.private_key()) {
                Ok(sbox) => sbox,
                Err(err) => panic!("generated key pair rejected: {err}"),
            }
        },
    }
}

fn mode(detached: bool) -> MacMode {
    if detached { MacMode::Detached } else { MacMode::Combined }
}

fuzz_target!(|scenario: BoxScenario| {
    let mut sbox = build_box(&scenario);
    let mut destroyed = false;

    for op in scenario.operations {
        match op {
            BoxOperation::Roundtrip { message, detached } => {
                let result = sbox.encrypt(&message, mode(detached));

                if message.is_empty() {
                    assert_eq!(result.err(), Some(BoxError::EmptyInput { name: "message" }));
                    continue;
                }
                if destroyed {
                    assert!(
                        matches!(result.err(), Some(BoxError::NullKey { .. })),
                        "destroyed box must fail closed"
                    );
                    continue;
                }

                let envelope = match result {
                    Ok(envelope) => envelope,
                    Err(err) => panic!("encrypt failed on live box: {err}"),
                };

                assert_eq!(envelope.nonce_len(), NONCE_SIZE);
                if detached {
                    assert_eq!(envelope.ciphertext_len(), message.len());
                    assert_eq!(envelope.mac_len(), MAC_SIZE);
                } else {
                    assert_eq!(envelope.ciphertext_len(), message.len() + MAC_SIZE);
                    assert_eq!(envelope.mac_len(), 0);
                }

                match sbox.decrypt(&envelope) {
                    Ok(decrypted) => assert_eq!(decrypted.as_slice(), message.as_slice()),
                    Err(err) => panic!("decrypt of valid envelope failed: {err}"),
                }
            },

            BoxOperation::Corrupt { message, detached, target, index, bit } => {
                if message.is_empty() || destroyed {
                    continue;
                }
                let envelope = match sbox.encrypt(&message, mode(detached)) {
                    Ok(envelope) => envelope,
                    Err(err) => panic!("encrypt failed on live box: {err}"),
                };

                let tampered = corrupt(&envelope, detached, &target, index, bit);
                assert_eq!(
                    sbox.decrypt(&tampered).err(),
                    Some(BoxError::AuthenticationFailure),
                    "corrupted envelope must fail authentication"
                );
            },

            BoxOperation::Destroy => {
                sbox.destroy();
                sbox.destroy();
                destroyed = true;
            },
        }
    }
});

fn corrupt(
    envelope: &Envelope,
    detached: bool,
    target: &CorruptTarget,
    index: u16,
    bit: u8,
) -> Envelope {
    let mut nonce = match envelope.nonce() {
        Some(nonce) => nonce.as_slice().to_vec(),
        None => panic!("secret/public envelope must carry a nonce"),
    };
    let mut ciphertext = envelope.ciphertext().as_slice().to_vec();
    let mut mac = envelope.mac().map(|mac| mac.as_slice().to_vec());

    let flip = |bytes: &mut [u8]| {
        let i = index as usize % bytes.len();
        bytes[i] ^= 1 << (bit % 8);
    };
    match target {
        CorruptTarget::Nonce => flip(&mut nonce),
        CorruptTarget::Ciphertext => flip(&mut ciphertext),
        CorruptTarget::Mac => match mac.as_deref_mut() {
            Some(mac) => flip(mac),
            // Combined envelopes keep the tag in the ciphertext tail.
            None => flip(&mut ciphertext),
        },
    }

    if detached {
        match mac {
            Some(mac) => Envelope::detached(
                SealedBuffer::from_vec(nonce),
                SealedBuffer::from_vec(ciphertext),
                SealedBuffer::from_vec(mac),
            ),
            None => panic!("detached envelope must carry a mac"),
        }
    } else {
        Envelope::combined(SealedBuffer::from_vec(nonce), SealedBuffer::from_vec(ciphertext))
    }
}
