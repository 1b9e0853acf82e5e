//! Property-based tests for the box contract
//!
//! These tests verify the fundamental invariants of the envelope API:
//!
//! 1. **Round-trip**: decrypt(encrypt(m)) == m for every variant and mode
//! 2. **Layout**: envelope buffer sizes follow the variant and MAC mode
//! 3. **Equivalence**: a combined ciphertext is the detached ciphertext
//!    with the MAC appended
//! 4. **Tamper rejection**: any single-bit flip in nonce, ciphertext, or
//!    MAC fails authentication

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use saltbox_crypto::{
    BoxError, Envelope, KeyPair, MacMode, Saltbox, SealedBuffer, KEY_SIZE, MAC_SIZE, NONCE_SIZE,
    SEAL_OVERHEAD,
};

fn mac_mode() -> impl Strategy<Value = MacMode> {
    prop_oneof![Just(MacMode::Combined), Just(MacMode::Detached)]
}

fn key_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), KEY_SIZE..=KEY_SIZE)
}

fn secret_box(key: &[u8]) -> Saltbox {
    Saltbox::secret(SealedBuffer::from_slice(key)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_secret_box_roundtrip(
        key in key_bytes(),
        message in prop::collection::vec(any::<u8>(), 1..800),
        mode in mac_mode(),
    ) {
        let sbox = secret_box(&key);
        let envelope = sbox.encrypt(&message, mode).unwrap();
        let decrypted = sbox.decrypt(&envelope).unwrap();
        prop_assert_eq!(decrypted.as_slice(), message.as_slice());
    }

    #[test]
    fn prop_envelope_layout_follows_mode(
        key in key_bytes(),
        message in prop::collection::vec(any::<u8>(), 1..500),
        mode in mac_mode(),
    ) {
        let sbox = secret_box(&key);
        let envelope = sbox.encrypt(&message, mode).unwrap();

        prop_assert_eq!(envelope.nonce_len(), NONCE_SIZE);
        prop_assert_eq!(envelope.mode(), mode);
        match mode {
            MacMode::Combined => {
                prop_assert_eq!(envelope.ciphertext_len(), message.len() + MAC_SIZE);
                prop_assert_eq!(envelope.mac_len(), 0);
            },
            MacMode::Detached => {
                prop_assert_eq!(envelope.ciphertext_len(), message.len());
                prop_assert_eq!(envelope.mac_len(), MAC_SIZE);
            },
        }
    }

    #[test]
    fn prop_combined_is_detached_plus_mac(
        key in key_bytes(),
        message in prop::collection::vec(any::<u8>(), 1..500),
        seed in any::<u64>(),
    ) {
        let sbox = secret_box(&key);

        let mut rng1 = StdRng::seed_from_u64(seed);
        let mut rng2 = StdRng::seed_from_u64(seed);
        let combined = sbox.encrypt_with_rng(&mut rng1, &message, MacMode::Combined).unwrap();
        let detached = sbox.encrypt_with_rng(&mut rng2, &message, MacMode::Detached).unwrap();

        let combined_ct = combined.ciphertext().as_slice();
        prop_assert_eq!(detached.ciphertext().as_slice(), &combined_ct[..message.len()]);
        prop_assert_eq!(detached.mac().unwrap().as_slice(), &combined_ct[message.len()..]);
    }

    #[test]
    fn prop_seeded_encryption_is_deterministic(
        key in key_bytes(),
        message in prop::collection::vec(any::<u8>(), 1..300),
        seed in any::<u64>(),
        mode in mac_mode(),
    ) {
        let sbox = secret_box(&key);
        let mut rng1 = StdRng::seed_from_u64(seed);
        let mut rng2 = StdRng::seed_from_u64(seed);

        let env1 = sbox.encrypt_with_rng(&mut rng1, &message, mode).unwrap();
        let env2 = sbox.encrypt_with_rng(&mut rng2, &message, mode).unwrap();

        prop_assert_eq!(env1.nonce().unwrap().as_slice(), env2.nonce().unwrap().as_slice());
        prop_assert_eq!(env1.ciphertext().as_slice(), env2.ciphertext().as_slice());
    }

    #[test]
    fn prop_in_place_matches_allocating_path(
        key in key_bytes(),
        message in prop::collection::vec(any::<u8>(), 1..300),
        mode in mac_mode(),
    ) {
        let sbox = secret_box(&key);

        let ct_len = match mode {
            MacMode::Combined => message.len() + MAC_SIZE,
            MacMode::Detached => message.len(),
        };
        let mut envelope = match mode {
            MacMode::Combined => Envelope::combined(
                SealedBuffer::zeroed(NONCE_SIZE),
                SealedBuffer::zeroed(ct_len),
            ),
            MacMode::Detached => Envelope::detached(
                SealedBuffer::zeroed(NONCE_SIZE),
                SealedBuffer::zeroed(ct_len),
                SealedBuffer::zeroed(MAC_SIZE),
            ),
        };
        sbox.encrypt_into(&mut envelope, &message).unwrap();

        let mut out = SealedBuffer::zeroed(message.len());
        sbox.decrypt_into(&mut out, &envelope).unwrap();
        prop_assert_eq!(out.as_slice(), message.as_slice());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_flipped_ciphertext_bit_fails(
        key in key_bytes(),
        message in prop::collection::vec(any::<u8>(), 1..300),
        mode in mac_mode(),
        byte_index in any::<usize>(),
        bit in 0u8..8,
    ) {
        let sbox = secret_box(&key);
        let envelope = sbox.encrypt(&message, mode).unwrap();

        let mut bytes = envelope.ciphertext().as_slice().to_vec();
        let index = byte_index % bytes.len();
        bytes[index] ^= 1 << bit;

        let nonce = envelope.nonce().unwrap().clone();
        let tampered = match mode {
            MacMode::Combined => Envelope::combined(nonce, SealedBuffer::from_vec(bytes)),
            MacMode::Detached => Envelope::detached(
                nonce,
                SealedBuffer::from_vec(bytes),
                envelope.mac().unwrap().clone(),
            ),
        };
        prop_assert_eq!(sbox.decrypt(&tampered).err(), Some(BoxError::AuthenticationFailure));
    }

    #[test]
    fn prop_flipped_mac_bit_fails(
        key in key_bytes(),
        message in prop::collection::vec(any::<u8>(), 1..300),
        byte_index in any::<usize>(),
        bit in 0u8..8,
    ) {
        let sbox = secret_box(&key);
        let envelope = sbox.encrypt(&message, MacMode::Detached).unwrap();

        let mut mac = envelope.mac().unwrap().as_slice().to_vec();
        let index = byte_index % mac.len();
        mac[index] ^= 1 << bit;

        let tampered = Envelope::detached(
            envelope.nonce().unwrap().clone(),
            envelope.ciphertext().clone(),
            SealedBuffer::from_vec(mac),
        );
        prop_assert_eq!(sbox.decrypt(&tampered).err(), Some(BoxError::AuthenticationFailure));
    }

    #[test]
    fn prop_flipped_nonce_bit_fails(
        key in key_bytes(),
        message in prop::collection::vec(any::<u8>(), 1..300),
        byte_index in any::<usize>(),
        bit in 0u8..8,
    ) {
        let sbox = secret_box(&key);
        let envelope = sbox.encrypt(&message, MacMode::Combined).unwrap();

        let mut nonce = envelope.nonce().unwrap().as_slice().to_vec();
        let index = byte_index % nonce.len();
        nonce[index] ^= 1 << bit;

        let tampered = Envelope::combined(
            SealedBuffer::from_vec(nonce),
            envelope.ciphertext().clone(),
        );
        prop_assert_eq!(sbox.decrypt(&tampered).err(), Some(BoxError::AuthenticationFailure));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_public_box_roundtrip(
        message in prop::collection::vec(any::<u8>(), 1..500),
        mode in mac_mode(),
    ) {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let alice_box = Saltbox::public(bob.public_key(), alice.private_key()).unwrap();
        let bob_box = Saltbox::public(alice.public_key(), bob.private_key()).unwrap();

        let envelope = alice_box.encrypt(&message, mode).unwrap();
        let decrypted = bob_box.decrypt(&envelope).unwrap();
        prop_assert_eq!(decrypted.as_slice(), message.as_slice());
    }

    #[test]
    fn prop_sealed_box_roundtrip(
        message in prop::collection::vec(any::<u8>(), 1..500),
    ) {
        let pair = KeyPair::generate();
        let sbox = Saltbox::sealed_with_private(
            pair.public_key().clone(),
            pair.private_key().clone(),
        )
        .unwrap();

        let envelope = sbox.encrypt(&message, MacMode::Combined).unwrap();
        prop_assert_eq!(envelope.ciphertext_len(), message.len() + SEAL_OVERHEAD);
        prop_assert_eq!(envelope.nonce_len(), 0);
        prop_assert_eq!(envelope.mac_len(), 0);
        let decrypted = sbox.decrypt(&envelope).unwrap();
        prop_assert_eq!(decrypted.as_slice(), message.as_slice());
    }

    #[test]
    fn prop_sealed_box_tamper_fails(
        message in prop::collection::vec(any::<u8>(), 1..300),
        byte_index in any::<usize>(),
        bit in 0u8..8,
    ) {
        let pair = KeyPair::generate();
        let sbox = Saltbox::sealed_with_private(
            pair.public_key().clone(),
            pair.private_key().clone(),
        )
        .unwrap();

        let envelope = sbox.encrypt(&message, MacMode::Combined).unwrap();
        let mut bytes = envelope.ciphertext().as_slice().to_vec();
        // Keep the embedded ephemeral public key intact; a flipped key byte
        // changes the derived shared secret, which also fails, but the tag
        // region is the interesting surface.
        let index = byte_index % bytes.len();
        bytes[index] ^= 1 << bit;

        let tampered = Envelope::sealed(SealedBuffer::from_vec(bytes));
        prop_assert_eq!(sbox.decrypt(&tampered).err(), Some(BoxError::AuthenticationFailure));
    }
}
