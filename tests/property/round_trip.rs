//! Property-based round-trip tests for the cipher engine.
//!
//! Uses proptest to verify:
//! 1. Caesar and Affine decrypt(encrypt(text)) == text for arbitrary
//!    printable text (case and non-letters preserved).
//! 2. Hill and Playfair round-trip to the cipher's canonical plaintext
//!    form (letters-only with engine-added filler), for arbitrary letter
//!    text and a pool of valid keys.
//! 3. Brute force always returns all 26 shifts, sorted best first.

use proptest::prelude::*;

use cryptolab_core::analysis::brute_force::brute_force;
use cryptolab_core::cipher::{self, CipherType};
use cryptolab_core::key::{HillKey, Key};

// --- Strategies ---

/// Valid Caesar shifts.
fn arb_shift() -> impl Strategy<Value = u8> {
    0u8..26
}

/// Valid affine `a` coefficients (units mod 26).
fn arb_affine_a() -> impl Strategy<Value = u8> {
    prop::sample::select(vec![1u8, 3, 5, 7, 9, 11, 15, 17, 19, 21, 23, 25])
}

/// Printable ASCII text with at least one character.
fn arb_printable() -> impl Strategy<Value = String> {
    "[ -~]{1,64}"
}

/// Text containing at least one letter.
fn arb_letter_text() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.!?]{0,48}"
}

/// A pool of invertible Hill keys, text-derived and explicit.
fn arb_hill_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Hill { key: HillKey::Matrix(vec![vec![3, 3], vec![2, 5]]) }),
        Just(Key::Hill { key: HillKey::Matrix(vec![vec![5, 8], vec![17, 3]]) }),
        Just(Key::Hill {
            key: HillKey::Matrix(vec![vec![6, 24, 1], vec![13, 16, 10], vec![20, 17, 15]])
        }),
        Just(Key::Hill { key: HillKey::Text("HILL".into()) }),
        Just(Key::Hill { key: HillKey::Text("GYBNQKURP".into()) }),
    ]
}

/// A pool of Playfair keywords.
fn arb_playfair_key() -> impl Strategy<Value = Key> {
    prop::sample::select(vec![
        Key::Playfair { keyword: "MONARCHY".into() },
        Key::Playfair { keyword: "playfair example".into() },
        Key::Playfair { keyword: "Jazz".into() },
        Key::Playfair { keyword: "KEYWORD".into() },
    ])
}

// --- Properties ---

proptest! {
    #[test]
    fn caesar_round_trips_exactly(text in arb_printable(), shift in arb_shift()) {
        let key = Key::Caesar { shift };
        let encrypted = cipher::encrypt(CipherType::Caesar, &text, &key).unwrap();
        let decrypted = cipher::decrypt(CipherType::Caesar, &encrypted.text, &key).unwrap();
        prop_assert_eq!(decrypted.text, text);
    }

    #[test]
    fn affine_round_trips_exactly(
        text in arb_printable(),
        a in arb_affine_a(),
        b in 0u8..26,
    ) {
        let key = Key::Affine { a, b };
        let encrypted = cipher::encrypt(CipherType::Affine, &text, &key).unwrap();
        let decrypted = cipher::decrypt(CipherType::Affine, &encrypted.text, &key).unwrap();
        prop_assert_eq!(decrypted.text, text);
    }

    #[test]
    fn hill_round_trips_to_canonical_form(text in arb_letter_text(), key in arb_hill_key()) {
        let canonical = cipher::canonical_plaintext(CipherType::Hill, &text, &key).unwrap();
        let encrypted = cipher::encrypt(CipherType::Hill, &text, &key).unwrap();
        let decrypted = cipher::decrypt(CipherType::Hill, &encrypted.text, &key).unwrap();
        prop_assert_eq!(decrypted.text, canonical);
    }

    #[test]
    fn playfair_round_trips_to_canonical_form(
        text in arb_letter_text(),
        key in arb_playfair_key(),
    ) {
        let canonical = cipher::canonical_plaintext(CipherType::Playfair, &text, &key).unwrap();
        let encrypted = cipher::encrypt(CipherType::Playfair, &text, &key).unwrap();
        let decrypted = cipher::decrypt(CipherType::Playfair, &encrypted.text, &key).unwrap();
        prop_assert_eq!(decrypted.text, canonical);
    }

    #[test]
    fn encryption_steps_are_deterministic(text in arb_letter_text(), shift in arb_shift()) {
        let key = Key::Caesar { shift };
        let first = cipher::encrypt(CipherType::Caesar, &text, &key).unwrap();
        let second = cipher::encrypt(CipherType::Caesar, &text, &key).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn brute_force_covers_all_shifts_sorted(text in arb_letter_text(), shift in arb_shift()) {
        let key = Key::Caesar { shift };
        let ciphertext = cipher::encrypt(CipherType::Caesar, &text, &key).unwrap().text;
        let candidates = brute_force(&ciphertext).unwrap();

        prop_assert_eq!(candidates.len(), 26);
        let mut shifts: Vec<u8> = candidates.iter().map(|c| c.shift).collect();
        shifts.sort_unstable();
        prop_assert_eq!(shifts, (0..26).collect::<Vec<u8>>());
        for pair in candidates.windows(2) {
            prop_assert!(pair[0].score <= pair[1].score);
        }
        // The true shift decrypts back to the original text.
        let truth = candidates.iter().find(|c| c.shift == shift).unwrap();
        prop_assert_eq!(&truth.decrypted_text, &text);
    }
}
