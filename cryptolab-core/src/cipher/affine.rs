//! Affine cipher: `E(x) = (a·x + b) mod 26`, `D(y) = a⁻¹·(y − b) mod 26`.
//!
//! `a` must be coprime with 26 (validated by the key model before this
//! module runs). Case is preserved and non-letters pass through.

use crate::algebra::mod_inverse;
use crate::alphabet::{MODULUS, letter_index};

use super::{CipherError, CipherOutput};

pub(crate) fn encrypt(plaintext: &str, a: i64, b: i64) -> Result<CipherOutput, CipherError> {
    if plaintext.is_empty() {
        return Err(CipherError::EmptyInput);
    }

    let mut steps = vec![format!("encryption formula: E(x) = ({a}x + {b}) mod 26")];
    let mut result = String::with_capacity(plaintext.len());
    for c in plaintext.chars() {
        if let Some(x) = letter_index(c) {
            let y = (a * x + b).rem_euclid(MODULUS);
            let out = recase(y, c);
            steps.push(format!("'{c}' (x={x}) -> ({a}*{x} + {b}) mod 26 = {y} -> '{out}'"));
            result.push(out);
        } else {
            steps.push(format!("'{c}' passes through unchanged"));
            result.push(c);
        }
    }

    steps.push(format!("result: {result}"));
    Ok(CipherOutput { text: result, steps })
}

pub(crate) fn decrypt(ciphertext: &str, a: i64, b: i64) -> Result<CipherOutput, CipherError> {
    if ciphertext.is_empty() {
        return Err(CipherError::EmptyInput);
    }

    let a_inv = mod_inverse(a, MODULUS)?;
    let mut steps = vec![
        format!("modular inverse of a: {a}^-1 mod 26 = {a_inv}"),
        format!("decryption formula: D(y) = {a_inv}(y - {b}) mod 26"),
    ];
    let mut result = String::with_capacity(ciphertext.len());
    for c in ciphertext.chars() {
        if let Some(y) = letter_index(c) {
            let x = (a_inv * (y - b)).rem_euclid(MODULUS);
            let out = recase(x, c);
            steps.push(format!("'{c}' (y={y}) -> {a_inv}*({y} - {b}) mod 26 = {x} -> '{out}'"));
            result.push(out);
        } else {
            steps.push(format!("'{c}' passes through unchanged"));
            result.push(c);
        }
    }

    steps.push(format!("result: {result}"));
    Ok(CipherOutput { text: result, steps })
}

/// Maps a residue back to a letter in the case of the original character.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn recase(residue: i64, original: char) -> char {
    let base = if original.is_ascii_lowercase() { b'a' } else { b'A' };
    // Safe: residue is already in 0..26.
    (residue as u8 + base) as char
}
