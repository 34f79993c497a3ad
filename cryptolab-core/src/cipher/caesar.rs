//! Caesar cipher: shift every letter by a fixed amount mod 26.
//!
//! Case is preserved and non-letters pass through untouched.

use crate::alphabet::{MODULUS, letter_index};

use super::{CipherError, CipherOutput};

pub(crate) fn encrypt(plaintext: &str, shift: u8) -> Result<CipherOutput, CipherError> {
    transform(plaintext, i64::from(shift), Direction::Encrypt)
}

pub(crate) fn decrypt(ciphertext: &str, shift: u8) -> Result<CipherOutput, CipherError> {
    transform(ciphertext, i64::from(shift), Direction::Decrypt)
}

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn transform(text: &str, shift: i64, direction: Direction) -> Result<CipherOutput, CipherError> {
    if text.is_empty() {
        return Err(CipherError::EmptyInput);
    }

    let mut steps = vec![match direction {
        Direction::Encrypt => format!("encryption formula: E(x) = (x + {shift}) mod 26"),
        Direction::Decrypt => format!("decryption formula: D(x) = (x - {shift}) mod 26"),
    }];

    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(x) = letter_index(c) {
            let y = match direction {
                Direction::Encrypt => (x + shift).rem_euclid(MODULUS),
                Direction::Decrypt => (x - shift).rem_euclid(MODULUS),
            };
            let out = recase(y, c);
            match direction {
                Direction::Encrypt => {
                    steps.push(format!("'{c}' ({x}) -> ({x} + {shift}) mod 26 = {y} -> '{out}'"));
                }
                Direction::Decrypt => {
                    steps.push(format!("'{c}' ({x}) -> ({x} - {shift}) mod 26 = {y} -> '{out}'"));
                }
            }
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
