//! The 26-letter Latin alphabet the whole engine operates over.
//!
//! Letters map to residues `A = 0 .. Z = 25`; everything else is either
//! passed through untouched or stripped, depending on the cipher's rule.

/// Size of the working alphabet, and the modulus for all cipher arithmetic.
pub const MODULUS: i64 = 26;

/// Standard English letter frequencies in percent, indexed `A = 0 .. Z = 25`.
///
/// Used by the monogram fitness score in the Caesar brute-force attack and
/// by the chi-squared statistic in frequency analysis.
pub const ENGLISH_FREQ: [f64; 26] = [
    8.17, 1.29, 2.78, 4.25, 12.70, 2.23, 2.02, 6.09, 6.97, 0.15, 0.77, 4.03, 2.41, 6.75, 7.51,
    1.93, 0.10, 5.99, 6.33, 9.06, 2.76, 0.98, 2.36, 0.15, 1.97, 0.07,
];

/// Returns the residue `0..26` for an ASCII letter, or `None` otherwise.
#[must_use]
pub const fn letter_index(c: char) -> Option<i64> {
    if c.is_ascii_uppercase() {
        Some((c as u8 - b'A') as i64)
    } else if c.is_ascii_lowercase() {
        Some((c as u8 - b'a') as i64)
    } else {
        None
    }
}

/// Returns the uppercase letter for a residue, reducing mod 26 first.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn index_to_letter(index: i64) -> char {
    // Safe: rem_euclid(26) lands in 0..26, well within u8 range.
    (index.rem_euclid(MODULUS) as u8 + b'A') as char
}

/// Uppercases `text` and strips everything that is not an ASCII letter.
#[must_use]
pub fn letters_only(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Converts the letters of `text` to residues, ignoring non-letters.
#[must_use]
pub fn to_residues(text: &str) -> Vec<i64> {
    text.chars().filter_map(letter_index).collect()
}

/// Converts residues back to an uppercase string.
#[must_use]
pub fn from_residues(residues: &[i64]) -> String {
    residues.iter().copied().map(index_to_letter).collect()
}

/// Counts the ASCII letters in `text`, case-insensitive.
#[must_use]
pub fn count_letters(text: &str) -> usize {
    text.chars().filter(char::is_ascii_alphabetic).count()
}
