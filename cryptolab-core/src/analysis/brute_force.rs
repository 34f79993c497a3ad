//! Exhaustive Caesar brute force ranked by monogram fitness.
//!
//! Decrypts the ciphertext under all 26 shifts via the cipher engine and
//! scores each candidate by how far its letter distribution sits from
//! standard English: the sum over the 26 letters of the squared deviation
//! between observed and expected percentage frequencies. Lower means more
//! English-like; candidates are returned best first.

use serde::{Deserialize, Serialize};

use crate::alphabet::{ENGLISH_FREQ, count_letters, letter_index};
use crate::cipher::{self, CipherType};
use crate::key::Key;

use super::AnalysisError;

/// Default number of candidates callers usually display.
pub const DEFAULT_TOP_K: usize = 10;

/// One brute-force candidate: a shift, its decryption, and its distance
/// from English.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftCandidate {
    /// The shift that was tried.
    pub shift: u8,
    /// The ciphertext decrypted under that shift.
    pub decrypted_text: String,
    /// Monogram fitness: lower = more English-like.
    pub score: f64,
}

/// Tries all 26 shifts, returning every candidate sorted best first
/// (ascending score, ties broken by shift).
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInput`] when the ciphertext contains no
/// letters — the fitness score is undefined without a distribution.
pub fn brute_force(ciphertext: &str) -> Result<Vec<ShiftCandidate>, AnalysisError> {
    if count_letters(ciphertext) == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    let mut candidates = Vec::with_capacity(26);
    for shift in 0..26u8 {
        let key = Key::Caesar { shift };
        let decrypted = cipher::decrypt(CipherType::Caesar, ciphertext, &key)?;
        let score = english_distance(&decrypted.text);
        candidates.push(ShiftCandidate {
            shift,
            decrypted_text: decrypted.text,
            score,
        });
    }

    candidates.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.shift.cmp(&b.shift)));
    Ok(candidates)
}

/// Tries all 26 shifts and keeps the best `k` candidates.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInput`] when the ciphertext contains no
/// letters.
pub fn brute_force_top(ciphertext: &str, k: usize) -> Result<Vec<ShiftCandidate>, AnalysisError> {
    let mut candidates = brute_force(ciphertext)?;
    candidates.truncate(k);
    Ok(candidates)
}

/// Sum of squared deviations between the text's letter percentages and
/// standard English. Zero would be a perfect match.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn english_distance(text: &str) -> f64 {
    let mut counts = [0usize; 26];
    let mut total = 0usize;
    for c in text.chars() {
        if let Some(idx) = letter_index(c) {
            // Safe: letter_index returns 0..26.
            counts[usize::try_from(idx).unwrap_or(0)] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return f64::INFINITY;
    }

    let total = total as f64;
    counts
        .iter()
        .zip(ENGLISH_FREQ.iter())
        .map(|(&count, &expected)| {
            let observed = count as f64 / total * 100.0;
            (observed - expected).powi(2)
        })
        .sum()
}
