//! Monogram frequency analysis with a chi-squared fit against English.
//!
//! Counts only alphabetic characters, case-insensitive. The report always
//! carries the full 26-letter distribution (ordered by count descending,
//! then alphabetically) so percentages sum to 100 within rounding; callers
//! wanting a "most common" slice take a prefix.

use serde::{Deserialize, Serialize};

use crate::alphabet::{ENGLISH_FREQ, index_to_letter, letter_index};

use super::AnalysisError;

/// One letter's share of the analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterFrequency {
    /// The letter (uppercase).
    pub letter: char,
    /// Occurrences in the text.
    pub count: usize,
    /// Percentage of all letters, rounded to 2 decimals.
    pub frequency: f64,
}

/// Full frequency analysis report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyReport {
    /// Number of alphabetic characters analyzed.
    pub total_letters: usize,
    /// All 26 letters, ordered by count descending then alphabetically.
    pub distribution: Vec<LetterFrequency>,
    /// Chi-squared statistic against standard English frequencies,
    /// rounded to 2 decimals. Lower = closer to English.
    pub chi_squared: f64,
}

impl FrequencyReport {
    /// The `k` most common letters.
    #[must_use]
    pub fn most_common(&self, k: usize) -> &[LetterFrequency] {
        &self.distribution[..k.min(self.distribution.len())]
    }
}

/// Analyzes the letter distribution of `text`.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInput`] when the text contains no
/// alphabetic characters — percentages and chi-squared would divide by
/// zero otherwise.
#[allow(clippy::cast_precision_loss)]
pub fn analyze(text: &str) -> Result<FrequencyReport, AnalysisError> {
    let mut counts = [0usize; 26];
    let mut total = 0usize;
    for c in text.chars() {
        if let Some(idx) = letter_index(c) {
            counts[usize::try_from(idx).unwrap_or(0)] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    let total_f = total as f64;
    let mut distribution: Vec<LetterFrequency> = counts
        .iter()
        .enumerate()
        .map(|(idx, &count)| LetterFrequency {
            letter: index_to_letter(i64::try_from(idx).unwrap_or(0)),
            count,
            frequency: round2(count as f64 / total_f * 100.0),
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then(a.letter.cmp(&b.letter)));

    let chi_squared = round2(
        counts
            .iter()
            .zip(ENGLISH_FREQ.iter())
            .map(|(&count, &freq)| {
                let expected = total_f * freq / 100.0;
                let observed = count as f64;
                (observed - expected).powi(2) / expected
            })
            .sum(),
    );

    Ok(FrequencyReport {
        total_letters: total,
        distribution,
        chi_squared,
    })
}

/// Rounds to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
