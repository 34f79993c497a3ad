//! Cryptanalysis attacks against the classical ciphers.
//!
//! Three attacks, each a pure function: exhaustive Caesar brute force
//! ranked by monogram fitness, monogram frequency analysis with a
//! chi-squared statistic, and Hill key recovery from known
//! plaintext/ciphertext block pairs.

pub mod brute_force;
pub mod frequency;
pub mod known_plaintext;

use crate::algebra::AlgebraError;
use crate::cipher::CipherError;

/// Errors from cryptanalysis operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The input contains no letters to analyze.
    #[error("input text contains no letters")]
    EmptyInput,

    /// Too few known block pairs to determine a key.
    #[error("need at least {needed} block pairs, got {got}")]
    InsufficientData {
        /// Block pairs required (the matrix dimension).
        needed: usize,
        /// Block pairs supplied.
        got: usize,
    },

    /// The plaintext blocks form a singular matrix mod 26 — no unique key
    /// can be derived from this data.
    #[error("plaintext blocks form a singular matrix mod 26; no unique key is derivable")]
    SingularPlaintext,

    /// A supplied block does not match the matrix dimension.
    #[error("block {index} has length {len}, expected {dim}")]
    MalformedBlock {
        /// Index of the offending block.
        index: usize,
        /// Its length.
        len: usize,
        /// Expected length.
        dim: usize,
    },

    /// Plaintext and ciphertext disagree on letter count.
    #[error("plaintext and ciphertext letter counts differ ({plain} vs {cipher})")]
    LengthMismatch {
        /// Plaintext letter count.
        plain: usize,
        /// Ciphertext letter count.
        cipher: usize,
    },

    /// A cipher operation inside the attack failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// A matrix operation inside the attack failed.
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}
