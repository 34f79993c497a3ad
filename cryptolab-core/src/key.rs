//! The closed cipher key model.
//!
//! Every key is a tagged [`Key`] variant matching one cipher type, and is
//! validated once, centrally, before any cipher logic runs. This replaces
//! the free-form per-cipher key objects the front end used to assemble ad
//! hoc — an engine can never silently operate on a partially-filled key.

use serde::{Deserialize, Serialize};

use crate::algebra::{AlgebraError, Matrix};
use crate::alphabet::{self, MODULUS};
use crate::cipher::CipherType;

/// Minimum number of letters in a Hill text key.
pub const MIN_TEXT_KEY_LETTERS: usize = 4;

/// Letter count at which a Hill text key expands to a 3×3 matrix instead
/// of a 2×2 (4–8 letters → 2×2, 9 or more → 3×3).
pub const THREE_BY_THREE_MIN: usize = 9;

/// Errors from key validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Caesar shift outside `0..=25`.
    #[error("caesar shift {0} is out of range 0..=25")]
    ShiftOutOfRange(u8),

    /// Affine coefficient outside `0..=25`.
    #[error("affine coefficient '{name}' = {value} is out of range 0..=25")]
    CoefficientOutOfRange {
        /// Which coefficient (`a` or `b`).
        name: char,
        /// The offending value.
        value: u8,
    },

    /// Affine `a` shares a factor with 26, so decryption is impossible.
    #[error("affine coefficient a = {a} is not coprime with 26")]
    NotCoprime {
        /// The offending coefficient.
        a: u8,
    },

    /// Hill text key has too few letters to fill a matrix.
    #[error("hill text key needs at least {min} letters, got {got}")]
    KeyTooShort {
        /// Minimum letters required.
        min: usize,
        /// Letters actually supplied.
        got: usize,
    },

    /// The matrix derived from a Hill text key is not invertible mod 26.
    ///
    /// The derivation is deliberately not adjusted to force invertibility;
    /// the caller must pick a different key text.
    #[error("matrix derived from text key is not invertible mod 26 (determinant {det})")]
    DerivedMatrixSingular {
        /// Determinant of the derived matrix, reduced mod 26.
        det: i64,
    },

    /// An explicit Hill key matrix is not invertible mod 26.
    #[error("hill key matrix is not invertible mod 26 (determinant {det})")]
    SingularMatrix {
        /// Determinant reduced mod 26.
        det: i64,
    },

    /// An explicit Hill key matrix has a bad shape.
    #[error("hill key matrix is malformed: {0}")]
    MalformedMatrix(AlgebraError),

    /// Playfair keyword contains no letters.
    #[error("playfair keyword must contain at least one letter")]
    EmptyKeyword,

    /// The key variant does not match the requested cipher type.
    #[error("key is a {actual} key, but a {expected} key is required")]
    CipherMismatch {
        /// Cipher the caller asked for.
        expected: CipherType,
        /// Cipher the key actually belongs to.
        actual: CipherType,
    },
}

/// A Hill cipher key: either key text expanded into a matrix, or the
/// matrix itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HillKey {
    /// Letters-only key text, deterministically expanded row-major into an
    /// `n×n` matrix (`n` per [`THREE_BY_THREE_MIN`]).
    Text(String),
    /// An explicit `n×n` matrix, `n ∈ {2, 3}`.
    Matrix(Vec<Vec<i64>>),
}

impl HillKey {
    /// Expands this key into its matrix, with a derivation trace.
    ///
    /// Text keys map letters to residues `A = 0 .. Z = 25` and pack them
    /// row-major, truncating to `n²`. Explicit matrices are shape-checked.
    /// Either way the result must be invertible mod 26.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::KeyTooShort`], [`KeyError::MalformedMatrix`],
    /// [`KeyError::DerivedMatrixSingular`], or [`KeyError::SingularMatrix`].
    pub fn expand(&self) -> Result<(Matrix, Vec<String>), KeyError> {
        match self {
            Self::Text(text) => {
                let cleaned = alphabet::letters_only(text);
                if cleaned.len() < MIN_TEXT_KEY_LETTERS {
                    return Err(KeyError::KeyTooShort {
                        min: MIN_TEXT_KEY_LETTERS,
                        got: cleaned.len(),
                    });
                }
                let dim = if cleaned.len() >= THREE_BY_THREE_MIN { 3 } else { 2 };
                let residues = alphabet::to_residues(&cleaned);
                let matrix = Matrix::from_flat(dim, &residues[..dim * dim])
                    .map_err(KeyError::MalformedMatrix)?;
                let mut steps = vec![
                    format!("key text '{text}' cleaned to '{cleaned}'"),
                    format!(
                        "letters as residues (A=0..Z=25): {:?}",
                        &residues[..dim * dim]
                    ),
                    format!("packed row-major into {dim}x{dim} matrix {matrix}"),
                ];
                let det = matrix.det();
                if matrix.inverse_mod26().is_err() {
                    return Err(KeyError::DerivedMatrixSingular { det });
                }
                steps.push(format!("determinant {det} mod 26 is coprime with 26"));
                Ok((matrix, steps))
            }
            Self::Matrix(rows) => {
                let matrix = Matrix::from_rows(rows).map_err(KeyError::MalformedMatrix)?;
                let det = matrix.det();
                if matrix.inverse_mod26().is_err() {
                    return Err(KeyError::SingularMatrix { det });
                }
                let steps = vec![format!(
                    "{0}x{0} key matrix {1}, determinant {2}",
                    matrix.dim(),
                    matrix,
                    det
                )];
                Ok((matrix, steps))
            }
        }
    }
}

/// A validated-on-demand cipher key, tagged by cipher type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// Caesar shift in `0..=25`.
    Caesar {
        /// Positions to shift each letter.
        shift: u8,
    },
    /// Affine coefficients with `gcd(a, 26) = 1`.
    Affine {
        /// Multiplicative coefficient.
        a: u8,
        /// Additive coefficient.
        b: u8,
    },
    /// Hill matrix key (text-derived or explicit).
    Hill {
        /// The matrix source.
        key: HillKey,
    },
    /// Playfair keyword (letters only are used; `J` merges into `I`).
    Playfair {
        /// Keyword seeding the 5×5 grid.
        keyword: String,
    },
}

impl Key {
    /// The cipher type this key belongs to.
    #[must_use]
    pub const fn cipher_type(&self) -> CipherType {
        match self {
            Self::Caesar { .. } => CipherType::Caesar,
            Self::Affine { .. } => CipherType::Affine,
            Self::Hill { .. } => CipherType::Hill,
            Self::Playfair { .. } => CipherType::Playfair,
        }
    }

    /// Validates the key's invariants.
    ///
    /// # Errors
    ///
    /// Returns the [`KeyError`] naming the violated invariant.
    pub fn validate(&self) -> Result<(), KeyError> {
        match self {
            Self::Caesar { shift } => {
                if *shift > 25 {
                    return Err(KeyError::ShiftOutOfRange(*shift));
                }
                Ok(())
            }
            Self::Affine { a, b } => {
                if *a > 25 {
                    return Err(KeyError::CoefficientOutOfRange { name: 'a', value: *a });
                }
                if *b > 25 {
                    return Err(KeyError::CoefficientOutOfRange { name: 'b', value: *b });
                }
                let (g, _, _) = crate::algebra::egcd(i64::from(*a), MODULUS);
                if g != 1 {
                    return Err(KeyError::NotCoprime { a: *a });
                }
                Ok(())
            }
            Self::Hill { key } => key.expand().map(|_| ()),
            Self::Playfair { keyword } => {
                if alphabet::letters_only(keyword).is_empty() {
                    return Err(KeyError::EmptyKeyword);
                }
                Ok(())
            }
        }
    }

    /// Validates the key and checks it matches the requested cipher.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::CipherMismatch`] on a type mismatch, or the
    /// underlying validation error.
    pub fn validate_for(&self, cipher: CipherType) -> Result<(), KeyError> {
        let actual = self.cipher_type();
        if actual != cipher {
            return Err(KeyError::CipherMismatch {
                expected: cipher,
                actual,
            });
        }
        self.validate()
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Caesar { shift } => write!(f, "shift={shift}"),
            Self::Affine { a, b } => write!(f, "a={a}, b={b}"),
            Self::Hill { key: HillKey::Text(text) } => write!(f, "text-key='{text}'"),
            Self::Hill { key: HillKey::Matrix(rows) } => {
                write!(f, "matrix=")?;
                let formatted: Vec<String> = rows
                    .iter()
                    .map(|row| {
                        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                        format!("[{}]", cells.join(", "))
                    })
                    .collect();
                write!(f, "[{}]", formatted.join(", "))
            }
            Self::Playfair { keyword } => write!(f, "keyword='{keyword}'"),
        }
    }
}
