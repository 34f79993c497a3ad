//! The cipher engine: encrypt/decrypt dispatch for the four classical
//! ciphers, plus static reference information about each.
//!
//! Both operations validate the key against the [`Key`](crate::key::Key)
//! model first — a malformed key is rejected before any text is touched —
//! and return the transformed text together with an ordered, deterministic
//! trace of the transformation steps.

mod affine;
mod caesar;
mod hill;
mod playfair;

use serde::{Deserialize, Serialize};

use crate::algebra::AlgebraError;
use crate::key::{Key, KeyError};

/// The closed set of supported ciphers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherType {
    /// Fixed-shift substitution.
    Caesar,
    /// `E(x) = (a·x + b) mod 26` substitution.
    Affine,
    /// Polygraphic substitution via matrix multiplication mod 26.
    Hill,
    /// Digraph substitution on a 5×5 keyword grid.
    Playfair,
}

impl CipherType {
    /// All supported cipher types, in canonical order.
    pub const ALL: [Self; 4] = [Self::Caesar, Self::Affine, Self::Hill, Self::Playfair];
}

impl std::fmt::Display for CipherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Caesar => "caesar",
            Self::Affine => "affine",
            Self::Hill => "hill",
            Self::Playfair => "playfair",
        };
        write!(f, "{name}")
    }
}

/// Error returned when a cipher name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported cipher type '{0}'")]
pub struct ParseCipherTypeError(pub String);

impl std::str::FromStr for CipherType {
    type Err = ParseCipherTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "caesar" => Ok(Self::Caesar),
            "affine" => Ok(Self::Affine),
            "hill" => Ok(Self::Hill),
            "playfair" => Ok(Self::Playfair),
            other => Err(ParseCipherTypeError(other.to_string())),
        }
    }
}

/// Errors from cipher operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    /// The key failed validation (wrong variant, bad range, singular
    /// matrix, empty keyword, ...).
    #[error("invalid key: {0}")]
    Key(#[from] KeyError),

    /// The input text is empty (for Hill/Playfair: no letters survive
    /// stripping; for Caesar/Affine: the input string itself is empty).
    #[error("input text is empty")]
    EmptyInput,

    /// Arithmetic failure that escaped key validation.
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}

/// Result of a cipher operation: the transformed text and the ordered
/// step trace.
///
/// Steps are descriptive and deterministic for the same input; they are
/// never parsed by any consumer. They are always computed — whether to
/// display them is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherOutput {
    /// The ciphertext (encrypt) or plaintext (decrypt).
    pub text: String,
    /// Human-readable transformation trace, one entry per step.
    pub steps: Vec<String>,
}

/// Static reference information about a cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CipherInfo {
    /// Human-readable cipher name.
    pub name: &'static str,
    /// One-sentence description.
    pub description: &'static str,
    /// Shape of the key this cipher takes.
    pub key_type: &'static str,
    /// Why this cipher is breakable.
    pub weaknesses: &'static [&'static str],
    /// What one would do about it.
    pub defenses: &'static [&'static str],
}

/// Encrypts `plaintext` with `key`, which must match `cipher`.
///
/// # Errors
///
/// Returns [`CipherError::Key`] for any key problem and
/// [`CipherError::EmptyInput`] for empty input.
pub fn encrypt(cipher: CipherType, plaintext: &str, key: &Key) -> Result<CipherOutput, CipherError> {
    key.validate_for(cipher)?;
    match (cipher, key) {
        (CipherType::Caesar, Key::Caesar { shift }) => caesar::encrypt(plaintext, *shift),
        (CipherType::Affine, Key::Affine { a, b }) => {
            affine::encrypt(plaintext, i64::from(*a), i64::from(*b))
        }
        (CipherType::Hill, Key::Hill { key }) => hill::encrypt(plaintext, key),
        (CipherType::Playfair, Key::Playfair { keyword }) => playfair::encrypt(plaintext, keyword),
        // validate_for has already rejected a mismatched key.
        _ => Err(KeyError::CipherMismatch {
            expected: cipher,
            actual: key.cipher_type(),
        }
        .into()),
    }
}

/// Decrypts `ciphertext` with `key`, which must match `cipher`.
///
/// # Errors
///
/// Returns [`CipherError::Key`] for any key problem and
/// [`CipherError::EmptyInput`] for empty input.
pub fn decrypt(cipher: CipherType, ciphertext: &str, key: &Key) -> Result<CipherOutput, CipherError> {
    key.validate_for(cipher)?;
    match (cipher, key) {
        (CipherType::Caesar, Key::Caesar { shift }) => caesar::decrypt(ciphertext, *shift),
        (CipherType::Affine, Key::Affine { a, b }) => {
            affine::decrypt(ciphertext, i64::from(*a), i64::from(*b))
        }
        (CipherType::Hill, Key::Hill { key }) => hill::decrypt(ciphertext, key),
        (CipherType::Playfair, Key::Playfair { keyword }) => playfair::decrypt(ciphertext, keyword),
        _ => Err(KeyError::CipherMismatch {
            expected: cipher,
            actual: key.cipher_type(),
        }
        .into()),
    }
}

/// The normalization a cipher applies to plaintext before encrypting.
///
/// Decrypting a ciphertext with the key used to produce it yields exactly
/// this form — identity for Caesar/Affine, uppercase letters padded with
/// `'X'` filler for Hill, the prepared digraph text for Playfair. It is
/// the reference against which MITM attack success is judged and the form
/// round-trip tests compare with.
///
/// # Errors
///
/// Returns [`CipherError::Key`] for an invalid key and
/// [`CipherError::EmptyInput`] for empty input.
pub fn canonical_plaintext(
    cipher: CipherType,
    text: &str,
    key: &Key,
) -> Result<String, CipherError> {
    key.validate_for(cipher)?;
    match (cipher, key) {
        (CipherType::Caesar | CipherType::Affine, _) => {
            if text.is_empty() {
                Err(CipherError::EmptyInput)
            } else {
                Ok(text.to_string())
            }
        }
        (CipherType::Hill, Key::Hill { key }) => hill::canonical_plaintext(text, key),
        (CipherType::Playfair, _) => playfair::canonical_plaintext(text),
        _ => Err(KeyError::CipherMismatch {
            expected: cipher,
            actual: key.cipher_type(),
        }
        .into()),
    }
}

static CAESAR_INFO: CipherInfo = CipherInfo {
    name: "Caesar Cipher",
    description: "A substitution cipher that shifts each letter by a fixed number of positions.",
    key_type: "integer shift in 0..=25",
    weaknesses: &[
        "Only 26 possible keys - easily brute forced",
        "Vulnerable to frequency analysis",
        "Preserves word patterns and lengths",
    ],
    defenses: &[
        "Use more complex ciphers like Vigenere",
        "Combine with transposition",
        "Use modern encryption algorithms",
    ],
};

static AFFINE_INFO: CipherInfo = CipherInfo {
    name: "Affine Cipher",
    description: "A substitution cipher using the formula E(x) = (ax + b) mod 26.",
    key_type: "two integers: 'a' (coprime with 26) and 'b' (0..=25)",
    weaknesses: &[
        "Limited keyspace (312 valid keys)",
        "Vulnerable to frequency analysis",
        "Known-plaintext attack with 2 character pairs",
    ],
    defenses: &[
        "Use polyalphabetic ciphers",
        "Increase alphabet size",
        "Use modern cryptographic algorithms",
    ],
};

static HILL_INFO: CipherInfo = CipherInfo {
    name: "Hill Cipher",
    description: "A polygraphic substitution cipher using linear algebra and matrix multiplication mod 26.",
    key_type: "2x2 or 3x3 invertible matrix (mod 26), or key text expanded into one",
    weaknesses: &[
        "Vulnerable to known-plaintext attack",
        "Matrix must be invertible (determinant coprime with 26)",
        "Requires padding to an exact multiple of the block size",
        "Linear algebraic structure can be exploited",
    ],
    defenses: &[
        "Use larger matrices",
        "Combine with transposition",
        "Use modern block ciphers",
    ],
};

static PLAYFAIR_INFO: CipherInfo = CipherInfo {
    name: "Playfair Cipher",
    description: "A digraph substitution cipher using a 5x5 keyword grid.",
    key_type: "keyword or phrase (letters only; J merges into I)",
    weaknesses: &[
        "Frequency analysis on digraphs",
        "Known-plaintext attack possible",
        "I and J are treated as the same letter",
    ],
    defenses: &[
        "Use larger grids with a full alphabet",
        "Change keywords frequently",
        "Use modern encryption",
    ],
};

/// Static reference info for a cipher.
#[must_use]
pub const fn info(cipher: CipherType) -> &'static CipherInfo {
    match cipher {
        CipherType::Caesar => &CAESAR_INFO,
        CipherType::Affine => &AFFINE_INFO,
        CipherType::Hill => &HILL_INFO,
        CipherType::Playfair => &PLAYFAIR_INFO,
    }
}
