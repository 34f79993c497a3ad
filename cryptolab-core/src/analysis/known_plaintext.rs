//! Hill cipher known-plaintext attack: recover the key matrix from
//! matched plaintext/ciphertext block pairs.
//!
//! With `n` linearly independent plaintext blocks as the columns of `P`
//! and their ciphertext blocks as the columns of `C`, the key is
//! `M = C · P⁻¹ mod 26`. Fewer than `n` pairs cannot determine `M`, and a
//! singular `P` admits no unique solution.

use crate::algebra::Matrix;
use crate::alphabet::{letters_only, to_residues};

use super::AnalysisError;

/// Recovers the Hill key matrix from block pairs.
///
/// The first `dim` pairs are used; blocks are column vectors of residues.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] with fewer than `dim`
/// pairs, [`AnalysisError::MalformedBlock`] when a block's length differs
/// from `dim`, and [`AnalysisError::SingularPlaintext`] when the
/// plaintext matrix is not invertible mod 26.
pub fn recover_key(
    plain_blocks: &[Vec<i64>],
    cipher_blocks: &[Vec<i64>],
    dim: usize,
) -> Result<Matrix, AnalysisError> {
    let got = plain_blocks.len().min(cipher_blocks.len());
    if got < dim {
        return Err(AnalysisError::InsufficientData { needed: dim, got });
    }
    for (index, block) in plain_blocks
        .iter()
        .take(dim)
        .chain(cipher_blocks.iter().take(dim))
        .enumerate()
    {
        if block.len() != dim {
            return Err(AnalysisError::MalformedBlock {
                index: index % dim,
                len: block.len(),
                dim,
            });
        }
    }

    let plain = Matrix::from_columns(&plain_blocks[..dim])?;
    let cipher = Matrix::from_columns(&cipher_blocks[..dim])?;

    let plain_inv = plain
        .inverse_mod26()
        .map_err(|_| AnalysisError::SingularPlaintext)?;

    Ok(cipher.mul_mod26(&plain_inv)?)
}

/// Recovers the Hill key from matched plaintext/ciphertext strings.
///
/// Both texts are stripped to letters and chopped into `dim`-sized blocks;
/// a trailing partial block is ignored.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyInput`] when either text has no letters,
/// [`AnalysisError::LengthMismatch`] when their letter counts differ, and
/// the [`recover_key`] errors otherwise.
pub fn recover_key_from_text(
    plaintext: &str,
    ciphertext: &str,
    dim: usize,
) -> Result<Matrix, AnalysisError> {
    let plain = to_residues(&letters_only(plaintext));
    let cipher = to_residues(&letters_only(ciphertext));
    if plain.is_empty() || cipher.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if plain.len() != cipher.len() {
        return Err(AnalysisError::LengthMismatch {
            plain: plain.len(),
            cipher: cipher.len(),
        });
    }

    let plain_blocks: Vec<Vec<i64>> = plain
        .chunks_exact(dim)
        .map(<[i64]>::to_vec)
        .collect();
    let cipher_blocks: Vec<Vec<i64>> = cipher
        .chunks_exact(dim)
        .map(<[i64]>::to_vec)
        .collect();

    recover_key(&plain_blocks, &cipher_blocks, dim)
}
