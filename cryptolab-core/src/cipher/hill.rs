//! Hill cipher: blocks of `n` letters as column vectors, multiplied by an
//! invertible `n×n` key matrix mod 26.
//!
//! Text is uppercased and stripped of non-letters, then padded with `'X'`
//! filler to a multiple of the matrix dimension. Decryption multiplies by
//! the inverse matrix; the key model guarantees the inverse exists.

use crate::alphabet::{from_residues, letters_only, to_residues};
use crate::key::HillKey;

use super::{CipherError, CipherOutput};

/// Residue of the `'X'` filler letter.
const FILLER: i64 = 23;

pub(crate) fn encrypt(plaintext: &str, key: &HillKey) -> Result<CipherOutput, CipherError> {
    let (matrix, mut steps) = key.expand()?;
    let blocks = prepare_blocks(plaintext, matrix.dim(), &mut steps)?;

    let mut out = Vec::with_capacity(blocks.len() * matrix.dim());
    for block in &blocks {
        let encrypted = matrix.mul_vec_mod26(block)?;
        steps.push(format!(
            "block '{}' {:?} x key matrix -> {:?} '{}'",
            from_residues(block),
            block,
            encrypted,
            from_residues(&encrypted)
        ));
        out.extend(encrypted);
    }

    let text = from_residues(&out);
    steps.push(format!("result: {text}"));
    Ok(CipherOutput { text, steps })
}

pub(crate) fn decrypt(ciphertext: &str, key: &HillKey) -> Result<CipherOutput, CipherError> {
    let (matrix, mut steps) = key.expand()?;
    let inverse = matrix.inverse_mod26()?;
    steps.push(format!("inverse key matrix mod 26: {inverse}"));
    let blocks = prepare_blocks(ciphertext, matrix.dim(), &mut steps)?;

    let mut out = Vec::with_capacity(blocks.len() * matrix.dim());
    for block in &blocks {
        let decrypted = inverse.mul_vec_mod26(block)?;
        steps.push(format!(
            "block '{}' {:?} x inverse matrix -> {:?} '{}'",
            from_residues(block),
            block,
            decrypted,
            from_residues(&decrypted)
        ));
        out.extend(decrypted);
    }

    let text = from_residues(&out);
    steps.push(format!("result: {text}"));
    Ok(CipherOutput { text, steps })
}

/// The letters-only, `'X'`-padded form the cipher reduces plaintext to.
pub(crate) fn canonical_plaintext(text: &str, key: &HillKey) -> Result<String, CipherError> {
    let (matrix, _) = key.expand()?;
    let mut residues = to_residues(&letters_only(text));
    if residues.is_empty() {
        return Err(CipherError::EmptyInput);
    }
    while residues.len() % matrix.dim() != 0 {
        residues.push(FILLER);
    }
    Ok(from_residues(&residues))
}

/// Strips, uppercases, pads with filler, and chops into `dim`-sized blocks.
fn prepare_blocks(
    text: &str,
    dim: usize,
    steps: &mut Vec<String>,
) -> Result<Vec<Vec<i64>>, CipherError> {
    let cleaned = letters_only(text);
    if cleaned.is_empty() {
        return Err(CipherError::EmptyInput);
    }
    steps.push(format!("letters only: {cleaned}"));

    let mut residues = to_residues(&cleaned);
    let unpadded = residues.len();
    while residues.len() % dim != 0 {
        residues.push(FILLER);
    }
    if residues.len() > unpadded {
        steps.push(format!(
            "padded with {} 'X' filler letter(s) to a multiple of {dim}",
            residues.len() - unpadded
        ));
    }

    Ok(residues.chunks(dim).map(<[i64]>::to_vec).collect())
}
