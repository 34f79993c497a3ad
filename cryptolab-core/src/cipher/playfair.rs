//! Playfair cipher: digraph substitution on a 5×5 keyword grid.
//!
//! The grid holds the keyword's letters first (duplicates dropped, `J`
//! merged into `I`), then the rest of the alphabet. Plaintext is prepared
//! into digraphs with `'X'` filler between doubled letters and after a
//! trailing lone letter. Same-row digraphs shift columns, same-column
//! digraphs shift rows, and everything else swaps columns (the rectangle
//! rule, which is its own inverse).

use super::{CipherError, CipherOutput};

/// Grid side length.
const GRID: usize = 5;

pub(crate) fn encrypt(plaintext: &str, keyword: &str) -> Result<CipherOutput, CipherError> {
    let grid = Grid::build(keyword);
    let mut steps = grid.trace(keyword);

    let prepared = prepare_digraphs(plaintext);
    if prepared.is_empty() {
        return Err(CipherError::EmptyInput);
    }
    steps.push(format!("prepared digraph text: {prepared}"));

    let text = transform(&grid, &prepared, 1, &mut steps);
    steps.push(format!("result: {text}"));
    Ok(CipherOutput { text, steps })
}

pub(crate) fn decrypt(ciphertext: &str, keyword: &str) -> Result<CipherOutput, CipherError> {
    let grid = Grid::build(keyword);
    let mut steps = grid.trace(keyword);

    let mut cleaned = clean(ciphertext);
    if cleaned.is_empty() {
        return Err(CipherError::EmptyInput);
    }
    if cleaned.len() % 2 != 0 {
        // A lone trailing letter cannot form a digraph.
        cleaned.push('X');
        steps.push("padded trailing lone letter with 'X'".to_string());
    }
    steps.push(format!("ciphertext digraphs: {cleaned}"));

    let text = transform(&grid, &cleaned, -1, &mut steps);
    steps.push(format!("result: {text}"));
    Ok(CipherOutput { text, steps })
}

/// The prepared digraph form the cipher reduces plaintext to.
pub(crate) fn canonical_plaintext(text: &str) -> Result<String, CipherError> {
    let prepared = prepare_digraphs(text);
    if prepared.is_empty() {
        Err(CipherError::EmptyInput)
    } else {
        Ok(prepared)
    }
}

/// The 5×5 letter grid with a residue → position lookup (`J` shares `I`).
struct Grid {
    cells: [[char; GRID]; GRID],
    positions: [(usize, usize); 26],
}

impl Grid {
    fn build(keyword: &str) -> Self {
        let mut seen = [false; 26];
        // J never appears in the grid.
        seen[9] = true;
        let mut letters = Vec::with_capacity(25);

        for c in clean(keyword).chars().chain('A'..='Z') {
            let idx = (c as u8 - b'A') as usize;
            if !seen[idx] {
                seen[idx] = true;
                letters.push(c);
            }
        }

        let mut cells = [[' '; GRID]; GRID];
        let mut positions = [(0, 0); 26];
        for (i, c) in letters.iter().enumerate() {
            let (row, col) = (i / GRID, i % GRID);
            cells[row][col] = *c;
            positions[(*c as u8 - b'A') as usize] = (row, col);
        }
        // J resolves to I's cell.
        positions[9] = positions[8];

        Self { cells, positions }
    }

    fn position(&self, c: char) -> (usize, usize) {
        self.positions[(c as u8 - b'A') as usize]
    }

    fn at(&self, row: usize, col: usize) -> char {
        self.cells[row][col]
    }

    fn trace(&self, keyword: &str) -> Vec<String> {
        let mut steps = vec![format!("keyword: {keyword}")];
        for row in &self.cells {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            steps.push(format!("grid row: {}", cells.join(" ")));
        }
        steps
    }
}

/// Uppercases, merges `J` into `I`, and strips non-letters.
fn clean(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| {
            let c = c.to_ascii_uppercase();
            if c == 'J' { 'I' } else { c }
        })
        .collect()
}

/// Splits cleaned text into digraphs, inserting `'X'` between doubled
/// letters and padding a final lone letter.
fn prepare_digraphs(text: &str) -> String {
    let cleaned: Vec<char> = clean(text).chars().collect();
    let mut prepared = Vec::with_capacity(cleaned.len() + 2);

    let mut i = 0;
    while i < cleaned.len() {
        prepared.push(cleaned[i]);
        if i + 1 < cleaned.len() {
            if cleaned[i] == cleaned[i + 1] {
                prepared.push('X');
            } else {
                prepared.push(cleaned[i + 1]);
                i += 1;
            }
        }
        i += 1;
    }

    if prepared.len() % 2 != 0 {
        prepared.push('X');
    }
    prepared.into_iter().collect()
}

/// Applies the digraph rules with the given shift direction
/// (`+1` encrypt, `-1` decrypt).
fn transform(grid: &Grid, digraphs: &str, shift: i64, steps: &mut Vec<String>) -> String {
    let chars: Vec<char> = digraphs.chars().collect();
    let mut result = String::with_capacity(chars.len());

    for pair in chars.chunks(2) {
        let (first, second) = (pair[0], pair[1]);
        let (r1, c1) = grid.position(first);
        let (r2, c2) = grid.position(second);

        let (out1, out2, rule) = if r1 == r2 {
            (
                grid.at(r1, wrap(c1, shift)),
                grid.at(r2, wrap(c2, shift)),
                "same row",
            )
        } else if c1 == c2 {
            (
                grid.at(wrap(r1, shift), c1),
                grid.at(wrap(r2, shift), c2),
                "same column",
            )
        } else {
            (grid.at(r1, c2), grid.at(r2, c1), "rectangle")
        };

        steps.push(format!("{first}{second} ({rule}) -> {out1}{out2}"));
        result.push(out1);
        result.push(out2);
    }

    result
}

/// Shifts a grid coordinate by ±1, wrapping mod 5.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn wrap(coord: usize, shift: i64) -> usize {
    // Safe: result of rem_euclid(5) is in 0..5.
    ((coord as i64 + shift).rem_euclid(GRID as i64)) as usize
}
