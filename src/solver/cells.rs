//! Row/column naming for linear cell indices.
//!
//! Cell names are `R{row}C{col}` with 1-based coordinates, case-insensitive
//! on input and canonical uppercase on output.

use crate::error::{ConfigError, Result};

/// 0-based linear index of a cell on a `size × size` grid.
pub type CellIndex = usize;

/// Formats a linear index as its 1-based `R{row}C{col}` name.
pub fn cell_name(cell: CellIndex, size: usize) -> String {
    format!("R{}C{}", cell / size + 1, cell % size + 1)
}

/// Parses a cell name back to its linear index.
///
/// Fails with [`ConfigError::InvalidCellName`] when the name does not match
/// the `R{row}C{col}` pattern or either coordinate falls outside the board.
pub fn cell_index_from_name(name: &str, size: usize) -> Result<CellIndex> {
    parse_name(name, size).ok_or_else(|| {
        ConfigError::InvalidCellName {
            name: name.to_string(),
        }
        .into()
    })
}

/// Parses a whole list of names; the first bad name fails the batch.
pub fn cell_indexes_from_names(names: &[String], size: usize) -> Result<Vec<CellIndex>> {
    names
        .iter()
        .map(|name| cell_index_from_name(name, size))
        .collect()
}

fn parse_name(name: &str, size: usize) -> Option<CellIndex> {
    let lower = name.to_ascii_lowercase();
    let rest = lower.strip_prefix('r')?;
    let (row_digits, col_digits) = rest.split_once('c')?;
    if !is_number(row_digits) || !is_number(col_digits) {
        return None;
    }
    let row: usize = row_digits.parse().ok()?;
    let col: usize = col_digits.parse().ok()?;
    if !(1..=size).contains(&row) || !(1..=size).contains(&col) {
        return None;
    }
    Some((row - 1) * size + (col - 1))
}

fn is_number(digits: &str) -> bool {
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
