//! Cells forced to hold one shared value: palindromes and clone regions.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::Result,
    solver::{
        board::Board,
        cells::{cell_indexes_from_names, cell_name, CellIndex},
        combinatorics::combinations,
        constraint::{Constraint, ConstraintDescriptor, ConstraintResult},
        masks::{self, ValueMask},
    },
};

/// All member cells must end up holding the same value.
///
/// Setup teaches the board the consequences: anything excluded for one
/// member is excluded for all of them, and two members the geometry
/// already forces distinct make the puzzle impossible on the spot.
#[derive(Debug, Clone)]
pub struct EqualCellsConstraint {
    name: String,
    specific_name: String,
    cells: Vec<CellIndex>,
    cells_set: HashSet<CellIndex>,
}

impl EqualCellsConstraint {
    pub fn new(name: &str, specific_name: &str, mut cells: Vec<CellIndex>) -> Self {
        cells.sort_unstable();
        cells.dedup();
        let cells_set = cells.iter().copied().collect();
        Self {
            name: name.to_string(),
            specific_name: specific_name.to_string(),
            cells,
            cells_set,
        }
    }

    /// Distinct given values among the members, recomputed per call.
    fn given_values(&self, board: &Board) -> Vec<u32> {
        let mut values = Vec::new();
        for &cell in &self.cells {
            if !board.is_given(cell) {
                continue;
            }
            if let Some(value) = board.value(cell) {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        values
    }

    /// Intersection of every member's candidates.
    fn shared_mask(&self, board: &Board) -> ValueMask {
        self.cells
            .iter()
            .fold(board.all_values(), |mask, &cell| mask & board.cell_mask(cell))
    }
}

impl Constraint for EqualCellsConstraint {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: self.name.clone(),
            description: self.specific_name.clone(),
        }
    }

    fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    fn init(&self, board: &mut Board, is_repeat: bool) -> ConstraintResult {
        if is_repeat || self.cells.len() < 2 {
            return ConstraintResult::Unchanged;
        }

        for pair in combinations(&self.cells, 2) {
            if board.seen_cells(pair[0]).contains(&pair[1]) {
                return ConstraintResult::Invalid;
            }
            board.add_clone_weak_links(pair[0], pair[1]);
        }

        ConstraintResult::Unchanged
    }

    fn enforce(&self, board: &Board, cell: CellIndex, _value: u32) -> bool {
        if !self.cells_set.contains(&cell) {
            return true;
        }

        let given_values = self.given_values(board);
        if given_values.len() > 1 {
            return false;
        }
        if let [value] = given_values[..] {
            return self
                .cells
                .iter()
                .all(|&member| masks::has_value(board.cell_mask(member), value));
        }

        self.shared_mask(board) != 0
    }

    fn logic_step(
        &self,
        board: &mut Board,
        trace: Option<&mut Vec<String>>,
    ) -> ConstraintResult {
        let mut trace = trace;
        let shared = self.shared_mask(board);
        if shared == 0 {
            if let Some(trace) = trace.as_deref_mut() {
                trace.push(format!("{} has no possible values", self.specific_name));
            }
            return ConstraintResult::Invalid;
        }

        let mut outcome = ConstraintResult::Unchanged;
        for &cell in &self.cells {
            let current = board.cell_mask(cell);
            if current == shared {
                continue;
            }
            if let Some(trace) = trace.as_deref_mut() {
                let removed = current & !shared;
                if removed != 0 {
                    trace.push(format!(
                        "{} eliminates {}",
                        self.specific_name,
                        board.compact_name(&[cell], removed)
                    ));
                }
            }
            outcome = outcome.max(board.keep_cell_mask(cell, shared));
        }
        outcome
    }
}

#[derive(Debug, Deserialize)]
struct PalindromeParams {
    lines: Vec<Vec<String>>,
}

/// Factory for the `palindrome` rule: each line pairs its i-th cell with
/// its mirror, and every pair must match.
pub fn build_palindrome(board: &Board, params: &Value) -> Result<Vec<Box<dyn Constraint>>> {
    let Ok(params) = serde_json::from_value::<PalindromeParams>(params.clone()) else {
        return Ok(Vec::new());
    };

    let mut built: Vec<Box<dyn Constraint>> = Vec::new();
    for line in &params.lines {
        if line.is_empty() {
            continue;
        }
        let cells = cell_indexes_from_names(line, board.size())?;
        let specific_name = format!("Palindrome at {}", cell_name(cells[0], board.size()));
        for i in 0..cells.len() / 2 {
            let pair = vec![cells[i], cells[cells.len() - 1 - i]];
            built.push(Box::new(EqualCellsConstraint::new(
                "Palindrome",
                &specific_name,
                pair,
            )));
        }
    }
    Ok(built)
}

#[derive(Debug, Deserialize)]
struct CloneParams {
    cells: Vec<String>,
    #[serde(rename = "cloneCells")]
    clone_cells: Vec<String>,
}

/// Factory for the `clone` rule: two equal-length cell groups matched
/// index-wise. Mismatched lengths are a malformed instance and build
/// nothing.
pub fn build_clone(board: &Board, params: &Value) -> Result<Vec<Box<dyn Constraint>>> {
    let Ok(params) = serde_json::from_value::<CloneParams>(params.clone()) else {
        return Ok(Vec::new());
    };
    if params.cells.len() != params.clone_cells.len() {
        return Ok(Vec::new());
    }

    let originals = cell_indexes_from_names(&params.cells, board.size())?;
    let clones = cell_indexes_from_names(&params.clone_cells, board.size())?;

    let mut built: Vec<Box<dyn Constraint>> = Vec::new();
    for (&original, &clone) in originals.iter().zip(&clones) {
        let specific_name = format!(
            "Clone Cells {},{}",
            cell_name(original, board.size()),
            cell_name(clone, board.size())
        );
        built.push(Box::new(EqualCellsConstraint::new(
            "Clone",
            &specific_name,
            vec![original, clone],
        )));
    }
    Ok(built)
}
