//! Distinctness regions beyond the standard geometry, plus the aggregate
//! builders that synthesize them from whole-board flags.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::Result,
    solver::{
        board::Board,
        cells::{cell_indexes_from_names, cell_name, CellIndex},
        constraint::{Constraint, ConstraintDescriptor, ConstraintResult},
        region::RegionKind,
        registry::BoardConfig,
    },
};

/// Declares one extra all-distinct region.
///
/// The constraint's whole contribution happens at setup: once the region
/// is registered, the engine's distinctness machinery does the
/// eliminating, so there is no per-step logic here.
#[derive(Debug, Clone)]
pub struct ExtraRegionConstraint {
    name: String,
    specific_name: String,
    cells: Vec<CellIndex>,
}

impl ExtraRegionConstraint {
    pub fn new(name: &str, board: &Board, mut cells: Vec<CellIndex>) -> Self {
        cells.sort_unstable();
        let anchor = cells
            .first()
            .map(|&cell| cell_name(cell, board.size()))
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            specific_name: format!("{name} at {anchor}"),
            cells,
        }
    }
}

impl Constraint for ExtraRegionConstraint {
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
        if !is_repeat && self.cells.len() > 1 {
            board.add_region(
                &self.specific_name,
                &self.cells,
                "extra region constraint",
                &self.specific_name,
            );
        }
        ConstraintResult::Unchanged
    }
}

#[derive(Debug, Deserialize)]
struct ExtraRegionParams {
    cells: Vec<String>,
}

/// Factory for the `extraregion` rule. Fewer than two cells is a
/// malformed instance and builds nothing.
pub fn build_extra_region(board: &Board, params: &Value) -> Result<Vec<Box<dyn Constraint>>> {
    let Ok(params) = serde_json::from_value::<ExtraRegionParams>(params.clone()) else {
        return Ok(Vec::new());
    };
    if params.cells.len() < 2 {
        return Ok(Vec::new());
    }

    let cells = cell_indexes_from_names(&params.cells, board.size())?;
    Ok(vec![Box::new(ExtraRegionConstraint::new(
        "Extra Region",
        board,
        cells,
    ))])
}

/// Anti-king: every diagonally adjacent pair becomes a two-cell region.
///
/// Only the next row down is inspected (the pair above was generated by
/// the cell above); the row check also rejects wrap-around at row edges,
/// since a wrapped index lands in a row other than exactly `+1`.
pub fn build_anti_king(board: &Board, config: &BoardConfig) -> Vec<Box<dyn Constraint>> {
    if !config.antiking {
        return Vec::new();
    }

    let size = board.size();
    let mut built: Vec<Box<dyn Constraint>> = Vec::new();
    for index in 0..board.cell_count() {
        let origin_row = index / size;
        for neighbor in [index + size - 1, index + size + 1] {
            if neighbor >= board.cell_count() || neighbor / size != origin_row + 1 {
                continue;
            }
            built.push(Box::new(ExtraRegionConstraint::new(
                "Anti King",
                board,
                vec![index, neighbor],
            )));
        }
    }
    built
}

/// Anti-knight: every knight-move pair becomes a two-cell region. Row
/// checks reject wrap-around exactly as for anti-king.
pub fn build_anti_knight(board: &Board, config: &BoardConfig) -> Vec<Box<dyn Constraint>> {
    if !config.antiknight {
        return Vec::new();
    }

    let size = board.size();
    let mut built: Vec<Box<dyn Constraint>> = Vec::new();
    for index in 0..board.cell_count() {
        let origin_row = index / size;
        let mut neighbors = Vec::with_capacity(4);
        for cell in [index + size - 2, index + size + 2] {
            if cell < board.cell_count() && cell / size == origin_row + 1 {
                neighbors.push(cell);
            }
        }
        for cell in [index + 2 * size - 1, index + 2 * size + 1] {
            if cell < board.cell_count() && cell / size == origin_row + 2 {
                neighbors.push(cell);
            }
        }
        for neighbor in neighbors {
            built.push(Box::new(ExtraRegionConstraint::new(
                "Anti Knight",
                board,
                vec![index, neighbor],
            )));
        }
    }
    built
}

/// `diagonal+` runs bottom-left to top-right, `diagonal-` top-left to
/// bottom-right; each requested diagonal becomes one full region.
pub fn build_diagonals(board: &Board, config: &BoardConfig) -> Vec<Box<dyn Constraint>> {
    let size = board.size();
    let mut built: Vec<Box<dyn Constraint>> = Vec::new();
    if config.diagonal_positive {
        let cells: Vec<CellIndex> = (0..size).map(|i| size * (size - 1 - i) + i).collect();
        built.push(Box::new(ExtraRegionConstraint::new(
            "Diagonals", board, cells,
        )));
    }
    if config.diagonal_negative {
        let cells: Vec<CellIndex> = (0..size).map(|i| i * size + i).collect();
        built.push(Box::new(ExtraRegionConstraint::new(
            "Diagonals", board, cells,
        )));
    }
    built
}

/// Disjoint groups: cells occupying the same position within their box
/// must all differ, one cross-region per intra-box position.
pub fn build_disjoint_groups(board: &Board, config: &BoardConfig) -> Vec<Box<dyn Constraint>> {
    if !config.disjointgroups {
        return Vec::new();
    }

    let boxes: Vec<&[CellIndex]> = board
        .regions()
        .iter()
        .filter(|region| region.kind == RegionKind::Box)
        .map(|region| region.cells.as_slice())
        .collect();

    let mut built: Vec<Box<dyn Constraint>> = Vec::new();
    for position in 0..board.size() {
        let cells: Vec<CellIndex> = boxes
            .iter()
            .filter_map(|cells| cells.get(position).copied())
            .collect();
        if cells.len() < 2 {
            continue;
        }
        built.push(Box::new(ExtraRegionConstraint::new(
            "Disjoint Sets",
            board,
            cells,
        )));
    }
    built
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::solver::{
        engine::{PropagationEngine, PropagationOutcome},
        masks,
        search::BacktrackingSearch,
    };

    fn config_with(setter: impl FnOnce(&mut BoardConfig)) -> BoardConfig {
        let mut config = BoardConfig::default();
        setter(&mut config);
        config
    }

    #[test]
    fn init_registers_the_region_once() {
        let mut board = Board::new(9);
        let before = board.regions().len();
        let constraint =
            ExtraRegionConstraint::new("Extra Region", &board, vec![0, 10, 20, 30]);

        assert_eq!(constraint.init(&mut board, false), ConstraintResult::Unchanged);
        assert_eq!(board.regions().len(), before + 1);

        let region = board.regions().last().expect("just added");
        assert_eq!(region.kind, RegionKind::Extra);
        assert_eq!(region.name, "Extra Region at R1C1");
        assert_eq!(region.owner.as_deref(), Some("Extra Region at R1C1"));

        // A restart must not duplicate the region.
        assert_eq!(constraint.init(&mut board, true), ConstraintResult::Unchanged);
        assert_eq!(board.regions().len(), before + 1);
    }

    #[test]
    fn registered_regions_feed_the_distinctness_sweep() {
        let mut board = Board::new(9);
        let built = build_extra_region(
            &board,
            &json!({ "cells": ["R1C1", "R5C5", "R9C9"] }),
        )
        .unwrap();
        let engine = PropagationEngine::new();
        assert_eq!(
            engine.initialize(&mut board, &built, false),
            ConstraintResult::Unchanged
        );

        board.set_given(0, 7);
        let (outcome, _stats) = engine.propagate(&mut board, &built, None);
        assert_eq!(outcome, PropagationOutcome::Stalled);
        // R5C5 and R9C9 are nowhere near R1C1 geometrically, but the extra
        // region forbids a second 7.
        assert!(!masks::has_value(board.cell_mask(40), 7));
        assert!(!masks::has_value(board.cell_mask(80), 7));
    }

    #[test]
    fn undersized_extra_regions_build_nothing() {
        let board = Board::new(9);
        let built = build_extra_region(&board, &json!({ "cells": ["R1C1"] })).unwrap();
        assert!(built.is_empty());
        let built = build_extra_region(&board, &json!({ "wrong": true })).unwrap();
        assert!(built.is_empty());
    }

    #[test]
    fn extra_region_rejects_bad_cell_names() {
        let board = Board::new(9);
        assert!(build_extra_region(&board, &json!({ "cells": ["R1C1", "R0C0"] })).is_err());
    }

    #[test]
    fn anti_king_pairs_diagonal_neighbors_in_the_next_row() {
        let board = Board::new(9);
        let built = build_anti_king(&board, &config_with(|c| c.antiking = true));

        let pairs_from_10: Vec<&[CellIndex]> = built
            .iter()
            .map(|constraint| constraint.cells())
            .filter(|cells| cells.contains(&10))
            .collect();

        // R2C2 pairs downward with R3C1 and R3C3, and upward pairs come
        // from R1C1 and R1C3.
        assert!(pairs_from_10.contains(&&[10, 18][..]));
        assert!(pairs_from_10.contains(&&[10, 20][..]));
        assert!(pairs_from_10.contains(&&[0, 10][..]));
        assert!(pairs_from_10.contains(&&[2, 10][..]));
        assert_eq!(pairs_from_10.len(), 4);

        // Every generated pair spans exactly one row.
        for constraint in &built {
            let cells = constraint.cells();
            assert_eq!(cells.len(), 2);
            assert_eq!(cells[1] / 9, cells[0] / 9 + 1, "pair {cells:?} spans rows");
        }
    }

    #[test]
    fn anti_king_does_not_wrap_rows() {
        let board = Board::new(9);
        let built = build_anti_king(&board, &config_with(|c| c.antiking = true));

        // R1C9 (index 8): its only diagonal neighbor below is R2C8 (16);
        // index 18 would be a wrap to R3C1.
        let pairs_from_8: Vec<&[CellIndex]> = built
            .iter()
            .map(|constraint| constraint.cells())
            .filter(|cells| cells[0] == 8)
            .collect();
        assert_eq!(pairs_from_8, vec![&[8, 16][..]]);
    }

    #[test]
    fn anti_king_off_builds_nothing() {
        let board = Board::new(9);
        assert!(build_anti_king(&board, &BoardConfig::default()).is_empty());
    }

    #[test]
    fn anti_knight_pairs_knight_moves_without_wrapping() {
        let board = Board::new(9);
        let built = build_anti_knight(&board, &config_with(|c| c.antiknight = true));

        let from_20: Vec<&[CellIndex]> = built
            .iter()
            .map(|constraint| constraint.cells())
            .filter(|cells| cells[0] == 20)
            .collect();
        // R3C3 (20): row+1 partners C1/C5 (27, 31), row+2 partners C2/C4
        // (37, 39).
        assert_eq!(from_20.len(), 4);
        assert!(from_20.contains(&&[20, 27][..]));
        assert!(from_20.contains(&&[20, 31][..]));
        assert!(from_20.contains(&&[20, 37][..]));
        assert!(from_20.contains(&&[20, 39][..]));

        // Left edge: R1C1 (0) has no col-2 partner to the left.
        let from_0: Vec<&[CellIndex]> = built
            .iter()
            .map(|constraint| constraint.cells())
            .filter(|cells| cells[0] == 0)
            .collect();
        assert_eq!(from_0.len(), 2);
        assert!(from_0.contains(&&[0, 11][..]));
        assert!(from_0.contains(&&[0, 19][..]));

        for constraint in &built {
            assert_eq!(constraint.descriptor().name, "Anti Knight");
        }
    }

    #[test]
    fn diagonal_flags_build_one_region_each() {
        let board = Board::new(9);

        let positive = build_diagonals(&board, &config_with(|c| c.diagonal_positive = true));
        assert_eq!(positive.len(), 1);
        let mut expected: Vec<CellIndex> = (0..9).map(|i| 9 * (8 - i) + i).collect();
        expected.sort_unstable();
        assert_eq!(positive[0].cells(), expected.as_slice());

        let negative = build_diagonals(&board, &config_with(|c| c.diagonal_negative = true));
        assert_eq!(negative.len(), 1);
        let expected: Vec<CellIndex> = (0..9).map(|i| i * 9 + i).collect();
        assert_eq!(negative[0].cells(), expected.as_slice());

        let both = build_diagonals(
            &board,
            &config_with(|c| {
                c.diagonal_positive = true;
                c.diagonal_negative = true;
            }),
        );
        assert_eq!(both.len(), 2);
        assert!(build_diagonals(&board, &BoardConfig::default()).is_empty());
    }

    #[test]
    fn disjoint_groups_slice_boxes_by_position() {
        let board = Board::new(9);
        let built =
            build_disjoint_groups(&board, &config_with(|c| c.disjointgroups = true));

        // One cross-region per intra-box position.
        assert_eq!(built.len(), 9);
        for (position, constraint) in built.iter().enumerate() {
            let cells = constraint.cells();
            assert_eq!(cells.len(), 9, "group {position} misses a box");
            // One cell from every box, all at the same intra-box position.
            let boxes: Vec<usize> = cells
                .iter()
                .map(|&cell| (cell / 9 / 3) * 3 + (cell % 9) / 3)
                .collect();
            let mut sorted_boxes = boxes.clone();
            sorted_boxes.sort_unstable();
            assert_eq!(sorted_boxes, (0..9).collect::<Vec<_>>());
            for &cell in cells {
                let intra = (cell / 9 % 3) * 3 + (cell % 9) % 3;
                assert_eq!(intra, position, "cell {cell} sits at the wrong offset");
            }
            assert_eq!(constraint.descriptor().name, "Disjoint Sets");
        }
    }

    #[test]
    fn an_anti_king_fill_keeps_diagonal_neighbors_distinct() {
        let mut board = Board::new(9);
        let built = build_anti_king(&board, &config_with(|c| c.antiking = true));
        let engine = PropagationEngine::new();
        assert_eq!(
            engine.initialize(&mut board, &built, false),
            ConstraintResult::Unchanged
        );

        let mut search = BacktrackingSearch::with_seed(3);
        let (solution, _stats) = search.solve(&board, &built);
        let solution = solution.expect("anti-king grids exist");
        assert!(solution.is_solved());

        for index in 0..solution.cell_count() {
            let row = index / 9;
            for neighbor in [index + 8, index + 10] {
                if neighbor < solution.cell_count() && neighbor / 9 == row + 1 {
                    assert_ne!(
                        solution.value(index),
                        solution.value(neighbor),
                        "cells {index} and {neighbor} match diagonally"
                    );
                }
            }
        }
    }

    #[test]
    fn disjoint_groups_need_boxes() {
        // Size 5 has no box regions, so there is nothing to slice.
        let board = Board::new(5);
        let built =
            build_disjoint_groups(&board, &config_with(|c| c.disjointgroups = true));
        assert!(built.is_empty());
    }
}
