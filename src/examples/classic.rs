//! Worked example: classic 9×9 Sudoku driven through the engine.

use crate::solver::{
    board::Board,
    constraint::{Constraint, ConstraintResult},
    engine::PropagationEngine,
    search::{BacktrackingSearch, SolveStats},
};

/// Builds a size-9 board from a digit grid (0 = empty).
pub fn board_from_grid(grid: &[[u32; 9]; 9]) -> Board {
    let mut board = Board::new(9);
    for (row, columns) in grid.iter().enumerate() {
        for (col, &value) in columns.iter().enumerate() {
            if value != 0 {
                board.set_given(row * 9 + col, value);
            }
        }
    }
    board
}

/// Reads a (possibly partial) board back into a digit grid (0 = unsettled).
pub fn grid_from_board(board: &Board) -> [[u32; 9]; 9] {
    let mut grid = [[0; 9]; 9];
    for (cell, slot) in grid.iter_mut().flatten().enumerate() {
        *slot = board.value(cell).unwrap_or(0);
    }
    grid
}

/// Initializes the constraints and solves; `None` when the puzzle is
/// unsatisfiable.
pub fn solve(
    mut board: Board,
    constraints: &[Box<dyn Constraint>],
) -> (Option<Board>, SolveStats) {
    let engine = PropagationEngine::new();
    if engine.initialize(&mut board, constraints, false) == ConstraintResult::Invalid {
        return (None, SolveStats::default());
    }
    let mut search = BacktrackingSearch::new();
    search.solve(&board, constraints)
}
