//! Backtracking search for when logic alone stalls.
//!
//! Propagation does the heavy lifting; the search only guesses at cells
//! the fixed point left unresolved, recursing on cheap board clones and
//! treating `Contradiction` as "this branch is dead, try the next
//! candidate".

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::solver::{
    board::Board,
    cells::CellIndex,
    constraint::{Constraint, ConstraintResult},
    engine::{PropagationEngine, PropagationOutcome, PropagationStats},
    masks,
};

/// Counters accumulated across a whole search.
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    pub nodes_visited: u64,
    pub backtracks: u64,
    pub propagation: PropagationStats,
}

/// Depth-first search over guesses: propagate, branch on the unresolved
/// cell with the fewest candidates, recurse.
#[derive(Debug)]
pub struct BacktrackingSearch {
    engine: PropagationEngine,
    rng: Option<ChaCha8Rng>,
}

impl BacktrackingSearch {
    /// A search that tries candidate values in ascending order.
    pub fn new() -> Self {
        Self {
            engine: PropagationEngine::new(),
            rng: None,
        }
    }

    /// A search that draws candidate values in seeded-random order;
    /// useful for sampling varied solutions of under-constrained puzzles.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            engine: PropagationEngine::new(),
            rng: Some(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Finds a solved board reachable from `board`, or `None` when the
    /// puzzle is unsatisfiable. Constraints must already be initialized.
    pub fn solve(
        &mut self,
        board: &Board,
        constraints: &[Box<dyn Constraint>],
    ) -> (Option<Board>, SolveStats) {
        let mut stats = SolveStats::default();
        let solution = self.search(board.clone(), constraints, &mut stats);
        debug!(
            nodes = stats.nodes_visited,
            backtracks = stats.backtracks,
            solved = solution.is_some(),
            "search finished"
        );
        (solution, stats)
    }

    fn search(
        &mut self,
        mut board: Board,
        constraints: &[Box<dyn Constraint>],
        stats: &mut SolveStats,
    ) -> Option<Board> {
        stats.nodes_visited += 1;

        let (outcome, propagation_stats) = self.engine.propagate(&mut board, constraints, None);
        stats.propagation.absorb(&propagation_stats);
        match outcome {
            PropagationOutcome::Solved => return Some(board),
            PropagationOutcome::Contradiction => return None,
            PropagationOutcome::Stalled => {}
        }

        let Some(cell) = select_cell(&board) else {
            // Unreachable after Stalled, but harmless to handle.
            return Some(board);
        };

        let mut remaining = board.cell_mask(cell);
        while remaining != 0 {
            let value = match &mut self.rng {
                Some(rng) => masks::random_value(remaining, rng),
                None => masks::min_value(remaining),
            };
            remaining &= !masks::value_bit(value);

            let mut guess = board.clone();
            if guess.keep_cell_mask(cell, masks::value_bit(value)) == ConstraintResult::Invalid {
                continue;
            }
            if !self.engine.check(&guess, constraints, cell, value) {
                stats.backtracks += 1;
                continue;
            }
            if let Some(solution) = self.search(guess, constraints, stats) {
                return Some(solution);
            }
            stats.backtracks += 1;
        }
        None
    }
}

impl Default for BacktrackingSearch {
    fn default() -> Self {
        Self::new()
    }
}

/// The unresolved cell with the fewest candidates.
fn select_cell(board: &Board) -> Option<CellIndex> {
    (0..board.cell_count())
        .filter(|&cell| masks::popcount(board.cell_mask(cell)) > 1)
        .min_by_key(|&cell| masks::popcount(board.cell_mask(cell)))
}
