//! The propagation engine: drives every active constraint to a logical
//! fixed point.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::solver::{
    board::Board,
    cells::CellIndex,
    constraint::{Constraint, ConstraintResult},
    masks,
    work_list::WorkList,
};

pub type ConstraintId = usize;

/// Where a propagation run ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// Every cell settled on exactly one value.
    Solved,
    /// Fixed point reached with unresolved cells; a search driver takes
    /// over from here.
    Stalled,
    /// Some constraint proved the position unsatisfiable. This is the
    /// expected, recoverable termination for an over-constrained position,
    /// not a fault.
    Contradiction,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PerConstraintStats {
    pub logic_steps: u64,
    pub prunings: u64,
    pub time_spent_micros: u64,
}

#[derive(Debug, Clone, Default)]
pub struct PropagationStats {
    pub logic_steps: u64,
    pub singles_prunings: u64,
    pub constraint_stats: HashMap<ConstraintId, PerConstraintStats>,
}

impl PropagationStats {
    /// Folds another run's counters into this one.
    pub fn absorb(&mut self, other: &PropagationStats) {
        self.logic_steps += other.logic_steps;
        self.singles_prunings += other.singles_prunings;
        for (id, per) in &other.constraint_stats {
            let entry = self.constraint_stats.entry(*id).or_default();
            entry.logic_steps += per.logic_steps;
            entry.prunings += per.prunings;
            entry.time_spent_micros += per.time_spent_micros;
        }
    }
}

/// Owns the fixed-point elimination loop.
///
/// Exactly one engine call mutates a board at a time; constraints only
/// request narrowing through [`Board::keep_cell_mask`], which keeps the
/// monotonicity guarantee enforceable in one place.
#[derive(Debug, Default)]
pub struct PropagationEngine;

impl PropagationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Runs one-time setup for every constraint in registration order.
    ///
    /// `Invalid` means some constraint proved the puzzle unsatisfiable
    /// before any elimination ran (e.g. two cells forced equal that the
    /// geometry already forces distinct).
    pub fn initialize(
        &self,
        board: &mut Board,
        constraints: &[Box<dyn Constraint>],
        is_repeat: bool,
    ) -> ConstraintResult {
        let mut outcome = ConstraintResult::Unchanged;
        for constraint in constraints {
            let result = constraint.init(board, is_repeat);
            if result == ConstraintResult::Invalid {
                debug!(
                    constraint = %constraint.descriptor().description,
                    "init proved the puzzle impossible"
                );
                return ConstraintResult::Invalid;
            }
            outcome = outcome.max(result);
        }
        outcome
    }

    /// Pure feasibility sweep for "`cell` settled on `value`": every
    /// constraint must accept it.
    pub fn check(
        &self,
        board: &Board,
        constraints: &[Box<dyn Constraint>],
        cell: CellIndex,
        value: u32,
    ) -> bool {
        constraints
            .iter()
            .all(|constraint| constraint.enforce(board, cell, value))
    }

    /// Runs the board to a fixed point.
    ///
    /// Two mechanisms interleave until neither can narrow anything:
    /// settled cells exclude their value from every cell they see
    /// (regions plus weak links), and each constraint's `logic_step` runs
    /// whenever one of its member cells has narrowed since its last step.
    /// The work queue keeps quiescent constraints from being rescanned.
    pub fn propagate(
        &self,
        board: &mut Board,
        constraints: &[Box<dyn Constraint>],
        mut trace: Option<&mut Vec<String>>,
    ) -> (PropagationOutcome, PropagationStats) {
        let mut stats = PropagationStats::default();

        // Constraints indexed by member cell, for re-queueing.
        let mut dependents: HashMap<CellIndex, Vec<ConstraintId>> = HashMap::new();
        for (id, constraint) in constraints.iter().enumerate() {
            for &cell in constraint.cells() {
                dependents.entry(cell).or_default().push(id);
            }
        }

        let mut worklist = WorkList::new();
        for id in 0..constraints.len() {
            worklist.push_back(id);
        }

        // Seed the cascade with every cell so givens propagate before the
        // first constraint step; stale journal entries from setup are
        // superseded by the full seeding.
        let _ = board.take_modified();
        let mut pending_cells: Vec<CellIndex> = (0..board.cell_count()).collect();

        loop {
            // Singles cascade: a settled cell excludes its value from
            // everything it sees, and every constraint must accept it.
            while let Some(cell) = pending_cells.pop() {
                let Some(value) = board.value(cell) else {
                    continue;
                };
                if !self.check(board, constraints, cell, value) {
                    debug!(cell, value, "enforce rejected a settled cell");
                    return (PropagationOutcome::Contradiction, stats);
                }
                let exclude = !masks::value_bit(value);
                for peer in board.seen_cells(cell) {
                    match board.keep_cell_mask(peer, exclude) {
                        ConstraintResult::Invalid => {
                            return (PropagationOutcome::Contradiction, stats);
                        }
                        ConstraintResult::Changed => stats.singles_prunings += 1,
                        ConstraintResult::Unchanged => {}
                    }
                }
                for changed in board.take_modified() {
                    pending_cells.push(changed);
                    if let Some(ids) = dependents.get(&changed) {
                        for &id in ids {
                            worklist.push_back(id);
                        }
                    }
                }
            }

            // Then the next constraint whose cells changed.
            let Some(id) = worklist.pop_front() else {
                break;
            };
            let constraint = &constraints[id];
            let started = Instant::now();
            let result = constraint.logic_step(board, trace.as_deref_mut());
            let per = stats.constraint_stats.entry(id).or_default();
            per.logic_steps += 1;
            per.time_spent_micros += started.elapsed().as_micros() as u64;
            stats.logic_steps += 1;

            match result {
                ConstraintResult::Invalid => {
                    return (PropagationOutcome::Contradiction, stats);
                }
                ConstraintResult::Changed => {
                    for changed in board.take_modified() {
                        per.prunings += 1;
                        pending_cells.push(changed);
                        if let Some(ids) = dependents.get(&changed) {
                            for &dependent in ids {
                                if dependent != id {
                                    worklist.push_back(dependent);
                                }
                            }
                        }
                    }
                }
                ConstraintResult::Unchanged => {}
            }
        }

        debug!(
            logic_steps = stats.logic_steps,
            singles_prunings = stats.singles_prunings,
            "propagation reached a fixed point"
        );
        if board.is_solved() {
            (PropagationOutcome::Solved, stats)
        } else {
            (PropagationOutcome::Stalled, stats)
        }
    }
}
