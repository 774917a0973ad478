//! The plugin contract every rule variant implements.

use std::fmt;

use crate::solver::{board::Board, cells::CellIndex};

/// Outcome of a narrowing step.
///
/// Ordered so combined outcomes take the strongest via `max`: `Invalid`
/// dominates `Changed` dominates `Unchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConstraintResult {
    Unchanged,
    Changed,
    Invalid,
}

/// Identifies a constraint in stats displays and trace lines.
#[derive(Debug, Clone)]
pub struct ConstraintDescriptor {
    /// Rule family, e.g. `"Palindrome"`.
    pub name: String,
    /// Specific display name, e.g. `"Palindrome at R1C1"`; used verbatim
    /// in trace lines.
    pub description: String,
}

/// A rule participating in the uniform elimination protocol.
///
/// Instances are immutable once built. Anything derived from the board —
/// given-value lists, candidate intersections — is recomputed on every
/// call, because the board mutates between calls.
pub trait Constraint: fmt::Debug {
    fn descriptor(&self) -> ConstraintDescriptor;

    /// The cells this constraint governs. The engine re-queues a
    /// constraint when one of these narrows.
    fn cells(&self) -> &[CellIndex];

    /// One-time setup, called once per solve attempt. May add weak links
    /// or regions, or prove the puzzle impossible outright. `is_repeat`
    /// distinguishes a restart from a fresh build so setup side effects
    /// are not duplicated.
    fn init(&self, board: &mut Board, is_repeat: bool) -> ConstraintResult {
        let _ = (board, is_repeat);
        ConstraintResult::Unchanged
    }

    /// Cell-local feasibility probe for "`cell` has settled on `value`".
    ///
    /// Pure: must not mutate the board. Returns `false` the instant the
    /// constraint can prove the configuration infeasible.
    fn enforce(&self, board: &Board, cell: CellIndex, value: u32) -> bool {
        let _ = (board, cell, value);
        true
    }

    /// The elimination step: narrow member cells through
    /// [`Board::keep_cell_mask`], appending human-readable lines to
    /// `trace` when a sink is supplied.
    fn logic_step(
        &self,
        board: &mut Board,
        trace: Option<&mut Vec<String>>,
    ) -> ConstraintResult {
        let _ = (board, trace);
        ConstraintResult::Unchanged
    }
}
