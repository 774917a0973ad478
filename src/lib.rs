//! Gridprop is a constraint-propagation engine for Sudoku and its rule
//! variants: palindromes, clone regions, extra regions, anti-king,
//! anti-knight, diagonals, and disjoint groups.
//!
//! Each cell's candidates live in a bitmask; heterogeneous rules plug into
//! one elimination protocol through the [`Constraint`] trait; and the
//! [`PropagationEngine`] drives every active rule to a logical fixed
//! point, reporting the position solved, stalled, or contradictory. A
//! [`BacktrackingSearch`] picks up where logic stalls.
//!
//! # Core Concepts
//!
//! - **[`Board`]**: the shared mutable state — candidate masks, the
//!   weak-link graph, and the region list. All narrowing goes through
//!   [`Board::keep_cell_mask`], so masks only ever shrink.
//! - **[`Constraint`]**: a rule's three hooks — one-time `init`, the pure
//!   `enforce` feasibility probe, and the eliminating `logic_step`.
//! - **Registries**: rule-type names map to factories building constraint
//!   instances from puzzle parameters; aggregate builders synthesize
//!   constraints from whole-board flags like `antiking`.
//!
//! [`Constraint`]: solver::constraint::Constraint
//! [`Board`]: solver::board::Board
//! [`Board::keep_cell_mask`]: solver::board::Board::keep_cell_mask
//! [`PropagationEngine`]: solver::engine::PropagationEngine
//! [`BacktrackingSearch`]: solver::search::BacktrackingSearch
//!
//! # Example: a palindrome pair propagating a given
//!
//! ```
//! use gridprop::solver::board::Board;
//! use gridprop::solver::constraint::ConstraintResult;
//! use gridprop::solver::engine::{PropagationEngine, PropagationOutcome};
//! use gridprop::solver::registry;
//! use serde_json::json;
//!
//! let mut board = Board::new(9);
//! let constraints = registry::build_constraints(
//!     "palindrome",
//!     &board,
//!     &json!({ "lines": [["R1C1", "R5C5", "R9C2"]] }),
//! )
//! .unwrap();
//! // A 3-cell line folds into one mirrored pair: R1C1 == R9C2.
//! assert_eq!(constraints.len(), 1);
//!
//! let engine = PropagationEngine::new();
//! assert_eq!(
//!     engine.initialize(&mut board, &constraints, false),
//!     ConstraintResult::Unchanged
//! );
//!
//! board.set_given(73, 7); // R9C2 = 7
//! let (outcome, _stats) = engine.propagate(&mut board, &constraints, None);
//! assert_eq!(outcome, PropagationOutcome::Stalled);
//! assert_eq!(board.value(0), Some(7)); // R1C1 forced to match
//! ```
pub mod error;
pub mod examples;
pub mod solver;
