//! Process-wide rule registries.
//!
//! Each rule family binds a factory to its rule-type name; a separate flat
//! list of aggregate builders inspects whole-board configuration flags and
//! synthesizes constraints for them. Both tables are populated at startup
//! (built-in families are seeded on first touch) and append-only after
//! that.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::Result,
    solver::{board::Board, constraint::Constraint, constraints},
};

/// Builds zero or more constraint instances from per-rule parameters.
///
/// Malformed parameter shapes yield an empty set so one bad rule instance
/// cannot abort the whole build; malformed cell names fail with
/// `InvalidCellName`.
pub type ConstraintFactory = fn(&Board, &Value) -> Result<Vec<Box<dyn Constraint>>>;

/// Builds constraint instances from whole-board configuration flags.
pub type AggregateFactory = fn(&Board, &BoardConfig) -> Vec<Box<dyn Constraint>>;

/// Whole-board rule toggles. Field names follow the wire format.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub antiking: bool,
    pub antiknight: bool,
    #[serde(rename = "diagonal+")]
    pub diagonal_positive: bool,
    #[serde(rename = "diagonal-")]
    pub diagonal_negative: bool,
    pub disjointgroups: bool,
}

static CONSTRAINT_FACTORIES: Lazy<RwLock<HashMap<String, ConstraintFactory>>> =
    Lazy::new(|| {
        let mut factories: HashMap<String, ConstraintFactory> = HashMap::new();
        factories.insert(
            "palindrome".to_string(),
            constraints::equal_cells::build_palindrome as ConstraintFactory,
        );
        factories.insert(
            "clone".to_string(),
            constraints::equal_cells::build_clone as ConstraintFactory,
        );
        factories.insert(
            "extraregion".to_string(),
            constraints::extra_region::build_extra_region as ConstraintFactory,
        );
        RwLock::new(factories)
    });

static AGGREGATE_FACTORIES: Lazy<RwLock<Vec<AggregateFactory>>> = Lazy::new(|| {
    RwLock::new(vec![
        constraints::extra_region::build_anti_king as AggregateFactory,
        constraints::extra_region::build_anti_knight as AggregateFactory,
        constraints::extra_region::build_diagonals as AggregateFactory,
        constraints::extra_region::build_disjoint_groups as AggregateFactory,
    ])
});

/// Binds a rule-type name to its factory. Names are case-insensitive;
/// later registrations win, which lets embedders override a built-in
/// family.
pub fn register_constraint(name: &str, factory: ConstraintFactory) {
    let mut factories = CONSTRAINT_FACTORIES
        .write()
        .expect("constraint registry poisoned");
    let _ = factories.insert(name.to_ascii_lowercase(), factory);
}

/// Adds an aggregate builder, invoked once per board build.
pub fn register_aggregate(factory: AggregateFactory) {
    AGGREGATE_FACTORIES
        .write()
        .expect("aggregate registry poisoned")
        .push(factory);
}

/// Instantiates the rule family `name` with `params`. Unknown names yield
/// an empty set.
pub fn build_constraints(
    name: &str,
    board: &Board,
    params: &Value,
) -> Result<Vec<Box<dyn Constraint>>> {
    let factory = {
        let factories = CONSTRAINT_FACTORIES
            .read()
            .expect("constraint registry poisoned");
        factories.get(&name.to_ascii_lowercase()).copied()
    };
    match factory {
        Some(factory) => factory(board, params),
        None => {
            debug!(rule = name, "no factory registered");
            Ok(Vec::new())
        }
    }
}

/// Runs every aggregate builder against the board configuration.
pub fn build_aggregate_constraints(
    board: &Board,
    config: &BoardConfig,
) -> Vec<Box<dyn Constraint>> {
    let factories = AGGREGATE_FACTORIES
        .read()
        .expect("aggregate registry poisoned");
    factories
        .iter()
        .flat_map(|factory| factory(board, config))
        .collect()
}
