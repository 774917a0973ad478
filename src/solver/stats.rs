use prettytable::{Cell, Row, Table};

use crate::solver::{
    constraint::Constraint,
    engine::{ConstraintId, PerConstraintStats, PropagationStats},
};

/// Renders per-constraint propagation counters as a text table, cheapest
/// constraint first.
pub fn render_stats_table(
    stats: &PropagationStats,
    constraints: &[Box<dyn Constraint>],
) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Constraint Type"),
        Cell::new("ID"),
        Cell::new("Description"),
        Cell::new("Logic Steps"),
        Cell::new("Prunings"),
        Cell::new("Time / Step (µs)"),
        Cell::new("Total Time (ms)"),
    ]));

    let mut sorted_stats: Vec<(&ConstraintId, &PerConstraintStats)> =
        stats.constraint_stats.iter().collect();

    sorted_stats.sort_by_key(|entry| entry.1.time_spent_micros);

    for (constraint_id, per) in sorted_stats {
        let descriptor = constraints[*constraint_id].descriptor();
        let avg_time = if per.logic_steps > 0 {
            per.time_spent_micros as f64 / per.logic_steps as f64
        } else {
            0.0
        };

        table.add_row(Row::new(vec![
            Cell::new(&descriptor.name),
            Cell::new(&constraint_id.to_string()),
            Cell::new(&descriptor.description),
            Cell::new(&per.logic_steps.to_string()),
            Cell::new(&per.prunings.to_string()),
            Cell::new(&format!("{:.2}", avg_time)),
            Cell::new(&format!("{:.2}", per.time_spent_micros as f64 / 1000.0)),
        ]));
    }

    table.to_string()
}
