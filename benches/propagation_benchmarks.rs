use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridprop::examples::classic::{board_from_grid, solve};
use gridprop::solver::{
    constraint::Constraint,
    engine::PropagationEngine,
    registry::{self, BoardConfig},
    search::BacktrackingSearch,
};

// Puzzle shared with src/examples/classic.rs tests.
const PUZZLE: [[u32; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

fn bench_classic_solve(c: &mut Criterion) {
    c.bench_function("classic 9x9 solve", |b| {
        b.iter(|| {
            let board = board_from_grid(black_box(&PUZZLE));
            let constraints: Vec<Box<dyn Constraint>> = Vec::new();
            let (solution, _stats) = solve(board, &constraints);
            assert!(solution.is_some());
        });
    });
}

fn bench_propagation_fixed_point(c: &mut Criterion) {
    c.bench_function("propagate to fixed point", |b| {
        b.iter(|| {
            let mut board = board_from_grid(black_box(&PUZZLE));
            let constraints: Vec<Box<dyn Constraint>> = Vec::new();
            let engine = PropagationEngine::new();
            let (outcome, _stats) = engine.propagate(&mut board, &constraints, None);
            black_box(outcome)
        });
    });
}

fn bench_variant_solve(c: &mut Criterion) {
    let config = BoardConfig {
        antiking: true,
        diagonal_negative: true,
        ..BoardConfig::default()
    };

    c.bench_function("empty 9x9 anti-king + diagonal fill", |b| {
        b.iter(|| {
            let mut board = board_from_grid(&[[0; 9]; 9]);
            let constraints = registry::build_aggregate_constraints(&board, black_box(&config));
            let engine = PropagationEngine::new();
            engine.initialize(&mut board, &constraints, false);
            let mut search = BacktrackingSearch::with_seed(1);
            let (solution, _stats) = search.solve(&board, &constraints);
            assert!(solution.is_some());
        });
    });
}

criterion_group!(
    benches,
    bench_classic_solve,
    bench_propagation_fixed_point,
    bench_variant_solve
);
criterion_main!(benches);
