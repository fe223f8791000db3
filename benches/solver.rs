//! Benchmarks for the Lazor tracer and placement search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lazor::bff;
use lazor::solver::{search_space, SearchOptions};
use lazor::tracer::{trace, DEFAULT_STEP_CAP};
use lazor::Puzzle;

const SPLIT_PAIR: &str = include_str!("../puzzles/split_pair.bff");
const MIRROR_BOX: &str = include_str!("../puzzles/mirror_box.bff");

fn load(text: &str) -> Puzzle {
    bff::parse(text).expect("bundled puzzle parses")
}

/// Benchmark solving a puzzle that needs a split beam.
fn bench_solve_split_pair(c: &mut Criterion) {
    let puzzle = load(SPLIT_PAIR);
    let options = SearchOptions::default();

    c.bench_function("solve_split_pair", |b| {
        b.iter(|| black_box(&puzzle).solve(&options))
    });
}

/// Benchmark a single trace that ends in a cycle.
fn bench_trace_loop(c: &mut Criterion) {
    let puzzle = load(MIRROR_BOX);

    c.bench_function("trace_mirror_box", |b| {
        b.iter(|| trace(black_box(&puzzle.board), DEFAULT_STEP_CAP))
    });
}

/// Benchmark an unsolvable search with diagnosis enabled.
fn bench_diagnose(c: &mut Criterion) {
    let puzzle = load(MIRROR_BOX);
    let options = SearchOptions {
        diagnose: true,
        ..SearchOptions::default()
    };

    c.bench_function("diagnose_mirror_box", |b| {
        b.iter(|| black_box(&puzzle).solve(&options))
    });
}

/// Benchmark sizing the layout space of a large board.
fn bench_search_space(c: &mut Criterion) {
    let puzzle = load(SPLIT_PAIR);

    c.bench_function("search_space", |b| {
        b.iter(|| search_space(black_box(40), black_box(&puzzle.inventory)))
    });
}

criterion_group!(
    benches,
    bench_solve_split_pair,
    bench_trace_loop,
    bench_diagnose,
    bench_search_space
);
criterion_main!(benches);
