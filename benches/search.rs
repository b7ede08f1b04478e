use std::hint::black_box;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tictactoe::search::{best_classic_move, order_root_moves, MegaSearcher, SearchLimits};
use tictactoe::{Board, Geometry, Mark, TranspositionCache};

/// Random mid-game positions with `marks` squares filled, alternating X and O
fn corpus(size: usize, marks: usize, count: usize) -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(1337);
    (0..count)
        .map(|_| {
            let mut board = Board::new(size);
            let mut mark = Mark::X;
            for _ in 0..marks {
                let available = board.available_moves();
                let idx = available[rng.random_range(0..available.len())];
                board = board.with_move(idx, mark);
                mark = mark.opponent();
            }
            board
        })
        .collect()
}

fn bench_classic(c: &mut Criterion) {
    let geometry = Geometry::classic();
    let empty = Board::new(3);
    c.bench_function("classic/empty", |b| {
        b.iter(|| black_box(best_classic_move(black_box(&empty), &geometry, Mark::X)))
    });

    let boards = corpus(3, 2, 16);
    c.bench_function("classic/two_marks", |b| {
        b.iter(|| {
            for board in &boards {
                black_box(best_classic_move(board, &geometry, Mark::X));
            }
        })
    });
}

fn bench_mega(c: &mut Criterion) {
    let geometry = Geometry::new(7, 4);
    let boards = corpus(7, 6, 8);
    let limits = SearchLimits::new(3, 10, Duration::from_secs(5));

    c.bench_function("mega/7x7_depth3", |b| {
        b.iter(|| {
            for board in &boards {
                let mut cache = TranspositionCache::new();
                let moves = order_root_moves(board, &geometry, Mark::X, limits.top_k, true);
                let mut searcher = MegaSearcher::new(&geometry, Mark::X, limits, Instant::now(), &mut cache);
                black_box(searcher.iterative_deepening(board, &moves));
            }
        })
    });
}

criterion_group!(search, bench_classic, bench_mega);
criterion_main!(search);
