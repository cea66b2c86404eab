use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gomoku::eval::Evaluator;
use gomoku::search::{MoveOrderer, NullObserver, OrderHints, Searcher};
use gomoku::{EngineConfig, Pos, Position, Stone};

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    size: usize,
    /// Alternating moves, black first
    moves: &'static [(u8, u8)],
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "opening",
        size: 19,
        moves: &[(9, 9), (9, 10), (10, 10), (8, 8)],
    },
    BenchCase {
        name: "midgame",
        size: 19,
        moves: &[
            (9, 9),
            (9, 10),
            (10, 10),
            (8, 8),
            (10, 9),
            (10, 8),
            (11, 9),
            (8, 9),
            (12, 9),
            (13, 9),
            (11, 11),
            (12, 12),
        ],
    },
    BenchCase {
        name: "small_board",
        size: 15,
        moves: &[(7, 7), (7, 8), (8, 8), (6, 6), (8, 7), (8, 6)],
    },
];

fn setup(case: &BenchCase) -> (Position, Stone) {
    let mut position = Position::new(case.size, 5);
    let mut player = Stone::Black;
    for &(r, c) in case.moves {
        position
            .play(Pos::new(r, c), player)
            .expect("benchmark moves should be legal");
        player = player.opponent();
    }
    (position, player)
}

fn bench_evaluate(c: &mut Criterion) {
    let config = EngineConfig::default();
    let evaluator = Evaluator::new(&config.heuristic);
    let mut group = c.benchmark_group("evaluate_board");

    for case in CASES {
        let (position, player) = setup(case);
        group.bench_with_input(BenchmarkId::from_parameter(case.name), &position, |b, p| {
            b.iter(|| black_box(evaluator.evaluate_board(black_box(p.board()), player)))
        });
    }
    group.finish();
}

fn bench_order_moves(c: &mut Criterion) {
    let config = EngineConfig::default();
    let evaluator = Evaluator::new(&config.heuristic);
    let orderer = MoveOrderer::new(&evaluator, &config.search);
    let hints = OrderHints {
        cap: config.search.move_caps.root,
        ..OrderHints::default()
    };
    let mut group = c.benchmark_group("order_moves");

    for case in CASES {
        let (mut position, player) = setup(case);
        group.bench_function(BenchmarkId::from_parameter(case.name), |b| {
            b.iter(|| black_box(orderer.order_moves(&mut position, player, &hints).len()))
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_depth_search");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    for depth in [2u8, 4] {
        let mut config = EngineConfig::default();
        config.search.max_depth = depth;
        config.search.tt_size_mb = 4;
        let evaluator = Evaluator::new(&config.heuristic);

        for case in CASES {
            let (mut position, player) = setup(case);
            let name = format!("{}_d{}", case.name, depth);
            group.bench_function(BenchmarkId::from_parameter(name), |b| {
                b.iter(|| {
                    let mut searcher = Searcher::new(&evaluator, &config.search);
                    let result = searcher.iterative_deepening(
                        &mut position,
                        player,
                        Duration::from_secs(60),
                        &mut NullObserver,
                    );
                    black_box(result.best_move)
                })
            });
        }
    }
    group.finish();
}

criterion_group!(search_benches, bench_evaluate, bench_order_moves, bench_search);
criterion_main!(search_benches);
