use core::time::Duration;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sttt_core::*;

fn random_game(seed: u64) -> Board {
    let mut bot = RandomBot::new(seed);
    let mut board = Board::new();
    while let Some(coord) = bot.select_move(board.clone(), Duration::ZERO) {
        board.play(coord).unwrap();
    }
    board
}

fn bench_playout(c: &mut Criterion) {
    let mut seed = 0;
    c.bench_function("random_game", |b| {
        b.iter(|| {
            seed += 1;
            black_box(random_game(seed))
        })
    });

    let midgame = {
        let mut bot = RandomBot::new(1);
        let mut board = Board::new();
        for _ in 0..20 {
            let coord = bot.select_move(board.clone(), Duration::ZERO).unwrap();
            board.play(coord).unwrap();
        }
        board
    };
    c.bench_function("copy_midgame", |b| b.iter(|| black_box(midgame.clone())));
    c.bench_function("available_moves_midgame", |b| {
        b.iter(|| black_box(midgame.available_moves()))
    });
}

criterion_group!(benches, bench_playout);
criterion_main!(benches);
