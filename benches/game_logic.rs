use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stacklogic::core::{Board, GameSession};
use stacklogic::types::{PieceKind, RunState, TICK_MS};

fn bench_tick(c: &mut Criterion) {
    let mut game = GameSession::new(12345);
    game.new_game();

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            game.tick(black_box(TICK_MS));
            if game.state() == RunState::GameOver {
                game.go_home();
                game.new_game();
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in 16..20 {
                board.fill_row(y, PieceKind::I);
            }
            black_box(board.clear_full_rows());
        })
    });
}

fn bench_piece_spawn(c: &mut Criterion) {
    let mut game = GameSession::new(12345);
    game.new_game();

    c.bench_function("spawn_piece", |b| {
        b.iter(|| {
            black_box(game.spawn_piece());
        })
    });
}

fn bench_move(c: &mut Criterion) {
    let mut game = GameSession::new(12345);
    game.new_game();

    c.bench_function("move_right", |b| {
        b.iter(|| {
            black_box(game.move_right());
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut game = GameSession::new(12345);
    game.new_game();

    c.bench_function("rotate_cw", |b| {
        b.iter(|| {
            black_box(game.rotate_cw());
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut game = GameSession::new(12345);
    game.new_game();
    let mut snap = game.snapshot();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            game.snapshot_into(black_box(&mut snap));
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_piece_spawn,
    bench_move,
    bench_rotate,
    bench_snapshot
);
criterion_main!(benches);
