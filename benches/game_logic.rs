use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{Field, GameConfig, GameState};
use blockfall::engine::{Engine, NullRenderer};
use blockfall::types::{Cell, Command, RED};

fn started_game() -> GameState {
    let mut state = GameState::with_seed(&GameConfig::default(), 12345).unwrap();
    state.start();
    state
}

fn bench_tick(c: &mut Criterion) {
    let mut state = started_game();

    c.bench_function("game_tick", |b| {
        b.iter(|| {
            if state.game_over() {
                state.restart();
            }
            black_box(state.tick());
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut field = Field::new(10, 20);
            // Fill bottom 4 rows plus some rubble above them
            for y in 17..=20 {
                for x in 1..=10 {
                    field.insert(Cell::new(x, y), RED);
                }
            }
            for x in (1..=10).step_by(2) {
                field.insert(Cell::new(x, 16), RED);
            }
            black_box(field.clear_full_rows(2));
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let mut state = started_game();
    let mut dx = 1;

    c.bench_function("try_move", |b| {
        b.iter(|| {
            if !state.try_move(black_box(dx)) {
                dx = -dx;
            }
        })
    });
}

fn bench_try_rotate(c: &mut Criterion) {
    let mut state = started_game();
    for _ in 0..5 {
        state.tick();
    }

    c.bench_function("try_rotate", |b| {
        b.iter(|| {
            black_box(state.try_rotate());
        })
    });
}

fn bench_engine_session(c: &mut Criterion) {
    c.bench_function("engine_session_to_game_over", |b| {
        b.iter(|| {
            let config = GameConfig::default().with_seed(7);
            let mut engine = Engine::new(config, NullRenderer).unwrap();
            engine.handle(Command::Start);
            while engine.advance(Duration::from_millis(700)) > 0 {}
            black_box(engine.game().score())
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_try_move,
    bench_try_rotate,
    bench_engine_session
);
criterion_main!(benches);
