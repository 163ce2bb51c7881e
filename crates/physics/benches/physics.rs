use criterion::{black_box, criterion_group, criterion_main, Criterion};
use physics::{CartPole, CartPoleConfig, CartState, InvertedPendulum, InvertedPendulumConfig};

fn bench_cartpole_episode(c: &mut Criterion) {
    let mut cp = CartPole::new(CartPoleConfig::default()).unwrap();
    c.bench_function("cartpole_200_steps", |b| {
        b.iter(|| {
            cp.reset_to(CartState::new(0.0, 0.0, 0.01, 0.0));
            for i in 0..200 {
                cp.push(black_box(i % 2 == 0)).unwrap();
            }
        });
    });
}

fn bench_pendulum_episode(c: &mut Criterion) {
    let mut pendulum = InvertedPendulum::new(InvertedPendulumConfig::default()).unwrap();
    c.bench_function("inverted_pendulum_1000_steps", |b| {
        b.iter(|| {
            pendulum.reset_to(CartState::new(0.0, 0.0, 0.005, 0.0));
            for i in 0..1000 {
                let ctrl = if i % 2 == 0 { 0.1 } else { -0.1 };
                pendulum.step(black_box(ctrl)).unwrap();
            }
        });
    });
}

criterion_group!(benches, bench_cartpole_episode, bench_pendulum_episode);
criterion_main!(benches);
