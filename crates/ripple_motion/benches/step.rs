//! Per-frame stepping cost

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ripple_core::{Heartbeat, Transform2D};
use ripple_motion::{Motion, MotionOptions, SpringOptions, TweenOptions};

fn manual<T: ripple_motion::MotionGoal>(initial: T) -> Motion<T> {
    Motion::with_options(initial, MotionOptions::new().clock(Heartbeat::new()))
}

fn bench_spring_scalar(c: &mut Criterion) {
    c.bench_function("spring_scalar_step", |b| {
        let motion = manual(0.0f32);
        let mut target = 100.0;
        b.iter(|| {
            if motion.is_complete() {
                target = -target;
                motion.spring(target, &SpringOptions::new()).unwrap();
            }
            black_box(motion.step(1.0 / 60.0).unwrap())
        });
    });
}

fn bench_tween_sequence(c: &mut Criterion) {
    c.bench_function("tween_sequence_64_step", |b| {
        let motion = manual(vec![0.0f32; 64]);
        b.iter(|| {
            if motion.is_complete() {
                let goal = motion.get().iter().map(|v| Some(1.0 - v)).collect();
                motion.tween(goal, &TweenOptions::new().time(0.5)).unwrap();
            }
            black_box(motion.step(1.0 / 60.0).unwrap())
        });
    });
}

fn bench_heartbeat_fanout(c: &mut Criterion) {
    c.bench_function("heartbeat_32_transforms", |b| {
        let clock = Heartbeat::new();
        let motions: Vec<_> = (0..32)
            .map(|i| {
                let motion = Motion::with_options(
                    Transform2D::IDENTITY,
                    MotionOptions::new().clock(clock.clone()).start(true),
                );
                let target = Transform2D::new(i as f32, -(i as f32), 0.5, 2.0);
                motion.spring(target, &SpringOptions::new()).unwrap();
                motion
            })
            .collect();
        b.iter(|| clock.tick(black_box(1.0 / 60.0)));
        drop(motions);
    });
}

criterion_group!(
    benches,
    bench_spring_scalar,
    bench_tween_sequence,
    bench_heartbeat_fanout
);
criterion_main!(benches);
