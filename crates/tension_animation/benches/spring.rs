use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tension_animation::{
    Animation, AnimationContext, AnimationScheduler, FluidSpringAnimation, Spring,
};
use tension_core::{Vector2, VectorArithmetic};

fn bench_closed_form(c: &mut Criterion) {
    let springs = [
        ("under_damped", Spring::new(0.5, 0.3)),
        ("critical", Spring::new(0.5, 0.0)),
        ("over_damped", Spring::new(0.5, -0.4)),
    ];

    let mut group = c.benchmark_group("closed_form");
    for (name, spring) in springs {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for frame in 0..60 {
                    let t = frame as f64 / 60.0;
                    sum += spring.value(black_box(1.0), 0.0, t);
                    sum += spring.velocity(black_box(1.0), 0.0, t);
                }
                sum
            })
        });
    }
    group.finish();
}

fn bench_settling(c: &mut Criterion) {
    c.bench_function("settling_duration_scan", |b| {
        let spring = Spring::new(0.5, -0.4);
        b.iter(|| black_box(spring).settling_duration())
    });
    c.bench_function("with_settling_duration", |b| {
        b.iter(|| Spring::with_settling_duration(black_box(0.8), 0.7, 0.001))
    });
}

fn bench_fluid(c: &mut Criterion) {
    c.bench_function("fluid_second_at_60fps", |b| {
        let animation = FluidSpringAnimation::new(0.5, 0.8, 0.0);
        b.iter(|| {
            let mut context = AnimationContext::new();
            let mut offset = 0.0;
            for frame in 1..=60 {
                let time = frame as f64 / 60.0;
                match animation.animate(black_box(1.0), time, &mut context) {
                    Some(value) => offset = value,
                    None => break,
                }
            }
            offset
        })
    });
}

fn bench_scheduler(c: &mut Criterion) {
    c.bench_function("scheduler_100_properties", |b| {
        b.iter(|| {
            let mut scheduler = AnimationScheduler::new();
            for i in 0..100 {
                let id = scheduler.add_property(Vector2::zero());
                let target = Vector2::new(i as f64, 100.0);
                scheduler.animate_to(id, target, Animation::snappy());
            }
            for frame in 1..=30 {
                scheduler.tick(frame as f64 / 60.0);
            }
            scheduler.has_active_animations()
        })
    });
}

criterion_group!(
    benches,
    bench_closed_form,
    bench_settling,
    bench_fluid,
    bench_scheduler
);
criterion_main!(benches);
