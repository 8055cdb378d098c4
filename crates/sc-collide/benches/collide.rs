use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sc_collide::{PlacedOutline, collides};
use sc_core::{Point2f, Polygon2f, Transform2f};
use sc_outline::Outline;

fn star(cx: f32, cy: f32, spikes: usize, r_out: f32, r_in: f32) -> Polygon2f {
    let n = spikes * 2;
    Polygon2f::new(
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * core::f32::consts::TAU;
                let r = if i % 2 == 0 { r_out } else { r_in };
                Point2f::new(cx + r * a.cos(), cy + r * a.sin())
            })
            .collect(),
    )
}

fn bench_collides(c: &mut Criterion) {
    let outline = Outline::new(vec![
        star(0.0, 0.0, 64, 200.0, 150.0),
        star(0.0, 0.0, 32, 100.0, 80.0),
    ]);
    let a = PlacedOutline::new(&outline, &Transform2f::default(), true);
    // Nested without crossings: the worst case, every edge pair is tested.
    let b = PlacedOutline::new(
        &Outline::new(vec![star(0.0, 0.0, 16, 120.0, 110.0)]),
        &Transform2f::default(),
        true,
    );
    let far = PlacedOutline::new(&outline, &Transform2f::translation(1000.0, 0.0), true);

    c.bench_function("sc_collide_nested_no_crossing", |bench| {
        bench.iter(|| black_box(collides(black_box(&a), black_box(&b))));
    });
    c.bench_function("sc_collide_hit_box_reject", |bench| {
        bench.iter(|| black_box(collides(black_box(&a), black_box(&far))));
    });
}

criterion_group!(benches, bench_collides);
criterion_main!(benches);
