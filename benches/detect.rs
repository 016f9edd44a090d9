use criterion::{black_box, criterion_group, criterion_main, Criterion};
use edgecam::{detect_batch, EdgeDetector, Frame, GradientEdgeDetector};

fn build_slanted_u8(width: usize, height: usize) -> Vec<u8> {
    let theta = 20.0f32.to_radians();
    let nx = theta.cos();
    let ny = theta.sin();
    let t = nx * (0.5 * width as f32) + ny * (0.5 * height as f32);

    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let d = nx * x as f32 + ny * y as f32 - t;
            data[y * width + x] = if d >= 0.0 { 255 } else { 0 };
        }
    }
    data
}

fn bench_gradient_640x480(c: &mut Criterion) {
    let data = build_slanted_u8(640, 480);
    let frame = Frame::new(&data, 640, 480).expect("valid frame");
    let detector = GradientEdgeDetector::new();

    c.bench_function("gradient_detect_640x480", |b| {
        b.iter(|| {
            let out = detector.detect(black_box(&frame)).expect("detect");
            black_box(out.edge_count());
        });
    });
}

fn bench_batch_8x640x480(c: &mut Criterion) {
    let data = build_slanted_u8(640, 480);
    let frames: Vec<Frame<'_>> = (0..8)
        .map(|_| Frame::new(&data, 640, 480).expect("valid frame"))
        .collect();
    let detector = GradientEdgeDetector::new();

    c.bench_function("gradient_batch_8x640x480", |b| {
        b.iter(|| {
            let out = detect_batch(&detector, black_box(&frames));
            black_box(out.len());
        });
    });
}

criterion_group!(benches, bench_gradient_640x480, bench_batch_8x640x480);
criterion_main!(benches);
