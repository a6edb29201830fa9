//! Throughput benchmark for the two-frame difference detector.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use video_motion::{
    capture::Frame,
    detection::{MotionDetector, TwoFramesDifferenceDetector},
};

fn bench_process_frame(c: &mut Criterion) {
    let width = 640u32;
    let height = 480u32;
    let pixel_count = (width * height) as usize;

    // Two fixed frames with plenty of per-pixel variation, built once so
    // the measurement covers the detector pass, not allocation
    let even: Vec<u8> = (0..pixel_count).map(|i| (i % 251) as u8).collect();
    let odd: Vec<u8> = (0..pixel_count).map(|i| ((i * 7) % 253) as u8).collect();
    let even = Frame::gray(even, width, height, 1);
    let odd = Frame::gray(odd, width, height, 2);

    c.bench_function("two_frames_diff_640x480", |b| {
        let mut detector = TwoFramesDifferenceDetector::new();
        let mut sequence = 0u64;

        b.iter(|| {
            sequence += 1;
            let frame = if sequence % 2 == 0 { &even } else { &odd };
            detector.process_frame(black_box(frame));
            black_box(detector.motion_level())
        });
    });
}

criterion_group!(benches, bench_process_frame);
criterion_main!(benches);
