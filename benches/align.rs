use criterion::{criterion_group, criterion_main, Criterion};
use patchalign::{AlignConfig, Aligner, RasterImage, Rect};
use std::hint::black_box;

fn noise(x: i32, y: i32) -> u32 {
    let mut h = (x as u32).wrapping_mul(0x9E37_79B1) ^ (y as u32).wrapping_mul(0x85EB_CA77);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}

fn make_image(width: u32, height: u32, shift_x: i32, shift_y: i32) -> RasterImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let v = (noise(x + shift_x, y + shift_y) & 0xFF) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    RasterImage::new(data, width, height, 4).unwrap()
}

fn bench_aligner(c: &mut Criterion) {
    let reference = make_image(512, 512, 0, 0);
    let target = make_image(512, 512, -11, 7);
    let region = Rect::new(200, 200, 64, 64).unwrap();

    let aligner = Aligner::new(&reference, region);
    c.bench_function("align_default_radius", |b| {
        b.iter(|| black_box(aligner.align(&target)));
    });

    let wide = Aligner::new(&reference, region).with_config(AlignConfig {
        search_radius: 100,
        ..AlignConfig::default()
    });
    c.bench_function("align_wide_radius", |b| {
        b.iter(|| black_box(wide.align(&target)));
    });

    #[cfg(feature = "rayon")]
    c.bench_function("align_default_radius_parallel", |b| {
        b.iter(|| black_box(aligner.align_par(&target)));
    });
}

criterion_group!(benches, bench_aligner);
criterion_main!(benches);
