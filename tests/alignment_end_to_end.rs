//! End-to-end aligner validation on synthetic images.
//!
//! The textured scenarios use hash noise box-blurred over a 9x9 support.
//! The blur gives the similarity surface a triangular correlation ramp
//! wider than half the coarse stride, so the best coarse grid point lands
//! within fine-pass reach of the true position; the hash keeps the texture
//! aperiodic so no distant window can imitate the template.

use patchalign::{AlignConfig, Aligner, RasterImage, Rect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn noise(x: i32, y: i32) -> u32 {
    let mut h = (x as u32).wrapping_mul(0x9E37_79B1) ^ (y as u32).wrapping_mul(0x85EB_CA77);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}

/// Blurred-noise texture over the whole plane; safe to sample anywhere.
fn textured(x: i32, y: i32) -> u8 {
    let mut sum: i32 = 0;
    for j in -4..=4 {
        for i in -4..=4 {
            sum += (noise(x + i, y + j) & 0xFF) as i32;
        }
    }
    let q = (sum - 10327) * 45 / 665;
    (q + 128).clamp(0, 255) as u8
}

/// Renders the texture into an RGBA image, sampling from `(shift_x,
/// shift_y)`: the template region of an unshifted reference reappears in a
/// shifted rendering at `region - shift`.
fn textured_image(width: u32, height: u32, shift_x: i32, shift_y: i32) -> RasterImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let v = textured(x + shift_x, y + shift_y);
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    RasterImage::new(data, width, height, 4).unwrap()
}

fn solid_rgb(width: u32, height: u32, value: u8) -> Vec<u8> {
    vec![value; (width * height * 3) as usize]
}

/// Paints a dark square into a solid RGB buffer.
fn paint_square(data: &mut [u8], img_width: u32, x: u32, y: u32, size: u32, value: u8) {
    for row in y..y + size {
        for col in x..x + size {
            let idx = ((row * img_width + col) * 3) as usize;
            data[idx..idx + 3].copy_from_slice(&[value, value, value]);
        }
    }
}

fn region() -> Rect {
    Rect::new(30, 30, 40, 40).unwrap()
}

#[test]
fn recovers_exact_shift_on_textured_content() {
    let reference = textured_image(140, 140, 0, 0);

    // Target content equals the reference content shifted by (6, -5): the
    // template region reappears at placement (36, 25).
    let target = textured_image(140, 140, -6, 5);

    let result = Aligner::new(&reference, region()).align(&target);
    assert!(result.score >= 0.99, "score {}", result.score);
    assert_eq!((result.dx, result.dy), (-6, 5));
}

#[test]
fn recovers_shift_under_mild_noise() {
    let reference = textured_image(140, 140, 0, 0);

    let clean = textured_image(140, 140, -6, 5);
    let mut rng = StdRng::seed_from_u64(99);
    let noisy: Vec<u8> = clean
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i % 4 == 3 {
                v // alpha untouched
            } else {
                (v as i16 + rng.random_range(-4i16..=4)).clamp(0, 255) as u8
            }
        })
        .collect();
    let target = RasterImage::new(noisy, 140, 140, 4).unwrap();

    let result = Aligner::new(&reference, region()).align(&target);
    assert!(result.score >= 0.9, "score {}", result.score);
    assert!((result.dx - (-6)).abs() <= 1, "dx {}", result.dx);
    assert!((result.dy - 5).abs() <= 1, "dy {}", result.dy);
}

#[test]
fn translates_between_image_origins() {
    // Identical content, but the target layer sits at a different origin in
    // the shared space; the reported shift must cancel that origin delta.
    let reference = textured_image(140, 140, 0, 0);
    let shifted_origin = RasterImage::with_origin(
        textured_image(140, 140, 0, 0).as_slice().to_vec(),
        140,
        140,
        4,
        (9, -6),
    )
    .unwrap();

    let result = Aligner::new(&reference, region()).align(&shifted_origin);
    assert!(result.score >= 0.99, "score {}", result.score);
    assert_eq!((result.dx, result.dy), (-9, 6));
}

#[test]
fn solid_patch_with_inset_square_scenario() {
    // 10x10 template over a light background with a 3x3 dark square inset
    // at (4, 4); the target has the same composition displaced so that the
    // reported shift is (7, -3).
    let template_region = Rect::new(47, 45, 10, 10).unwrap();

    let mut ref_data = solid_rgb(80, 80, 200);
    paint_square(&mut ref_data, 80, 47 + 4, 45 + 4, 3, 30);
    let reference = RasterImage::new(ref_data, 80, 80, 3).unwrap();

    let mut tgt_data = solid_rgb(80, 80, 200);
    paint_square(&mut tgt_data, 80, 40 + 4, 48 + 4, 3, 30);
    let target = RasterImage::new(tgt_data, 80, 80, 3).unwrap();

    let result = Aligner::new(&reference, template_region).align(&target);
    assert!(result.score >= 0.95, "score {}", result.score);
    assert_eq!((result.dx, result.dy), (7, -3));
}

#[test]
fn offset_beyond_radius_stays_inside_the_window() {
    let cfg = AlignConfig {
        search_radius: 20,
        ..AlignConfig::default()
    };
    let reference = textured_image(300, 300, 0, 0);
    let template_region = Rect::new(130, 130, 40, 40).unwrap();

    // True best placement is 80px away, far outside the 20px radius.
    let target = textured_image(300, 300, -80, 0);

    let result = Aligner::new(&reference, template_region)
        .with_config(cfg)
        .align(&target);
    let bound = (cfg.search_radius + cfg.coarse_step / 2) as i32;
    assert!(result.dx.abs() <= bound, "dx {}", result.dx);
    assert!(result.dy.abs() <= bound, "dy {}", result.dy);
}

#[test]
fn unreadable_template_yields_zero_sentinel() {
    let reference = textured_image(40, 40, 0, 0);
    let target = textured_image(140, 140, 0, 0);

    // Region extends past the reference image.
    let aligner = Aligner::new(&reference, region());
    assert!(!aligner.has_template());

    let result = aligner.align(&target);
    assert_eq!((result.dx, result.dy, result.score), (0, 0, 0.0));
}

#[test]
fn target_smaller_than_template_is_undeterminable() {
    let reference = textured_image(140, 140, 0, 0);
    let target = textured_image(16, 16, 0, 0);

    let result = Aligner::new(&reference, region()).align(&target);
    assert_eq!((result.dx, result.dy, result.score), (0, 0, -1.0));
}

#[test]
fn config_validation_catches_bad_ranges() {
    assert!(AlignConfig::default().validate().is_ok());
    assert!(AlignConfig {
        search_radius: 0,
        ..AlignConfig::default()
    }
    .validate()
    .is_err());
    assert!(AlignConfig {
        coarse_step: 0,
        ..AlignConfig::default()
    }
    .validate()
    .is_err());
    assert!(AlignConfig {
        min_overlap: 1.5,
        ..AlignConfig::default()
    }
    .validate()
    .is_err());
}
