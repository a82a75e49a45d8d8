use std::f64::consts::PI;

use crate::rng::{derive, lattice_value};

/// Hash-based lattice value in (-1, 1] for integer coordinates.
#[inline]
pub fn smooth_noise(ix: i32, iy: i32, seed: u32) -> f64 {
    lattice_value(ix, iy, seed)
}

/// Cosine-eased blend: `0.5 * (1 - cos(pi * t))` as the weight of `b`.
#[inline]
pub fn cosine_interpolate(a: f64, b: f64, t: f64) -> f64 {
    let f = (1.0 - (t * PI).cos()) * 0.5;
    a * (1.0 - f) + b * f
}

/// Continuous value noise: the four surrounding lattice values blended on both axes.
#[inline]
pub fn interpolated_noise(x: f64, y: f64, seed: u32) -> f64 {
    let fx0 = x.floor();
    let fy0 = y.floor();
    let ix = fx0 as i32;
    let iy = fy0 as i32;
    let fx = x - fx0;
    let fy = y - fy0;

    let v00 = smooth_noise(ix, iy, seed);
    let v10 = smooth_noise(ix.wrapping_add(1), iy, seed);
    let v01 = smooth_noise(ix, iy.wrapping_add(1), seed);
    let v11 = smooth_noise(ix.wrapping_add(1), iy.wrapping_add(1), seed);

    let top = cosine_interpolate(v00, v10, fx);
    let bottom = cosine_interpolate(v01, v11, fx);
    cosine_interpolate(top, bottom, fy)
}

/// Fractal value noise. Octave `i` samples at frequency `2^i` with seed `seed + i`
/// and weight `persistence^i`; the sum is divided by the total weight, so the result
/// stays in [-1, 1] for any octave count.
pub fn perlin_noise(x: f64, y: f64, persistence: f64, octaves: u32, seed: u32) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut max_value = 0.0;

    for i in 0..octaves {
        total += interpolated_noise(x * frequency, y * frequency, derive(seed, i)) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value > 0.0 { total / max_value } else { 0.0 }
}
