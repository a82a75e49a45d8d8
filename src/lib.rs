pub mod cache;
pub mod config;
pub mod erosion;
pub mod features;
pub mod grid;
pub mod noise;
pub mod normalize;
pub mod render;
pub mod rng;
pub mod shape;

use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use config::Params;
use grid::Grid;
use noise::perlin_noise;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Generate a `size` x `size` elevation grid.
///
/// Pure function of `(params, size)`: the seed is used as-is, so callers that want
/// seed 0 to mean "random" resolve it first (see [`cache::TerrainCache`]).
/// Parameters are assumed to be in range (see [`Params::validate`]).
pub fn generate(params: &Params, size: usize) -> Grid<f64> {
    generate_timed(params, size).0
}

/// [`generate`] plus wall-clock timings per pipeline stage.
pub fn generate_timed(params: &Params, size: usize) -> (Grid<f64>, Vec<Timing>) {
    assert!(size >= 1, "grid size must be at least 1");
    let mut timings = Vec::new();
    let total_start = Instant::now();
    let mut height = Grid::square(size);

    // 1. Base fractal noise
    stage(&mut timings, "base_noise", || fill_base_noise(&mut height, params));

    // 2. Land/water shape
    stage(&mut timings, "shape", || shape::carve(&mut height, params));

    // 3. Mountains, then erosion, then valleys and lakes cut into the smoothed field
    stage(&mut timings, "mountains", || {
        features::add_mountains(&mut height, params)
    });
    stage(&mut timings, "erosion", || {
        erosion::erode(&mut height, params.erosion_iterations)
    });
    stage(&mut timings, "valleys", || {
        features::carve_valleys(&mut height, params)
    });
    stage(&mut timings, "lakes", || {
        let placed = features::add_lakes(&mut height, params);
        debug!("lakes: {placed} of {} placed", params.lake_count);
    });
    stage(&mut timings, "rivers", || {
        let carved = features::carve_rivers(&mut height, params);
        debug!("rivers: {carved} of {} carved", params.river_count);
    });

    // 4. Range policy
    stage(&mut timings, "normalize", || {
        normalize::normalize(&mut height);
    });

    debug_assert!(height.all_finite(), "non-finite elevation produced");

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    (height, timings)
}

fn stage(timings: &mut Vec<Timing>, name: &'static str, f: impl FnOnce()) {
    let t = Instant::now();
    f();
    let ms = t.elapsed().as_secs_f64() * 1000.0;
    debug!("{name}: {ms:.1} ms");
    timings.push(Timing { name, ms });
}

/// Seed the grid with fractal noise sampled at `noise_scale` lattice cells per side.
fn fill_base_noise(height: &mut Grid<f64>, params: &Params) {
    let size = height.size();
    height
        .data
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            let ny = y as f64 / size as f64 * params.noise_scale;
            for (x, cell) in row.iter_mut().enumerate() {
                let nx = x as f64 / size as f64 * params.noise_scale;
                *cell = perlin_noise(nx, ny, params.persistence, params.noise_octaves, params.seed);
            }
        });
}
