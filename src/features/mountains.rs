use rayon::prelude::*;

use crate::config::Params;
use crate::grid::{Grid, disc_bounds};
use crate::noise::perlin_noise;
use crate::rng::{Rng, derive};

pub const SEED_PEAKS: u32 = 100;
pub const SEED_RIDGES: u32 = 1000;

/// Peak radius as a fraction of grid size.
const PEAK_RADIUS: (f64, f64) = (0.10, 0.25);
const PEAK_HEIGHT: (f64, f64) = (0.4, 0.7);
const PEAK_FALLOFF: f64 = 1.5;

const RIDGE_FREQUENCY: f64 = 2.0;
const RIDGE_PERSISTENCE: f64 = 0.8;
const RIDGE_OCTAVES: u32 = 4;
const RIDGE_GAIN: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub height: f64,
}

/// Draw `count` peaks from the `seed + 100` stream.
pub fn place_peaks(seed: u32, size: usize, count: u32) -> Vec<Peak> {
    let mut rng = Rng::stream(seed, SEED_PEAKS);
    let s = size as f64;
    (0..count)
        .map(|_| Peak {
            x: rng.range_f64(0.0, s),
            y: rng.range_f64(0.0, s),
            radius: s * rng.range_f64(PEAK_RADIUS.0, PEAK_RADIUS.1),
            height: rng.range_f64(PEAK_HEIGHT.0, PEAK_HEIGHT.1),
        })
        .collect()
}

/// Add a `(1 - d/r)^1.5` bump to every land cell inside the peak's radius.
/// Water cells (<= 0) are never raised.
pub fn raise_peak(grid: &mut Grid<f64>, peak: &Peak) {
    if peak.radius <= 0.0 {
        return;
    }
    let (x0, x1, y0, y1) = disc_bounds(peak.x, peak.y, peak.radius, grid.size());
    for y in y0..y1 {
        for x in x0..x1 {
            let d = (x as f64 - peak.x).hypot(y as f64 - peak.y);
            let v = grid.get(x, y);
            if d < peak.radius && v > 0.0 {
                let falloff = (1.0 - d / peak.radius).powf(PEAK_FALLOFF);
                grid.set(x, y, v + peak.height * falloff);
            }
        }
    }
}

/// Multi-octave ridge texture on land. Only positive noise is kept, so ridges raise
/// terrain and never cut it. Octave `o` uses stream `seed + 1000 + o`.
pub fn add_ridges(grid: &mut Grid<f64>, params: &Params) {
    let size = grid.size();
    if params.mountain_intensity <= 0.0 {
        return;
    }
    let base = params.noise_scale * RIDGE_FREQUENCY / size as f64;

    grid.data
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                if *cell <= 0.0 {
                    continue;
                }
                let mut frequency = 1.0;
                let mut amplitude = 1.0;
                for octave in 0..params.noise_octaves {
                    let f = base * frequency;
                    let n = perlin_noise(
                        x as f64 * f,
                        y as f64 * f,
                        RIDGE_PERSISTENCE,
                        RIDGE_OCTAVES,
                        derive(params.seed, SEED_RIDGES + octave),
                    );
                    if n > 0.0 {
                        *cell += n * amplitude * params.mountain_intensity * RIDGE_GAIN;
                    }
                    frequency *= 2.0;
                    amplitude *= params.persistence;
                }
            }
        });
}

pub fn add_mountains(grid: &mut Grid<f64>, params: &Params) {
    for peak in place_peaks(params.seed, grid.size(), params.mountain_count) {
        raise_peak(grid, &peak);
    }
    add_ridges(grid, params);
}
