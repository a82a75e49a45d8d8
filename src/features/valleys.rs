use rayon::prelude::*;

use crate::config::Params;
use crate::grid::Grid;
use crate::noise::perlin_noise;
use crate::rng::derive;

pub const SEED_VALLEYS: u32 = 200;
/// Cells at or below this are beach or water and are never carved.
pub const VALLEY_MIN_ELEVATION: f64 = 0.1;
/// Lowest value a valley cut can reach; valleys never turn land into water.
pub const VALLEY_FLOOR: f64 = 0.05;

const VALLEY_FREQUENCY: f64 = 1.5;
const VALLEY_PERSISTENCE: f64 = 0.5;
const VALLEY_OCTAVES: u32 = 3;
const VALLEY_GAIN: f64 = 0.5;

/// Cut valleys with the negative half of multi-octave noise. Octave `o` uses stream
/// `seed + 200 + o`, frequency doubles and amplitude decays by `persistence`.
pub fn carve_valleys(grid: &mut Grid<f64>, params: &Params) {
    let size = grid.size();
    if params.valley_depth <= 0.0 {
        return;
    }
    let base = params.noise_scale * VALLEY_FREQUENCY / size as f64;

    grid.data
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                let mut frequency = 1.0;
                let mut amplitude = 1.0;
                for octave in 0..params.noise_octaves {
                    if *cell <= VALLEY_MIN_ELEVATION {
                        break;
                    }
                    let f = base * frequency;
                    let n = perlin_noise(
                        x as f64 * f,
                        y as f64 * f,
                        VALLEY_PERSISTENCE,
                        VALLEY_OCTAVES,
                        derive(params.seed, SEED_VALLEYS + octave),
                    );
                    if n < 0.0 {
                        let cut = n * amplitude * params.valley_depth * VALLEY_GAIN;
                        *cell = (*cell + cut).max(VALLEY_FLOOR);
                    }
                    frequency *= 2.0;
                    amplitude *= params.persistence;
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deep() -> Params {
        Params {
            seed: 3,
            valley_depth: 1.0,
            ..Params::default()
        }
    }

    #[test]
    fn beaches_and_water_are_not_carved() {
        let mut g = Grid::filled(32, VALLEY_MIN_ELEVATION);
        g.set(5, 5, -0.7);
        let before = g.clone();
        carve_valleys(&mut g, &deep());
        assert_eq!(g, before);
    }

    #[test]
    fn valleys_only_lower_and_respect_floor() {
        let mut g = Grid::filled(64, 0.6);
        carve_valleys(&mut g, &deep());
        assert!(g.data.iter().all(|&v| v <= 0.6 && v >= VALLEY_FLOOR));
        assert!(g.data.iter().any(|&v| v < 0.6));
    }

    #[test]
    fn zero_depth_is_noop() {
        let p = Params {
            valley_depth: 0.0,
            ..deep()
        };
        let mut g = Grid::filled(16, 0.5);
        carve_valleys(&mut g, &p);
        assert_eq!(g, Grid::filled(16, 0.5));
    }
}
