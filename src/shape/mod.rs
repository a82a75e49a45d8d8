pub mod coast;
pub mod voronoi;

use rayon::prelude::*;

use crate::config::{Params, ShapeMode, TerrainType};
use crate::grid::Grid;
use crate::noise::perlin_noise;
use crate::rng::derive;

pub use voronoi::{VORONOI_POINTS, VoronoiSeed, voronoi_influence, voronoi_seeds};

pub const SEED_FILLED: u32 = 1;
pub const SEED_BEACH: u32 = 20;
pub const SEED_ARCHIPELAGO: u32 = 50;

/// Coastline perturbation layers: (seed offset, frequency, persistence, octaves, weight).
const COAST_LAYERS: [(u32, f64, f64, u32, f64); 3] = [
    (10, 0.01, 0.5, 3, 0.4),
    (11, 0.005, 0.6, 2, 0.3),
    (12, 0.02, 0.4, 2, 0.3),
];
const COAST_AMPLITUDE: f64 = 0.25;

const WATER_SURFACE: f64 = -0.8;
const WATER_MAX_EXTRA_DEPTH: f64 = 2.0;
/// Distance past the coast (as a fraction of grid size) over which depth grows by 0.5.
const WATER_DEPTH_RAMP: f64 = 0.1;

const BEACH_HEIGHT: f64 = 0.05;
const BEACH_NOISE: f64 = 0.1;
const BEACH_FREQUENCY: f64 = 0.05;
const BEACH_BLEND: f64 = 0.5;

const FILLED_LAND: f64 = 0.3;
const FILLED_WOBBLE: f64 = 0.15;

const ARCHIPELAGO_FREQUENCY: f64 = 3.0;
const ARCHIPELAGO_RAMP: f64 = 0.2;
const ARCHIPELAGO_SHALLOWS: f64 = -0.3;

/// Nominal island geometry for one run.
#[derive(Clone, Copy, Debug)]
pub struct Island {
    pub center: f64,
    pub base_radius: f64,
}

impl Island {
    pub fn new(size: usize, params: &Params) -> Self {
        Self {
            center: (size / 2) as f64,
            base_radius: size as f64 * params.island_size * (1.0 - params.water_level),
        }
    }
}

/// Turn the base noise field into land and water according to the shape mode.
pub fn carve(grid: &mut Grid<f64>, params: &Params) {
    match params.shape_mode {
        ShapeMode::Filled => fill_land(grid, params),
        ShapeMode::Organic => {
            let island = Island::new(grid.size(), params);
            carve_island(grid, params, island);
            coast::smooth_coast(grid, island.center, island.base_radius);
        }
    }
}

/// Filled mode: every cell is land, base noise damped to a small wobble.
fn fill_land(grid: &mut Grid<f64>, params: &Params) {
    let size = grid.size();
    let wobble_seed = derive(params.seed, SEED_FILLED);

    grid.data
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            let ny = y as f64 / size as f64 * params.noise_scale;
            for (x, cell) in row.iter_mut().enumerate() {
                let nx = x as f64 / size as f64 * params.noise_scale;
                let wobble = perlin_noise(nx, ny, params.persistence, 2, wobble_seed);
                *cell = FILLED_LAND + (0.6 * *cell + 0.4 * wobble) * FILLED_WOBBLE;
            }
        });
}

fn carve_island(grid: &mut Grid<f64>, params: &Params, island: Island) {
    let size = grid.size();
    let seeds = voronoi_seeds(params.seed, island.center, island.base_radius, VORONOI_POINTS);
    let depth_ramp = size as f64 * WATER_DEPTH_RAMP;

    grid.data
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            let fy = y as f64;
            for (x, cell) in row.iter_mut().enumerate() {
                let fx = x as f64;
                let distance = (fx - island.center).hypot(fy - island.center);

                let coast_noise: f64 = COAST_LAYERS
                    .iter()
                    .map(|&(offset, freq, persistence, octaves, weight)| {
                        perlin_noise(fx * freq, fy * freq, persistence, octaves, derive(params.seed, offset))
                            * weight
                    })
                    .sum::<f64>()
                    * params.coastline_roughness;
                let influence = voronoi_influence(fx, fy, &seeds);
                let effective_radius = (island.base_radius
                    * (1.0 + coast_noise * COAST_AMPLITUDE + influence))
                    .max(f64::EPSILON);

                *cell = if distance > effective_radius {
                    open_water(distance - effective_radius, depth_ramp)
                } else {
                    land(*cell, fx, fy, distance, effective_radius, size, params)
                };
            }
        });
}

/// Open water: -0.8 at the shoreline, deepening with distance, at most -2.8.
#[inline]
fn open_water(past_coast: f64, depth_ramp: f64) -> f64 {
    WATER_SURFACE - (past_coast / depth_ramp * 0.5).min(WATER_MAX_EXTRA_DEPTH)
}

/// Land: base noise lifted by a terrain-shaped falloff from the island interior,
/// then blended toward beach height inside the beach band.
fn land(
    base: f64,
    x: f64,
    y: f64,
    distance: f64,
    effective_radius: f64,
    size: usize,
    params: &Params,
) -> f64 {
    let terrain = params.terrain_type;
    let interior = 1.0 - distance / effective_radius;
    let mut lift = interior.powf(terrain.falloff_power()) * terrain.height_scale();

    if terrain == TerrainType::Archipelago {
        let f = ARCHIPELAGO_FREQUENCY / size as f64;
        let fragment = perlin_noise(x * f, y * f, 0.5, 3, derive(params.seed, SEED_ARCHIPELAGO));
        if fragment < 0.0 {
            return ARCHIPELAGO_SHALLOWS + fragment * 0.5;
        }
        lift *= (fragment / ARCHIPELAGO_RAMP).min(1.0);
    }

    let mut value = base + lift;

    let band = params.beach_width * effective_radius;
    let inner = effective_radius - band;
    if band > 0.0 && distance > inner {
        let proximity = (distance - inner) / band;
        let w = proximity * BEACH_BLEND;
        let sand = BEACH_HEIGHT
            + perlin_noise(
                x * BEACH_FREQUENCY,
                y * BEACH_FREQUENCY,
                0.6,
                2,
                derive(params.seed, SEED_BEACH),
            ) * BEACH_NOISE;
        value = value * (1.0 - w) + sand * w;
    }

    value
}
