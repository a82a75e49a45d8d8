use std::f64::consts::TAU;

use crate::rng::Rng;

pub const SEED_VORONOI: u32 = 2;
pub const VORONOI_POINTS: usize = 8;

/// Bays pull the coastline in harder than peninsulas push it out.
const BAY_WEIGHT: f64 = 0.25;
const PENINSULA_WEIGHT: f64 = 0.2;
const DISTANCE_DECAY: f64 = 0.008;
const EDGE_SOFTNESS: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiSeed {
    pub x: f64,
    pub y: f64,
    pub is_bay: bool,
}

/// Seed points spread around the nominal coastline: evenly spaced angles plus up to
/// 0.5 rad of jitter, radius scaled by 0.8..1.2, bay or peninsula with equal odds.
pub fn voronoi_seeds(seed: u32, center: f64, base_radius: f64, count: usize) -> Vec<VoronoiSeed> {
    let mut rng = Rng::stream(seed, SEED_VORONOI);
    (0..count)
        .map(|i| {
            let angle = TAU / count as f64 * i as f64 + rng.next_f64() * 0.5;
            let radius = base_radius * rng.range_f64(0.8, 1.2);
            let is_bay = rng.chance(0.5);
            VoronoiSeed {
                x: center + angle.cos() * radius,
                y: center + angle.sin() * radius,
                is_bay,
            }
        })
        .collect()
}

/// Relative radius change at (x, y) from the nearest seed's cell. Negative inside
/// bay cells, positive inside peninsula cells. The tanh of the nearest/second-nearest
/// gap fades the effect to zero at cell borders, so there is no seam between cells.
pub fn voronoi_influence(x: f64, y: f64, seeds: &[VoronoiSeed]) -> f64 {
    let mut nearest = f64::INFINITY;
    let mut second = f64::INFINITY;
    let mut nearest_is_bay = false;

    for s in seeds {
        let d = (x - s.x).hypot(y - s.y);
        if d < nearest {
            second = nearest;
            nearest = d;
            nearest_is_bay = s.is_bay;
        } else if d < second {
            second = d;
        }
    }

    if !nearest.is_finite() {
        return 0.0;
    }

    let smooth = ((second - nearest) * EDGE_SOFTNESS).tanh();
    let influence = (-nearest * DISTANCE_DECAY).exp() * smooth;
    if nearest_is_bay {
        -influence * BAY_WEIGHT
    } else {
        influence * PENINSULA_WEIGHT
    }
}
