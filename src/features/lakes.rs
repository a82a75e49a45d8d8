use crate::config::Params;
use crate::grid::{Grid, disc_bounds};
use crate::rng::Rng;

pub const SEED_LAKES: u32 = 300;
/// Lake bed elevation. Kept above zero so lakes read as inland water, not ocean.
pub const LAKE_FLOOR: f64 = 0.01;
/// Lakes only start on shallow land strictly inside this band.
pub const LAKE_BAND: (f64, f64) = (0.1, 0.4);

const LAKE_RADIUS: (i64, i64) = (10, 25);
/// Depression strength at the lake center; deeper than erosion would leave it.
const LAKE_DEPTH: f64 = 0.9;

/// Place up to `lake_count` lakes from the `seed + 300` stream. A candidate is
/// used only if its center cell lies in the shallow-land band. Returns how many
/// lakes were carved.
pub fn add_lakes(grid: &mut Grid<f64>, params: &Params) -> usize {
    let size = grid.size();
    if size == 0 {
        return 0;
    }
    let mut rng = Rng::stream(params.seed, SEED_LAKES);
    let mut placed = 0;
    for _ in 0..params.lake_count {
        let x = rng.range_usize(size);
        let y = rng.range_usize(size);
        let radius = rng.range_inclusive(LAKE_RADIUS.0, LAKE_RADIUS.1) as f64;

        let h = grid.get(x, y);
        if h > LAKE_BAND.0 && h < LAKE_BAND.1 {
            carve_lake(grid, x as f64, y as f64, radius);
            placed += 1;
        }
    }
    placed
}

/// Pull every cell within `radius` that is above the lake floor down toward it,
/// in proportion to closeness to the center. Affected cells end strictly lower
/// than they started and never below [`LAKE_FLOOR`].
pub fn carve_lake(grid: &mut Grid<f64>, cx: f64, cy: f64, radius: f64) {
    if radius <= 0.0 {
        return;
    }
    let (x0, x1, y0, y1) = disc_bounds(cx, cy, radius, grid.size());
    for y in y0..y1 {
        for x in x0..x1 {
            let d = (x as f64 - cx).hypot(y as f64 - cy);
            let v = grid.get(x, y);
            if d < radius && v > LAKE_FLOOR {
                let proximity = 1.0 - d / radius;
                grid.set(x, y, (v * (1.0 - proximity * LAKE_DEPTH)).max(LAKE_FLOOR));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lake_cells_sink_but_stay_above_floor() {
        let mut g = Grid::filled(64, 0.25);
        g.set(30, 30, 0.005);
        g.set(31, 30, -0.4);
        let before = g.clone();
        let p = Params {
            seed: 42,
            lake_count: 8,
            ..Params::default()
        };
        let placed = add_lakes(&mut g, &p);
        assert!(placed > 0);

        let mut affected = 0;
        for (old, new) in before.data.iter().zip(&g.data) {
            if old != new {
                affected += 1;
                assert!(*new >= LAKE_FLOOR);
                assert!(new < old);
            }
        }
        assert!(affected > 0);
        // Water and already-flooded cells keep their values.
        assert_eq!(g.get(31, 30), -0.4);
        assert_eq!(g.get(30, 30), 0.005);
    }

    #[test]
    fn center_reaches_near_floor() {
        let mut g = Grid::filled(40, 0.3);
        carve_lake(&mut g, 20.0, 20.0, 12.0);
        assert!((g.get(20, 20) - 0.03).abs() < 1e-12);
        assert_eq!(g.get(20, 33), 0.3);
    }

    #[test]
    fn candidates_outside_band_are_skipped() {
        let mut high = Grid::filled(32, 0.8);
        let p = Params {
            seed: 1,
            lake_count: 10,
            ..Params::default()
        };
        assert_eq!(add_lakes(&mut high, &p), 0);
        assert_eq!(high, Grid::filled(32, 0.8));
    }
}
