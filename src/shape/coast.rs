use rayon::prelude::*;

use crate::grid::Grid;

/// Band around the nominal coastline that gets smoothed, as a fraction of the radius.
const COASTAL_RANGE: f64 = 0.3;
/// Blend weight of the smoothed value right on the nominal coastline.
const MAX_BLEND: f64 = 0.6;
const KERNEL_RADIUS: i64 = 2;

/// 5x5 kernel, weight `exp(-0.5 * d)` for offset distance `d`.
fn kernel() -> [[f64; 5]; 5] {
    let mut k = [[0.0; 5]; 5];
    for (ky, row) in k.iter_mut().enumerate() {
        for (kx, w) in row.iter_mut().enumerate() {
            let dx = kx as f64 - KERNEL_RADIUS as f64;
            let dy = ky as f64 - KERNEL_RADIUS as f64;
            *w = (-(dx * dx + dy * dy).sqrt() * 0.5).exp();
        }
    }
    k
}

/// Soften the ring of cells within `0.3 * base_radius` of the nominal coastline.
///
/// Per-cell radius perturbation leaves angular banding along the shore; a local
/// weighted average, blended in proportion to closeness to the coastline, removes it.
/// Reads only pre-pass values. Border rows/columns are left as they are.
pub fn smooth_coast(grid: &mut Grid<f64>, center: f64, base_radius: f64) {
    let size = grid.size();
    if size < 3 {
        return;
    }
    let range = base_radius * COASTAL_RANGE;
    let kernel = kernel();
    let src = grid.clone();

    grid.data
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            if y == 0 || y == size - 1 {
                return;
            }
            for x in 1..size - 1 {
                let distance = (x as f64 - center).hypot(y as f64 - center);
                let from_coast = (distance - base_radius).abs();
                if from_coast >= range {
                    continue;
                }

                let mut sum = 0.0;
                let mut weight = 0.0;
                for ky in -KERNEL_RADIUS..=KERNEL_RADIUS {
                    for kx in -KERNEL_RADIUS..=KERNEL_RADIUS {
                        let nx = x as i64 + kx;
                        let ny = y as i64 + ky;
                        if nx < 0 || ny < 0 || nx >= size as i64 || ny >= size as i64 {
                            continue;
                        }
                        let w = kernel[(ky + KERNEL_RADIUS) as usize][(kx + KERNEL_RADIUS) as usize];
                        sum += src.get(nx as usize, ny as usize) * w;
                        weight += w;
                    }
                }

                let blend = (1.0 - from_coast / range) * MAX_BLEND;
                row[x] = src.get(x, y) * (1.0 - blend) + (sum / weight) * blend;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_grid(size: usize, center: f64, radius: f64) -> Grid<f64> {
        let mut g = Grid::square(size);
        for y in 0..size {
            for x in 0..size {
                let d = (x as f64 - center).hypot(y as f64 - center);
                g.set(x, y, if d <= radius { 1.0 } else { -1.0 });
            }
        }
        g
    }

    #[test]
    fn far_cells_are_untouched() {
        let before = step_grid(64, 32.0, 20.0);
        let mut after = before.clone();
        smooth_coast(&mut after, 32.0, 20.0);
        assert_eq!(after.get(32, 32), before.get(32, 32));
        assert_eq!(after.get(2, 2), before.get(2, 2));
        assert_eq!(after.get(0, 32), before.get(0, 32));
    }

    #[test]
    fn shoreline_step_is_softened() {
        let before = step_grid(64, 32.0, 20.0);
        let mut after = before.clone();
        smooth_coast(&mut after, 32.0, 20.0);
        // (52, 32) sits exactly on the nominal coastline, just inside the land step.
        let v = after.get(52, 32);
        assert!(v < 1.0 && v > -1.0, "v={v}");
        // Smoothing never overshoots the input range.
        assert!(after.data.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn constant_field_is_fixed_point() {
        let mut g = Grid::filled(32, 0.25);
        smooth_coast(&mut g, 16.0, 10.0);
        assert!(g.data.iter().all(|v| (v - 0.25).abs() < 1e-12));
    }

    #[test]
    fn tiny_grids_are_noops() {
        let mut g = Grid::filled(2, 0.5);
        smooth_coast(&mut g, 1.0, 0.8);
        assert_eq!(g, Grid::filled(2, 0.5));
    }
}
