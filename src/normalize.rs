use log::debug;
use rayon::prelude::*;

use crate::grid::Grid;

/// Dynamic range above which the field is considered pathological and rescaled.
pub const RANGE_THRESHOLD: f64 = 3.0;

/// Rescale into [-1, 1] only when `max - min > 3.0`.
///
/// Under the threshold the grid is left bit-for-bit unchanged. A constant field has
/// zero range and is never divided. Returns whether it rescaled.
pub fn normalize(grid: &mut Grid<f64>) -> bool {
    let (min, max) = grid.min_max();
    let range = max - min;
    if !(range > RANGE_THRESHOLD) {
        debug!("normalize: range {range:.3} within threshold, left as-is");
        return false;
    }
    debug!("normalize: rescaling [{min:.3}, {max:.3}] to [-1, 1]");
    grid.data
        .par_iter_mut()
        .for_each(|v| *v = (*v - min) / range * 2.0 - 1.0);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_threshold_is_exact_noop() {
        let mut g = Grid::square(8);
        for (i, v) in g.data.iter_mut().enumerate() {
            *v = -1.4 + i as f64 * 0.045;
        }
        let before = g.clone();
        assert!(!normalize(&mut g));
        assert_eq!(g, before);
    }

    #[test]
    fn range_exactly_at_threshold_is_noop() {
        let mut g = Grid::filled(4, 0.0);
        g.set(0, 0, -1.5);
        g.set(3, 3, 1.5);
        let before = g.clone();
        assert!(!normalize(&mut g));
        assert_eq!(g, before);
    }

    #[test]
    fn wide_range_is_rescaled() {
        let mut g = Grid::filled(4, 0.5);
        g.set(0, 0, -2.8);
        g.set(1, 0, 1.7);
        assert!(normalize(&mut g));
        assert_eq!(g.get(0, 0), -1.0);
        assert_eq!(g.get(1, 0), 1.0);
        assert!(g.data.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn constant_field_is_left_alone() {
        let mut g = Grid::filled(6, 7.25);
        assert!(!normalize(&mut g));
        assert!(g.data.iter().all(|&v| v == 7.25));
    }
}
