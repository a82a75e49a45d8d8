use std::mem;

use rayon::prelude::*;

use crate::grid::Grid;

/// Weight a cell keeps of its own value each pass; the rest comes from the mean of
/// its four orthogonal neighbors.
const SELF_WEIGHT: f64 = 0.5;

/// Run `iterations` passes of 4-neighbor local averaging over the whole grid.
///
/// Every pass reads only pre-pass values (double-buffered). Border rows and columns
/// are never written. Water cells are averaged exactly like land, so each pass also
/// softens the coastline.
pub fn erode(grid: &mut Grid<f64>, iterations: u32) {
    if grid.size() < 3 || iterations == 0 {
        return;
    }
    let mut back = grid.clone();
    for _ in 0..iterations {
        erode_into(grid, &mut back);
        mem::swap(grid, &mut back);
    }
}

/// One pass from `src` into `dst`. Both grids must share borders, which this leaves alone.
fn erode_into(src: &Grid<f64>, dst: &mut Grid<f64>) {
    let size = src.size();
    dst.data
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(y, row)| {
            if y == 0 || y == size - 1 {
                return;
            }
            for x in 1..size - 1 {
                let mean = src.neighbor_sum4(x, y) / 4.0;
                row[x] = src.get(x, y) * SELF_WEIGHT + mean * (1.0 - SELF_WEIGHT);
            }
        });
}
