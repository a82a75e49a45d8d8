use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::grid::Grid;

// Grayscale band shades
pub const OCEAN: u8 = 0x14;
pub const RIVER: u8 = 0x27;
pub const VALLEY: u8 = 0x29;
pub const MOUNTAIN: u8 = 0x3C;
const MIDPOINT: u8 = (VALLEY + MOUNTAIN) / 2;

const RIVER_TOP: f64 = 0.05;
const VALLEY_TOP: f64 = 0.5;

#[inline]
fn lerp_gray(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (a as f64 + (b as f64 - a as f64) * t) as u8
}

/// Map an elevation to one of four grayscale bands. Ocean and river/lake are flat
/// shades; valleys and mountains ramp toward the valley/mountain midpoint.
pub fn height_to_gray(height: f64) -> u8 {
    if height < 0.0 {
        OCEAN
    } else if height < RIVER_TOP {
        RIVER
    } else if height < VALLEY_TOP {
        lerp_gray(VALLEY, MIDPOINT, height / VALLEY_TOP)
    } else {
        lerp_gray(MIDPOINT, MOUNTAIN, (height - VALLEY_TOP) / VALLEY_TOP)
    }
}

#[inline]
pub fn height_to_color(height: f64) -> [u8; 4] {
    let g = height_to_gray(height);
    [g, g, g, 255]
}

#[inline]
fn render_row(grid: &Grid<f64>, y: usize, row: &mut [u8]) {
    for (x, px) in row.chunks_exact_mut(4).enumerate() {
        px.copy_from_slice(&height_to_color(grid.get_clamped(x, y)));
    }
}

/// Colorize the grid into a `width` x `height` RGBA8 raster. Pixels past the grid's
/// last row/column repeat the edge cell. The grid must be non-empty.
pub fn render_map(grid: &Grid<f64>, width: usize, height: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; width * height * 4];
    if width == 0 {
        return rgba;
    }
    rgba.par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| render_row(grid, y, row));
    rgba
}

/// Like [`render_map`], but checks `cancel` before each row. Returns `None` if the
/// flag was raised at any point; the partial raster is discarded.
pub fn render_map_cancellable(
    grid: &Grid<f64>,
    width: usize,
    height: usize,
    cancel: &AtomicBool,
) -> Option<Vec<u8>> {
    let mut rgba = vec![0u8; width * height * 4];
    if width > 0 {
        rgba.par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(y, row)| {
                if !cancel.load(Ordering::Relaxed) {
                    render_row(grid, y, row);
                }
            });
    }
    if cancel.load(Ordering::Relaxed) {
        None
    } else {
        Some(rgba)
    }
}

/// Diagnostic: grayscale heightmap stretched from min to max, one pixel per cell.
pub fn render_heightmap(grid: &Grid<f64>) -> Vec<u8> {
    let (min_h, max_h) = grid.min_max();
    let range = (max_h - min_h).max(f64::EPSILON);
    let mut rgba = vec![0u8; grid.data.len() * 4];
    for (px, &v) in rgba.chunks_exact_mut(4).zip(&grid.data) {
        let g = ((v - min_h) / range * 255.0).clamp(0.0, 255.0) as u8;
        px.copy_from_slice(&[g, g, g, 255]);
    }
    rgba
}
