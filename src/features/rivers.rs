use crate::config::Params;
use crate::grid::Grid;
use crate::rng::Rng;

pub const SEED_RIVERS: u32 = 400;
/// Rivers only start on land above this elevation.
const RIVER_SOURCE_MIN: f64 = 0.2;
const RIVER_CUT: f64 = 0.05;
const RIVER_BED: f64 = 0.02;

const NEIGHBORS8: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Draw `river_count` sources from the `seed + 400` stream and carve a river from
/// each source that sits high enough. Returns the number of rivers carved.
pub fn carve_rivers(grid: &mut Grid<f64>, params: &Params) -> usize {
    let size = grid.size();
    if size == 0 {
        return 0;
    }
    let mut rng = Rng::stream(params.seed, SEED_RIVERS);
    let mut carved = 0;
    for _ in 0..params.river_count {
        let x = rng.range_usize(size);
        let y = rng.range_usize(size);
        if grid.get(x, y) > RIVER_SOURCE_MIN {
            carve_river(grid, x, y, &mut rng);
            carved += 1;
        }
    }
    carved
}

/// Walk downhill from (x, y) for at most `size` steps, lowering each visited cell.
/// Stops at the grid border or on water. When no neighbor is lower the walk takes
/// a random step. Returns the number of cells lowered.
pub fn carve_river(grid: &mut Grid<f64>, x: usize, y: usize, rng: &mut Rng) -> usize {
    let size = grid.size() as i64;
    let (mut x, mut y) = (x as i64, y as i64);
    let mut lowered = 0;

    for _ in 0..size {
        if x < 1 || y < 1 || x >= size - 1 || y >= size - 1 {
            break;
        }
        let v = grid.get(x as usize, y as usize);
        if v <= 0.0 {
            break;
        }
        let cut = (v - RIVER_CUT).max(RIVER_BED.min(v));
        grid.set(x as usize, y as usize, cut);
        lowered += 1;

        let mut best = (x, y);
        let mut lowest = cut;
        for (dx, dy) in NEIGHBORS8 {
            let (nx, ny) = (x + dx, y + dy);
            let h = grid.get(nx as usize, ny as usize);
            if h < lowest {
                lowest = h;
                best = (nx, ny);
            }
        }

        if best == (x, y) {
            x += rng.range_inclusive(-1, 1);
            y += rng.range_inclusive(-1, 1);
        } else {
            (x, y) = best;
        }
    }
    lowered
}
