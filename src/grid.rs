/// Row-major flat grid. No per-cell objects.
/// Elevation grids are always square; `w == h == size`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn filled(size: usize, value: T) -> Self {
        Self {
            data: vec![value; size * size],
            w: size,
            h: size,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Clamp-to-edge read: coordinates past the last row/column read the edge cell.
    #[inline]
    pub fn get_clamped(&self, x: usize, y: usize) -> T {
        self.get(x.min(self.w - 1), y.min(self.h - 1))
    }
}

impl Grid<f64> {
    /// Sum of the four orthogonal neighbors. Caller guarantees (x, y) is interior.
    #[inline]
    pub fn neighbor_sum4(&self, x: usize, y: usize) -> f64 {
        self.get(x - 1, y) + self.get(x + 1, y) + self.get(x, y - 1) + self.get(x, y + 1)
    }

    /// (min, max) over all cells. Empty grids yield (+inf, -inf).
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Values of every cell not on row/column 0 or size-1.
    pub fn interior(&self) -> impl Iterator<Item = f64> + Clone + '_ {
        let (w, h) = (self.w, self.h);
        (1..h.saturating_sub(1))
            .flat_map(move |y| (1..w.saturating_sub(1)).map(move |x| self.get(x, y)))
    }
}

/// Population standard deviation.
pub fn std_dev(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count();
    if n == 0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let var = values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    var.sqrt()
}

/// Integer-coordinate bounding box of a disc, clipped to a `size`-wide grid.
/// Returns half-open ranges (x0..x1, y0..y1).
pub fn disc_bounds(cx: f64, cy: f64, radius: f64, size: usize) -> (usize, usize, usize, usize) {
    let clip = |v: f64| v.max(0.0).min(size as f64) as usize;
    (
        clip((cx - radius).floor()),
        clip((cx + radius).ceil() + 1.0),
        clip((cy - radius).floor()),
        clip((cy + radius).ceil() + 1.0),
    )
}
