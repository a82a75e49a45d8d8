use std::sync::Arc;

use log::info;

use crate::config::Params;
use crate::generate;
use crate::grid::Grid;

/// One lookup's result. `params` carries the resolved seed the grid was built with.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub params: Params,
    pub size: usize,
    pub grid: Arc<Grid<f64>>,
    pub regenerated: bool,
}

/// Memoizes the last generated grid.
///
/// A request reuses the cached grid only when its size is identical and its
/// parameters match within [`crate::config::PARAM_EPSILON`]. Seed 0 is resolved to
/// a fresh random seed before the comparison, so "random" requests always regenerate.
#[derive(Default)]
pub struct TerrainCache {
    last: Option<Snapshot>,
}

impl TerrainCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_generate(&mut self, params: &Params, size: usize) -> Snapshot {
        self.get_or_generate_with(params, size, &mut rand::thread_rng())
    }

    /// As [`TerrainCache::get_or_generate`], drawing random seeds from `rng`.
    pub fn get_or_generate_with<R: rand::Rng>(
        &mut self,
        params: &Params,
        size: usize,
        rng: &mut R,
    ) -> Snapshot {
        let resolved = self.resolve_seed(params, rng);

        if let Some(last) = &self.last {
            if last.size == size && last.params.matches(&resolved) {
                info!("terrain cache hit: seed={} size={}", last.params.seed, size);
                return Snapshot {
                    regenerated: false,
                    ..last.clone()
                };
            }
        }

        info!("terrain cache miss: generating seed={} size={}", resolved.seed, size);
        let grid = Arc::new(generate(&resolved, size));
        let snapshot = Snapshot {
            params: resolved,
            size,
            grid,
            regenerated: true,
        };
        self.last = Some(snapshot.clone());
        snapshot
    }

    /// Seed 0 becomes a random seed distinct from the cached one.
    fn resolve_seed<R: rand::Rng>(&self, params: &Params, rng: &mut R) -> Params {
        if params.seed != 0 {
            return params.clone();
        }
        let cached_seed = self.last.as_ref().map(|s| s.params.seed);
        loop {
            let candidate = params.with_resolved_seed(rng);
            if Some(candidate.seed) != cached_seed {
                return candidate;
            }
        }
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(seed: u32) -> Params {
        Params {
            seed,
            ..Params::default()
        }
    }

    #[test]
    fn identical_request_reuses_grid() {
        let mut cache = TerrainCache::new();
        let first = cache.get_or_generate(&fixed(42), 32);
        let second = cache.get_or_generate(&fixed(42), 32);
        assert!(first.regenerated);
        assert!(!second.regenerated);
        assert!(Arc::ptr_eq(&first.grid, &second.grid));
    }

    #[test]
    fn tiny_float_drift_still_hits() {
        let mut cache = TerrainCache::new();
        cache.get_or_generate(&fixed(42), 32);
        let drifted = Params {
            island_size: 0.4 + 0.0004,
            ..fixed(42)
        };
        assert!(!cache.get_or_generate(&drifted, 32).regenerated);
    }

    #[test]
    fn any_real_change_regenerates() {
        let mut cache = TerrainCache::new();
        cache.get_or_generate(&fixed(42), 32);
        let changed = Params {
            island_size: 0.45,
            ..fixed(42)
        };
        assert!(cache.get_or_generate(&changed, 32).regenerated);
        assert!(cache.get_or_generate(&changed, 33).regenerated);
        assert!(cache.get_or_generate(&fixed(43), 33).regenerated);
    }

    #[test]
    fn random_seed_always_regenerates() {
        let mut cache = TerrainCache::new();
        let a = cache.get_or_generate(&fixed(0), 24);
        let b = cache.get_or_generate(&fixed(0), 24);
        assert!(a.regenerated && b.regenerated);
        assert_ne!(a.params.seed, 0);
        assert_ne!(a.params.seed, b.params.seed);
    }

    #[test]
    fn resolved_seed_can_be_replayed() {
        let mut cache = TerrainCache::new();
        let random = cache.get_or_generate(&fixed(0), 24);
        let replay = cache.get_or_generate(&fixed(random.params.seed), 24);
        assert!(!replay.regenerated);
        assert_eq!(*replay.grid, generate(&random.params, 24));
    }

    #[test]
    fn invalidate_forces_regeneration() {
        let mut cache = TerrainCache::new();
        cache.get_or_generate(&fixed(5), 16);
        cache.invalidate();
        assert!(cache.last().is_none());
        assert!(cache.get_or_generate(&fixed(5), 16).regenerated);
    }
}
