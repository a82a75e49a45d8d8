use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest seed a caller can pick; random seeds are drawn from 1..=MAX_SEED.
pub const MAX_SEED: u32 = 99_999;

/// Epsilon for float fields when deciding whether a cached grid is still valid.
pub const PARAM_EPSILON: f64 = 0.001;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    /// Perturbed circular island surrounded by open water.
    #[default]
    Organic,
    /// Land everywhere, no coastline.
    Filled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TerrainType {
    #[default]
    Organic,
    Mountainous,
    Flat,
    Archipelago,
}

impl TerrainType {
    /// Exponent applied to the normalized distance-from-coast.
    pub fn falloff_power(self) -> f64 {
        match self {
            TerrainType::Organic => 1.8,
            TerrainType::Mountainous => 1.3,
            TerrainType::Flat => 1.0,
            TerrainType::Archipelago => 1.8,
        }
    }

    /// Peak land contribution at the island center.
    pub fn height_scale(self) -> f64 {
        match self {
            TerrainType::Organic => 0.7,
            TerrainType::Mountainous => 1.0,
            TerrainType::Flat => 0.35,
            TerrainType::Archipelago => 0.6,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("grid size must be at least 1")]
    EmptyGrid,
}

/// All tunable generation parameters. Immutable once a run starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub shape_mode: ShapeMode,
    /// 0 means "pick a fresh random seed" (see [`Params::with_resolved_seed`]).
    pub seed: u32,
    pub island_size: f64,
    pub mountain_intensity: f64,
    pub erosion_iterations: u32,
    pub noise_scale: f64,
    pub noise_octaves: u32,
    pub persistence: f64,

    // Coastline
    pub water_level: f64,
    pub beach_width: f64,
    pub coastline_roughness: f64,

    // Features
    pub mountain_count: u32,
    pub valley_depth: f64,
    pub lake_count: u32,
    pub river_count: u32,
    pub terrain_type: TerrainType,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            shape_mode: ShapeMode::Organic,
            seed: 0,
            island_size: 0.4,
            mountain_intensity: 0.5,
            erosion_iterations: 3,
            noise_scale: 4.0,
            noise_octaves: 4,
            persistence: 0.5,
            water_level: 0.0,
            beach_width: 0.25,
            coastline_roughness: 1.0,
            mountain_count: 5,
            valley_depth: 0.3,
            lake_count: 5,
            river_count: 0,
            terrain_type: TerrainType::Organic,
        }
    }
}

const FLOAT_RANGES: [(&str, f64, f64); 8] = [
    ("island_size", 0.2, 0.8),
    ("mountain_intensity", 0.0, 1.0),
    ("noise_scale", 1.0, 10.0),
    ("persistence", 0.2, 0.9),
    ("water_level", -0.3, 0.3),
    ("beach_width", 0.0, 0.5),
    ("coastline_roughness", 0.0, 2.0),
    ("valley_depth", 0.0, 1.0),
];

const COUNT_RANGES: [(&str, u32, u32); 6] = [
    ("seed", 0, MAX_SEED),
    ("erosion_iterations", 0, 10),
    ("noise_octaves", 1, 8),
    ("mountain_count", 0, 20),
    ("lake_count", 0, 20),
    ("river_count", 0, 20),
];

impl Params {
    /// Float fields in `FLOAT_RANGES` order.
    fn floats(&self) -> [f64; 8] {
        [
            self.island_size,
            self.mountain_intensity,
            self.noise_scale,
            self.persistence,
            self.water_level,
            self.beach_width,
            self.coastline_roughness,
            self.valley_depth,
        ]
    }

    fn floats_mut(&mut self) -> [&mut f64; 8] {
        [
            &mut self.island_size,
            &mut self.mountain_intensity,
            &mut self.noise_scale,
            &mut self.persistence,
            &mut self.water_level,
            &mut self.beach_width,
            &mut self.coastline_roughness,
            &mut self.valley_depth,
        ]
    }

    /// Integer fields in `COUNT_RANGES` order.
    fn counts(&self) -> [u32; 6] {
        [
            self.seed,
            self.erosion_iterations,
            self.noise_octaves,
            self.mountain_count,
            self.lake_count,
            self.river_count,
        ]
    }

    fn counts_mut(&mut self) -> [&mut u32; 6] {
        [
            &mut self.seed,
            &mut self.erosion_iterations,
            &mut self.noise_octaves,
            &mut self.mountain_count,
            &mut self.lake_count,
            &mut self.river_count,
        ]
    }

    /// Reject any field outside its documented closed range.
    pub fn validate(&self) -> Result<(), ParamError> {
        for ((name, min, max), value) in FLOAT_RANGES.into_iter().zip(self.floats()) {
            if !(min..=max).contains(&value) {
                return Err(ParamError::OutOfRange { name, value, min, max });
            }
        }
        for ((name, min, max), value) in COUNT_RANGES.into_iter().zip(self.counts()) {
            if !(min..=max).contains(&value) {
                return Err(ParamError::OutOfRange {
                    name,
                    value: value as f64,
                    min: min as f64,
                    max: max as f64,
                });
            }
        }
        Ok(())
    }

    /// Copy with every field clamped into range. NaN floats fall back to the default.
    pub fn clamped(&self) -> Params {
        let defaults = Params::default().floats();
        let mut out = self.clone();
        for (((_, min, max), v), default) in
            FLOAT_RANGES.into_iter().zip(out.floats_mut()).zip(defaults)
        {
            *v = if v.is_nan() { default } else { (*v).clamp(min, max) };
        }
        for ((_, min, max), v) in COUNT_RANGES.into_iter().zip(out.counts_mut()) {
            *v = (*v).clamp(min, max);
        }
        out
    }

    /// Resolve seed 0 to a random seed in 1..=MAX_SEED; other seeds are kept.
    pub fn with_resolved_seed<R: rand::Rng>(&self, rng: &mut R) -> Params {
        let mut out = self.clone();
        if out.seed == 0 {
            out.seed = rng.gen_range(1..=MAX_SEED);
        }
        out
    }

    /// Equality for cache purposes: floats within [`PARAM_EPSILON`], everything else exact.
    pub fn matches(&self, other: &Params) -> bool {
        let floats_match = self
            .floats()
            .iter()
            .zip(other.floats())
            .all(|(a, b)| (a - b).abs() < PARAM_EPSILON);
        floats_match
            && self.counts() == other.counts()
            && self.shape_mode == other.shape_mode
            && self.terrain_type == other.terrain_type
    }
}

/// Grid side length for a destination raster.
pub fn grid_size(width: usize, height: usize) -> Result<usize, ParamError> {
    match width.min(height) {
        0 => Err(ParamError::EmptyGrid),
        size => Ok(size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Params::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let p = Params {
            island_size: 0.95,
            ..Params::default()
        };
        match p.validate() {
            Err(ParamError::OutOfRange { name, .. }) => assert_eq!(name, "island_size"),
            other => panic!("unexpected {other:?}"),
        }
        let p = Params {
            noise_octaves: 0,
            ..Params::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn clamped_is_valid() {
        let p = Params {
            island_size: 5.0,
            persistence: f64::NAN,
            noise_octaves: 40,
            seed: 1_000_000,
            coastline_roughness: -3.0,
            ..Params::default()
        };
        let c = p.clamped();
        assert_eq!(c.validate(), Ok(()));
        assert_eq!(c.island_size, 0.8);
        assert_eq!(c.persistence, 0.5);
        assert_eq!(c.noise_octaves, 8);
        assert_eq!(c.seed, MAX_SEED);
        assert_eq!(c.coastline_roughness, 0.0);
    }

    #[test]
    fn zero_seed_resolves_to_nonzero() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let p = Params::default().with_resolved_seed(&mut rng);
            assert!((1..=MAX_SEED).contains(&p.seed));
        }
        let fixed = Params {
            seed: 42,
            ..Params::default()
        };
        assert_eq!(fixed.with_resolved_seed(&mut rng).seed, 42);
    }

    #[test]
    fn matches_uses_epsilon_for_floats() {
        let a = Params {
            seed: 9,
            ..Params::default()
        };
        let mut b = a.clone();
        b.island_size += 0.0005;
        assert!(a.matches(&b));
        b.island_size += 0.002;
        assert!(!a.matches(&b));

        let mut c = a.clone();
        c.lake_count += 1;
        assert!(!a.matches(&c));
        let mut d = a.clone();
        d.shape_mode = ShapeMode::Filled;
        assert!(!a.matches(&d));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p: Params =
            serde_json::from_str(r#"{"seed": 7, "shape_mode": "filled", "terrain_type": "archipelago"}"#)
                .unwrap();
        assert_eq!(p.seed, 7);
        assert_eq!(p.shape_mode, ShapeMode::Filled);
        assert_eq!(p.terrain_type, TerrainType::Archipelago);
        assert_eq!(p.island_size, 0.4);
    }

    #[test]
    fn grid_size_is_min_side() {
        assert_eq!(grid_size(800, 600), Ok(600));
        assert_eq!(grid_size(0, 600), Err(ParamError::EmptyGrid));
    }
}
