use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use heightgen::config::{self, Params, ShapeMode, TerrainType};
use heightgen::render;

/// Generate an island heightmap and write PNG previews.
#[derive(Parser, Debug)]
#[command(name = "heightgen", version)]
struct Cli {
    /// Destination raster width. The elevation grid is min(width, height) per side.
    #[arg(long, default_value_t = 1024)]
    width: usize,
    /// Destination raster height.
    #[arg(long, default_value_t = 1024)]
    height: usize,
    /// Output directory.
    #[arg(long, default_value = "artifacts")]
    out: PathBuf,
    /// JSON file with any subset of the generation parameters.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Clamp out-of-range parameters instead of rejecting them.
    #[arg(long)]
    clamp: bool,

    /// 0 picks a random seed.
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long, value_enum)]
    shape: Option<ShapeMode>,
    #[arg(long, value_enum)]
    terrain: Option<TerrainType>,
    #[arg(long)]
    island_size: Option<f64>,
    #[arg(long)]
    mountain_intensity: Option<f64>,
    #[arg(long)]
    erosion_iterations: Option<u32>,
    #[arg(long)]
    noise_scale: Option<f64>,
    #[arg(long)]
    noise_octaves: Option<u32>,
    #[arg(long)]
    persistence: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    water_level: Option<f64>,
    #[arg(long)]
    beach_width: Option<f64>,
    #[arg(long)]
    coastline_roughness: Option<f64>,
    #[arg(long)]
    mountain_count: Option<u32>,
    #[arg(long)]
    valley_depth: Option<f64>,
    #[arg(long)]
    lake_count: Option<u32>,
    #[arg(long)]
    river_count: Option<u32>,
}

impl Cli {
    /// Defaults, then the config file, then explicit flags.
    fn params(&self) -> Result<Params> {
        let mut params = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid parameters in {}", path.display()))?
            }
            None => Params::default(),
        };

        macro_rules! apply {
            ($($flag:ident => $field:ident),* $(,)?) => {
                $(if let Some(v) = self.$flag { params.$field = v; })*
            };
        }
        apply!(
            seed => seed,
            shape => shape_mode,
            terrain => terrain_type,
            island_size => island_size,
            mountain_intensity => mountain_intensity,
            erosion_iterations => erosion_iterations,
            noise_scale => noise_scale,
            noise_octaves => noise_octaves,
            persistence => persistence,
            water_level => water_level,
            beach_width => beach_width,
            coastline_roughness => coastline_roughness,
            mountain_count => mountain_count,
            valley_depth => valley_depth,
            lake_count => lake_count,
            river_count => river_count,
        );

        if self.clamp {
            params = params.clamped();
        }
        params.validate()?;
        Ok(params)
    }
}

fn save_png(path: &Path, rgba: &[u8], w: usize, h: usize) -> Result<()> {
    image::save_buffer(path, rgba, w as u32, h as u32, image::ColorType::Rgba8)
        .with_context(|| format!("failed to save {}", path.display()))?;
    eprintln!("Saved {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let size = config::grid_size(cli.width, cli.height)?;
    let params = cli.params()?.with_resolved_seed(&mut rand::thread_rng());

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("failed to create {}", cli.out.display()))?;

    eprintln!(
        "Generating {}x{} grid with seed={}, shape={:?}, terrain={:?}",
        size, size, params.seed, params.shape_mode, params.terrain_type
    );

    let (grid, timings) = heightgen::generate_timed(&params, size);

    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    // 1. Banded map at destination resolution
    let map = render::render_map(&grid, cli.width, cli.height);
    save_png(&cli.out.join("map.png"), &map, cli.width, cli.height)?;

    // 2. Stretched grayscale diagnostic, one pixel per cell
    let hmap = render::render_heightmap(&grid);
    save_png(&cli.out.join("heightmap.png"), &hmap, size, size)?;

    // 3. Resolved parameters, reusable with --config
    let params_path = cli.out.join("params.json");
    std::fs::write(&params_path, serde_json::to_string_pretty(&params)?)
        .with_context(|| format!("failed to write {}", params_path.display()))?;
    eprintln!("Saved {}", params_path.display());

    eprintln!("\nDone.");
    Ok(())
}
