use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Result, anyhow};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use log::{error, info};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use heightgen::cache::TerrainCache;
use heightgen::config::{self, ParamError, Params};
use heightgen::render;

type SharedCache = Arc<Mutex<TerrainCache>>;

#[derive(Deserialize)]
struct GenerateRequest {
    width: Option<usize>,
    height: Option<usize>,
    #[serde(flatten)]
    params: Params,
}

#[derive(Serialize)]
struct GenerateResponse {
    layers: Vec<Layer>,
    width: usize,
    height: usize,
    seed: u32,
    regenerated: bool,
    ms: f64,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

enum ApiError {
    BadRequest(ParamError),
    Internal(anyhow::Error),
}

impl From<ParamError> for ApiError {
    fn from(e: ParamError) -> Self {
        ApiError::BadRequest(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            ApiError::Internal(e) => {
                error!("generate failed: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> Result<String> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder.write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    Ok(format!("data:image/png;base64,{}", b64))
}

async fn generate_handler(
    State(cache): State<SharedCache>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let width = req.width.unwrap_or(1024);
    let height = req.height.unwrap_or(1024);
    let size = config::grid_size(width, height)?;
    req.params.validate()?;
    let params = req.params;

    let response = tokio::task::spawn_blocking(move || -> Result<GenerateResponse> {
        let t = Instant::now();
        let snapshot = cache
            .lock()
            .map_err(|_| anyhow!("terrain cache lock poisoned"))?
            .get_or_generate(&params, size);

        let layers = vec![
            Layer {
                name: "map".into(),
                data_url: encode_png(
                    &render::render_map(&snapshot.grid, width, height),
                    width,
                    height,
                )?,
            },
            Layer {
                name: "heightmap".into(),
                data_url: encode_png(&render::render_heightmap(&snapshot.grid), size, size)?,
            },
        ];

        Ok(GenerateResponse {
            layers,
            width,
            height,
            seed: snapshot.params.seed,
            regenerated: snapshot.regenerated,
            ms: t.elapsed().as_secs_f64() * 1000.0,
        })
    })
    .await
    .map_err(|e| anyhow!("generation task failed: {e}"))??;

    info!(
        "served seed={} {}x{} regenerated={} in {:.1} ms",
        response.seed, width, height, response.regenerated, response.ms
    );
    Ok(Json(response))
}

async fn defaults_handler() -> Json<Params> {
    Json(Params::default())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cache: SharedCache = Arc::new(Mutex::new(TerrainCache::new()));

    let app = Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/defaults", get(defaults_handler))
        .layer(CorsLayer::permissive())
        .with_state(cache);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    eprintln!("heightgen server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
