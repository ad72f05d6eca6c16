//! HTTP server for the map page, the SVG rendering, and the marker API.
//!
//! Each request runs one [`snapshot::load`]: one feed fetch and one render.
//! A failed fetch surfaces as `502 Bad Gateway` carrying the error text.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;

use crate::error::Error;
use crate::feed::FeedSource;
use crate::legend::Legend;
use crate::metrics::Metrics;
use crate::render::{render_html, render_svg};
use crate::snapshot::{self, Snapshot};
use crate::style::DepthBand;
use crate::types::{MapView, TileLayer};

pub struct AppState<S> {
    pub source: S,
    pub view: MapView,
    pub tiles: TileLayer,
    pub metrics: Arc<Metrics>,
}

impl<S: FeedSource> AppState<S> {
    pub fn new(source: S, view: MapView, tiles: TileLayer, metrics: Arc<Metrics>) -> Self {
        Self { source, view, tiles, metrics }
    }

    async fn load(&self) -> Result<Snapshot, AppError> {
        Ok(snapshot::load(&self.source, &self.metrics).await?)
    }
}

pub fn router<S: FeedSource>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(index::<S>))
        .route("/map.svg", get(map_svg::<S>))
        .route("/api/markers", get(api_markers::<S>))
        .with_state(state)
}

struct AppError(Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, format!("earthquake feed unavailable: {}\n", self.0)).into_response()
    }
}

async fn index<S: FeedSource>(State(state): State<Arc<AppState<S>>>) -> Result<Html<String>, AppError> {
    let snapshot = state.load().await?;
    let t0 = Instant::now();
    let page = render_html(&state.view, &state.tiles, &snapshot.markers, &snapshot.legend, &snapshot.title);
    state.metrics.observe_render(t0.elapsed(), snapshot.markers.len());
    Ok(Html(page))
}

async fn map_svg<S: FeedSource>(State(state): State<Arc<AppState<S>>>) -> Result<Response, AppError> {
    let snapshot = state.load().await?;
    let t0 = Instant::now();
    let svg = render_svg(&state.view, &state.tiles, &snapshot.markers, &snapshot.legend);
    state.metrics.observe_render(t0.elapsed(), snapshot.markers.len());
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

#[derive(Serialize)]
struct MarkersResponse {
    title: String,
    count: usize,
    markers: Vec<ApiMarker>,
    legend: Legend,
}

#[derive(Serialize)]
struct ApiMarker {
    lat: f64,
    lon: f64,
    radius_m: f64,
    band: DepthBand,
    color: &'static str,
    popup: String,
}

async fn api_markers<S: FeedSource>(State(state): State<Arc<AppState<S>>>) -> Result<Json<MarkersResponse>, AppError> {
    let snapshot = state.load().await?;
    let t0 = Instant::now();
    let response = MarkersResponse {
        title: snapshot.title,
        count: snapshot.count,
        markers: snapshot
            .markers
            .into_iter()
            .map(|m| ApiMarker {
                lat: m.position.lat,
                lon: m.position.lon,
                radius_m: m.radius_m,
                band: m.band,
                color: m.band.color(),
                popup: m.popup,
            })
            .collect(),
        legend: snapshot.legend,
    };
    state.metrics.observe_render(t0.elapsed(), response.markers.len());
    Ok(Json(response))
}
