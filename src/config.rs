//! CLI configuration via clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::types::{LatLng, MapView, TileLayer};

/// USGS summary feed: all earthquakes from the past seven days.
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

#[derive(Parser, Debug, Clone)]
#[command(name = "quake-map")]
#[command(about = "Fetches the USGS earthquake feed and renders it as a map with depth-colored markers")]
pub struct Config {
    /// GeoJSON feed URL
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// Read the feed from a saved GeoJSON file instead of the network
    #[arg(long, conflicts_with = "feed_url")]
    pub feed_file: Option<PathBuf>,

    /// Latitude of the map center
    #[arg(long, default_value = "37.0902", allow_hyphen_values = true)]
    pub center_lat: f64,

    /// Longitude of the map center
    #[arg(long, default_value = "-95.7129", allow_hyphen_values = true)]
    pub center_lon: f64,

    /// Zoom level of the map view
    #[arg(short, long, default_value = "4")]
    pub zoom: u8,

    /// Map width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Map height in pixels
    #[arg(long, default_value = "800")]
    pub height: u32,

    /// Basemap tile URL template ({s}, {z}, {x}, {y})
    #[arg(long, default_value = crate::types::OSM_TILE_URL)]
    pub tile_url: String,

    /// HTTP port for the map page
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// HTTP port for /metrics and /health
    #[arg(long, default_value = "9090")]
    pub metrics_port: u16,

    /// Feed request timeout in seconds
    #[arg(long, default_value = "10")]
    pub timeout_secs: u64,

    /// Render a single SVG map to this path and exit instead of serving
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Config {
    #[must_use]
    pub fn view(&self) -> MapView {
        MapView {
            center: LatLng::new(self.center_lat, self.center_lon),
            zoom: self.zoom,
            width: self.width,
            height: self.height,
        }
    }

    #[must_use]
    pub fn tile_layer(&self) -> TileLayer {
        TileLayer {
            url_template: self.tile_url.clone(),
            ..TileLayer::default()
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
