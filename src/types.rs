//! Core domain types for earthquake feed data and the map view.

use serde::Serialize;

/// OpenStreetMap standard tile server.
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A single earthquake event from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Quake {
    pub id: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    /// Hypocenter depth in kilometers.
    pub depth: f64,
    /// `None` when the feed reports `null` (not yet computed by USGS).
    pub magnitude: Option<f64>,
    pub place: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub time: Option<i64>,
}

impl Quake {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// Feed-level metadata block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedMetadata {
    /// Number of features the source claims to carry.
    pub count: usize,
    pub title: Option<String>,
    pub generated: Option<i64>,
    pub url: Option<String>,
    pub status: Option<u16>,
}

/// A decoded feed: metadata plus events in feed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed {
    pub metadata: FeedMetadata,
    pub quakes: Vec<Quake>,
}

/// Fixed map viewport: center, zoom, and pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: LatLng::new(37.0902, -95.7129),
            zoom: 4,
            width: 1280,
            height: 800,
        }
    }
}

/// Slippy-map basemap layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    /// Template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url_template: String,
    pub subdomains: Vec<String>,
    /// HTML attribution shown in the map corner.
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            subdomains: ["a", "b", "c"].map(String::from).to_vec(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                .to_string(),
        }
    }
}
