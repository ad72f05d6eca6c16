//! Shared test fixtures and helpers.
//!
//! Provides reusable constructors for domain types used across multiple test
//! modules. Avoids duplicating `quake()`, `feed()`, etc. in every
//! `#[cfg(test)]` block.

use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};

use crate::error::{Error, Result};
use crate::feed::FeedSource;
use crate::types::{Feed, FeedMetadata, Quake};

/// `Quake` from coordinates, depth and magnitude (test convenience).
pub(crate) fn quake(lon: f64, lat: f64, depth: f64, magnitude: Option<f64>) -> Quake {
    Quake {
        id: None,
        longitude: lon,
        latitude: lat,
        depth,
        magnitude,
        place: None,
        time: None,
    }
}

/// `Feed` whose metadata count matches its quakes.
pub(crate) fn feed(quakes: Vec<Quake>) -> Feed {
    Feed {
        metadata: FeedMetadata {
            count: quakes.len(),
            title: Some("Test feed".to_string()),
            ..FeedMetadata::default()
        },
        quakes,
    }
}

/// In-memory source that counts how often it was fetched.
pub(crate) struct StaticFeed {
    feed: Feed,
    fetches: AtomicUsize,
}

impl StaticFeed {
    pub(crate) fn new(feed: Feed) -> Self {
        Self { feed, fetches: AtomicUsize::new(0) }
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Relaxed)
    }
}

impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<Feed> {
        self.fetches.fetch_add(1, Relaxed);
        Ok(self.feed.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// Source that always fails.
pub(crate) struct FailingFeed;

impl FeedSource for FailingFeed {
    async fn fetch(&self) -> Result<Feed> {
        Err(Error::Io(std::io::Error::other("feed unavailable")))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

// ---------------------------------------------------------------------------
// Shared JSON fixtures
// ---------------------------------------------------------------------------

/// 4-event USGS summary feed (trimmed properties, real field layout). The
/// last event has a `null` magnitude.
pub(crate) const FEED_JSON_4Q: &str = r#"{
    "type": "FeatureCollection",
    "metadata": {
        "generated": 1700000000000,
        "url": "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson",
        "title": "USGS All Earthquakes, Past Week",
        "status": 200,
        "api": "1.10.3",
        "count": 4
    },
    "features": [
        {"type":"Feature","properties":{"mag":2.4,"place":"20 km N of Willow, Alaska","time":1699999000000,"tsunami":0,"magType":"ml"},"geometry":{"type":"Point","coordinates":[-150.1,61.5,95.2]},"id":"ak0241"},
        {"type":"Feature","properties":{"mag":0.0,"place":"5 km W of Cobb, CA","time":1699998000000},"geometry":{"type":"Point","coordinates":[-122.8,38.8,1.9]},"id":"nc7390"},
        {"type":"Feature","properties":{"mag":4.7,"place":"Fiji region","time":1699997000000},"geometry":{"type":"Point","coordinates":[178.2,-17.9,560.0]},"id":"us6000"},
        {"type":"Feature","properties":{"mag":null,"place":"Puerto Rico","time":1699996000000},"geometry":{"type":"Point","coordinates":[-66.8,17.9,12.0]},"id":"pr7112"}
    ],
    "bbox": [-150.1, -17.9, 1.9, 178.2, 61.5, 560.0]
}"#;

/// Plain GeoJSON without the USGS metadata block.
pub(crate) const FEED_JSON_NO_METADATA: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"mag":1.1},"geometry":{"type":"Point","coordinates":[10.0,20.0,30.0]}}]}"#;
