//! Earthquake map library.
//!
//! Fetches the USGS earthquake GeoJSON feed, derives one circle marker per
//! event (radius from magnitude, fill from depth), and renders the map view
//! with popups and a depth legend, either as a Leaflet page served over HTTP
//! or as a standalone SVG.

pub mod config;
pub mod error;
pub mod feed;
pub mod legend;
pub mod marker;
pub mod metrics;
pub mod projection;
pub mod render;
pub mod server;
pub mod snapshot;
pub mod style;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;
