//! Turns a decoded feed into drawable circle markers.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::style::{DepthBand, magnitude_radius};
use crate::types::{Feed, LatLng, Quake};

/// One circle on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: LatLng,
    /// Radius on the ground, in meters.
    pub radius_m: f64,
    pub band: DepthBand,
    /// Popup body (HTML, `<br>`-separated lines).
    pub popup: String,
}

impl Marker {
    #[must_use]
    pub fn from_quake(quake: &Quake) -> Self {
        Self {
            position: quake.position(),
            radius_m: magnitude_radius(quake.magnitude),
            band: DepthBand::classify(quake.depth),
            popup: popup_text(quake),
        }
    }

    #[must_use]
    pub fn fill_color(&self) -> &'static str {
        self.band.color()
    }
}

/// `Magnitude: 2.4<br> Location: 61.5, -150.1<br> Depth: 95.2`
#[must_use]
pub fn popup_text(quake: &Quake) -> String {
    let magnitude = quake
        .magnitude
        .map_or_else(|| "unknown".to_string(), |m| m.to_string());
    format!(
        "Magnitude: {magnitude}<br> Location: {}, {}<br> Depth: {}",
        quake.latitude, quake.longitude, quake.depth
    )
}

/// Build exactly `metadata.count` markers, in feed order.
///
/// A count larger than the feature list is an error. Features past the
/// reported count are not drawn.
pub fn build_markers(feed: &Feed) -> Result<Vec<Marker>> {
    let reported = feed.metadata.count;
    let actual = feed.quakes.len();
    if reported > actual {
        return Err(Error::CountMismatch { reported, actual });
    }
    if reported < actual {
        warn!(reported, actual, "feed carries more features than its metadata count");
    }

    let markers: Vec<Marker> = feed.quakes[..reported].iter().map(Marker::from_quake).collect();
    debug!(count = markers.len(), "markers built");
    Ok(markers)
}
