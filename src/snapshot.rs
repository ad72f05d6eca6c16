//! One load of the map: a single fetch, then markers and legend.
//!
//! Every page load (and every `--output` run) goes through [`load`] exactly
//! once; nothing is cached between loads.

use std::time::Instant;

use tracing::{info, warn};

use crate::error::Result;
use crate::feed::FeedSource;
use crate::legend::Legend;
use crate::marker::{Marker, build_markers};
use crate::metrics::Metrics;

/// Page title used when the feed carries none.
pub const DEFAULT_TITLE: &str = "Earthquakes";

/// Everything a renderer needs for one view.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub title: String,
    /// Feature count reported by the feed metadata; equals `markers.len()`.
    pub count: usize,
    pub markers: Vec<Marker>,
    pub legend: Legend,
}

/// Fetch the feed once and derive the markers.
pub async fn load<S: FeedSource>(source: &S, metrics: &Metrics) -> Result<Snapshot> {
    let t0 = Instant::now();
    // A feed that decodes but cannot be drawn counts as a failed fetch.
    let outcome = match source.fetch().await {
        Ok(feed) => build_markers(&feed).map(|markers| (feed, markers)),
        Err(e) => Err(e),
    };
    let (feed, markers) = match outcome {
        Ok(loaded) => loaded,
        Err(e) => {
            metrics.observe_fetch(t0.elapsed(), None);
            warn!(source = %source.describe(), error = %e, "feed load failed");
            return Err(e);
        }
    };
    metrics.observe_fetch(t0.elapsed(), Some(feed.metadata.count));
    info!(count = markers.len(), "snapshot loaded");

    Ok(Snapshot {
        title: feed.metadata.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        count: feed.metadata.count,
        markers,
        legend: Legend::depth(),
    })
}
