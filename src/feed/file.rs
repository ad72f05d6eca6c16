//! Feed source reading a saved GeoJSON document from disk.

use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::types::Feed;

use super::{FeedSource, decode};

#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedSource for FileFeed {
    async fn fetch(&self) -> Result<Feed> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        let feed = decode(&body)?;
        info!(path = %self.path.display(), count = feed.metadata.count, "feed loaded");
        Ok(feed)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
