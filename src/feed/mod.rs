//! Earthquake feed sources and GeoJSON decoding.
//!
//! The USGS summary feeds are GeoJSON `FeatureCollection`s with an extra
//! `metadata` object. Each feature is a `Point` whose third coordinate is the
//! hypocenter depth in kilometers; the magnitude lives in `properties.mag`
//! and is `null` for events that have not been reviewed yet.
//!
//! The document is parsed with the `geojson` crate; `metadata` is a foreign
//! member of the collection and is decoded separately. Unknown fields and
//! properties are ignored.

pub mod file;
pub mod http;

use std::time::Duration;

use geojson::{Feature, GeoJson, Value, feature::Id};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{Feed, FeedMetadata, Quake};

pub use file::FileFeed;
pub use http::HttpFeed;

/// Upper bound on a single feed request, connect included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait implemented by each feed source.
pub trait FeedSource: Send + Sync + 'static {
    /// Fetch and decode the whole feed once.
    fn fetch(&self) -> impl std::future::Future<Output = Result<Feed>> + Send;

    /// Short name used in logs.
    fn describe(&self) -> String;
}

/// The USGS `metadata` foreign member.
#[derive(Deserialize)]
struct WireMetadata {
    count: usize,
    title: Option<String>,
    generated: Option<i64>,
    url: Option<String>,
    status: Option<u16>,
}

/// Decode a USGS GeoJSON document.
///
/// A missing `metadata` block is tolerated; the count then falls back to the
/// number of features so that plain GeoJSON collections still render.
pub fn decode(json: &str) -> Result<Feed> {
    let GeoJson::FeatureCollection(collection) = json.parse::<GeoJson>()? else {
        return Err(Error::NotFeatureCollection);
    };

    let wire_metadata = collection
        .foreign_members
        .and_then(|mut members| members.remove("metadata"))
        .filter(|value| !value.is_null())
        .map(serde_json::from_value::<WireMetadata>)
        .transpose()?;

    let quakes = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| to_quake(index, &feature))
        .collect::<Result<Vec<_>>>()?;

    let metadata = match wire_metadata {
        Some(m) => FeedMetadata {
            count: m.count,
            title: m.title,
            generated: m.generated,
            url: m.url,
            status: m.status,
        },
        None => FeedMetadata {
            count: quakes.len(),
            ..FeedMetadata::default()
        },
    };

    Ok(Feed { metadata, quakes })
}

fn to_quake(index: usize, feature: &Feature) -> Result<Quake> {
    let Some(geometry) = &feature.geometry else {
        return Err(Error::Feed { index, reason: "missing geometry" });
    };
    let Value::Point(coordinates) = &geometry.value else {
        return Err(Error::Feed { index, reason: "geometry is not a Point" });
    };
    let [longitude, latitude, depth, ..] = coordinates[..] else {
        return Err(Error::Feed { index, reason: "expected [lon, lat, depth] coordinates" });
    };

    Ok(Quake {
        id: feature.id.as_ref().map(|id| match id {
            Id::String(s) => s.clone(),
            Id::Number(n) => n.to_string(),
        }),
        longitude,
        latitude,
        depth,
        magnitude: feature.property("mag").and_then(serde_json::Value::as_f64),
        place: feature.property("place").and_then(serde_json::Value::as_str).map(str::to_owned),
        time: feature.property("time").and_then(serde_json::Value::as_i64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FEED_JSON_4Q, FEED_JSON_NO_METADATA};

    #[test]
    fn decode_usgs_feed() {
        let feed = decode(FEED_JSON_4Q).expect("valid feed");

        assert_eq!(feed.metadata.count, 4);
        assert_eq!(feed.metadata.status, Some(200));
        assert_eq!(feed.metadata.title.as_deref(), Some("USGS All Earthquakes, Past Week"));
        assert_eq!(feed.quakes.len(), 4);

        let first = &feed.quakes[0];
        assert_eq!(first.id.as_deref(), Some("ak0241"));
        assert!((first.longitude + 150.1).abs() < 1e-9);
        assert!((first.latitude - 61.5).abs() < 1e-9);
        assert!((first.depth - 95.2).abs() < 1e-9);
        assert_eq!(first.magnitude, Some(2.4));
        assert_eq!(first.place.as_deref(), Some("20 km N of Willow, Alaska"));
    }

    #[test]
    fn null_magnitude_decodes_as_none() {
        let feed = decode(FEED_JSON_4Q).unwrap();
        assert_eq!(feed.quakes[3].magnitude, None);
    }

    #[test]
    fn missing_metadata_counts_features() {
        let feed = decode(FEED_JSON_NO_METADATA).unwrap();
        assert_eq!(feed.metadata.count, 1);
        assert_eq!(feed.quakes.len(), 1);
    }

    #[test]
    fn two_coordinates_is_an_error() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"mag":1.0},"geometry":{"type":"Point","coordinates":[1.0,2.0]}}
        ]}"#;
        match decode(json) {
            Err(Error::Feed { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected feature error, got {other:?}"),
        }
    }

    #[test]
    fn non_point_geometry_is_an_error() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"mag":1.0},"geometry":{"type":"Point","coordinates":[1.0,2.0,3.0]}},
            {"type":"Feature","properties":{"mag":1.0},"geometry":{"type":"LineString","coordinates":[[1.0,2.0],[3.0,4.0]]}}
        ]}"#;
        match decode(json) {
            Err(Error::Feed { index, reason }) => {
                assert_eq!(index, 1);
                assert_eq!(reason, "geometry is not a Point");
            }
            other => panic!("expected feature error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(decode("{not json"), Err(Error::GeoJson(_))));
    }

    #[test]
    fn null_properties_are_accepted() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":null,"geometry":{"type":"Point","coordinates":[1.0,2.0,3.0]}}
        ]}"#;
        let feed = decode(json).expect("null properties are valid GeoJSON");
        assert_eq!(feed.quakes.len(), 1);
        assert_eq!(feed.quakes[0].magnitude, None);
        assert!(feed.quakes[0].place.is_none());
        assert!((feed.quakes[0].depth - 3.0).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_coordinates_keep_the_parse_error() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":["a","b","c"]}}
        ]}"#;
        match decode(json) {
            Err(Error::GeoJson(_)) => {}
            other => panic!("expected GeoJSON error, got {other:?}"),
        }
    }

    #[test]
    fn bare_feature_is_not_a_collection() {
        let json = r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1.0,2.0,3.0]}}"#;
        assert!(matches!(decode(json), Err(Error::NotFeatureCollection)));
    }

    #[test]
    fn malformed_metadata_is_a_json_error() {
        let json = r#"{"type":"FeatureCollection","metadata":{"count":"many"},"features":[]}"#;
        assert!(matches!(decode(json), Err(Error::Json(_))));
    }
}
