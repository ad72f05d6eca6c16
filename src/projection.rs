//! Spherical Web Mercator math (EPSG:3857, the projection Leaflet and the
//! OSM tile servers use) and slippy-map tile enumeration.

use std::f64::consts::PI;

use crate::types::{LatLng, MapView, TileLayer};

/// Edge length of a basemap tile in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Mercator is undefined at the poles; latitudes are clamped to this.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// WGS84 equatorial radius, meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Pixel coordinate (x right, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Tile address at a zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

/// Project to world pixel space at `zoom`. The world is `256 * 2^zoom`
/// pixels square with the origin at (lat 85.05, lon -180).
#[must_use]
pub fn project(lat_lng: LatLng, zoom: u8) -> Point {
    let size = world_size(zoom);
    let lat = lat_lng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (lat_lng.lon + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    Point { x, y }
}

/// Inverse of [`project`].
#[must_use]
pub fn unproject(point: Point, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lon = point.x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * point.y / size;
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lon)
}

#[must_use]
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom.min(30))
}

/// Ground resolution at a latitude, meters per pixel.
#[must_use]
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    2.0 * PI * EARTH_RADIUS_M * lat.cos() / world_size(zoom)
}

impl MapView {
    /// World-pixel position of the view's top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        let c = project(self.center, self.zoom);
        Point {
            x: c.x - f64::from(self.width) / 2.0,
            y: c.y - f64::from(self.height) / 2.0,
        }
    }

    /// Position relative to the view's top-left corner.
    #[must_use]
    pub fn to_screen(&self, lat_lng: LatLng) -> Point {
        let p = project(lat_lng, self.zoom);
        let o = self.origin();
        Point { x: p.x - o.x, y: p.y - o.y }
    }

    /// Circle radius in screen pixels for a ground radius at `lat`.
    #[must_use]
    pub fn radius_px(&self, lat: f64, radius_m: f64) -> f64 {
        radius_m / meters_per_pixel(lat, self.zoom)
    }

    /// Whether a circle of `radius_px` around `p` overlaps the view.
    #[must_use]
    pub fn intersects(&self, p: Point, radius_px: f64) -> bool {
        p.x + radius_px >= 0.0
            && p.y + radius_px >= 0.0
            && p.x - radius_px <= f64::from(self.width)
            && p.y - radius_px <= f64::from(self.height)
    }
}

/// A tile with its screen placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub tile: Tile,
    /// Top-left corner in screen pixels.
    pub at: Point,
}

/// Tiles covering the view, row-major. X wraps around the antimeridian,
/// rows outside the world are skipped.
#[must_use]
pub fn visible_tiles(view: &MapView) -> Vec<PlacedTile> {
    let o = view.origin();
    let n = 1i64 << view.zoom.min(30);

    let x0 = (o.x / TILE_SIZE).floor() as i64;
    let y0 = (o.y / TILE_SIZE).floor() as i64;
    let x1 = ((o.x + f64::from(view.width)) / TILE_SIZE).ceil() as i64;
    let y1 = ((o.y + f64::from(view.height)) / TILE_SIZE).ceil() as i64;

    let mut tiles = Vec::new();
    for ty in y0.max(0)..y1.min(n) {
        for tx in x0..x1 {
            let wrapped = tx.rem_euclid(n);
            tiles.push(PlacedTile {
                tile: Tile { x: wrapped as u32, y: ty as u32, z: view.zoom },
                at: Point {
                    x: tx as f64 * TILE_SIZE - o.x,
                    y: ty as f64 * TILE_SIZE - o.y,
                },
            });
        }
    }
    tiles
}

impl TileLayer {
    /// Fill the URL template for `tile`. Subdomains rotate on `x + y` so
    /// neighbouring tiles spread across hosts.
    #[must_use]
    pub fn url(&self, tile: Tile) -> String {
        let mut url = self
            .url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string());
        if !self.subdomains.is_empty() {
            let idx = (tile.x as usize + tile.y as usize) % self.subdomains.len();
            url = url.replace("{s}", &self.subdomains[idx]);
        }
        url
    }
}
