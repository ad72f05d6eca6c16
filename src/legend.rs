//! Static depth legend.

use serde::Serialize;

use crate::style::DepthBand;

/// Legend interval starts in km, shallowest first. The first entry is the
/// nominal floor shown for the open-ended shallow band.
pub const INTERVALS_KM: [i32; 6] = [-10, 10, 30, 50, 70, 90];

/// Map corner a control is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Leaflet control position string.
    #[must_use]
    pub const fn as_leaflet(self) -> &'static str {
        match self {
            Self::TopLeft => "topleft",
            Self::TopRight => "topright",
            Self::BottomLeft => "bottomleft",
            Self::BottomRight => "bottomright",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub band: DepthBand,
    pub color: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: Corner,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// The six depth bands, in ascending order, anchored bottom right.
    ///
    /// Colors are taken from [`DepthBand::color`], so an entry's swatch is
    /// always the color the markers in that band are drawn with.
    #[must_use]
    pub fn depth() -> Self {
        let entries = DepthBand::ALL
            .iter()
            .zip(INTERVALS_KM.iter())
            .enumerate()
            .map(|(i, (&band, &start))| LegendEntry {
                band,
                color: band.color(),
                label: match INTERVALS_KM.get(i + 1) {
                    Some(end) => format!("{start}km - {end}km"),
                    None => format!("{start}+"),
                },
            })
            .collect();

        Self { position: Corner::BottomRight, entries }
    }
}
