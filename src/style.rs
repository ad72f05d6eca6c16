//! Visual encoding of an earthquake: fill color from depth, radius from
//! magnitude, and the fixed marker stroke/opacity.
//!
//! Depth thresholds use strict greater-than comparisons, so a boundary value
//! (exactly 10, 30, 50, 70 or 90 km) belongs to the shallower band. Anything
//! that fails every comparison, including negative depths and NaN, falls into
//! [`DepthBand::Shallow`].

use serde::Serialize;

/// Radius drawn for a magnitude of exactly zero, in meters.
pub const MIN_RADIUS_M: f64 = 1_000.0;

/// Meters of radius per unit of magnitude.
pub const RADIUS_PER_MAG_M: f64 = 10_000.0;

/// Depth band, ordered shallowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthBand {
    /// ≤ 10 km
    Shallow,
    /// 10–30 km
    Upper,
    /// 30–50 km
    Middle,
    /// 50–70 km
    Lower,
    /// 70–90 km
    Deep,
    /// deeper than 90 km
    VeryDeep,
}

impl DepthBand {
    /// All bands in ascending depth order.
    pub const ALL: [DepthBand; 6] = [
        DepthBand::Shallow,
        DepthBand::Upper,
        DepthBand::Middle,
        DepthBand::Lower,
        DepthBand::Deep,
        DepthBand::VeryDeep,
    ];

    /// Classify a depth in kilometers.
    #[must_use]
    pub fn classify(depth_km: f64) -> Self {
        if depth_km > 90.0 {
            Self::VeryDeep
        } else if depth_km > 70.0 {
            Self::Deep
        } else if depth_km > 50.0 {
            Self::Lower
        } else if depth_km > 30.0 {
            Self::Middle
        } else if depth_km > 10.0 {
            Self::Upper
        } else {
            Self::Shallow
        }
    }

    /// Exclusive lower bound of the band in km. `None` for the open-ended
    /// shallow band.
    #[must_use]
    pub const fn lower_bound_km(self) -> Option<f64> {
        match self {
            Self::Shallow => None,
            Self::Upper => Some(10.0),
            Self::Middle => Some(30.0),
            Self::Lower => Some(50.0),
            Self::Deep => Some(70.0),
            Self::VeryDeep => Some(90.0),
        }
    }

    /// CSS color name.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Shallow => "lightgreen",
            Self::Upper => "yellow",
            Self::Middle => "gold",
            Self::Lower => "orange",
            Self::Deep => "orangered",
            Self::VeryDeep => "red",
        }
    }

    /// sRGB hex value of [`color`](Self::color).
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Shallow => "#90ee90",
            Self::Upper => "#ffff00",
            Self::Middle => "#ffd700",
            Self::Lower => "#ffa500",
            Self::Deep => "#ff4500",
            Self::VeryDeep => "#ff0000",
        }
    }
}

/// Circle radius in meters for a magnitude.
///
/// Positive magnitudes scale linearly. Zero, negative (USGS reports small
/// negative local magnitudes), missing, and NaN magnitudes all get
/// [`MIN_RADIUS_M`], so the result is always strictly positive.
#[must_use]
pub fn magnitude_radius(magnitude: Option<f64>) -> f64 {
    match magnitude {
        Some(m) if m > 0.0 => m * RADIUS_PER_MAG_M,
        _ => MIN_RADIUS_M,
    }
}

/// Stroke and opacity shared by every marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub stroke: bool,
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl MarkerStyle {
    pub const QUAKE: MarkerStyle = MarkerStyle {
        stroke: true,
        color: "black",
        weight: 0.5,
        opacity: 1.0,
        fill_opacity: 1.0,
    };
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(DepthBand::classify(90.0), DepthBand::Deep);
        assert_eq!(DepthBand::classify(90.01), DepthBand::VeryDeep);
        assert_eq!(DepthBand::classify(70.0), DepthBand::Lower);
        assert_eq!(DepthBand::classify(50.0), DepthBand::Middle);
        assert_eq!(DepthBand::classify(30.0), DepthBand::Upper);
        assert_eq!(DepthBand::classify(10.0), DepthBand::Shallow);
        assert_eq!(DepthBand::classify(10.5), DepthBand::Upper);
    }

    #[test]
    fn colors_per_band() {
        assert_eq!(DepthBand::classify(650.0).color(), "red");
        assert_eq!(DepthBand::classify(75.0).color(), "orangered");
        assert_eq!(DepthBand::classify(55.0).color(), "orange");
        assert_eq!(DepthBand::classify(35.0).color(), "gold");
        assert_eq!(DepthBand::classify(15.0).color(), "yellow");
        assert_eq!(DepthBand::classify(2.0).color(), "lightgreen");
    }

    #[test]
    fn shallow_catches_negative_and_nan() {
        assert_eq!(DepthBand::classify(-3.2), DepthBand::Shallow);
        assert_eq!(DepthBand::classify(f64::NAN), DepthBand::Shallow);
        assert_eq!(DepthBand::classify(f64::NEG_INFINITY), DepthBand::Shallow);
        assert_eq!(DepthBand::classify(f64::INFINITY), DepthBand::VeryDeep);
    }

    #[test]
    fn classification_agrees_with_lower_bounds() {
        // Walk the line in 0.25 km steps: every depth lands in exactly the
        // band whose (lower, next lower] interval contains it.
        for step in -80..=480 {
            let depth = f64::from(step) * 0.25;
            let band = DepthBand::classify(depth);
            if let Some(lower) = band.lower_bound_km() {
                assert!(depth > lower, "{depth} classified above its band");
            }
            let idx = DepthBand::ALL.iter().position(|b| *b == band).unwrap();
            if let Some(next) = DepthBand::ALL.get(idx + 1) {
                assert!(depth <= next.lower_bound_km().unwrap(), "{depth} belongs higher");
            }
        }
    }

    #[test]
    fn all_is_sorted_and_distinct() {
        assert!(DepthBand::ALL.windows(2).all(|w| w[0] < w[1]));
        let colors: std::collections::HashSet<_> = DepthBand::ALL.iter().map(|b| b.color()).collect();
        assert_eq!(colors.len(), 6);
    }

    #[test]
    fn radius_minimum_at_zero() {
        assert_eq!(magnitude_radius(Some(0.0)), MIN_RADIUS_M);
        assert_eq!(magnitude_radius(Some(-0.0)), MIN_RADIUS_M);
    }

    #[test]
    fn radius_linear_in_magnitude() {
        assert!((magnitude_radius(Some(4.5)) - 45_000.0).abs() < 1e-6);
        assert!((magnitude_radius(Some(0.05)) - 500.0).abs() < 1e-9);
        let r1 = magnitude_radius(Some(1.0));
        let r3 = magnitude_radius(Some(3.0));
        assert!((r3 - 3.0 * r1).abs() < 1e-6);
    }

    #[test]
    fn radius_always_positive() {
        for m in [None, Some(f64::NAN), Some(-1.2), Some(0.0), Some(1e-9), Some(9.1)] {
            assert!(magnitude_radius(m) > 0.0, "radius for {m:?}");
        }
    }
}
