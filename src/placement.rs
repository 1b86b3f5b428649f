//! Anchor-based placement geometry for the bar, its box, and its label.

use std::str::FromStr;

use bevy::math::DVec2;

use crate::bounds::GeoBounds;
use crate::config::ScaleBarError;
use crate::distance::EARTH_RADIUS_M;

/// Horizontal and southern inset from the view edge, as a fraction of the
/// relevant extent.
const EDGE_INSET: f64 = 0.05;
/// Vertical inset from the north edge for north-family anchors.
const NORTH_INSET: f64 = 0.08;
/// Box margin around the baseline, as a fraction of each extent.
const BOX_MARGIN: f64 = 0.02;
/// Label lift above the box center, as a fraction of the latitude extent.
const LABEL_LIFT: f64 = 0.01;

/// Label font size per 100 px of container height.
const LABEL_FONT_FACTOR: f32 = 2.3;
const CONTAINER_UNIT_PX: f32 = 100.0;

/// Compass placement of the scale bar inside the view.
///
/// Parses from any of the twelve conventional aliases
/// (`ne`/`northeast`, `n`/`north`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleAnchor {
    North,
    South,
    NorthEast,
    NorthWest,
    #[default]
    SouthEast,
    SouthWest,
}

impl ScaleAnchor {
    /// True for anchors placed along the north edge.
    pub const fn is_north_family(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    const fn is_east(self) -> bool { matches!(self, Self::NorthEast | Self::SouthEast) }

    const fn is_west(self) -> bool { matches!(self, Self::NorthWest | Self::SouthWest) }
}

impl FromStr for ScaleAnchor {
    type Err = ScaleBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" | "north" => Ok(Self::North),
            "s" | "south" => Ok(Self::South),
            "ne" | "northeast" => Ok(Self::NorthEast),
            "nw" | "northwest" => Ok(Self::NorthWest),
            "se" | "southeast" => Ok(Self::SouthEast),
            "sw" | "southwest" => Ok(Self::SouthWest),
            other => Err(ScaleBarError::InvalidLocation(other.to_string())),
        }
    }
}

/// Concrete overlay geometry in view degrees (x = longitude, y = latitude).
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub baseline_start: DVec2,
    pub baseline_end:   DVec2,
    /// Closed quadrilateral enclosing the baseline with margin, wound
    /// counter-clockwise from the south-west corner.
    pub box_polygon:    [DVec2; 4],
    pub label_position: DVec2,
}

/// Longitude span in degrees equivalent to `distance_meters` of ground
/// distance along the parallel at `center_lat` degrees. Zero at and beyond
/// the poles, where no parallel exists to measure against. Note that
/// `cos(90°.to_radians())` is a tiny positive number, not zero, so the guard
/// must be on the latitude itself.
fn longitude_span_for(distance_meters: f64, center_lat: f64) -> f64 {
    if center_lat.abs() >= 90.0 {
        return 0.0;
    }
    let parallel_radius = EARTH_RADIUS_M * center_lat.to_radians().cos();
    (distance_meters / parallel_radius).to_degrees()
}

/// Computes baseline endpoints, box polygon, and label position for a bar of
/// `bar_meters` ground distance anchored at `anchor`.
///
/// East anchors run leftward from the inset east edge. West anchors are built
/// rightward from the inset west edge and then endpoint-reversed, so the bar
/// reads as extending outward from the edge it hugs. N/S center the bar on the
/// view's longitude midpoint.
pub fn place(bounds: &GeoBounds, bar_meters: f64, anchor: ScaleAnchor) -> Placement {
    let lat_span = bounds.lat_span();
    let lon_span = bounds.lon_span();
    let dlon = longitude_span_for(bar_meters, bounds.center_lat());

    let (start_lon, end_lon) = if anchor.is_east() {
        let start = bounds.lon_max - EDGE_INSET * lon_span;
        (start, start - dlon)
    } else if anchor.is_west() {
        let edge = bounds.lon_min + EDGE_INSET * lon_span;
        (edge + dlon, edge)
    } else {
        let center = bounds.center_lon();
        (center - dlon * 0.5, center + dlon * 0.5)
    };

    let baseline_lat = if anchor.is_north_family() {
        bounds.lat_max - NORTH_INSET * lat_span
    } else {
        bounds.lat_min + EDGE_INSET * lat_span
    };

    let lon_lo = start_lon.min(end_lon) - BOX_MARGIN * lon_span;
    let lon_hi = start_lon.max(end_lon) + BOX_MARGIN * lon_span;
    let lat_lo = baseline_lat - BOX_MARGIN * lat_span;
    let lat_hi = baseline_lat + BOX_MARGIN * lat_span;

    Placement {
        baseline_start: DVec2::new(start_lon, baseline_lat),
        baseline_end:   DVec2::new(end_lon, baseline_lat),
        box_polygon:    [
            DVec2::new(lon_lo, lat_lo),
            DVec2::new(lon_hi, lat_lo),
            DVec2::new(lon_hi, lat_hi),
            DVec2::new(lon_lo, lat_hi),
        ],
        label_position: DVec2::new(
            (lon_lo + lon_hi) * 0.5,
            baseline_lat + LABEL_LIFT * lat_span,
        ),
    }
}

/// Label font size in logical pixels, derived from the container's physical
/// height rather than the view's zoom level. A resize therefore only changes
/// the font, never the bar geometry.
pub fn label_font_size(container_height_px: f32) -> f32 {
    container_height_px / CONTAINER_UNIT_PX * LABEL_FONT_FACTOR
}
