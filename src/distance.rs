//! Ground distance spanned by the view, measured along the center parallel.

use crate::bounds::GeoBounds;

/// WGS84 equatorial radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Ground distance in meters covered by the view's longitude extent, measured
/// along the parallel at the view's center latitude.
///
/// This is a flat, spherical-tangent approximation: it degrades for very wide
/// or high-latitude views, which is acceptable for a screen-sized scale bar.
/// A center latitude outside ±90° marks the bounds as degenerate and yields
/// `0.0` rather than an error; downstream stages then produce a zero-length
/// bar.
pub fn ground_distance(bounds: &GeoBounds) -> f64 {
    let center_lat = bounds.center_lat();
    if center_lat.abs() > 90.0 {
        return 0.0;
    }
    EARTH_RADIUS_M * center_lat.to_radians().cos() * bounds.lon_span().to_radians()
}
