//! Geographic view bounds supplied by the host map view.

use bevy::prelude::*;

/// Visible extent of the map view in degrees.
///
/// Owned by the host: insert it on the view entity and keep it current as the
/// view pans and zooms. The scale bar only ever reads it. Callers are expected
/// to uphold `lat_max >= lat_min` and `lon_max >= lon_min`.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 { self.lat_max - self.lat_min }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 { self.lon_max - self.lon_min }

    /// Latitude of the view center in degrees.
    pub fn center_lat(&self) -> f64 { (self.lat_min + self.lat_max) * 0.5 }

    /// Longitude of the view center in degrees.
    pub fn center_lon(&self) -> f64 { (self.lon_min + self.lon_max) * 0.5 }
}
