//! Per-view scale bar configuration and argument validation.

use bevy::prelude::*;
use thiserror::Error;

use crate::placement::ScaleAnchor;
use crate::scale::UnitSystem;

const WIDTH_FRACTION_MIN: f64 = 0.1;
const WIDTH_FRACTION_MAX: f64 = 0.9;

/// Validation errors raised while building a [`ScaleBarConfig`].
///
/// All validation happens before any world mutation: a failed build leaves an
/// existing overlay on the view completely untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScaleBarError {
    #[error("width is not a real number: {0:?}")]
    InvalidWidth(String),
    #[error("units must be \"si\" or \"imp\", got {0:?}")]
    InvalidUnits(String),
    #[error("location {0:?} is not a recognized compass alias")]
    InvalidLocation(String),
    #[error("unrecognized parameter {0:?}")]
    UnrecognizedParameter(String),
}

/// Configuration bound to a map view entity.
///
/// Inserting this next to a [`GeoBounds`](crate::bounds::GeoBounds) creates
/// the overlay; removing it tears the overlay down. The captured values are
/// reused verbatim on every reactive rebuild.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ScaleBarConfig {
    pub anchor:         ScaleAnchor,
    /// Target bar length as a fraction of the view width, clamped to
    /// [0.1, 0.9].
    pub width_fraction: f64,
    pub units:          UnitSystem,
    /// When false, zoom/pan/click events leave the overlay alone and only an
    /// explicit [`RefreshScaleBar`](crate::RefreshScaleBar) rebuilds it.
    pub auto_refresh:   bool,
}

impl Default for ScaleBarConfig {
    fn default() -> Self {
        Self {
            anchor:         ScaleAnchor::default(),
            width_fraction: 0.2,
            units:          UnitSystem::default(),
            auto_refresh:   true,
        }
    }
}

/// Clamps a width argument into the supported [0.1, 0.9] range.
pub fn clamp_width_fraction(width: f64) -> f64 {
    width.clamp(WIDTH_FRACTION_MIN, WIDTH_FRACTION_MAX)
}

impl ScaleBarConfig {
    /// Builds a config from `(keyword, value)` pairs, the flat-keyword calling
    /// convention of scale bar front ends: `units` (`si`|`imp`), `location`
    /// (one of the twelve compass aliases), `width` (real, clamped), and
    /// `set_callbacks` (`true`|`false`|`1`|`0`).
    ///
    /// Validation is eager; the first offending pair aborts the build. A
    /// malformed `set_callbacks` value has no variant of its own in the
    /// four-error taxonomy and is reported as
    /// [`ScaleBarError::UnrecognizedParameter`] naming the whole
    /// `set_callbacks=<value>` pair.
    pub fn from_kwargs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ScaleBarError> {
        let mut config = Self::default();
        for (key, value) in pairs {
            match key {
                "units" => config.units = value.parse()?,
                "location" => config.anchor = value.parse()?,
                "width" => {
                    let width: f64 = value
                        .parse()
                        .map_err(|_| ScaleBarError::InvalidWidth(value.to_string()))?;
                    if !width.is_finite() {
                        return Err(ScaleBarError::InvalidWidth(value.to_string()));
                    }
                    config.width_fraction = clamp_width_fraction(width);
                },
                "set_callbacks" => {
                    config.auto_refresh = match value {
                        "true" | "1" => true,
                        "false" | "0" => false,
                        other => {
                            return Err(ScaleBarError::UnrecognizedParameter(format!(
                                "set_callbacks={other}"
                            )));
                        },
                    };
                },
                other => return Err(ScaleBarError::UnrecognizedParameter(other.to_string())),
            }
        }
        Ok(config)
    }
}
