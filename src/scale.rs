//! Selection of a human-readable "nice" scale distance and unit.

use std::str::FromStr;

use crate::config::ScaleBarError;

/// Meters-to-miles conversion factor.
const MILES_PER_METER: f64 = 0.000_621_371_192;

/// Meters per foot, used for the feet threshold and the re-derived distance.
const METERS_PER_FOOT: f64 = 0.3048;

/// Divisor used when deriving the feet magnitude. Differs from
/// `METERS_PER_FOOT` in the trailing digit; both constants are load-bearing
/// for label output and must not be merged.
const FEET_MAGNITUDE_DIVISOR: f64 = 0.30482;

const INCHES_PER_FOOT: f64 = 12.0;

/// Unit system for the scale label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl FromStr for UnitSystem {
    type Err = ScaleBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "si" => Ok(Self::Metric),
            "imp" => Ok(Self::Imperial),
            other => Err(ScaleBarError::InvalidUnits(other.to_string())),
        }
    }
}

/// The chosen rounded scale distance.
///
/// `distance_meters` is the ground distance the drawn bar actually represents
/// (re-derived from the rounded magnitude), not the raw target the selection
/// started from. Placement must use this value.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSpec {
    pub magnitude:       f64,
    pub unit_label:      &'static str,
    pub distance_meters: f64,
}

impl ScaleSpec {
    /// Formatted label text, e.g. `"200 km"`.
    pub fn label(&self) -> String { format!("{} {}", self.magnitude, self.unit_label) }

    fn zero(units: UnitSystem) -> Self {
        let unit_label = match units {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        };
        Self {
            magnitude: 0.0,
            unit_label,
            distance_meters: 0.0,
        }
    }
}

/// Rounds `x` down onto the conventional scale-bar mantissa set {1, 2, 5} at
/// `x`'s order of magnitude, so the leading digit of the result is always 1,
/// 2, or 5.
pub fn nice_round(x: f64) -> f64 {
    let power = x.log10().floor() as i32;
    let base = 10.0_f64.powi(power);
    let mantissa = x / base;
    let nice = if mantissa >= 5.0 {
        5.0
    } else if mantissa >= 2.0 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Selects the scale magnitude and unit for a view spanning `distance_meters`,
/// targeting a bar `width_fraction` of the view wide.
///
/// The tiers are mutually exclusive and exhaustive for any positive target; a
/// non-positive or non-finite target (degenerate view) yields a zero spec.
pub fn select_scale(distance_meters: f64, width_fraction: f64, units: UnitSystem) -> ScaleSpec {
    let target = distance_meters * width_fraction;
    if !(target.is_finite() && target > 0.0) {
        return ScaleSpec::zero(units);
    }

    match units {
        UnitSystem::Metric => {
            let rounded = nice_round(target);
            if target > 1000.0 {
                ScaleSpec {
                    magnitude: rounded / 1000.0,
                    unit_label: "km",
                    distance_meters: rounded,
                }
            } else if target > width_fraction {
                // Quirk kept on purpose: the meters/millimeters boundary is the
                // unit-less width fraction, not 1 m. See DESIGN.md.
                ScaleSpec {
                    magnitude: rounded,
                    unit_label: "m",
                    distance_meters: rounded,
                }
            } else {
                ScaleSpec {
                    magnitude: rounded * 1000.0,
                    unit_label: "mm",
                    distance_meters: rounded,
                }
            }
        },
        UnitSystem::Imperial => {
            if target > 1.0 / MILES_PER_METER {
                let magnitude = nice_round(target * MILES_PER_METER);
                ScaleSpec {
                    magnitude,
                    unit_label: "mi",
                    distance_meters: magnitude / MILES_PER_METER,
                }
            } else if target > METERS_PER_FOOT {
                let magnitude = nice_round(target / FEET_MAGNITUDE_DIVISOR);
                ScaleSpec {
                    magnitude,
                    unit_label: "ft",
                    distance_meters: magnitude * METERS_PER_FOOT,
                }
            } else {
                // Whole inches; sub-inch bars are not worth labeling finer.
                let magnitude = (target / METERS_PER_FOOT * INCHES_PER_FOOT).round();
                ScaleSpec {
                    magnitude,
                    unit_label: "in",
                    distance_meters: magnitude / INCHES_PER_FOOT * METERS_PER_FOOT,
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_round_floors_onto_1_2_5() {
        assert_eq!(nice_round(37.0), 20.0);
        assert_eq!(nice_round(150.0), 100.0);
        assert_eq!(nice_round(730.0), 500.0);
        assert_eq!(nice_round(5.0), 5.0);
        assert_eq!(nice_round(2.0), 2.0);
        assert_eq!(nice_round(1.0), 1.0);
        assert_eq!(nice_round(9.99), 5.0);
        assert_eq!(nice_round(0.037), 0.02);
    }

    #[test]
    fn nice_round_leading_digit_property() {
        for x in [0.0043, 0.7, 3.0, 18.0, 444.0, 9_000.0, 123_456.0] {
            let r = nice_round(x);
            let mantissa = r / 10.0_f64.powf(r.log10().floor());
            assert!(
                (mantissa - 1.0).abs() < 1e-9
                    || (mantissa - 2.0).abs() < 1e-9
                    || (mantissa - 5.0).abs() < 1e-9,
                "nice_round({x}) = {r}"
            );
        }
    }

    #[test]
    fn metric_kilometers_tier() {
        // The end-to-end example from a 10-degree view at 35N: target is about
        // 182.4 km, whose mantissa 1.82 floors to 1.
        let spec = select_scale(911_868.0, 0.2, UnitSystem::Metric);
        assert_eq!(spec.unit_label, "km");
        assert_eq!(spec.magnitude, 100.0);
        assert_eq!(spec.distance_meters, 100_000.0);
        assert_eq!(spec.label(), "100 km");
    }

    #[test]
    fn metric_meters_tier() {
        let spec = select_scale(900.0, 0.5, UnitSystem::Metric);
        assert_eq!(spec.unit_label, "m");
        assert_eq!(spec.magnitude, 200.0);
        assert_eq!(spec.distance_meters, 200.0);
    }

    #[test]
    fn metric_millimeters_tier() {
        // target = 0.15, below the width-fraction boundary of 0.2.
        let spec = select_scale(0.75, 0.2, UnitSystem::Metric);
        assert_eq!(spec.unit_label, "mm");
        assert_eq!(spec.magnitude, 100.0);
        assert_eq!(spec.distance_meters, 0.1);
    }

    #[test]
    fn metric_boundary_uses_width_fraction() {
        // target = 0.3 m sits between the width fraction (0.2) and 1 m; the
        // boundary is the width fraction, so this lands in the meters tier.
        let spec = select_scale(1.5, 0.2, UnitSystem::Metric);
        assert_eq!(spec.unit_label, "m");
        assert_eq!(spec.magnitude, 0.2);
    }

    #[test]
    fn imperial_miles_tier() {
        let spec = select_scale(10_000.0, 0.5, UnitSystem::Imperial);
        assert_eq!(spec.unit_label, "mi");
        assert_eq!(spec.magnitude, 2.0);
        assert!((spec.distance_meters - 2.0 / MILES_PER_METER).abs() < 1e-9);
    }

    #[test]
    fn imperial_feet_tier() {
        let spec = select_scale(200.0, 0.5, UnitSystem::Imperial);
        assert_eq!(spec.unit_label, "ft");
        // 100 / 0.30482 = 328.06 -> 200 ft
        assert_eq!(spec.magnitude, 200.0);
        assert!((spec.distance_meters - 60.96).abs() < 1e-9);
    }

    #[test]
    fn imperial_inches_tier_rounds_to_whole_inches() {
        let spec = select_scale(0.4, 0.5, UnitSystem::Imperial);
        assert_eq!(spec.unit_label, "in");
        // 0.2 m = 7.874 in -> 8 in
        assert_eq!(spec.magnitude, 8.0);
        assert!((spec.distance_meters - 8.0 / 12.0 * 0.3048).abs() < 1e-9);
    }

    #[test]
    fn exactly_one_tier_per_target() {
        for target in [0.05, 0.2, 0.5, 2.0, 999.0, 1_001.0, 5.0e6] {
            for units in [UnitSystem::Metric, UnitSystem::Imperial] {
                let spec = select_scale(target, 1.0, units);
                assert!(spec.magnitude > 0.0, "target {target} {units:?}");
                assert!(spec.distance_meters > 0.0);
            }
        }
    }

    #[test]
    fn degenerate_distance_yields_zero_spec() {
        let spec = select_scale(0.0, 0.2, UnitSystem::Metric);
        assert_eq!(spec.magnitude, 0.0);
        assert_eq!(spec.distance_meters, 0.0);
        assert_eq!(spec.unit_label, "m");
        let spec = select_scale(0.0, 0.2, UnitSystem::Imperial);
        assert_eq!(spec.unit_label, "ft");
    }

    #[test]
    fn unit_system_parsing() {
        assert_eq!("si".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("imp".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!(matches!(
            "xyz".parse::<UnitSystem>(),
            Err(ScaleBarError::InvalidUnits(_))
        ));
    }
}
