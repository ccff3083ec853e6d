//! Per-model temperature constraints.
//!
//! Every model carries a [`TemperatureConstraint`] describing which sampling
//! temperatures it accepts. Providers consult the constraint before sending
//! traffic to a backend so unsupported values never reach the remote service:
//! `validate` decides whether a requested value is acceptable,
//! `corrected_value` coerces an out-of-range value into a safe one, and
//! `description` yields a human-readable message for validation errors.

use serde::Deserialize;

/// Tolerance for floating point comparison of temperatures.
const TEMPERATURE_EPSILON: f64 = 1e-6;

/// Constraint on the sampling temperature a model accepts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "String")]
pub enum TemperatureConstraint {
    /// A continuous inclusive range with a preferred default.
    Range { min: f64, max: f64, default: f64 },
    /// A discrete set of permitted values.
    Discrete { values: Vec<f64>, default: f64 },
    /// An exact required value (reasoning models such as O3 pin this to 1.0).
    Fixed(f64),
}

impl TemperatureConstraint {
    /// Continuous range constraint. When `default` is `None` the midpoint of
    /// the range is used.
    pub fn range(min: f64, max: f64, default: Option<f64>) -> Self {
        Self::Range {
            min,
            max,
            default: default.unwrap_or((min + max) / 2.0),
        }
    }

    /// Discrete value-set constraint. When `default` is `None` the median of
    /// the sorted values is used.
    pub fn discrete(mut values: Vec<f64>, default: Option<f64>) -> Self {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let default = default.unwrap_or_else(|| values[values.len() / 2]);
        Self::Discrete { values, default }
    }

    /// Exact-value constraint.
    pub fn fixed(value: f64) -> Self {
        Self::Fixed(value)
    }

    /// Map a configuration string (`"fixed"`, `"discrete"`, `"range"`, or
    /// anything else) onto a constraint with conventional defaults.
    ///
    /// Model configuration files reference constraints by these names; the
    /// fallback for unknown or absent kinds is the standard 0.0..=2.0 range.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            // Fixed-temperature reasoning models only accept 1.0
            "fixed" => Self::fixed(1.0),
            "discrete" => Self::discrete(vec![0.0, 0.3, 0.7, 1.0, 1.5, 2.0], Some(0.3)),
            _ => Self::range(0.0, 2.0, Some(0.3)),
        }
    }

    /// Whether `temperature` may be sent to the backend as-is.
    pub fn validate(&self, temperature: f64) -> bool {
        match self {
            Self::Range { min, max, .. } => temperature >= *min && temperature <= *max,
            Self::Discrete { values, .. } => values
                .iter()
                .any(|v| (temperature - v).abs() < TEMPERATURE_EPSILON),
            Self::Fixed(value) => (temperature - value).abs() < TEMPERATURE_EPSILON,
        }
    }

    /// A valid substitute for a possibly out-of-range temperature.
    ///
    /// Ranges clamp, discrete sets pick the nearest allowed value, and fixed
    /// constraints always return their pinned value.
    pub fn corrected_value(&self, temperature: f64) -> f64 {
        match self {
            Self::Range { min, max, .. } => temperature.clamp(*min, *max),
            Self::Discrete { values, .. } => values
                .iter()
                .copied()
                .min_by(|a, b| {
                    (temperature - a)
                        .abs()
                        .partial_cmp(&(temperature - b).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(temperature),
            Self::Fixed(value) => *value,
        }
    }

    /// Human-readable description of the acceptable values, suitable for
    /// inclusion in validation error messages.
    pub fn description(&self) -> String {
        match self {
            Self::Range { min, max, .. } => {
                format!(
                    "Supports temperature range {} to {}",
                    format_temperature(*min),
                    format_temperature(*max)
                )
            }
            Self::Discrete { values, .. } => {
                let rendered: Vec<String> =
                    values.iter().map(|v| format_temperature(*v)).collect();
                format!("Supports temperatures: {}", rendered.join(", "))
            }
            Self::Fixed(value) => {
                format!("Only supports temperature={}", format_temperature(*value))
            }
        }
    }

    /// The default temperature for the model.
    pub fn default_value(&self) -> f64 {
        match self {
            Self::Range { default, .. } | Self::Discrete { default, .. } => *default,
            Self::Fixed(value) => *value,
        }
    }
}

impl Default for TemperatureConstraint {
    fn default() -> Self {
        Self::range(0.0, 2.0, Some(0.3))
    }
}

impl From<String> for TemperatureConstraint {
    fn from(kind: String) -> Self {
        Self::from_kind(&kind)
    }
}

/// Render a temperature with at least one decimal place, so ranges read as
/// "0.0 to 2.0" rather than "0 to 2".
fn format_temperature(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_validates_inclusive_bounds() {
        let constraint = TemperatureConstraint::range(0.0, 2.0, Some(0.3));
        assert!(!constraint.validate(-0.1));
        assert!(constraint.validate(0.0));
        assert!(constraint.validate(2.0));
        assert!(!constraint.validate(2.1));
    }

    #[test]
    fn range_clamps_when_correcting() {
        let constraint = TemperatureConstraint::range(0.0, 2.0, Some(0.3));
        assert_eq!(constraint.corrected_value(5.0), 2.0);
        assert_eq!(constraint.corrected_value(-1.0), 0.0);
        assert_eq!(constraint.corrected_value(0.7), 0.7);
    }

    #[test]
    fn range_default_falls_back_to_midpoint() {
        let constraint = TemperatureConstraint::range(0.0, 1.0, None);
        assert_eq!(constraint.default_value(), 0.5);
    }

    #[test]
    fn range_description_mentions_bounds() {
        let constraint = TemperatureConstraint::range(0.0, 2.0, Some(0.3));
        assert!(constraint.description().contains("0.0 to 2.0"));
    }

    #[test]
    fn fixed_tolerates_floating_point_noise() {
        let constraint = TemperatureConstraint::fixed(1.0);
        assert!(constraint.validate(1.0));
        assert!(constraint.validate(1.0 + 1e-9));
        assert!(!constraint.validate(0.9));
        assert_eq!(constraint.corrected_value(0.3), 1.0);
    }

    #[test]
    fn discrete_picks_the_nearest_allowed_value() {
        let constraint = TemperatureConstraint::discrete(vec![0.0, 0.5, 1.0], Some(0.5));
        assert!(constraint.validate(0.5));
        assert!(!constraint.validate(0.4));
        assert_eq!(constraint.corrected_value(0.4), 0.5);
        assert_eq!(constraint.corrected_value(0.2), 0.0);
        assert_eq!(constraint.corrected_value(9.0), 1.0);
    }

    #[test]
    fn discrete_sorts_values_and_defaults_to_the_median() {
        let constraint = TemperatureConstraint::discrete(vec![1.0, 0.0, 0.5], None);
        match &constraint {
            TemperatureConstraint::Discrete { values, default } => {
                assert_eq!(values, &vec![0.0, 0.5, 1.0]);
                assert_eq!(*default, 0.5);
            }
            other => panic!("unexpected constraint: {other:?}"),
        }
    }

    #[test]
    fn from_kind_maps_configuration_strings() {
        assert_eq!(
            TemperatureConstraint::from_kind("fixed"),
            TemperatureConstraint::fixed(1.0)
        );
        assert!(matches!(
            TemperatureConstraint::from_kind("discrete"),
            TemperatureConstraint::Discrete { .. }
        ));
        assert_eq!(
            TemperatureConstraint::from_kind("range"),
            TemperatureConstraint::default()
        );
        assert_eq!(
            TemperatureConstraint::from_kind("unknown"),
            TemperatureConstraint::default()
        );
    }

    #[test]
    fn deserializes_from_a_kind_string() {
        let constraint: TemperatureConstraint = serde_json::from_str("\"fixed\"").unwrap();
        assert_eq!(constraint, TemperatureConstraint::fixed(1.0));
    }
}
