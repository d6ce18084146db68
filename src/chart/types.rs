use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AxisError {
    #[error("invalid label format `{0}`")]
    InvalidLabelFormat(String),
    #[error("axis break must satisfy minimum < maximum")]
    InvalidBreak,
}

/// How values along an axis are interpreted.
///
/// `Date` values are julian day numbers, `DateTime` values are seconds since
/// the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
    Category,
    Date,
    DateTime,
}

impl AxisScale {
    pub fn is_calendar(self) -> bool {
        matches!(self, AxisScale::Date | AxisScale::DateTime)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisId {
    X,
    Y,
    Y2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// A location on or alongside an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisValue {
    #[default]
    Minimum,
    Maximum,
    Zero,
    Both,
}

/// Which ends of an axis a policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limits {
    pub minimum: bool,
    pub maximum: bool,
}

impl Limits {
    pub const NONE: Limits = Limits {
        minimum: false,
        maximum: false,
    };
    pub const MINIMUM: Limits = Limits {
        minimum: true,
        maximum: false,
    };
    pub const MAXIMUM: Limits = Limits {
        minimum: false,
        maximum: true,
    };
    pub const BOTH: Limits = Limits {
        minimum: true,
        maximum: true,
    };

    pub fn union(self, other: Limits) -> Limits {
        Limits {
            minimum: self.minimum || other.minimum,
            maximum: self.maximum || other.maximum,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.minimum && !self.maximum
    }
}

/// Calendar granularity of date ticks, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DateTimeUnit {
    Seconds,
    Minutes,
    Hours,
    #[default]
    Days,
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickLength {
    Zero,
    Short,
    Long,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub position: f64,
    pub length: TickLength,
    pub label: String,
}

impl TickLabel {
    pub fn new(position: f64, length: TickLength, label: impl Into<String>) -> Self {
        Self {
            position,
            length,
            label: label.into(),
        }
    }

    pub fn unlabeled(position: f64, length: TickLength) -> Self {
        Self::new(position, length, String::new())
    }
}

/// Which tick set to produce: level 1 is the unzoomed set, each further
/// level halves the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRequest {
    pub zoom_level: u32,
    pub side: AxisValue,
}

impl Default for TickRequest {
    fn default() -> Self {
        Self {
            zoom_level: 1,
            side: AxisValue::Minimum,
        }
    }
}

/// Tunables shared by every axis of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    /// Gap between the segments of a broken axis, in pixels.
    pub segment_margin: f64,
    pub auto_vertical_label_pixels: f64,
    pub auto_horizontal_label_pixels: f64,
    pub em_pixels: f64,
    pub max_zoom: f64,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            segment_margin: 40.0,
            auto_vertical_label_pixels: 25.0,
            auto_horizontal_label_pixels: 80.0,
            em_pixels: 16.0,
            max_zoom: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let settings: AxisSettings = serde_json::from_str(r#"{"max_zoom": 8.0}"#).unwrap();
        assert_eq!(settings.max_zoom, 8.0);
        assert_eq!(settings.segment_margin, 40.0);
        assert_eq!(settings.auto_vertical_label_pixels, 25.0);
    }

    #[test]
    fn calendar_units_order_from_finest() {
        assert!(DateTimeUnit::Seconds < DateTimeUnit::Days);
        assert!(DateTimeUnit::Days < DateTimeUnit::Months);
        assert!(DateTimeUnit::Months < DateTimeUnit::Years);
    }

    #[test]
    fn limits_union() {
        assert_eq!(Limits::MINIMUM.union(Limits::MAXIMUM), Limits::BOTH);
        assert!(Limits::NONE.is_empty());
        assert_eq!(
            serde_json::to_string(&AxisScale::DateTime).unwrap(),
            "\"date-time\""
        );
    }
}
