//! Chart axis engine.
//!
//! [`Axis`] turns configured limits plus the data reported by a
//! [`ChartContext`] into rounded ranges, ticks, labels and device positions.
//! [`series`] holds the row lookup used when iterating a zoomed series.

mod axis;
mod context;
pub mod series;
mod types;

pub use axis::nice::{round_down_125, round_up_125, round125};
pub use axis::{Axis, LabelTransform, Segment, from_julian_day, julian_day};
pub use context::{ChartContext, ChartModel, StaticContext};
pub use types::{
    AxisError, AxisId, AxisScale, AxisSettings, AxisValue, DateTimeUnit, Limits, Orientation,
    TickLabel, TickLength, TickRequest,
};
