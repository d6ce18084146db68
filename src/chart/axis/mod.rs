//! Axis range and tick engine.
//!
//! An [`Axis`] owns one segment, or two when a break omits part of the value
//! range. Each render recomputes the segments' rendered ranges from the
//! configured limits and the chart data ([`Axis::prepare_render`]), after
//! which ticks, labels and device mapping are available.

mod calendar;
mod label;
mod mapping;
pub(crate) mod nice;
mod range;
mod render;
mod ticks;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::chart::types::{
    AxisError, AxisId, AxisScale, AxisSettings, AxisValue, DateTimeUnit, Limits,
};
use crate::logging::{LogLevel, Logger, emit, json_str};

pub use calendar::{from_julian_day, julian_day};

pub(crate) const LOG_TARGET: &str = "trellis::axis";

/// Maps a value to the value whose label is shown in its place.
pub type LabelTransform = Rc<dyn Fn(f64) -> f64>;

/// A contiguous part of the axis range.
///
/// `minimum`/`maximum` are the configured limits (`None` means automatic);
/// the `render_*` fields are recomputed on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub render_minimum: f64,
    pub render_maximum: f64,
    pub render_start: f64,
    pub render_length: f64,
    pub date_time_unit: DateTimeUnit,
    pub date_time_interval: u32,
}

impl Default for Segment {
    fn default() -> Self {
        Self {
            minimum: None,
            maximum: None,
            render_minimum: 0.0,
            render_maximum: 0.0,
            render_start: 0.0,
            render_length: 0.0,
            date_time_unit: DateTimeUnit::Days,
            date_time_interval: 0,
        }
    }
}

pub struct Axis {
    pub(crate) id: AxisId,
    pub(crate) scale: AxisScale,
    pub(crate) resolution: f64,
    pub(crate) label_interval: f64,
    pub(crate) label_base_point: f64,
    pub(crate) label_format: Option<String>,
    pub(crate) label_angle: f64,
    pub(crate) round_limits: Limits,
    pub(crate) padding: i32,
    pub(crate) inverted: bool,
    pub(crate) max_zoom: f64,
    pub(crate) minimum_zoom_range: Option<f64>,
    pub(crate) zoom_min: Option<f64>,
    pub(crate) zoom_max: Option<f64>,
    pub(crate) label_transforms: HashMap<AxisValue, LabelTransform>,
    pub(crate) settings: AxisSettings,
    pub(crate) segments: Vec<Segment>,
    pub(crate) render_interval: f64,
    pub(crate) full_render_length: f64,
    pub(crate) logger: Option<Logger>,
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axis")
            .field("id", &self.id)
            .field("scale", &self.scale)
            .field("segments", &self.segments)
            .field("render_interval", &self.render_interval)
            .field("round_limits", &self.round_limits)
            .field("inverted", &self.inverted)
            .field("zoom", &(self.zoom_min, self.zoom_max))
            .field("label_transforms", &self.label_transforms.len())
            .finish_non_exhaustive()
    }
}

impl Axis {
    pub fn new(id: AxisId) -> Self {
        Self::with_settings(id, AxisSettings::default())
    }

    pub fn with_settings(id: AxisId, settings: AxisSettings) -> Self {
        Self {
            id,
            scale: AxisScale::Linear,
            resolution: 0.0,
            label_interval: 0.0,
            label_base_point: 0.0,
            label_format: None,
            label_angle: 0.0,
            round_limits: Limits::BOTH,
            padding: 0,
            inverted: false,
            max_zoom: settings.max_zoom,
            minimum_zoom_range: None,
            zoom_min: None,
            zoom_max: None,
            label_transforms: HashMap::new(),
            settings,
            segments: vec![Segment::default()],
            render_interval: 1.0,
            full_render_length: 0.0,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn id(&self) -> AxisId {
        self.id
    }

    pub fn settings(&self) -> &AxisSettings {
        &self.settings
    }

    pub fn scale(&self) -> AxisScale {
        self.scale
    }

    pub fn set_scale(&mut self, scale: AxisScale) {
        self.scale = scale;
    }

    fn first(&mut self) -> &mut Segment {
        &mut self.segments[0]
    }

    fn last(&mut self) -> &mut Segment {
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// Fix the lower limit; the minimum end is no longer rounded.
    pub fn set_minimum(&mut self, minimum: f64) {
        let s = self.first();
        s.minimum = Some(minimum);
        if let Some(maximum) = s.maximum {
            s.maximum = Some(maximum.max(minimum));
        }
        self.round_limits.minimum = false;
    }

    /// Fix the upper limit; the maximum end is no longer rounded.
    pub fn set_maximum(&mut self, maximum: f64) {
        let s = self.last();
        s.maximum = Some(maximum);
        if let Some(minimum) = s.minimum {
            s.minimum = Some(minimum.min(maximum));
        }
        self.round_limits.maximum = false;
    }

    /// Lower end of the axis: the configured limit, or the rendered one
    /// when automatic.
    pub fn minimum(&self) -> f64 {
        let s = &self.segments[0];
        s.minimum.unwrap_or(s.render_minimum)
    }

    pub fn maximum(&self) -> f64 {
        let s = &self.segments[self.segments.len() - 1];
        s.maximum.unwrap_or(s.render_maximum)
    }

    /// Fix both limits and disable rounding. Ignored unless
    /// `minimum < maximum`.
    pub fn set_range(&mut self, minimum: f64, maximum: f64) {
        if maximum > minimum {
            self.first().minimum = Some(minimum);
            self.last().maximum = Some(maximum);
            self.round_limits = Limits::NONE;
        }
    }

    /// Make the given ends automatic again; automatic ends are rounded.
    pub fn set_auto_limits(&mut self, limits: Limits) {
        if limits.minimum {
            self.first().minimum = None;
        }
        if limits.maximum {
            self.last().maximum = None;
        }
        self.round_limits = self.round_limits.union(limits);
    }

    pub fn auto_limits(&self) -> Limits {
        Limits {
            minimum: self.segments[0].minimum.is_none(),
            maximum: self.segments[self.segments.len() - 1].maximum.is_none(),
        }
    }

    pub fn set_round_limits(&mut self, limits: Limits) {
        self.round_limits = limits;
    }

    pub fn round_limits(&self) -> Limits {
        self.round_limits
    }

    /// Smallest range shown; `0` picks a scale-dependent default.
    pub fn set_resolution(&mut self, resolution: f64) {
        self.resolution = resolution;
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Omit `(minimum, maximum)` from the axis, splitting it in two segments.
    pub fn set_break(&mut self, minimum: f64, maximum: f64) -> Result<(), AxisError> {
        if !(minimum < maximum) {
            emit(
                self.logger.as_ref(),
                LogLevel::Warn,
                LOG_TARGET,
                "ignoring axis break",
                [json_str("break", format!("{minimum}..{maximum}"))],
            );
            return Err(AxisError::InvalidBreak);
        }
        if self.segments.len() != 2 {
            let upper = Segment {
                maximum: self.segments[0].maximum,
                ..Segment::default()
            };
            self.segments.truncate(1);
            self.segments.push(upper);
        }
        self.segments[0].maximum = Some(minimum);
        self.segments[1].minimum = Some(maximum);
        Ok(())
    }

    pub fn clear_break(&mut self) {
        if self.segments.len() == 2 {
            let upper = self.segments.remove(1);
            self.segments[0].maximum = upper.maximum;
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Distance between labels; `0` picks one automatically.
    pub fn set_label_interval(&mut self, interval: f64) {
        self.label_interval = interval;
    }

    pub fn label_interval(&self) -> f64 {
        self.label_interval
    }

    /// A value that stays on a label when the minimum is rounded.
    pub fn set_label_base_point(&mut self, base_point: f64) {
        self.label_base_point = base_point;
    }

    pub fn label_base_point(&self) -> f64 {
        self.label_base_point
    }

    /// Set a printf-style format for numeric axes or a strftime format for
    /// date axes. An unusable format is reported and the previous one kept.
    pub fn set_label_format(&mut self, format: impl Into<String>) -> Result<(), AxisError> {
        let format = format.into();
        let valid = match self.scale {
            AxisScale::Category => true,
            AxisScale::Date | AxisScale::DateTime => label::is_valid_date_format(&format),
            AxisScale::Linear | AxisScale::Log => label::NumberFormat::parse(&format).is_some(),
        };
        if !valid {
            emit(
                self.logger.as_ref(),
                LogLevel::Error,
                LOG_TARGET,
                "invalid label format",
                [json_str("format", format.as_str())],
            );
            return Err(AxisError::InvalidLabelFormat(format));
        }
        self.label_format = Some(format);
        Ok(())
    }

    /// Back to the scale's default format.
    pub fn reset_label_format(&mut self) {
        self.label_format = None;
    }

    /// Label rotation in degrees; steeper labels pack more densely.
    pub fn set_label_angle(&mut self, angle: f64) {
        self.label_angle = angle;
    }

    pub fn label_angle(&self) -> f64 {
        self.label_angle
    }

    /// Clipping margin kept at the ends of the axis, in pixels.
    pub fn set_padding(&mut self, padding: i32) {
        self.padding = padding;
    }

    pub fn padding(&self) -> i32 {
        self.padding
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn set_label_transform<F>(&mut self, side: AxisValue, transform: F)
    where
        F: Fn(f64) -> f64 + 'static,
    {
        self.label_transforms.insert(side, Rc::new(transform));
    }

    pub fn clear_label_transform(&mut self, side: AxisValue) {
        self.label_transforms.remove(&side);
    }

    pub fn label_transform(&self, side: AxisValue) -> Option<&LabelTransform> {
        self.label_transforms.get(&side)
    }

    /// Label interval chosen by the last [`Axis::prepare_render`].
    pub fn render_interval(&self) -> f64 {
        self.render_interval
    }

    pub fn segment_margin(&self) -> f64 {
        self.settings.segment_margin
    }
}
