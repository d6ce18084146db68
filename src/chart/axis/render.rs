use crate::chart::axis::Axis;
use crate::chart::axis::calendar::{self, SECONDS_PER_DAY};
use crate::chart::axis::nice::{round_down_125, round_up_125, round125};
use crate::chart::context::ChartContext;
use crate::chart::types::{AxisScale, DateTimeUnit, Orientation};
use crate::logging::{LogLevel, emit, json_kv};
use crate::width::em_length_px;

impl Axis {
    /// Lay the segments out along `length` pixels and pick the label
    /// interval, rounding automatic limits to it.
    ///
    /// Returns `false` when the axis cannot be drawn (no room left after
    /// padding and segment margins, or no usable interval).
    pub fn prepare_render(
        &mut self,
        orientation: Orientation,
        length: f64,
        ctx: &dyn ChartContext,
    ) -> bool {
        self.full_render_length = length;
        self.compute_ranges(ctx);
        let mut total_range: f64 = self
            .segments
            .iter()
            .map(|s| s.render_maximum - s.render_minimum)
            .sum();

        let (clip_min, clip_max) = self.clipping();
        let count = self.segments.len();
        let total_length =
            length - self.settings.segment_margin * (count - 1) as f64 - clip_min - clip_max;
        if total_length <= 0.0 {
            self.render_interval = 1.0;
            return false;
        }

        for pass in 0..2 {
            let mut start = clip_min;
            let previous_range = total_range;
            total_range = 0.0;
            for i in 0..count {
                let round_minimum = i == 0 && self.round_limits.minimum;
                let round_maximum = i == count - 1 && self.round_limits.maximum;
                let diff = self.segments[i].render_maximum - self.segments[i].render_minimum;
                self.segments[i].render_start = start;
                self.segments[i].render_length = diff / previous_range * total_length;

                if i == 0 {
                    self.render_interval = self.label_interval;
                    if self.render_interval == 0.0 {
                        self.render_interval = self.auto_interval(orientation, diff, ctx);
                    }
                }
                if !(self.render_interval.is_finite() && self.render_interval > 0.0) {
                    self.render_interval = 1.0;
                    return false;
                }

                match self.scale {
                    AxisScale::Linear if pass == 0 => {
                        self.round_linear(i, round_minimum, round_maximum)
                    }
                    AxisScale::Date | AxisScale::DateTime => {
                        self.round_calendar(i, round_minimum, round_maximum)
                    }
                    _ => {}
                }

                let s = &self.segments[i];
                total_range += s.render_maximum - s.render_minimum;
                start += s.render_length + self.settings.segment_margin;
            }
        }

        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            super::LOG_TARGET,
            "axis prepared",
            [
                json_kv("length", length),
                json_kv("interval", self.render_interval),
                json_kv("minimum", self.segments[0].render_minimum),
                json_kv("maximum", self.segments[count - 1].render_maximum),
            ],
        );
        true
    }

    /// Padding at each end; linear and date axes skip it at an end that
    /// sits on zero.
    fn clipping(&self) -> (f64, f64) {
        let padding = f64::from(self.padding);
        if matches!(self.scale, AxisScale::Category | AxisScale::Log) {
            return (padding, padding);
        }
        let first = &self.segments[0];
        let last = &self.segments[self.segments.len() - 1];
        let pad_unless_zero = |v: f64| if v == 0.0 { 0.0 } else { padding };
        if self.inverted {
            (pad_unless_zero(last.render_maximum), pad_unless_zero(first.render_minimum))
        } else {
            (pad_unless_zero(first.render_minimum), pad_unless_zero(last.render_maximum))
        }
    }

    fn auto_interval(&self, orientation: Orientation, diff: f64, ctx: &dyn ChartContext) -> f64 {
        let labels = self.auto_label_count(orientation, 0);
        match self.scale {
            AxisScale::Category => {
                let categories = ctx.category_count(self.id) as f64;
                (categories / (labels / 1.5)).floor().max(1.0)
            }
            AxisScale::Log => 1.0,
            _ => round125(diff / labels),
        }
    }

    /// How many labels fit along a segment at the configured label angle.
    pub(crate) fn auto_label_count(&self, orientation: Orientation, segment: usize) -> f64 {
        let s = &self.segments[segment];
        let vertical = self.settings.auto_vertical_label_pixels;
        match orientation {
            Orientation::Horizontal if self.label_angle.abs() <= 15.0 => {
                let date_width =
                    em_length_px(self.default_date_format(s), self.settings.em_pixels);
                s.render_length / self.settings.auto_horizontal_label_pixels.max(date_width)
            }
            Orientation::Horizontal if self.label_angle.abs() <= 40.0 => {
                s.render_length / (2.0 * vertical)
            }
            _ => s.render_length / vertical,
        }
    }

    fn round_linear(&mut self, segment: usize, round_minimum: bool, round_maximum: bool) {
        let interval = self.render_interval;
        let base = self.label_base_point;
        let s = &mut self.segments[segment];
        if round_minimum {
            s.render_minimum = round_down_125(s.render_minimum, interval);
            // Keep the base point on a labelled tick.
            if s.render_minimum <= base && base <= s.render_maximum {
                let step = 2.0 * interval;
                s.render_minimum = base - step * ((base - s.render_minimum) / step).ceil();
            }
        }
        if round_maximum {
            s.render_maximum = round_up_125(s.render_maximum, interval);
        }
    }

    fn round_calendar(&mut self, segment: usize, round_minimum: bool, round_maximum: bool) {
        let scale = self.scale;
        let days = match scale {
            AxisScale::Date => self.render_interval,
            _ => self.render_interval / SECONDS_PER_DAY,
        };
        let (mut unit, mut interval) = calendar::select_interval(days);
        if scale == AxisScale::Date && unit < DateTimeUnit::Days {
            unit = DateTimeUnit::Days;
            interval = 1;
        }

        let s = &mut self.segments[segment];
        let bounds = calendar::decode(scale, s.render_minimum)
            .zip(calendar::decode(scale, s.render_maximum));
        if let Some((mut min, mut max)) = bounds {
            if round_minimum {
                min = calendar::floor_to(min, unit, interval).unwrap_or(min);
            }
            if round_maximum {
                max = calendar::ceil_to(max, unit, interval, min).unwrap_or(max);
            }
            let (lo, hi) = (calendar::encode(scale, min), calendar::encode(scale, max));
            if lo < hi {
                s.render_minimum = lo;
                s.render_maximum = hi;
            }
        }
        s.date_time_unit = unit;
        s.date_time_interval = interval;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::chart::axis::{Axis, julian_day};
    use crate::chart::context::StaticContext;
    use crate::chart::types::{AxisId, AxisScale, DateTimeUnit, Orientation};

    fn bounds(axis: &Axis) -> (f64, f64) {
        let segments = axis.segments();
        (
            segments[0].render_minimum,
            segments[segments.len() - 1].render_maximum,
        )
    }

    #[test]
    fn linear_limits_round_to_the_label_interval() {
        let ctx = StaticContext::new().with_range(AxisId::Y, 0.0, 97.0);
        let mut axis = Axis::new(AxisId::Y);
        assert!(axis.prepare_render(Orientation::Horizontal, 400.0, &ctx));
        assert_eq!(axis.render_interval(), 20.0);
        assert_eq!(bounds(&axis), (0.0, 100.0));

        assert!(axis.prepare_render(Orientation::Vertical, 400.0, &ctx));
        assert_eq!(axis.render_interval(), 5.0);
        assert_eq!(bounds(&axis), (0.0, 100.0));
        assert_eq!(axis.segments()[0].render_length, 400.0);
    }

    #[test]
    fn rounded_minimum_keeps_the_base_point_labelled() {
        let ctx = StaticContext::new().with_range(AxisId::Y, -5.0, 97.0);
        let mut axis = Axis::new(AxisId::Y);
        assert!(axis.prepare_render(Orientation::Vertical, 400.0, &ctx));
        assert_eq!(axis.render_interval(), 5.0);
        assert_eq!(bounds(&axis), (-10.0, 100.0));
    }

    #[test]
    fn fixed_limits_are_not_rounded() {
        let ctx = StaticContext::new().with_range(AxisId::Y, 0.0, 97.0);
        let mut axis = Axis::new(AxisId::Y);
        axis.set_range(3.0, 97.0);
        assert!(axis.prepare_render(Orientation::Vertical, 400.0, &ctx));
        assert_eq!(bounds(&axis), (3.0, 97.0));
    }

    #[test]
    fn explicit_interval_wins() {
        let ctx = StaticContext::new().with_range(AxisId::Y, 0.0, 97.0);
        let mut axis = Axis::new(AxisId::Y);
        axis.set_label_interval(25.0);
        assert!(axis.prepare_render(Orientation::Vertical, 400.0, &ctx));
        assert_eq!(axis.render_interval(), 25.0);
        assert_eq!(bounds(&axis), (0.0, 100.0));
    }

    #[test]
    fn no_room_means_no_axis() {
        let ctx = StaticContext::new().with_range(AxisId::Y, 0.0, 97.0);
        let mut axis = Axis::new(AxisId::Y);
        axis.set_padding(10);
        axis.set_scale(AxisScale::Log);
        assert!(!axis.prepare_render(Orientation::Vertical, 20.0, &ctx));
        assert_eq!(axis.render_interval(), 1.0);
    }

    #[test]
    fn padding_is_skipped_at_zero() {
        let ctx = StaticContext::new().with_range(AxisId::Y, 0.0, 97.0);
        let mut axis = Axis::new(AxisId::Y);
        axis.set_padding(10);
        assert!(axis.prepare_render(Orientation::Vertical, 410.0, &ctx));
        let s = &axis.segments()[0];
        assert_eq!(s.render_start, 0.0);
        assert_eq!(s.render_length, 400.0);
    }

    #[test]
    fn broken_axes_share_the_length() {
        let ctx = StaticContext::new().with_range(AxisId::Y, 0.0, 1000.0);
        let mut axis = Axis::new(AxisId::Y);
        axis.set_break(100.0, 900.0).unwrap();
        assert!(axis.prepare_render(Orientation::Vertical, 440.0, &ctx));
        let segments = axis.segments();
        assert_eq!(segments[0].render_start, 0.0);
        assert_eq!(segments[0].render_length + segments[1].render_length, 400.0);
        assert_eq!(
            segments[1].render_start,
            segments[0].render_length + axis.segment_margin()
        );
    }

    #[test]
    fn categories_get_at_least_unit_intervals() {
        let ctx = StaticContext::new().with_categories(["a", "b", "c"]);
        let mut axis = Axis::new(AxisId::X);
        axis.set_scale(AxisScale::Category);
        assert!(axis.prepare_render(Orientation::Horizontal, 300.0, &ctx));
        assert_eq!(axis.render_interval(), 1.0);

        let many = StaticContext::new().with_categories((0..100).map(|i| i.to_string()));
        assert!(axis.prepare_render(Orientation::Horizontal, 300.0, &many));
        assert_eq!(axis.render_interval(), 40.0);
    }

    #[test]
    fn date_axes_round_to_calendar_boundaries() {
        let start = julian_day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()) as f64;
        let end = julian_day(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()) as f64;
        let ctx = StaticContext::new().with_range(AxisId::X, start, end);
        let mut axis = Axis::new(AxisId::X);
        axis.set_scale(AxisScale::Date);
        assert!(axis.prepare_render(Orientation::Horizontal, 800.0, &ctx));

        let s = &axis.segments()[0];
        assert_eq!(s.date_time_unit, DateTimeUnit::Months);
        assert_eq!(s.date_time_interval, 2);
        assert_eq!(s.render_minimum, start);
        let next_year = julian_day(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()) as f64;
        assert_eq!(s.render_maximum, next_year);
    }

    #[test]
    fn date_time_axes_pick_hours() {
        let midnight = 1_700_006_400.0;
        let ctx = StaticContext::new().with_range(AxisId::X, midnight + 600.0, midnight + 86_000.0);
        let mut axis = Axis::new(AxisId::X);
        axis.set_scale(AxisScale::DateTime);
        assert!(axis.prepare_render(Orientation::Vertical, 200.0, &ctx));
        let s = &axis.segments()[0];
        assert_eq!(s.date_time_unit, DateTimeUnit::Hours);
        assert_eq!(s.render_minimum, midnight);
        assert_eq!(s.render_maximum, midnight + 86_400.0);
    }
}
