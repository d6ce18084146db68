use crate::chart::axis::calendar::{SECONDS_PER_DAY, julian_day};
use crate::chart::axis::{Axis, Segment};
use crate::chart::context::ChartContext;
use crate::chart::types::AxisScale;

/// Days shown by a date axis without data.
const EMPTY_DATE_WINDOW_DAYS: f64 = 10.0;

impl Axis {
    /// Recompute the rendered range of one segment from its limits and the
    /// chart data.
    pub fn compute_range(&mut self, segment: usize, ctx: &dyn ChartContext) {
        let Some(s) = self.segments.get(segment) else {
            return;
        };
        let (minimum, maximum) = self.auto_range(s, ctx);
        let s = &mut self.segments[segment];
        s.render_minimum = minimum;
        s.render_maximum = maximum;
    }

    pub(crate) fn compute_ranges(&mut self, ctx: &dyn ChartContext) {
        for i in 0..self.segments.len() {
            self.compute_range(i, ctx);
        }
    }

    fn auto_range(&self, segment: &Segment, ctx: &dyn ChartContext) -> (f64, f64) {
        let find_minimum = segment.minimum.is_none();
        let find_maximum = segment.maximum.is_none();

        if self.scale == AxisScale::Category {
            let count = ctx.category_count(self.id).max(1) as f64;
            let minimum = segment.minimum.unwrap_or(-0.5);
            let maximum = segment.maximum.unwrap_or(count - 0.5);
            debug_assert!(minimum < maximum, "axis range collapsed");
            return (minimum, maximum);
        }

        let mut minimum = segment.minimum.unwrap_or(f64::MIN);
        let mut maximum = segment.maximum.unwrap_or(f64::MAX);
        if find_minimum || find_maximum {
            let (data_min, data_max) = ctx
                .data_range(self.id, self.scale)
                .filter(|(lo, hi)| lo.is_finite() && hi.is_finite() && lo <= hi)
                .unwrap_or_else(|| self.empty_range(ctx));
            if find_minimum {
                minimum = data_min.min(if find_maximum { data_max } else { maximum });
            }
            if find_maximum {
                maximum = data_max.max(if find_minimum { data_min } else { minimum });
            }
        }

        if self.scale == AxisScale::Log {
            (minimum, maximum) = decade_range(minimum, maximum, find_minimum, find_maximum);
        } else {
            let resolution = self.effective_resolution(minimum);
            let mut diff = maximum - minimum;
            if diff.abs() < resolution {
                let average = (maximum + minimum) / 2.0;
                match (find_minimum, find_maximum) {
                    (true, false) => minimum = maximum - resolution,
                    (false, true) => maximum = minimum + resolution,
                    _ => {
                        minimum = average - resolution / 2.0;
                        maximum = average + resolution / 2.0;
                    }
                }
                diff = maximum - minimum;
            }
            // Include zero when it is close relative to the range.
            if find_minimum && minimum >= 0.0 && minimum - 0.5 * diff <= 0.0 {
                minimum = 0.0;
            }
            if find_maximum && maximum <= 0.0 && maximum + 0.5 * diff >= 0.0 {
                maximum = 0.0;
            }
        }

        debug_assert!(minimum < maximum, "axis range collapsed");
        (minimum, maximum)
    }

    fn effective_resolution(&self, minimum: f64) -> f64 {
        if self.resolution > 0.0 {
            return self.resolution;
        }
        match self.scale {
            AxisScale::Date => 1.0,
            AxisScale::DateTime => 120.0,
            _ => (1e-3 * minimum).abs().max(1e-3),
        }
    }

    fn empty_range(&self, ctx: &dyn ChartContext) -> (f64, f64) {
        match self.scale {
            AxisScale::Log => (1.0, 10.0),
            AxisScale::Date => {
                let today = julian_day(ctx.today()) as f64;
                (today - EMPTY_DATE_WINDOW_DAYS, today)
            }
            AxisScale::DateTime => {
                let midnight = ctx
                    .today()
                    .and_hms_opt(0, 0, 0)
                    .map_or(0.0, |dt| dt.and_utc().timestamp() as f64);
                (midnight - EMPTY_DATE_WINDOW_DAYS * SECONDS_PER_DAY, midnight)
            }
            _ => (0.0, 100.0),
        }
    }
}

/// Widen automatic ends of a log range to whole decades.
fn decade_range(minimum: f64, maximum: f64, find_minimum: bool, find_maximum: bool) -> (f64, f64) {
    let maximum = if maximum > 0.0 { maximum } else { 10.0 };
    let minimum = if minimum > 0.0 {
        minimum
    } else {
        (maximum / 10.0).min(1.0)
    };
    let min_log = minimum.log10();
    let max_log = maximum.log10();
    let decade = |exponent: f64| 10f64.powf(exponent);

    match (find_minimum, find_maximum) {
        (true, true) => {
            let lo = decade(min_log.floor());
            let mut hi = decade(max_log.ceil());
            if lo == hi {
                hi = decade(max_log.ceil() + 1.0);
            }
            (lo, hi)
        }
        (true, false) => {
            let mut lo = decade(min_log.floor());
            if lo >= maximum {
                lo = decade(max_log.ceil() - 1.0).min(decade(min_log.floor() - 1.0));
            }
            (lo, maximum)
        }
        (false, true) => {
            let mut hi = decade(max_log.ceil());
            if hi <= minimum {
                hi = decade(min_log.floor() + 1.0).max(decade(max_log.ceil() + 1.0));
            }
            (minimum, hi)
        }
        (false, false) => (minimum, maximum),
    }
}
