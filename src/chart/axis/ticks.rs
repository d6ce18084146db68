use crate::chart::axis::calendar;
use crate::chart::axis::label::format_date;
use crate::chart::axis::{Axis, Segment};
use crate::chart::context::ChartContext;
use crate::chart::types::{AxisScale, DateTimeUnit, TickLabel, TickLength, TickRequest};

/// Relative slack when comparing a tick against the end of its segment.
const EPSILON: f64 = 1e-3;
/// Upper bound on ticks per segment, against degenerate intervals.
const MAX_TICKS: usize = 10_000;

impl Axis {
    /// Ticks and labels for one segment, as prepared by the last
    /// [`Axis::prepare_render`].
    ///
    /// Zoom level `n` divides the interval by `2^(n-1)`; labels on the
    /// requested side pass through its label transform.
    pub fn label_ticks(
        &self,
        segment: usize,
        request: TickRequest,
        ctx: &dyn ChartContext,
    ) -> Vec<TickLabel> {
        let Some(s) = self.segments.get(segment) else {
            return Vec::new();
        };
        let divisor = 2f64.powi(request.zoom_level.max(1) as i32 - 1);
        match self.scale {
            AxisScale::Category => self.category_ticks(s, ctx),
            AxisScale::Linear => self.linear_ticks(s, divisor, request, ctx),
            AxisScale::Log => self.log_ticks(s, request, ctx),
            AxisScale::Date | AxisScale::DateTime => self.date_ticks(s, divisor, request),
        }
    }

    /// Device positions of the long ticks on every segment.
    pub fn grid_line_positions(&self, request: TickRequest, ctx: &dyn ChartContext) -> Vec<f64> {
        (0..self.segments.len())
            .flat_map(|i| {
                self.label_ticks(i, request, ctx)
                    .into_iter()
                    .filter(|t| t.length == TickLength::Long)
                    .map(move |t| self.map_to_device(t.position, i))
            })
            .collect()
    }

    fn transformed_label(&self, value: f64, request: TickRequest, ctx: &dyn ChartContext) -> String {
        match self.label_transforms.get(&request.side) {
            Some(transform) => self.label(transform(value), ctx),
            None => self.label(value, ctx),
        }
    }

    fn category_ticks(&self, s: &Segment, ctx: &dyn ChartContext) -> Vec<TickLabel> {
        let interval = (self.render_interval as i64).max(1);
        let mut ticks = Vec::new();
        if interval == 1 {
            ticks.push(TickLabel::unlabeled(s.render_minimum, TickLength::Long));
            let mut i = (s.render_minimum + 0.5) as i64;
            while (i as f64) < s.render_maximum && ticks.len() < MAX_TICKS {
                let value = i as f64;
                ticks.push(TickLabel::unlabeled(value + 0.5, TickLength::Long));
                ticks.push(TickLabel::new(value, TickLength::Zero, self.label(value, ctx)));
                i += 1;
            }
        } else {
            let mut i = s.render_minimum as i64;
            while (i as f64) < s.render_maximum && ticks.len() < MAX_TICKS {
                let value = i as f64;
                ticks.push(TickLabel::new(value, TickLength::Long, self.label(value, ctx)));
                i += interval;
            }
        }
        ticks
    }

    /// Every other tick is long and labelled.
    fn linear_ticks(
        &self,
        s: &Segment,
        divisor: f64,
        request: TickRequest,
        ctx: &dyn ChartContext,
    ) -> Vec<TickLabel> {
        let interval = self.render_interval / divisor;
        let mut ticks = Vec::new();
        for i in 0..MAX_TICKS {
            let value = s.render_minimum + interval * i as f64;
            if value - s.render_maximum > EPSILON * interval {
                break;
            }
            if i % 2 == 0 {
                let label = self.transformed_label(value, request, ctx);
                ticks.push(TickLabel::new(value, TickLength::Long, label));
            } else {
                ticks.push(TickLabel::unlabeled(value, TickLength::Short));
            }
        }
        ticks
    }

    /// Long labelled ticks on decades, short ones at each multiple between.
    fn log_ticks(&self, s: &Segment, request: TickRequest, ctx: &dyn ChartContext) -> Vec<TickLabel> {
        let mut value = if s.render_minimum > 0.0 {
            s.render_minimum
        } else {
            1e-4
        };
        let mut decade = value;
        let mut step = 0;
        let mut ticks = Vec::new();
        while ticks.len() < MAX_TICKS {
            if value - s.render_maximum > EPSILON * s.render_maximum {
                break;
            }
            if step == 9 {
                decade *= 10.0;
                value = decade;
                step = 0;
            }
            if step == 0 {
                let label = self.transformed_label(value, request, ctx);
                ticks.push(TickLabel::new(value, TickLength::Long, label));
            } else {
                ticks.push(TickLabel::unlabeled(value, TickLength::Short));
            }
            value += decade;
            step += 1;
        }
        ticks
    }

    /// Calendar ticks. When single coarse steps are not labelled at the tick,
    /// the label moves to a zero-length tick halfway to the next one.
    fn date_ticks(&self, s: &Segment, divisor: f64, request: TickRequest) -> Vec<TickLabel> {
        let scale = self.scale;
        let Some(mut dt) = calendar::decode(scale, s.render_minimum) else {
            return Vec::new();
        };
        let (unit, interval) = if request.zoom_level <= 1 {
            (s.date_time_unit, s.date_time_interval.max(1))
        } else {
            let days = match scale {
                AxisScale::Date => self.render_interval,
                _ => self.render_interval / calendar::SECONDS_PER_DAY,
            };
            match calendar::select_interval(days / divisor) {
                (unit, _) if scale == AxisScale::Date && unit < DateTimeUnit::Days => {
                    (DateTimeUnit::Days, 1)
                }
                selected => selected,
            }
        };
        let at_tick = self.labels_at_ticks(unit, interval);
        let format = self.label_format();
        let transform = self.label_transforms.get(&request.side);

        let mut ticks = Vec::new();
        while ticks.len() < MAX_TICKS {
            let value = calendar::encode(scale, dt);
            if value > s.render_maximum {
                break;
            }
            let Some(next) = calendar::advance(dt, unit, interval) else {
                break;
            };
            let shown = match transform {
                Some(transform) => calendar::decode(scale, transform(value)),
                None => Some(dt),
            };
            let text = shown.map(|d| format_date(d, &format)).unwrap_or_default();

            if value >= s.render_minimum {
                let label = if at_tick { text.clone() } else { String::new() };
                ticks.push(TickLabel::new(value, TickLength::Long, label));
            }
            if !at_tick {
                let middle = (calendar::encode(scale, next) + value) / 2.0;
                if middle >= s.render_minimum && middle <= s.render_maximum {
                    ticks.push(TickLabel::new(middle, TickLength::Zero, text));
                }
            }
            dt = next;
        }
        ticks
    }
}
