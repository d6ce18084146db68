//! Value to device mapping, and the zoom window expressed in axis values.

use crate::chart::axis::Axis;
use crate::chart::types::AxisScale;

impl Axis {
    /// Device position of `value` within one segment. Log axes clamp values
    /// below the segment minimum.
    pub fn map_to_device(&self, value: f64, segment: usize) -> f64 {
        if value.is_nan() {
            return value;
        }
        let Some(s) = self.segments.get(segment) else {
            return f64::NAN;
        };
        let offset = if self.scale == AxisScale::Log {
            let value = value.max(s.render_minimum);
            let (lo, hi) = (s.render_minimum.ln(), s.render_maximum.ln());
            (value.ln() - lo) / (hi - lo) * s.render_length
        } else {
            (value - s.render_minimum) / (s.render_maximum - s.render_minimum) * s.render_length
        };
        if self.inverted {
            self.device_end() - (s.render_start + offset)
        } else {
            s.render_start + offset
        }
    }

    /// Device position of `value` in the first segment that reaches it.
    pub fn map_to_device_auto(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        let last = self.segments.len() - 1;
        let segment = self
            .segments
            .iter()
            .position(|s| value <= s.render_maximum)
            .unwrap_or(last);
        self.map_to_device(value, segment)
    }

    pub fn map_from_device(&self, device: f64) -> f64 {
        let device = if self.inverted {
            self.device_end() - device
        } else {
            device
        };
        let last = self.segments.len() - 1;
        for (i, s) in self.segments.iter().enumerate() {
            let end = if self.inverted {
                self.device_end() - self.map_to_device(s.render_maximum, i)
            } else {
                self.map_to_device(s.render_maximum, i)
            };
            if i == last || device < end {
                if s.render_length == 0.0 {
                    return s.render_minimum;
                }
                let offset = (device - s.render_start) / s.render_length;
                return if self.scale == AxisScale::Log {
                    let (lo, hi) = (s.render_minimum.ln(), s.render_maximum.ln());
                    (lo + offset * (hi - lo)).exp()
                } else {
                    s.render_minimum + offset * (s.render_maximum - s.render_minimum)
                };
            }
        }
        0.0
    }

    /// Whether `value` falls inside a rendered segment rather than a break.
    pub fn is_on_axis(&self, value: f64) -> bool {
        self.segments
            .iter()
            .any(|s| value >= s.render_minimum && value <= s.render_maximum)
    }

    /// Mirror point for inverted axes: far end of the last segment plus the
    /// leading clip.
    fn device_end(&self) -> f64 {
        let first = &self.segments[0];
        let last = &self.segments[self.segments.len() - 1];
        last.render_start + last.render_length + first.render_start
    }

    /// Lowest value visible across the full render length.
    pub fn drawn_minimum(&self) -> f64 {
        if self.inverted {
            self.map_from_device(self.full_render_length)
        } else {
            self.map_from_device(0.0)
        }
    }

    pub fn drawn_maximum(&self) -> f64 {
        if self.inverted {
            self.map_from_device(0.0)
        } else {
            self.map_from_device(self.full_render_length)
        }
    }

    /// Show `[minimum, maximum]`. Bounds are swapped if reversed; a bound
    /// beyond the axis limits resets that end; a window narrower than
    /// [`Axis::minimum_zoom_range`] is widened around its centre.
    pub fn set_zoom_range(&mut self, minimum: f64, maximum: f64) {
        let (minimum, maximum) = ordered(minimum, maximum);
        let mut zoom_min = (minimum > self.minimum()).then_some(minimum);
        let mut zoom_max = (maximum < self.maximum()).then_some(maximum);
        if let (Some(lo), Some(hi)) = (zoom_min, zoom_max) {
            let smallest = self.minimum_zoom_range();
            if hi - lo < smallest {
                let centre = (lo + hi) / 2.0;
                zoom_min = Some(centre - smallest / 2.0);
                zoom_max = Some(centre + smallest / 2.0);
            }
        }
        self.zoom_min = zoom_min;
        self.zoom_max = zoom_max;
    }

    /// Apply a window reported by the client, which already honours the
    /// zoom constraints.
    pub fn set_zoom_range_from_client(&mut self, minimum: f64, maximum: f64) {
        let (minimum, maximum) = ordered(minimum, maximum);
        self.zoom_min = (minimum > self.drawn_minimum()).then_some(minimum);
        self.zoom_max = (maximum < self.drawn_maximum()).then_some(maximum);
    }

    pub fn zoom_minimum(&self) -> f64 {
        let drawn = self.drawn_minimum();
        match self.zoom_min {
            Some(min) if min > drawn => min,
            _ => drawn,
        }
    }

    pub fn zoom_maximum(&self) -> f64 {
        let drawn = self.drawn_maximum();
        match self.zoom_max {
            Some(max) if max < drawn => max,
            _ => drawn,
        }
    }

    /// Zoom by `factor` keeping the current zoom minimum in place.
    pub fn set_zoom(&mut self, factor: f64) {
        let span = self.drawn_maximum() - self.drawn_minimum();
        let start = self.zoom_minimum();
        self.set_zoom_range(start, start + span / factor);
    }

    pub fn zoom(&self) -> f64 {
        if self.zoom_min.is_none() && self.zoom_max.is_none() {
            return 1.0;
        }
        (self.drawn_maximum() - self.drawn_minimum()) / (self.zoom_maximum() - self.zoom_minimum())
    }

    /// Move the zoom window so it starts at `pan`.
    pub fn set_pan(&mut self, pan: f64) {
        let end = self.zoom_maximum() + pan - self.zoom_minimum();
        self.set_zoom_range(pan, end);
    }

    pub fn pan(&self) -> f64 {
        if self.inverted {
            self.zoom_maximum()
        } else {
            self.zoom_minimum()
        }
    }

    /// Largest zoom factor, at least 1. An explicit minimum zoom range is
    /// rescaled to match.
    pub fn set_max_zoom(&mut self, max_zoom: f64) {
        let max_zoom = max_zoom.max(1.0);
        if self.minimum_zoom_range.is_some() {
            self.minimum_zoom_range = Some((self.maximum() - self.minimum()) / max_zoom);
        }
        self.max_zoom = max_zoom;
    }

    pub fn max_zoom(&self) -> f64 {
        let zoom = (self.drawn_maximum() - self.drawn_minimum()) / self.minimum_zoom_range();
        zoom.max(1.0)
    }

    pub fn set_minimum_zoom_range(&mut self, range: f64) {
        self.minimum_zoom_range = Some(range);
    }

    /// Narrowest zoom window; derived from the max zoom unless set.
    pub fn minimum_zoom_range(&self) -> f64 {
        match self.minimum_zoom_range {
            Some(range) => range,
            None => (self.drawn_maximum() - self.drawn_minimum()) / self.max_zoom,
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a { (b, a) } else { (a, b) }
}

#[cfg(test)]
mod tests {
    use crate::chart::axis::Axis;
    use crate::chart::context::StaticContext;
    use crate::chart::types::{AxisId, AxisScale, Orientation};

    fn prepared(scale: AxisScale, minimum: f64, maximum: f64, length: f64) -> Axis {
        let ctx = StaticContext::new().with_range(AxisId::Y, minimum, maximum);
        let mut axis = Axis::new(AxisId::Y);
        axis.set_scale(scale);
        assert!(axis.prepare_render(Orientation::Vertical, length, &ctx));
        axis
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn linear_mapping_round_trips() {
        let axis = prepared(AxisScale::Linear, 0.0, 97.0, 400.0);
        assert_eq!(axis.map_to_device(25.0, 0), 100.0);
        assert_eq!(axis.map_to_device_auto(25.0), 100.0);
        assert_eq!(axis.map_from_device(100.0), 25.0);
        assert!(axis.map_to_device(f64::NAN, 0).is_nan());
    }

    #[test]
    fn inverted_axes_mirror_positions() {
        let mut axis = prepared(AxisScale::Linear, 0.0, 97.0, 400.0);
        axis.set_inverted(true);
        assert_eq!(axis.map_to_device(25.0, 0), 300.0);
        assert_eq!(axis.map_from_device(300.0), 25.0);
        assert_eq!(axis.drawn_minimum(), 0.0);
        assert_eq!(axis.drawn_maximum(), 100.0);
    }

    #[test]
    fn log_mapping_is_logarithmic() {
        let axis = prepared(AxisScale::Log, 1.0, 1000.0, 300.0);
        assert!(close(axis.map_to_device(10.0, 0), 100.0));
        assert!(close(axis.map_from_device(200.0), 100.0));
        assert_eq!(axis.map_to_device(0.5, 0), 0.0);
    }

    #[test]
    fn breaks_leave_a_gap() {
        let ctx = StaticContext::new().with_range(AxisId::Y, 0.0, 1000.0);
        let mut axis = Axis::new(AxisId::Y);
        axis.set_break(100.0, 900.0).unwrap();
        assert!(axis.prepare_render(Orientation::Vertical, 440.0, &ctx));
        assert!(axis.is_on_axis(50.0));
        assert!(axis.is_on_axis(950.0));
        assert!(!axis.is_on_axis(500.0));
        assert_eq!(axis.map_to_device_auto(950.0), 340.0);
        assert_eq!(axis.map_from_device(340.0), 950.0);
    }

    #[test]
    fn zoom_range_is_normalised() {
        let mut axis = prepared(AxisScale::Linear, 0.0, 97.0, 400.0);
        axis.set_zoom_range(80.0, 20.0);
        assert_eq!((axis.zoom_minimum(), axis.zoom_maximum()), (20.0, 80.0));
        assert!(close(axis.zoom(), 100.0 / 60.0));

        axis.set_zoom_range(50.0, 55.0);
        assert_eq!((axis.zoom_minimum(), axis.zoom_maximum()), (40.0, 65.0));

        axis.set_zoom_range(-10.0, 200.0);
        assert_eq!(axis.zoom(), 1.0);
        assert_eq!((axis.zoom_minimum(), axis.zoom_maximum()), (0.0, 100.0));
    }

    #[test]
    fn zoom_and_pan() {
        let mut axis = prepared(AxisScale::Linear, 0.0, 97.0, 400.0);
        axis.set_zoom(2.0);
        assert_eq!(axis.zoom(), 2.0);
        axis.set_pan(30.0);
        assert_eq!(axis.pan(), 30.0);
        assert_eq!(axis.zoom_maximum(), 80.0);

        axis.set_zoom_range_from_client(90.0, 10.0);
        assert_eq!((axis.zoom_minimum(), axis.zoom_maximum()), (10.0, 90.0));
    }

    #[test]
    fn max_zoom_and_minimum_zoom_range_track_each_other() {
        let mut axis = prepared(AxisScale::Linear, 0.0, 97.0, 400.0);
        assert_eq!(axis.max_zoom(), 4.0);
        assert_eq!(axis.minimum_zoom_range(), 25.0);

        axis.set_max_zoom(0.5);
        assert_eq!(axis.max_zoom(), 1.0);

        axis.set_minimum_zoom_range(10.0);
        assert_eq!(axis.max_zoom(), 10.0);
        axis.set_max_zoom(5.0);
        assert_eq!(axis.minimum_zoom_range(), 20.0);
        assert_eq!(axis.max_zoom(), 5.0);
    }
}
