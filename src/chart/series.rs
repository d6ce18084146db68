//! Row lookup over a monotone data column, and zoom factor bucketing.

use crate::chart::context::ChartModel;

/// Find the row of `column` holding `value`, searching `min_row..=max_row`
/// of a column sorted ascending.
///
/// Probes are interpolated from the values at the window ends; a probe that
/// fails to halve the window is followed by a bisection step, which bounds
/// the search on skewed data. Values outside the window clamp to its ends;
/// a value between rows returns one of the two adjacent rows.
pub fn find_row(
    model: &dyn ChartModel,
    column: usize,
    value: f64,
    min_row: usize,
    max_row: usize,
) -> usize {
    let mut lo = min_row;
    let mut hi = max_row.min(model.row_count().saturating_sub(1));
    let mut bisect = false;
    loop {
        if lo >= hi {
            return lo;
        }
        let first = model.data(lo, column);
        let last = model.data(hi, column);
        if value <= first {
            return lo;
        }
        if value >= last {
            return hi;
        }

        let width = hi - lo;
        let probe = if bisect {
            lo + width / 2
        } else {
            let fraction = (value - first) / (last - first);
            (lo + (fraction * width as f64) as usize).min(hi)
        };
        let data = model.data(probe, column);
        if data < value {
            lo = probe + 1;
        } else if data > value {
            hi = probe.saturating_sub(1);
        } else {
            return probe;
        }
        bisect = hi.saturating_sub(lo) > width / 2;
    }
}

/// Tick zoom level for a zoom factor: 1 up to ~1.4x, one more per doubling.
pub fn to_zoom_level(factor: f64) -> i32 {
    (factor.log2() + 0.5).floor() as i32 + 1
}
