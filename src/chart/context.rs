use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use crate::chart::types::{AxisId, AxisScale};

/// What an axis needs to know about the chart it belongs to.
pub trait ChartContext {
    /// Extent of the data plotted against `axis`, or `None` when there is none.
    fn data_range(&self, axis: AxisId, scale: AxisScale) -> Option<(f64, f64)>;

    fn category_count(&self, axis: AxisId) -> usize;

    fn category_label(&self, _axis: AxisId, _index: usize) -> Option<String> {
        None
    }

    /// Anchor of the default window of an empty date axis.
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Tabular data source for series iteration.
pub trait ChartModel {
    fn row_count(&self) -> usize;
    fn data(&self, row: usize, column: usize) -> f64;
}

/// Column-major table of values.
impl ChartModel for Vec<Vec<f64>> {
    fn row_count(&self) -> usize {
        self.first().map_or(0, Vec::len)
    }

    fn data(&self, row: usize, column: usize) -> f64 {
        self.get(column)
            .and_then(|values| values.get(row))
            .copied()
            .unwrap_or(f64::NAN)
    }
}

/// A fixed [`ChartContext`], for charts whose data is known up front.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    ranges: HashMap<AxisId, (f64, f64)>,
    categories: Vec<String>,
    today: Option<NaiveDate>,
}

impl StaticContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_range(mut self, axis: AxisId, minimum: f64, maximum: f64) -> Self {
        self.ranges.insert(axis, (minimum, maximum));
        self
    }

    pub fn with_categories<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

impl ChartContext for StaticContext {
    fn data_range(&self, axis: AxisId, _scale: AxisScale) -> Option<(f64, f64)> {
        self.ranges.get(&axis).copied()
    }

    fn category_count(&self, _axis: AxisId) -> usize {
        self.categories.len()
    }

    fn category_label(&self, _axis: AxisId, index: usize) -> Option<String> {
        self.categories.get(index).cloned()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}
