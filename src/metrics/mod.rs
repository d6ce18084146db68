use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters collected by the client-side layout registry.
#[derive(Debug, Default, Clone)]
pub struct ReflowMetrics {
    passes: u64,
    reflows: u64,
    memo_hits: u64,
    deferred: u64,
    deregistered: u64,
    drag_steps: u64,
}

impl ReflowMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A full `adjust()` sweep over every registered layout.
    pub fn record_pass(&mut self) {
        self.passes = self.passes.saturating_add(1);
    }

    pub fn record_reflow(&mut self) {
        self.reflows = self.reflows.saturating_add(1);
    }

    pub fn record_memo_hit(&mut self) {
        self.memo_hits = self.memo_hits.saturating_add(1);
    }

    pub fn record_deferred(&mut self) {
        self.deferred = self.deferred.saturating_add(1);
    }

    pub fn record_deregistered(&mut self, count: usize) {
        if count > 0 {
            self.deregistered = self.deregistered.saturating_add(count as u64);
        }
    }

    pub fn record_drag_step(&mut self) {
        self.drag_steps = self.drag_steps.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            passes: self.passes,
            reflows: self.reflows,
            memo_hits: self.memo_hits,
            deferred: self.deferred,
            deregistered: self.deregistered,
            drag_steps: self.drag_steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub passes: u64,
    pub reflows: u64,
    pub memo_hits: u64,
    pub deferred: u64,
    pub deregistered: u64,
    pub drag_steps: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "reflow_metrics".to_string(),
            self.as_fields(),
        )
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("reflows".to_string(), json!(self.reflows));
        map.insert("memo_hits".to_string(), json!(self.memo_hits));
        map.insert("deferred".to_string(), json!(self.deferred));
        map.insert("deregistered".to_string(), json!(self.deregistered));
        map.insert("drag_steps".to_string(), json!(self.drag_steps));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_counters_as_fields() {
        let mut metrics = ReflowMetrics::new();
        metrics.record_pass();
        metrics.record_reflow();
        metrics.record_reflow();
        metrics.record_deregistered(0);
        metrics.record_deregistered(2);

        let event = metrics.snapshot().to_log_event("trellis::registry");
        assert_eq!(event.message, "reflow_metrics");
        assert_eq!(event.fields["reflows"], json!(2));
        assert_eq!(event.fields["deregistered"], json!(2));
        assert_eq!(event.fields["memo_hits"], json!(0));
    }
}
