use blake3::Hash;

use crate::client::page::Page;
use crate::client::reflow::{AdjustOutcome, ClientLayout};
use crate::error::Result;
use crate::logging::{LogLevel, Logger, emit, json_kv, json_str};
use crate::metrics::{MetricSnapshot, ReflowMetrics};
use crate::session::Statement;

const LOG_TARGET: &str = "trellis::registry";

#[derive(Debug)]
struct Entry {
    layout: ClientLayout,
    digest: Hash,
    /// Config changed since the container was last marked dirty.
    stale: bool,
}

/// Every client layout on a page, in registration order.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    entries: Vec<Entry>,
    adjusting: bool,
    metrics: ReflowMetrics,
    logger: Option<Logger>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Register `layout`, replacing any entry with the same id.
    ///
    /// Returns `true` when the stored config changed.
    pub fn add(&mut self, layout: ClientLayout) -> bool {
        let digest = layout.config().digest();
        match self.entries.iter_mut().find(|e| e.layout.id() == layout.id()) {
            Some(entry) if entry.digest == digest => false,
            Some(entry) => {
                entry.layout = layout;
                entry.digest = digest;
                entry.stale = true;
                true
            }
            None => {
                self.entries.push(Entry {
                    layout,
                    digest,
                    stale: true,
                });
                true
            }
        }
    }

    /// `Some(id)` marks that layout for recomputation on the next sweep;
    /// `None` runs the sweep, dropping layouts whose container is gone.
    pub fn adjust(&mut self, id: Option<&str>, page: &mut Page) {
        match id {
            Some(id) => {
                if self.contains(id) {
                    page.mark_dirty(id);
                }
            }
            None => self.adjust_all(page),
        }
    }

    fn adjust_all(&mut self, page: &mut Page) {
        if self.adjusting {
            return;
        }
        self.adjusting = true;
        self.metrics.record_pass();

        let before = self.entries.len();
        let mut entries = std::mem::take(&mut self.entries);
        entries.retain_mut(|entry| {
            if entry.stale {
                page.mark_dirty(entry.layout.id());
                entry.stale = false;
            }
            let outcome = entry.layout.adjust_outcome(page);
            match outcome {
                AdjustOutcome::Reflowed => self.metrics.record_reflow(),
                AdjustOutcome::Unchanged => self.metrics.record_memo_hit(),
                AdjustOutcome::Deferred => self.metrics.record_deferred(),
                AdjustOutcome::Missing => emit(
                    self.logger.as_ref(),
                    LogLevel::Debug,
                    LOG_TARGET,
                    "dropping layout without container",
                    [json_str("id", entry.layout.id())],
                ),
            }
            outcome.keep()
        });
        self.entries = entries;

        let dropped = before - self.entries.len();
        if dropped > 0 {
            self.metrics.record_deregistered(dropped);
            emit(
                self.logger.as_ref(),
                LogLevel::Info,
                LOG_TARGET,
                "deregistered layouts",
                [json_kv("count", dropped)],
            );
        }
        self.adjusting = false;
    }

    /// Feed one client statement produced by a session.
    pub fn apply(&mut self, statement: &Statement, page: &mut Page) -> Result<()> {
        match statement {
            Statement::LoadScript { .. } => {}
            Statement::RegisterLayout(config) => {
                self.add(ClientLayout::new(config.clone()));
            }
            Statement::AdjustLayouts(id) => self.adjust(id.as_deref(), page),
        }
        Ok(())
    }

    pub fn apply_all<'a, I>(&mut self, statements: I, page: &mut Page) -> Result<()>
    where
        I: IntoIterator<Item = &'a Statement>,
    {
        for statement in statements {
            self.apply(statement, page)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ClientLayout> {
        self.entries
            .iter()
            .find(|e| e.layout.id() == id)
            .map(|e| &e.layout)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut ClientLayout> {
        self.entries
            .iter_mut()
            .find(|e| e.layout.id() == id)
            .map(|e| &mut e.layout)
    }

    /// Record a config edited in place (drag resize) so the digest stays current.
    pub(crate) fn refresh_digest(&mut self, id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.layout.id() == id) {
            entry.digest = entry.layout.config().digest();
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.layout.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_adjusting(&self) -> bool {
        self.adjusting
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut ReflowMetrics {
        &mut self.metrics
    }

    pub fn metrics(&self) -> MetricSnapshot {
        self.metrics.snapshot()
    }

    /// Write the current counters to the logger.
    pub fn log_metrics(&self) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(self.metrics().to_log_event(LOG_TARGET));
        }
    }
}
