//! Structured JSON logging.
//!
//! Configuration mistakes (unknown layout hints, unparsable label formats) are
//! reported here and otherwise ignored, so the layout always renders.

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

pub type LogFields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub ts_ms: u128,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "LogFields::is_empty", default)]
    pub fields: LogFields,
}

impl LogEvent {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ts_ms: current_ms(),
            level,
            target: target.into(),
            message: message.into(),
            fields: LogFields::new(),
        }
    }

    pub fn with_fields(
        level: LogLevel,
        target: impl Into<String>,
        message: impl Into<String>,
        fields: LogFields,
    ) -> Self {
        Self {
            fields,
            ..Self::new(level, target, message)
        }
    }
}

fn current_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

pub type LoggingResult<T> = std::result::Result<T, LoggingError>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("log sink lock poisoned")]
    Poisoned,
}

pub trait LogSink: Send + Sync {
    fn log(&self, event: &LogEvent) -> LoggingResult<()>;
}

#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

impl Logger {
    pub fn new<S>(sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Wraps an already shared sink, e.g. a [`MemorySink`] a test keeps a handle to.
    pub fn from_shared(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub fn log_event(&self, event: LogEvent) -> LoggingResult<()> {
        self.sink.log(&event)
    }
}

/// Emit an event through an optional logger, reporting sink failures.
pub fn try_emit<I>(
    logger: Option<&Logger>,
    level: LogLevel,
    target: &str,
    message: &str,
    fields: I,
) -> LoggingResult<()>
where
    I: IntoIterator<Item = (String, Value)>,
{
    match logger {
        Some(logger) => logger.log_event(event_with_fields(level, target, message, fields)),
        None => Ok(()),
    }
}

/// [`try_emit`] for diagnostics that must never interrupt layout or axis
/// work; sink failures are dropped.
pub fn emit<I>(logger: Option<&Logger>, level: LogLevel, target: &str, message: &str, fields: I)
where
    I: IntoIterator<Item = (String, Value)>,
{
    let _ = try_emit(logger, level, target, message, fields);
}

/// Appends JSON lines; past `max_bytes` the file moves to `<path>.1` and a
/// fresh one is started.
pub struct FileSink {
    path: PathBuf,
    max_bytes: u64,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>, max_bytes: u64) -> LoggingResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        Ok(Self {
            path,
            max_bytes,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    fn write_line(&self, mut line: String) -> LoggingResult<()> {
        line.push('\n');
        let mut guard = self.writer.lock().map_err(|_| LoggingError::Poisoned)?;

        if self.should_rotate(guard.get_ref(), line.len() as u64)? {
            guard.flush()?;
            std::fs::rename(&self.path, self.backup_path())?;
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)?;
            *guard = BufWriter::new(file);
        }

        guard.write_all(line.as_bytes())?;
        guard.flush()?;
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".1");
        PathBuf::from(name)
    }

    fn should_rotate(&self, file: &File, incoming: u64) -> std::io::Result<bool> {
        let current = file.metadata()?.len();
        Ok(self.max_bytes > 0 && current > 0 && current + incoming > self.max_bytes)
    }
}

impl LogSink for FileSink {
    fn log(&self, event: &LogEvent) -> LoggingResult<()> {
        let line = serde_json::to_string(event)?;
        self.write_line(line)
    }
}

/// Keeps every event in memory; embedders drain it to forward events elsewhere.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn log(&self, event: &LogEvent) -> LoggingResult<()> {
        let mut guard = self.events.lock().map_err(|_| LoggingError::Poisoned)?;
        guard.push(event.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

pub fn event_with_fields(
    level: LogLevel,
    target: &str,
    message: &str,
    fields: impl IntoIterator<Item = (String, Value)>,
) -> LogEvent {
    let mut map = LogFields::new();
    for (k, v) in fields.into_iter() {
        map.insert(k, v);
    }
    LogEvent::with_fields(level, target.to_string(), message.to_string(), map)
}

pub fn json_kv(key: &str, value: impl Into<Value>) -> (String, Value) {
    (key.to_string(), value.into())
}

pub fn json_str(key: &str, value: impl Into<String>) -> (String, Value) {
    (key.to_string(), json!(value.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_collects_events_with_fields() {
        let sink = Arc::new(MemorySink::new());
        let logger = Logger::from_shared(sink.clone());
        emit(
            Some(&logger),
            LogLevel::Error,
            "trellis::grid",
            "unrecognized hint",
            [json_str("hint", "colour")],
        );

        let events = sink.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, LogLevel::Error);
        assert_eq!(events[0].fields["hint"], json!("colour"));
        assert!(sink.events().is_empty());
    }

    struct PoisonedSink;

    impl LogSink for PoisonedSink {
        fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
            Err(LoggingError::Poisoned)
        }
    }

    #[test]
    fn sink_failures_surface_through_try_emit() {
        let logger = Logger::new(PoisonedSink);
        let result = try_emit(
            Some(&logger),
            LogLevel::Error,
            "trellis::axis",
            "bad label format",
            [json_str("format", "%q")],
        );
        assert!(matches!(result, Err(LoggingError::Poisoned)));
        assert!(try_emit(None, LogLevel::Error, "trellis::axis", "x", std::iter::empty()).is_ok());

        emit(Some(&logger), LogLevel::Warn, "trellis::axis", "dropped", std::iter::empty());
    }

    #[test]
    fn emit_without_logger_is_a_no_op() {
        emit(None, LogLevel::Warn, "trellis::axis", "ignored", std::iter::empty());
        let silent = Logger::new(NullSink);
        assert!(silent.log_event(LogEvent::new(LogLevel::Trace, "trellis::axis", "x")).is_ok());
    }

    #[test]
    fn file_sink_writes_json_lines_and_rotates() {
        let path = std::env::temp_dir().join(format!("trellis-log-{}.jsonl", std::process::id()));
        let backup = path.with_extension("jsonl.1");
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(&backup);

        let sink = FileSink::new(&path, 160).unwrap();
        let event = LogEvent::new(LogLevel::Info, "trellis::registry", "reflow");
        sink.log(&event).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        assert!(first.contains("\"level\":\"info\""));
        assert_eq!(first.lines().count(), 1);

        sink.log(&event).unwrap();
        sink.log(&event).unwrap();
        let current = std::fs::read_to_string(&path).unwrap();
        assert!(current.len() as u64 <= 160);
        assert!(std::fs::read_to_string(&backup).unwrap().lines().count() >= 1);

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(&backup);
    }
}
