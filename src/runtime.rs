//! Entry-point runtime seam: the narrow contract generated facades bind
//! to at run time.
//!
//! The backing logger stays host-owned behind [`EventSink`]; this module
//! only fixes the shape of one delivery: level, event id, event path,
//! message, positional args, optional error. [`CaptureSink`] is the
//! in-memory implementation used by tests.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Log severity for entry points, least to most severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    #[default]
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Trace => write!(f, "trace"),
            Level::Debug => write!(f, "debug"),
            Level::Info => write!(f, "info"),
            Level::Warn => write!(f, "warn"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// A borrowed view of one log call, handed to the sink on delivery.
#[derive(Clone, Copy)]
pub struct EventRecord<'a> {
    pub level: Level,
    pub event_id: i32,
    pub event_path: &'a str,
    pub message: &'a str,
    pub args: &'a [&'a dyn fmt::Display],
    pub error: Option<&'a (dyn Error + 'static)>,
}

/// The logging contract one facade tree binds to.
///
/// Implementations decide enablement per level and own delivery. Sinks are
/// shared across every entry point of a facade tree, so they must be usable
/// from multiple threads.
pub trait EventSink: Send + Sync {
    fn enabled(&self, level: Level) -> bool;
    fn write(&self, record: &EventRecord<'_>);
}

/// One bound leaf entry point: a shared sink plus its id/path pair.
#[derive(Clone)]
pub struct EventPoint {
    sink: Arc<dyn EventSink>,
    event_id: i32,
    event_path: String,
}

impl EventPoint {
    pub fn new(sink: Arc<dyn EventSink>, event_id: i32, event_path: impl Into<String>) -> Self {
        Self { sink, event_id, event_path: event_path.into() }
    }

    pub fn event_id(&self) -> i32 {
        self.event_id
    }

    pub fn event_path(&self) -> &str {
        &self.event_path
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.sink.enabled(level)
    }

    /// Deliver one event; a disabled level returns with no side effects.
    ///
    /// For the duration of the sink write, a tracing span tagged with the
    /// event path is entered. The record always carries the path as well,
    /// so sinks that ignore tracing still see it.
    pub fn log(
        &self,
        level: Level,
        error: Option<&(dyn Error + 'static)>,
        message: &str,
        args: &[&dyn fmt::Display],
    ) {
        if !self.sink.enabled(level) {
            return;
        }
        let span = tracing::debug_span!("event", event_path = %self.event_path);
        let _scope = span.enter();
        self.sink.write(&EventRecord {
            level,
            event_id: self.event_id,
            event_path: &self.event_path,
            message,
            args,
            error,
        });
    }
}

impl fmt::Debug for EventPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPoint")
            .field("event_id", &self.event_id)
            .field("event_path", &self.event_path)
            .finish_non_exhaustive()
    }
}

/// Owned copy of one delivered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub event_id: i32,
    pub event_path: String,
    pub message: String,
    pub args: Vec<String>,
    pub error: Option<String>,
}

/// In-memory sink that records every enabled delivery, for tests.
#[derive(Debug, Default)]
pub struct CaptureSink {
    min_level: Level,
    events: Mutex<Vec<CapturedEvent>>,
}

impl CaptureSink {
    /// A sink with every level enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_level(min_level: Level) -> Self {
        Self { min_level, events: Mutex::new(Vec::new()) }
    }

    /// Snapshot of everything captured so far, in delivery order.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for CaptureSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn write(&self, record: &EventRecord<'_>) {
        self.lock().push(CapturedEvent {
            level: record.level,
            event_id: record.event_id,
            event_path: record.event_path.to_string(),
            message: record.message.to_string(),
            args: record.args.iter().map(|arg| arg.to_string()).collect(),
            error: record.error.map(|e| e.to_string()),
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
