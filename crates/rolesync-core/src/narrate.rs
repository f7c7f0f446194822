//! Run narration.
//!
//! Services narrate every step of a batch through a `Narrator`; the sinks
//! (console, Discord channel) decide formatting and delivery. Narration is
//! fire-and-forget: a sink must never block or fail the run.

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
    Fatal,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Narrator: Send + Sync {
    fn narrate(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.narrate(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.narrate(Level::Error, message);
    }

    fn fatal(&self, message: &str) {
        self.narrate(Level::Fatal, message);
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Console sink backed by `tracing`.
pub struct TracingNarrator;

impl Narrator for TracingNarrator {
    fn narrate(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{message}"),
            Level::Error => tracing::error!("{message}"),
            Level::Fatal => tracing::error!("fatal: {message}"),
        }
    }
}

/// Fan-out to several sinks in order.
pub struct CompositeNarrator {
    sinks: Vec<Arc<dyn Narrator>>,
}

impl CompositeNarrator {
    pub fn new(sinks: Vec<Arc<dyn Narrator>>) -> Self {
        Self { sinks }
    }
}

impl Narrator for CompositeNarrator {
    fn narrate(&self, level: Level, message: &str) {
        for sink in &self.sinks {
            sink.narrate(level, message);
        }
    }
}

// ---------------------------------------------------------------------------
// Test sink
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) struct BufferNarrator {
    pub lines: std::sync::Mutex<Vec<(Level, String)>>,
}

#[cfg(test)]
impl BufferNarrator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            lines: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

#[cfg(test)]
impl Narrator for BufferNarrator {
    fn narrate(&self, level: Level, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_forwards_to_every_sink() {
        let a = BufferNarrator::new();
        let b = BufferNarrator::new();
        let composite = CompositeNarrator::new(vec![
            a.clone() as Arc<dyn Narrator>,
            b.clone() as Arc<dyn Narrator>,
        ]);
        composite.error("boom");
        assert!(a.contains(Level::Error, "boom"));
        assert!(b.contains(Level::Error, "boom"));
    }
}
