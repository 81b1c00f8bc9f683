//! Structured report channel for rejected operations and faults
//!
//! Every configuration error, lifecycle fault, and rejected mutation is
//! surfaced here for diagnosis instead of being thrown. The sink keeps a
//! bounded buffer of recent entries and mirrors each one to `tracing`
//! at the matching level.

use std::collections::VecDeque;

use crate::core::types::Tick;

/// Severity of a report entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warn,
    Error,
}

/// One rejected operation or fault, with enough context to diagnose it
#[derive(Debug, Clone)]
pub struct Report {
    pub level: ReportLevel,
    /// Name of the entity the report originated from, when known
    pub entity: Option<String>,
    pub message: String,
    /// Frame the report was recorded on
    pub frame: Tick,
}

/// Bounded collector of reports, owned by the room
#[derive(Debug)]
pub struct ReportSink {
    entries: VecDeque<Report>,
    capacity: usize,
    dropped: u64,
    frame: Tick,
}

impl ReportSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
            dropped: 0,
            frame: 0,
        }
    }

    /// Advance the frame stamp applied to subsequent reports
    pub fn set_frame(&mut self, frame: Tick) {
        self.frame = frame;
    }

    pub fn info(&mut self, entity: Option<&str>, message: impl Into<String>) {
        self.push(ReportLevel::Info, entity, message.into());
    }

    pub fn warn(&mut self, entity: Option<&str>, message: impl Into<String>) {
        self.push(ReportLevel::Warn, entity, message.into());
    }

    pub fn error(&mut self, entity: Option<&str>, message: impl Into<String>) {
        self.push(ReportLevel::Error, entity, message.into());
    }

    fn push(&mut self, level: ReportLevel, entity: Option<&str>, message: String) {
        match level {
            ReportLevel::Info => tracing::info!(entity, "{}", message),
            ReportLevel::Warn => tracing::warn!(entity, "{}", message),
            ReportLevel::Error => tracing::error!(entity, "{}", message),
        }
        self.entries.push_back(Report {
            level,
            entity: entity.map(str::to_owned),
            message,
            frame: self.frame,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
    }

    /// Drain all buffered entries in arrival order
    pub fn drain(&mut self) -> Vec<Report> {
        self.entries.drain(..).collect()
    }

    /// Borrow the buffered entries without consuming them
    pub fn entries(&self) -> impl Iterator<Item = &Report> {
        self.entries.iter()
    }

    /// Count buffered entries at a given level
    pub fn count_at(&self, level: ReportLevel) -> usize {
        self.entries.iter().filter(|r| r.level == level).count()
    }

    /// Entries evicted because the buffer was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
