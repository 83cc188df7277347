//! Building one message across several expressions
//!
//! A [`MessageStream`] is bound to a logger, a level and a message id. Values
//! are appended with [`MessageStream::append`] or `write!`, and the text is
//! recorded with a single leveled call when the stream is flushed or dropped.

use super::contract::Log;
use super::log_level::LogLevel;
use super::printf::{BoundedString, MAX_MESSAGE_LEN};
use std::fmt::{self, Display, Write as _};

/// Accumulates one message and records it exactly once
///
/// # Example
///
/// ```
/// use rust_section_logger::prelude::*;
///
/// let logger = MemoryLogger::new();
/// {
///     let mut msg = MessageStream::new(&logger, LogLevel::Info, "Solver");
///     msg.append("iterations: ").append(12);
///     msg.append(", residual: ").append(0.5);
/// }
///
/// assert_eq!(logger.messages(LogLevel::Info), vec!["iterations: 12, residual: 0.5"]);
/// ```
pub struct MessageStream<'a> {
    logger: &'a dyn Log,
    level: LogLevel,
    id: String,
    buffer: BoundedString,
    flushed: bool,
}

impl<'a> MessageStream<'a> {
    pub fn new(logger: &'a dyn Log, level: LogLevel, id: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            id: id.into(),
            buffer: BoundedString::new(MAX_MESSAGE_LEN),
            flushed: false,
        }
    }

    pub fn analysis(logger: &'a dyn Log, id: impl Into<String>) -> Self {
        Self::new(logger, LogLevel::Analysis, id)
    }

    pub fn info(logger: &'a dyn Log, id: impl Into<String>) -> Self {
        Self::new(logger, LogLevel::Info, id)
    }

    pub fn warn(logger: &'a dyn Log, id: impl Into<String>) -> Self {
        Self::new(logger, LogLevel::Warn, id)
    }

    pub fn error(logger: &'a dyn Log, id: impl Into<String>) -> Self {
        Self::new(logger, LogLevel::Error, id)
    }

    /// Info-level stream pre-filled with the begin line of a section
    pub fn section_begin(logger: &'a dyn Log, id: &str, index: Option<i64>) -> Self {
        let mut stream = Self::info(logger, id);
        stream.append("Section ").append(section_label(id, index)).append(" started");
        stream
    }

    /// Info-level stream pre-filled with the end line of a section
    pub fn section_end(logger: &'a dyn Log, id: &str, index: Option<i64>) -> Self {
        let mut stream = Self::info(logger, id);
        stream.append("Section ").append(section_label(id, index)).append(" finished");
        stream
    }

    /// Append one value using its `Display` form
    ///
    /// Appends after the stream was flushed are ignored.
    pub fn append<T: Display>(&mut self, value: T) -> &mut Self {
        if !self.flushed {
            let _ = write!(self.buffer, "{}", value);
        }
        self
    }

    /// The text accumulated so far
    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Record the message; later calls do nothing
    pub fn flush(&mut self) {
        if self.flushed {
            return;
        }
        self.flushed = true;
        self.logger
            .log_message(self.level, &self.id, self.buffer.as_str());
    }
}

impl fmt::Write for MessageStream<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s);
        Ok(())
    }
}

impl Drop for MessageStream<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

impl fmt::Debug for MessageStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageStream")
            .field("level", &self.level)
            .field("id", &self.id)
            .field("text", &self.text())
            .field("flushed", &self.flushed)
            .finish()
    }
}

/// `id`, or `id[index]` for indexed sections
pub(crate) fn section_label(id: &str, index: Option<i64>) -> String {
    match index {
        Some(index) => format!("{}[{}]", id, index),
        None => id.to_string(),
    }
}
