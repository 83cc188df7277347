//! In-memory capture for tests and embedding hosts
//!
//! [`MemoryLogger`] implements the logging contract directly and keeps every
//! record, which makes it the natural personal logger in unit tests.
//! [`SharedBuffer`] is a cloneable byte sink to hand to a multiplexed sink as a
//! borrowed destination.

use crate::appenders::destination::{shared_writer, SharedWriter};
use crate::core::{Log, LogLevel, LoggerError};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// One recorded message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub level: LogLevel,
    pub id: String,
    pub message: String,
}

/// Logger that stores records instead of writing them anywhere
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<Record>>,
    discarded: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a new logger in an `Arc`, ready to be installed as a personal logger
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    /// Take all records, leaving the logger empty
    pub fn drain(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Messages recorded at `level`, in order
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.records.lock().iter().filter(|r| r.level == level).count()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Descriptions of messages dropped by the no-throw guarantee
    pub fn discarded(&self) -> Vec<String> {
        self.discarded.lock().clone()
    }

    fn push(&self, level: LogLevel, msg: &str, id: &str) {
        self.records.lock().push(Record {
            level,
            id: id.to_string(),
            message: msg.to_string(),
        });
    }
}

impl Log for MemoryLogger {
    fn analysis_out(&self, msg: &str, id: &str) {
        self.push(LogLevel::Analysis, msg, id);
    }

    fn info_out(&self, msg: &str, id: &str) {
        self.push(LogLevel::Info, msg, id);
    }

    fn warn_out(&self, msg: &str, id: &str) {
        self.push(LogLevel::Warn, msg, id);
    }

    fn error_out(&self, msg: &str, id: &str) {
        self.push(LogLevel::Error, msg, id);
    }

    fn discard(&self, error: LoggerError) {
        self.discarded.lock().push(error.to_string());
    }
}

/// Cloneable in-memory byte sink; every clone appends to the same buffer
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new writer handle over this buffer.
    ///
    /// Every call creates a distinct handle; pass the same handle to several
    /// levels to have them share one destination.
    pub fn writer(&self) -> SharedWriter {
        shared_writer(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Arg;

    #[test]
    fn test_memory_logger_records_in_order() {
        let logger = MemoryLogger::new();
        logger.info("A", "first", &[]);
        logger.warn("B", "second %d", &[Arg::from(2)]);

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.count(LogLevel::Warn), 1);
        let drained = logger.drain();
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].id, "B");
        assert!(logger.is_empty());
    }

    #[test]
    fn test_shared_buffer_clones_share_bytes() {
        let buffer = SharedBuffer::new();
        let mut clone = buffer.clone();
        writeln!(clone, "line one").unwrap();
        writeln!(buffer.writer().lock(), "line two").unwrap();

        assert_eq!(buffer.lines(), vec!["line one", "line two"]);
    }
}
