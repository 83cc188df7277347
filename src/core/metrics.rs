//! Message counters for the formatting layer
//!
//! Counts warnings and errors reported through a logger, plus messages that
//! were dropped because formatting or presentation failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Running counts kept by a formatting logger
///
/// # Example
///
/// ```
/// use rust_section_logger::LogCounters;
///
/// let counters = LogCounters::new();
/// counters.record_warning();
/// counters.record_error();
/// counters.record_error();
///
/// assert_eq!(counters.warnings(), 1);
/// assert_eq!(counters.errors(), 2);
/// assert!(counters.has_errors());
/// ```
#[derive(Debug, Default)]
pub struct LogCounters {
    /// Warning-level messages received
    warnings: AtomicU64,

    /// Error-level messages received
    errors: AtomicU64,

    /// Messages lost to formatting or presentation failures
    dropped: AtomicU64,
}

impl LogCounters {
    pub const fn new() -> Self {
        Self {
            warnings: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn warnings(&self) -> u64 {
        self.warnings.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    /// Record a warning, returning the previous count
    #[inline]
    pub fn record_warning(&self) -> u64 {
        self.warnings.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an error, returning the previous count
    #[inline]
    pub fn record_error(&self) -> u64 {
        self.errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a dropped message, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.warnings.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
    }
}

impl Clone for LogCounters {
    fn clone(&self) -> Self {
        Self {
            warnings: AtomicU64::new(self.warnings()),
            errors: AtomicU64::new(self.errors()),
            dropped: AtomicU64::new(self.dropped()),
        }
    }
}
