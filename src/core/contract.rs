//! The logging contract every logger implements
//!
//! A concrete logger only provides the four sink operations. Everything a call
//! site uses (the leveled calls, translation, formatting and truncation) is a
//! provided method on [`Log`], and none of it can fail from the caller's point of
//! view: formatting errors and panics raised by a sink are caught, handed to
//! [`Log::discard`] and dropped.

use super::args::Arg;
use super::error::LoggerError;
use super::log_level::LogLevel;
use super::printf::{format_message, truncate_message};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Message id used by [`Log::debug`]
pub const DEBUG_MESSAGE_ID: &str = "dbg";

/// Capability surface of every logger
///
/// # Example
///
/// ```
/// use rust_section_logger::prelude::*;
///
/// let logger = MemoryLogger::new();
/// logger.warn("MeshCheck", "%d degenerate faces in '%s'", &[Arg::from(3), Arg::from("hull")]);
///
/// assert_eq!(logger.messages(LogLevel::Warn), vec!["3 degenerate faces in 'hull'"]);
/// ```
pub trait Log: Send + Sync {
    /// Record a line meant for log analysis tools
    fn analysis_out(&self, msg: &str, id: &str);
    /// Record a user-facing progress line
    fn info_out(&self, msg: &str, id: &str);
    /// Record a warning or non-fatal error
    fn warn_out(&self, msg: &str, id: &str);
    /// Record an error after which results are undefined
    fn error_out(&self, msg: &str, id: &str);

    /// Rewrite a message template before formatting, keeping its printf shape
    ///
    /// The default only turns the `%t` duration placeholder into `%f`.
    fn translate(&self, _id: &str, template: &str) -> String {
        normalize_duration_placeholder(template)
    }

    /// Numeric side channel for progress reporting
    fn progress_hint(&self, _param: i32) -> f64 {
        0.0
    }

    /// Destinations are about to receive output. Each flag is true when that
    /// level writes to a destination not shared with an earlier level.
    fn on_start(&self, _info: bool, _warn: bool, _error: bool) {}

    /// Destinations are about to be released; flags as in [`Log::on_start`]
    fn on_finish(&self, _info: bool, _warn: bool, _error: bool) {}

    /// A message was dropped instead of being recorded
    fn discard(&self, _error: LoggerError) {}

    /// Route an already formatted message to the sink of `level`
    fn dispatch(&self, level: LogLevel, msg: &str, id: &str) {
        match level {
            LogLevel::Analysis => self.analysis_out(msg, id),
            LogLevel::Info => self.info_out(msg, id),
            LogLevel::Warn => self.warn_out(msg, id),
            LogLevel::Error => self.error_out(msg, id),
        }
    }

    /// Translate, format, truncate and record one message
    fn log(&self, level: LogLevel, id: &str, template: &str, args: &[Arg]) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let template = self.translate(id, template);
            format_message(&template, args).map(|msg| self.dispatch(level, &msg, id))
        }));
        settle(self, outcome);
    }

    /// Record text that needs no template substitution
    fn log_message(&self, level: LogLevel, id: &str, text: &str) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.dispatch(level, &truncate_message(text), id);
            Ok(())
        }));
        settle(self, outcome);
    }

    fn analysis(&self, id: &str, template: &str, args: &[Arg]) {
        self.log(LogLevel::Analysis, id, template, args);
    }

    fn info(&self, id: &str, template: &str, args: &[Arg]) {
        self.log(LogLevel::Info, id, template, args);
    }

    fn warn(&self, id: &str, template: &str, args: &[Arg]) {
        self.log(LogLevel::Warn, id, template, args);
    }

    /// Report an error. Only records it; unwinding is up to the caller.
    fn error(&self, id: &str, template: &str, args: &[Arg]) {
        self.log(LogLevel::Error, id, template, args);
    }

    /// Debug-build diagnostics, sent untranslated to the info sink as `DEBUG:...`
    fn debug(&self, template: &str, args: &[Arg]) {
        if !cfg!(debug_assertions) {
            return;
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            format_message(template, args).map(|msg| {
                let line = truncate_message(&format!("DEBUG:{}", msg));
                self.info_out(&line, DEBUG_MESSAGE_ID)
            })
        }));
        settle(self, outcome);
    }
}

fn settle<L: Log + ?Sized>(
    log: &L,
    outcome: std::thread::Result<super::error::Result<()>>,
) {
    let error = match outcome {
        Ok(Ok(())) => return,
        Ok(Err(e)) => e,
        Err(payload) => LoggerError::sink_panicked(panic_message(payload.as_ref())),
    };
    let _ = panic::catch_unwind(AssertUnwindSafe(|| log.discard(error)));
}

/// Describe a panic payload, or `"unknown"` when it carries no text
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown".to_string()
    }
}

/// Rewrite every `%t` placeholder into `%f`, leaving `%%t` alone
pub fn normalize_duration_placeholder(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c != '%' {
            continue;
        }
        match chars.peek() {
            Some('%') => {
                out.push('%');
                chars.next();
            }
            Some('t') => {
                let mut ahead = chars.clone();
                ahead.next();
                if !matches!(ahead.peek(), Some('d' | 'i' | 'u' | 'x' | 'X' | 'o')) {
                    out.push('f');
                    chars.next();
                }
            }
            _ => {}
        }
    }
    out
}

/// A logger that records nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Log for NullLogger {
    fn analysis_out(&self, _msg: &str, _id: &str) {}
    fn info_out(&self, _msg: &str, _id: &str) {}
    fn warn_out(&self, _msg: &str, _id: &str) {}
    fn error_out(&self, _msg: &str, _id: &str) {}
}

impl fmt::Debug for dyn Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Log")
    }
}
