//! Scoped sections
//!
//! A section brackets one logical operation. Opening it records a begin line,
//! closing it records an end line, and if the operation fails or unwinds
//! before the section is closed a warning says so. Failures are only
//! annotated: errors are returned and panics resumed unchanged.
//!
//! ```
//! use rust_section_logger::prelude::*;
//!
//! let logger = MemoryLogger::new();
//! let loaded: std::result::Result<u32, String> =
//!     section::run(&logger, "Load", || Err("disk full".to_string()));
//!
//! assert_eq!(loaded, Err("disk full".to_string()));
//! assert_eq!(logger.messages(LogLevel::Info), vec!["Section Load started"]);
//! assert_eq!(
//!     logger.messages(LogLevel::Warn),
//!     vec!["Section Load not completed due to: disk full"]
//! );
//! ```

use super::args::Arg;
use super::contract::{panic_message, Log};
use super::stream::{section_label, MessageStream};
use std::convert::Infallible;
use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe};

/// Message id of the incomplete-section warning
pub const SECTION_FAILURE_ID: &str = "SectException";
/// Message id of the index mismatch warning
pub const SECTION_INDEX_MISMATCH_ID: &str = "SectIndexMismatch";
/// Failure description used when none is available
pub const UNKNOWN_FAILURE: &str = "unknown";
/// Failure description for a guard dropped while its thread panics
pub const UNWINDING_FAILURE: &str = "unwinding";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Open,
    Closed,
    Failed,
}

/// Guard for an open section
///
/// Dropping a guard that is still open reports the section as not completed,
/// which covers early returns through `?` as well as unwinding. A guard
/// cannot see the panic payload, so it reports `unwinding` while the thread
/// panics and `unknown` otherwise. Only [`run`], [`run_indexed`] and [`guard`]
/// quote the panic message.
#[must_use = "dropping a section right away reports it as not completed"]
pub struct Section<'a> {
    logger: &'a dyn Log,
    id: String,
    index: Option<i64>,
    state: SectionState,
}

impl<'a> Section<'a> {
    pub fn begin(logger: &'a dyn Log, id: impl Into<String>) -> Self {
        Self::open(logger, id.into(), None, None)
    }

    pub fn begin_indexed(logger: &'a dyn Log, id: impl Into<String>, index: i64) -> Self {
        Self::open(logger, id.into(), Some(index), None)
    }

    /// Begin with a note appended to the begin line
    pub fn begin_with(
        logger: &'a dyn Log,
        id: impl Into<String>,
        index: Option<i64>,
        note: impl Display,
    ) -> Self {
        Self::open(logger, id.into(), index, Some(&note as &dyn Display))
    }

    fn open(
        logger: &'a dyn Log,
        id: String,
        index: Option<i64>,
        note: Option<&dyn Display>,
    ) -> Self {
        let mut begin = MessageStream::section_begin(logger, &id, index);
        if let Some(note) = note {
            begin.append(": ").append(note);
        }
        begin.flush();
        Self {
            logger,
            id,
            index,
            state: SectionState::Open,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> Option<i64> {
        self.index
    }

    pub fn state(&self) -> SectionState {
        self.state
    }

    /// `id`, or `id[index]` for indexed sections
    pub fn label(&self) -> String {
        section_label(&self.id, self.index)
    }

    pub fn end(mut self) {
        self.close(None);
    }

    /// End with a note appended to the end line
    pub fn end_with(mut self, note: impl Display) {
        self.close(Some(&note as &dyn Display));
    }

    /// End an indexed section, checking the index it was begun with
    ///
    /// A mismatch is reported as a warning before the end line; the section
    /// still ends normally.
    pub fn end_indexed(mut self, index: i64) {
        if self.index != Some(index) {
            let begun = match self.index {
                Some(expected) => expected.to_string(),
                None => "no index".to_string(),
            };
            self.logger.warn(
                SECTION_INDEX_MISMATCH_ID,
                "Section %s ended with index %d, begun with %s",
                &[Arg::from(self.id.as_str()), Arg::from(index), Arg::from(begun)],
            );
        }
        self.close(None);
    }

    /// Report the section as not completed because of `reason`
    pub fn fail(mut self, reason: impl Display) {
        self.report_failure(&reason.to_string());
    }

    fn close(&mut self, note: Option<&dyn Display>) {
        let mut end = MessageStream::section_end(self.logger, &self.id, self.index);
        if let Some(note) = note {
            end.append(": ").append(note);
        }
        end.flush();
        self.state = SectionState::Closed;
    }

    fn report_failure(&mut self, description: &str) {
        self.state = SectionState::Failed;
        self.logger.warn(
            SECTION_FAILURE_ID,
            "Section %s not completed due to: %s",
            &[Arg::from(self.label()), Arg::from(description)],
        );
    }
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        if self.state == SectionState::Open {
            if std::thread::panicking() {
                self.report_failure(UNWINDING_FAILURE);
            } else {
                self.report_failure(UNKNOWN_FAILURE);
            }
        }
    }
}

impl fmt::Debug for Section<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("state", &self.state)
            .finish()
    }
}

/// Run `body` inside a section
///
/// `Ok` ends the section. `Err` is reported with its `Display` text and
/// returned as is. A panic is reported with its message and resumed.
pub fn run<T, E: Display>(
    logger: &dyn Log,
    id: &str,
    body: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    bracket(Section::begin(logger, id), None, body)
}

/// [`run`] for an indexed section
pub fn run_indexed<T, E: Display>(
    logger: &dyn Log,
    id: &str,
    index: i64,
    body: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    bracket(Section::begin_indexed(logger, id, index), Some(index), body)
}

/// [`run`] for a body that cannot return an error
pub fn guard<T>(logger: &dyn Log, id: &str, body: impl FnOnce() -> T) -> T {
    match run(logger, id, || Ok::<T, Infallible>(body())) {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

fn bracket<T, E: Display>(
    section: Section<'_>,
    end_index: Option<i64>,
    body: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => {
            match end_index {
                Some(index) => section.end_indexed(index),
                None => section.end(),
            }
            Ok(value)
        }
        Ok(Err(e)) => {
            section.fail(&e);
            Err(e)
        }
        Err(payload) => {
            section.fail(panic_message(payload.as_ref()));
            panic::resume_unwind(payload)
        }
    }
}
