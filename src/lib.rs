//! # Rust Section Logger
//!
//! Logging core for libraries embedded in larger host applications. Objects
//! that report progress log through a shared contract instead of writing
//! output themselves, and the host decides where it goes.
//!
//! ## Features
//!
//! - **Delegation**: every object owns a personal logger, inherits its
//!   parent's, or stays silent
//! - **No-throw logging**: printf-style templates are formatted into bounded
//!   messages; formatting failures and sink panics never reach the caller
//! - **Three destinations**: info, warnings and errors go to files, writers or
//!   the console, with shared destinations written once
//! - **Sections**: scoped begin/end lines and a warning for every operation
//!   that fails or unwinds before it completes
//!
//! ## Example
//!
//! ```
//! use rust_section_logger::prelude::*;
//!
//! struct Solver {
//!     logging: DelegatingLogger,
//! }
//!
//! impl Loggable for Solver {
//!     fn logging(&self) -> &DelegatingLogger {
//!         &self.logging
//!     }
//! }
//!
//! impl Solver {
//!     fn solve(&self) -> std::result::Result<f64, String> {
//!         section::run(self.logger(), "Solve", || {
//!             self.logger().info("Solve", "residual %.2e", &[Arg::from(1.5e-7)]);
//!             Ok(0.25)
//!         })
//!     }
//! }
//!
//! let buffer = SharedBuffer::new();
//! let host = StreamLogger::builder()
//!     .info(buffer.writer())
//!     .title_flags(TitleFlags::NONE)
//!     .build();
//!
//! let solver = Solver { logging: DelegatingLogger::new() };
//! solver.set_personal_logger(Some(std::sync::Arc::new(host)));
//! assert_eq!(solver.solve(), Ok(0.25));
//!
//! assert_eq!(
//!     buffer.lines(),
//!     vec!["Section Solve started", "residual 1.50e-07", "Section Solve finished"]
//! );
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        Banner, MemoryLogger, MultiplexedSink, OpenMode, SharedBuffer, SharedWriter,
        StreamLogger, StreamLoggerBuilder, Target,
    };
    pub use crate::config::LoggerConfig;
    pub use crate::core::section;
    pub use crate::core::{
        Arg, Channel, DelegatingLogger, FormatterConfig, FormattingLogger, Log, LogCounters,
        LogLevel, Loggable, LoggerError, MessageStream, NullLogger, Presenter, Result, Section,
        StandardTitles, TitleFlags, TitleFormat, Translator,
    };
}

pub use crate::appenders::{MemoryLogger, StreamLogger, StreamLoggerBuilder};
pub use crate::config::LoggerConfig;
pub use crate::core::{
    Arg, Channel, DelegatingLogger, FormatterConfig, FormattingLogger, Log, LogCounters, LogLevel,
    Loggable, LoggerError, MessageStream, NullLogger, Presenter, Result, Section, TitleFlags,
};
