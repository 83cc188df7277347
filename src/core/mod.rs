//! Core logger types and traits

pub mod args;
pub mod contract;
pub mod delegate;
pub mod error;
pub mod formatter;
pub mod log_level;
pub mod metrics;
pub mod printf;
pub mod section;
pub mod stream;
pub mod title;

pub use args::Arg;
pub use contract::{normalize_duration_placeholder, Log, NullLogger, DEBUG_MESSAGE_ID};
pub use delegate::{DelegatingLogger, Loggable};
pub use error::{LoggerError, Result};
pub use formatter::{FormattingLogger, Presenter, Translator};
pub use log_level::{Channel, LogLevel};
pub use metrics::LogCounters;
pub use printf::{format_message, BoundedString, MAX_MESSAGE_LEN};
pub use section::{
    Section, SectionState, SECTION_FAILURE_ID, SECTION_INDEX_MISMATCH_ID, UNKNOWN_FAILURE,
    UNWINDING_FAILURE,
};
pub use stream::MessageStream;
pub use title::{compose_title, FormatterConfig, StandardTitles, TitleFlags, TitleFormat};
