//! Logging macros
//!
//! Shorthand for the leveled calls of [`Log`](crate::core::Log): arguments are
//! converted with `Arg::from`, so they can be passed as plain values instead
//! of building the `&[Arg]` slice by hand.
//!
//! # Examples
//!
//! ```
//! use rust_section_logger::prelude::*;
//! use rust_section_logger::{info, section, warn};
//!
//! let logger = MemoryLogger::new();
//!
//! info!(logger, "Mesh", "loaded %d nodes from '%s'", 1200, "wing.msh");
//! warn!(logger, "Mesh", "no boundary conditions");
//!
//! let total = section!(&logger, "Assemble", {
//!     (1..=4).sum::<i32>()
//! });
//!
//! assert_eq!(total, 10);
//! assert_eq!(logger.count(LogLevel::Info), 3);
//! ```

/// Log at an explicit level
///
/// ```
/// # use rust_section_logger::prelude::*;
/// # let logger = MemoryLogger::new();
/// use rust_section_logger::log;
/// log!(logger, LogLevel::Error, "Io", "cannot read %s", "input.dat");
/// # assert_eq!(logger.messages(LogLevel::Error), vec!["cannot read input.dat"]);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $id:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::core::Log as _;
        $logger.log($level, $id, $fmt, &[$($crate::Arg::from($arg)),*])
    }};
}

/// Log a line for analysis tools
#[macro_export]
macro_rules! analysis {
    ($logger:expr, $id:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Analysis, $id, $fmt $(, $arg)*)
    };
}

/// Log a user-facing progress line
///
/// ```
/// # use rust_section_logger::prelude::*;
/// # let logger = MemoryLogger::new();
/// use rust_section_logger::info;
/// info!(logger, "Solver", "step %d of %d", 3, 10);
/// # assert_eq!(logger.messages(LogLevel::Info), vec!["step 3 of 10"]);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $id:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Info, $id, $fmt $(, $arg)*)
    };
}

/// Log a warning
#[macro_export]
macro_rules! warn {
    ($logger:expr, $id:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $id, $fmt $(, $arg)*)
    };
}

/// Log an error
#[macro_export]
macro_rules! error {
    ($logger:expr, $id:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Error, $id, $fmt $(, $arg)*)
    };
}

/// Debug-build diagnostics; nothing is recorded in release builds
#[macro_export]
macro_rules! debug {
    ($logger:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        use $crate::core::Log as _;
        $logger.debug($fmt, &[$($crate::Arg::from($arg)),*])
    }};
}

/// Run a block inside a section and yield its value
///
/// `$logger` must be a reference to a logger. A panic in the block is
/// reported as an incomplete section and resumed.
///
/// ```
/// # use rust_section_logger::prelude::*;
/// use rust_section_logger::section;
/// let logger = MemoryLogger::new();
/// section!(&logger, "Pass", 2, {
///     logger.info("Pass", "working", &[]);
/// });
/// assert_eq!(
///     logger.messages(LogLevel::Info),
///     vec!["Section Pass[2] started", "working", "Section Pass[2] finished"]
/// );
/// ```
#[macro_export]
macro_rules! section {
    ($logger:expr, $id:expr, $body:block) => {
        $crate::core::section::guard($logger, $id, || $body)
    };
    ($logger:expr, $id:expr, $index:expr, $body:block) => {
        match $crate::core::section::run_indexed($logger, $id, $index, || {
            ::std::result::Result::<_, ::std::convert::Infallible>::Ok($body)
        }) {
            ::std::result::Result::Ok(value) => value,
            ::std::result::Result::Err(never) => match never {},
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemoryLogger;
    use crate::core::{DelegatingLogger, LogLevel};
    use std::sync::Arc;

    #[test]
    fn test_leveled_macros() {
        let logger = MemoryLogger::new();
        analysis!(logger, "A", "a %d", 1);
        info!(logger, "I", "i %s", "x");
        warn!(logger, "W", "w %.1f", 2.5);
        error!(logger, "E", "e %c", 'z');

        let messages: Vec<String> = logger.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["a 1", "i x", "w 2.5", "e z"]);
    }

    #[test]
    fn test_macros_through_delegation() {
        let memory = Arc::new(MemoryLogger::new());
        let logger = DelegatingLogger::with_personal(memory.clone());
        warn!(logger, "W", "%d%%", 50);
        assert_eq!(memory.messages(LogLevel::Warn), vec!["50%"]);
    }

    #[test]
    fn test_debug_macro() {
        let logger = MemoryLogger::new();
        debug!(logger, "x=%d", 4);
        assert_eq!(logger.len(), usize::from(cfg!(debug_assertions)));
    }

    #[test]
    fn test_section_macro() {
        let logger = MemoryLogger::new();
        let value = section!(&logger, "Calc", { 6 * 7 });
        assert_eq!(value, 42);
        assert_eq!(logger.count(LogLevel::Info), 2);
    }
}
