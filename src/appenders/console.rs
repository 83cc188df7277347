//! Console output
//!
//! Echoed lines go to stdout, colored by level when the `console` feature is
//! enabled. The standard streams are also available as shared writers so a
//! multiplexed sink can borrow them as destinations.

use crate::appenders::destination::{shared_writer, SharedWriter};
use crate::core::LogLevel;
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

/// Mirror one presented line to stdout
///
/// Console failures are ignored; the line has already been presented.
pub fn echo(level: LogLevel, line: &str) {
    let mut out = io::stdout().lock();
    #[cfg(feature = "console")]
    let _ = writeln!(out, "{}", line.color(level.color_code()));
    #[cfg(not(feature = "console"))]
    let _ = {
        let _ = level;
        writeln!(out, "{}", line)
    };
    let _ = out.flush();
}

/// A shared handle on stdout
pub fn stdout_writer() -> SharedWriter {
    shared_writer(io::stdout())
}

/// A shared handle on stderr
pub fn stderr_writer() -> SharedWriter {
    shared_writer(io::stderr())
}
