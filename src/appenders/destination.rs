//! Output destinations of a multiplexed sink
//!
//! A [`Target`] names where one level should write: nowhere, a file the sink
//! opens and owns, a writer borrowed from the caller, or a standard stream.
//! Opening a target produces a [`Slot`], the live form kept by the sink.

use crate::appenders::console::{stderr_writer, stdout_writer};
use crate::core::{Channel, LoggerError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A writer shared between the caller and one or more loggers
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Wrap a writer so it can be shared as a destination
pub fn shared_writer<W: Write + Send + 'static>(writer: W) -> SharedWriter {
    Arc::new(Mutex::new(writer))
}

/// How owned files are opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    /// Start from an empty file
    #[default]
    Truncate,
    /// Keep existing content and append
    Append,
}

/// Where one level writes
#[derive(Clone, Default)]
pub enum Target {
    /// Output for the level is dropped
    #[default]
    Disabled,
    /// A file opened and owned by the sink
    Path(PathBuf),
    /// A writer owned by the caller
    Writer(SharedWriter),
    Stdout,
    Stderr,
}

impl Target {
    /// A file target; an empty path disables the level
    pub fn path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            Target::Disabled
        } else {
            Target::Path(path.to_path_buf())
        }
    }

    pub fn writer(writer: SharedWriter) -> Self {
        Target::Writer(writer)
    }

    /// Parse a configured destination name
    ///
    /// `""` disables the level, `"stdout"` and `"stderr"` select the standard
    /// streams and anything else is a file path.
    pub fn from_name(name: &str) -> Self {
        match name {
            "" => Target::Disabled,
            "stdout" => Target::Stdout,
            "stderr" => Target::Stderr,
            path => Target::Path(PathBuf::from(path)),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Target::Disabled)
    }

    /// True when both targets name the same live destination
    ///
    /// Files match by path as given, writers by identity. Disabled targets
    /// never match.
    pub fn same_destination(&self, other: &Target) -> bool {
        match (self, other) {
            (Target::Path(a), Target::Path(b)) => a == b,
            (Target::Writer(a), Target::Writer(b)) => {
                Arc::as_ptr(a) as *const u8 == Arc::as_ptr(b) as *const u8
            }
            (Target::Stdout, Target::Stdout) | (Target::Stderr, Target::Stderr) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Disabled => f.write_str("Disabled"),
            Target::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Target::Writer(writer) => write!(f, "Writer({:p})", Arc::as_ptr(writer) as *const u8),
            Target::Stdout => f.write_str("Stdout"),
            Target::Stderr => f.write_str("Stderr"),
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::from_name(name)
    }
}

impl From<PathBuf> for Target {
    fn from(path: PathBuf) -> Self {
        Target::path(path)
    }
}

impl From<SharedWriter> for Target {
    fn from(writer: SharedWriter) -> Self {
        Target::Writer(writer)
    }
}

impl From<Option<SharedWriter>> for Target {
    fn from(writer: Option<SharedWriter>) -> Self {
        writer.map_or(Target::Disabled, Target::Writer)
    }
}

/// How a level's output is currently handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Disabled,
    /// Writes to a file this sink opened
    Owned,
    /// Writes to a writer or stream it does not own
    Borrowed,
    /// Shares the destination of an earlier level
    Alias(Channel),
}

/// A live destination
pub(crate) enum Slot {
    Disabled,
    Owned {
        path: PathBuf,
        writer: Mutex<BufWriter<File>>,
    },
    Borrowed(SharedWriter),
    Alias(Channel),
}

impl Slot {
    /// Open `target`, failing when an owned file cannot be opened
    pub(crate) fn try_open(target: &Target, mode: OpenMode) -> Result<Slot> {
        Ok(match target {
            Target::Disabled => Slot::Disabled,
            Target::Path(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .append(mode == OpenMode::Append)
                    .truncate(mode == OpenMode::Truncate)
                    .open(path)
                    .map_err(|e| LoggerError::destination_open(path.display().to_string(), e))?;
                Slot::Owned {
                    path: path.clone(),
                    writer: Mutex::new(BufWriter::new(file)),
                }
            }
            Target::Writer(writer) => Slot::Borrowed(Arc::clone(writer)),
            Target::Stdout => Slot::Borrowed(stdout_writer()),
            Target::Stderr => Slot::Borrowed(stderr_writer()),
        })
    }

    /// Open `target`, disabling the level when it cannot be opened
    pub(crate) fn open(target: &Target, mode: OpenMode) -> Slot {
        Self::try_open(target, mode).unwrap_or_else(|e| {
            eprintln!("[LOGGER WARNING] {}; output disabled", e);
            Slot::Disabled
        })
    }

    pub(crate) fn kind(&self) -> SlotKind {
        match self {
            Slot::Disabled => SlotKind::Disabled,
            Slot::Owned { .. } => SlotKind::Owned,
            Slot::Borrowed(_) => SlotKind::Borrowed,
            Slot::Alias(channel) => SlotKind::Alias(*channel),
        }
    }

    pub(crate) fn is_disabled(&self) -> bool {
        matches!(self, Slot::Disabled)
    }

    /// Write one line and flush it. Aliases must be resolved by the caller.
    pub(crate) fn write_line(&self, line: &str) -> Result<()> {
        match self {
            Slot::Disabled | Slot::Alias(_) => Ok(()),
            Slot::Owned { writer, .. } => {
                let mut writer = writer.lock();
                writeln!(writer, "{}", line)?;
                writer.flush()?;
                Ok(())
            }
            Slot::Borrowed(writer) => {
                let mut writer = writer.lock();
                writeln!(writer, "{}", line)?;
                writer.flush()?;
                Ok(())
            }
        }
    }

    pub(crate) fn flush(&self) -> Result<()> {
        match self {
            Slot::Owned { writer, .. } => writer.lock().flush()?,
            Slot::Borrowed(writer) => writer.lock().flush()?,
            Slot::Disabled | Slot::Alias(_) => {}
        }
        Ok(())
    }

    /// Copy for a cloned sink: owned files are not shared and become disabled
    pub(crate) fn duplicate(&self) -> Slot {
        match self {
            Slot::Disabled | Slot::Owned { .. } => Slot::Disabled,
            Slot::Borrowed(writer) => Slot::Borrowed(Arc::clone(writer)),
            Slot::Alias(channel) => Slot::Alias(*channel),
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        if let Slot::Owned { path, writer } = self {
            if let Err(e) = writer.get_mut().flush() {
                eprintln!(
                    "[LOGGER WARNING] Failed to flush '{}' on close: {}",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Owned { path, .. } => f.debug_struct("Owned").field("path", path).finish(),
            other => fmt::Debug::fmt(&other.kind(), f),
        }
    }
}
