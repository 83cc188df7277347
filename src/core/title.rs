//! Message title synthesis
//!
//! Every presented line starts with a title built from the enabled parts:
//! calendar date, clock time and seconds elapsed since the logger started.
//! Which parts appear is controlled by [`TitleFlags`], a bit-mask kept in
//! [`FormatterConfig`].

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};
use std::time::Duration;

/// Bit-mask of title parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleFlags(u8);

impl TitleFlags {
    pub const NONE: TitleFlags = TitleFlags(0);
    /// Calendar date, `2026-10-19`
    pub const DATE: TitleFlags = TitleFlags(1);
    /// Clock time, `10:30:45`
    pub const TIME: TitleFlags = TitleFlags(2);
    /// Seconds since start, `+12.345s`
    pub const ELAPSED: TitleFlags = TitleFlags(4);
    pub const ALL: TitleFlags = TitleFlags(7);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, ignoring unknown ones
    pub const fn from_bits_truncate(bits: u8) -> Self {
        TitleFlags(bits & Self::ALL.0)
    }

    pub const fn contains(self, other: TitleFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn set(&mut self, flag: TitleFlags, on: bool) {
        if on {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}

impl BitOr for TitleFlags {
    type Output = TitleFlags;

    fn bitor(self, rhs: TitleFlags) -> TitleFlags {
        TitleFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for TitleFlags {
    fn bitor_assign(&mut self, rhs: TitleFlags) {
        self.0 |= rhs.0;
    }
}

/// Compose the base title for `now` and `elapsed`
///
/// Parts are separated by a space and the title ends with one, so it can be
/// prepended to a message as is. No enabled parts give an empty title.
pub fn compose_title(flags: TitleFlags, now: &NaiveDateTime, elapsed: Duration) -> String {
    let mut parts = Vec::with_capacity(3);
    if flags.contains(TitleFlags::DATE) {
        parts.push(now.format("%Y-%m-%d").to_string());
    }
    if flags.contains(TitleFlags::TIME) {
        parts.push(now.format("%H:%M:%S").to_string());
    }
    if flags.contains(TitleFlags::ELAPSED) {
        parts.push(format!("+{:.3}s", elapsed.as_secs_f64()));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("{} ", parts.join(" "))
    }
}

/// Title synthesis, overridable per message level
///
/// Each level-specific method receives the base title and the message id.
pub trait TitleFormat: Send + Sync {
    fn title(&self, flags: TitleFlags, elapsed: Duration) -> String {
        compose_title(flags, &Local::now().naive_local(), elapsed)
    }

    fn analysis_title(&self, base: &str, id: &str) -> String {
        format!("{}[{}] ", base, id)
    }

    fn user_title(&self, base: &str, _id: &str) -> String {
        base.to_string()
    }

    fn warning_title(&self, base: &str, _id: &str) -> String {
        format!("{}WARNING: ", base)
    }

    fn error_title(&self, base: &str, _id: &str) -> String {
        format!("{}ERROR: ", base)
    }
}

/// The default titles
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTitles;

impl TitleFormat for StandardTitles {}

/// Options of the formatting layer
///
/// # Examples
///
/// ```
/// use rust_section_logger::core::{FormatterConfig, TitleFlags};
///
/// let config = FormatterConfig::new()
///     .with_show_date(true)
///     .with_show_elapsed(false)
///     .with_console_echo(true);
///
/// assert_eq!(config.flags(), TitleFlags::DATE | TitleFlags::TIME);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Include the calendar date in titles
    pub show_date: bool,
    /// Include the clock time in titles
    pub show_time: bool,
    /// Include seconds since start in titles
    pub show_elapsed: bool,
    /// Mirror every presented message to the console
    pub console_echo: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            show_date: false,
            show_time: true,
            show_elapsed: true,
            console_echo: false,
        }
    }
}

impl FormatterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with titles disabled entirely
    #[must_use]
    pub fn plain() -> Self {
        Self::from_flags(TitleFlags::NONE)
    }

    #[must_use]
    pub fn from_flags(flags: TitleFlags) -> Self {
        Self::default().with_flags(flags)
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TitleFlags) -> Self {
        self.show_date = flags.contains(TitleFlags::DATE);
        self.show_time = flags.contains(TitleFlags::TIME);
        self.show_elapsed = flags.contains(TitleFlags::ELAPSED);
        self
    }

    #[must_use]
    pub fn with_show_date(mut self, show: bool) -> Self {
        self.show_date = show;
        self
    }

    #[must_use]
    pub fn with_show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    #[must_use]
    pub fn with_show_elapsed(mut self, show: bool) -> Self {
        self.show_elapsed = show;
        self
    }

    #[must_use]
    pub fn with_console_echo(mut self, echo: bool) -> Self {
        self.console_echo = echo;
        self
    }

    /// The title parts as a bit-mask
    pub fn flags(&self) -> TitleFlags {
        let mut flags = TitleFlags::NONE;
        flags.set(TitleFlags::DATE, self.show_date);
        flags.set(TitleFlags::TIME, self.show_time);
        flags.set(TitleFlags::ELAPSED, self.show_elapsed);
        flags
    }
}
