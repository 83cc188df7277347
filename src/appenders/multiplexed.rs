//! Three-destination sink
//!
//! [`MultiplexedSink`] routes informational lines, warnings and errors to
//! separate destinations. Levels configured with the same destination share
//! one live slot, so a file named twice is opened once and every line lands
//! in it in order. [`StreamLogger`] puts the formatting layer on top.

use crate::appenders::destination::{OpenMode, SharedWriter, Slot, SlotKind, Target};
use crate::core::{
    Channel, FormatterConfig, FormattingLogger, Presenter, Result, TitleFlags, Translator,
};
use std::fmt;
use std::path::Path;

/// Lines written to each distinct destination when logging starts and ends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    pub header: Option<String>,
    pub footer: Option<String>,
}

/// Presenter writing each level to its own destination
///
/// A level aliased to a destination that failed to open stays disabled; the
/// file is never opened twice.
#[derive(Debug)]
pub struct MultiplexedSink {
    slots: [Slot; 3],
    banner: Banner,
}

impl MultiplexedSink {
    /// Open the three destinations, disabling any that cannot be opened
    pub fn new(info: Target, warning: Target, error: Target, mode: OpenMode) -> Self {
        Self::assemble([info, warning, error], |target| Ok(Slot::open(target, mode)))
            .unwrap_or_else(|_| Self::disabled())
    }

    /// Open the three destinations, failing on the first that cannot be opened
    pub fn try_new(info: Target, warning: Target, error: Target, mode: OpenMode) -> Result<Self> {
        Self::assemble([info, warning, error], |target| Slot::try_open(target, mode))
    }

    /// A sink with every level disabled
    pub fn disabled() -> Self {
        Self {
            slots: [Slot::Disabled, Slot::Disabled, Slot::Disabled],
            banner: Banner::default(),
        }
    }

    fn assemble(
        targets: [Target; 3],
        mut open: impl FnMut(&Target) -> Result<Slot>,
    ) -> Result<Self> {
        let mut slots = [Slot::Disabled, Slot::Disabled, Slot::Disabled];
        for (index, target) in targets.iter().enumerate() {
            let shared = if target.is_disabled() {
                None
            } else {
                (0..index).find(|&earlier| targets[earlier].same_destination(target))
            };
            slots[index] = match shared {
                Some(earlier) => Slot::Alias(Channel::ALL[earlier]),
                None => open(target)?,
            };
        }
        Ok(Self {
            slots,
            banner: Banner::default(),
        })
    }

    #[must_use]
    pub fn with_banner(mut self, banner: Banner) -> Self {
        self.banner = banner;
        self
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    /// How `channel` is currently handled
    pub fn slot_kind(&self, channel: Channel) -> SlotKind {
        self.slots[channel.index()].kind()
    }

    /// True when `channel` has no live destination
    pub fn is_disabled(&self, channel: Channel) -> bool {
        self.resolve(channel).is_disabled()
    }

    /// Flush every live destination
    pub fn flush(&self) -> Result<()> {
        for slot in &self.slots {
            slot.flush()?;
        }
        Ok(())
    }

    fn resolve(&self, channel: Channel) -> &Slot {
        match &self.slots[channel.index()] {
            Slot::Alias(earlier) => &self.slots[earlier.index()],
            slot => slot,
        }
    }

    fn write(&self, channel: Channel, line: &str) -> Result<()> {
        self.resolve(channel).write_line(line)
    }

    fn write_banner(&self, text: Option<&str>, levels: (bool, bool, bool)) {
        let Some(text) = text else {
            return;
        };
        let (info, warn, error) = levels;
        for (channel, distinct) in Channel::ALL.into_iter().zip([info, warn, error]) {
            if !distinct {
                continue;
            }
            if let Err(e) = self.write(channel, text) {
                eprintln!(
                    "[LOGGER WARNING] Failed to write banner to {} destination: {}",
                    channel.name(),
                    e
                );
            }
        }
    }
}

impl Default for MultiplexedSink {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Copies share borrowed writers; files owned by the original are not reopened
impl Clone for MultiplexedSink {
    fn clone(&self) -> Self {
        Self {
            slots: [
                self.slots[0].duplicate(),
                self.slots[1].duplicate(),
                self.slots[2].duplicate(),
            ],
            banner: self.banner.clone(),
        }
    }
}

impl Presenter for MultiplexedSink {
    fn present_info(&self, line: &str) -> Result<()> {
        self.write(Channel::Info, line)
    }

    fn present_warning(&self, line: &str) -> Result<()> {
        self.write(Channel::Warning, line)
    }

    fn present_error(&self, line: &str) -> Result<()> {
        self.write(Channel::Error, line)
    }

    fn distinct_levels(&self) -> (bool, bool, bool) {
        let distinct = |channel: Channel| !matches!(self.slots[channel.index()], Slot::Alias(_));
        (
            true,
            distinct(Channel::Warning),
            distinct(Channel::Error),
        )
    }

    fn on_start(&self, info: bool, warn: bool, error: bool) {
        self.write_banner(self.banner.header.as_deref(), (info, warn, error));
    }

    fn on_finish(&self, info: bool, warn: bool, error: bool) {
        self.write_banner(self.banner.footer.as_deref(), (info, warn, error));
    }
}

/// Formatting logger over three destinations
pub type StreamLogger = FormattingLogger<MultiplexedSink>;

impl StreamLogger {
    pub fn builder() -> StreamLoggerBuilder {
        StreamLoggerBuilder::new()
    }

    /// Info to stdout, warnings and errors to stderr
    pub fn console() -> Self {
        Self::builder()
            .info(Target::Stdout)
            .warnings(Target::Stderr)
            .errors(Target::Stderr)
            .build()
    }

    /// Log to caller-owned writers; `None` disables a level
    ///
    /// Passing the same handle for several levels makes them share it.
    pub fn from_writers(
        info: Option<SharedWriter>,
        warnings: Option<SharedWriter>,
        errors: Option<SharedWriter>,
    ) -> Self {
        Self::builder()
            .info(info)
            .warnings(warnings)
            .errors(errors)
            .build()
    }

    /// Log to files opened by the logger; an empty path disables a level
    ///
    /// Levels given the same path share one file.
    pub fn from_paths(
        info: impl AsRef<Path>,
        warnings: impl AsRef<Path>,
        errors: impl AsRef<Path>,
        mode: OpenMode,
    ) -> Self {
        Self::builder()
            .info(Target::path(info))
            .warnings(Target::path(warnings))
            .errors(Target::path(errors))
            .open_mode(mode)
            .build()
    }

    pub fn sink(&self) -> &MultiplexedSink {
        self.presenter()
    }
}

/// Builder for [`StreamLogger`]
///
/// # Example
///
/// ```
/// use rust_section_logger::prelude::*;
///
/// let buffer = SharedBuffer::new();
/// let shared = buffer.writer();
/// let logger = StreamLogger::builder()
///     .info(shared.clone())
///     .warnings(shared)
///     .show_time(false)
///     .show_elapsed(false)
///     .build();
///
/// logger.info("Run", "started", &[]);
/// logger.warn("Run", "slow step", &[]);
/// logger.error("Run", "goes nowhere", &[]);
///
/// assert_eq!(buffer.lines(), vec!["started", "WARNING: slow step"]);
/// assert_eq!(logger.error_count(), 1);
/// ```
#[derive(Default)]
pub struct StreamLoggerBuilder {
    targets: [Target; 3],
    mode: OpenMode,
    config: FormatterConfig,
    banner: Banner,
    translator: Option<Translator>,
}

impl fmt::Debug for StreamLoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamLoggerBuilder")
            .field("targets", &self.targets)
            .field("mode", &self.mode)
            .field("config", &self.config)
            .field("banner", &self.banner)
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

impl StreamLoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, channel: Channel, target: impl Into<Target>) -> Self {
        self.targets[channel.index()] = target.into();
        self
    }

    pub fn info(self, target: impl Into<Target>) -> Self {
        self.target(Channel::Info, target)
    }

    pub fn warnings(self, target: impl Into<Target>) -> Self {
        self.target(Channel::Warning, target)
    }

    pub fn errors(self, target: impl Into<Target>) -> Self {
        self.target(Channel::Error, target)
    }

    pub fn open_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn config(mut self, config: FormatterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn title_flags(mut self, flags: TitleFlags) -> Self {
        self.config = self.config.with_flags(flags);
        self
    }

    pub fn show_date(mut self, show: bool) -> Self {
        self.config.show_date = show;
        self
    }

    pub fn show_time(mut self, show: bool) -> Self {
        self.config.show_time = show;
        self
    }

    pub fn show_elapsed(mut self, show: bool) -> Self {
        self.config.show_elapsed = show;
        self
    }

    pub fn console_echo(mut self, echo: bool) -> Self {
        self.config.console_echo = echo;
        self
    }

    pub fn banner(mut self, banner: Banner) -> Self {
        self.banner = banner;
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.banner.header = Some(header.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.banner.footer = Some(footer.into());
        self
    }

    pub fn translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Build, disabling destinations that cannot be opened
    pub fn build(self) -> StreamLogger {
        let [info, warning, error] = self.targets;
        let sink = MultiplexedSink::new(info, warning, error, self.mode).with_banner(self.banner);
        Self::finish(sink, self.config, self.translator)
    }

    /// Build, failing when a file destination cannot be opened
    pub fn try_build(self) -> Result<StreamLogger> {
        let [info, warning, error] = self.targets;
        let sink =
            MultiplexedSink::try_new(info, warning, error, self.mode)?.with_banner(self.banner);
        Ok(Self::finish(sink, self.config, self.translator))
    }

    fn finish(
        sink: MultiplexedSink,
        config: FormatterConfig,
        translator: Option<Translator>,
    ) -> StreamLogger {
        let logger = StreamLogger::with_config(sink, config);
        if translator.is_some() {
            logger.set_translator(translator);
        }
        logger
    }
}
