//! Formatting layer shared by concrete loggers
//!
//! [`FormattingLogger`] implements the sink half of [`Log`]: it prefixes each
//! message with a title, counts warnings and errors, optionally mirrors the
//! line to the console and hands it to a [`Presenter`] that knows where output
//! actually goes.

use super::contract::{normalize_duration_placeholder, Log};
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::metrics::LogCounters;
use super::title::{FormatterConfig, StandardTitles, TitleFlags, TitleFormat};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Template rewrite hook, called with `(id, template)`
pub type Translator = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Final output of titled lines
///
/// Analysis lines go to the info destination unless overridden.
pub trait Presenter: Send + Sync {
    fn present_info(&self, line: &str) -> Result<()>;
    fn present_warning(&self, line: &str) -> Result<()>;
    fn present_error(&self, line: &str) -> Result<()>;

    fn present_analysis(&self, line: &str) -> Result<()> {
        self.present_info(line)
    }

    /// Which levels write to a destination not shared with an earlier level
    fn distinct_levels(&self) -> (bool, bool, bool) {
        (true, true, true)
    }

    fn on_start(&self, _info: bool, _warn: bool, _error: bool) {}

    fn on_finish(&self, _info: bool, _warn: bool, _error: bool) {}
}

/// Logger that titles, counts and presents messages
///
/// # Example
///
/// ```
/// use rust_section_logger::prelude::*;
/// use parking_lot::Mutex;
///
/// #[derive(Default)]
/// struct Lines(Mutex<Vec<String>>);
///
/// impl Presenter for Lines {
///     fn present_info(&self, line: &str) -> Result<()> {
///         self.0.lock().push(line.to_string());
///         Ok(())
///     }
///     fn present_warning(&self, line: &str) -> Result<()> {
///         self.present_info(line)
///     }
///     fn present_error(&self, line: &str) -> Result<()> {
///         self.present_info(line)
///     }
/// }
///
/// let logger = FormattingLogger::new(Lines::default());
/// logger.set_title_flags(TitleFlags::NONE);
/// logger.warn("Mesh", "%d open edges", &[Arg::from(2)]);
///
/// assert_eq!(logger.presenter().0.lock()[0], "WARNING: 2 open edges");
/// assert_eq!(logger.warning_count(), 1);
/// ```
pub struct FormattingLogger<P: Presenter, T: TitleFormat = StandardTitles> {
    presenter: P,
    titles: T,
    config: RwLock<FormatterConfig>,
    started: RwLock<Instant>,
    counters: LogCounters,
    translator: RwLock<Option<Translator>>,
}

impl<P: Presenter> FormattingLogger<P, StandardTitles> {
    pub fn new(presenter: P) -> Self {
        Self::with_parts(presenter, StandardTitles, FormatterConfig::default())
    }

    pub fn with_config(presenter: P, config: FormatterConfig) -> Self {
        Self::with_parts(presenter, StandardTitles, config)
    }
}

impl<P: Presenter, T: TitleFormat> FormattingLogger<P, T> {
    /// Assemble a logger and start its destinations
    pub fn with_parts(presenter: P, titles: T, config: FormatterConfig) -> Self {
        Self::assemble(presenter, titles, config, Instant::now(), LogCounters::new(), None)
    }

    fn assemble(
        presenter: P,
        titles: T,
        config: FormatterConfig,
        started: Instant,
        counters: LogCounters,
        translator: Option<Translator>,
    ) -> Self {
        let logger = Self {
            presenter,
            titles,
            config: RwLock::new(config),
            started: RwLock::new(started),
            counters,
            translator: RwLock::new(translator),
        };
        let (info, warn, error) = logger.presenter.distinct_levels();
        logger.on_start(info, warn, error);
        logger
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn titles(&self) -> &T {
        &self.titles
    }

    pub fn config(&self) -> FormatterConfig {
        self.config.read().clone()
    }

    pub fn set_config(&self, config: FormatterConfig) {
        *self.config.write() = config;
    }

    /// Change the configuration in place
    pub fn update_config(&self, f: impl FnOnce(&mut FormatterConfig)) {
        f(&mut self.config.write());
    }

    pub fn set_title_flags(&self, flags: TitleFlags) {
        self.update_config(|config| *config = config.clone().with_flags(flags));
    }

    pub fn set_console_echo(&self, echo: bool) {
        self.update_config(|config| config.console_echo = echo);
    }

    /// Reset the point elapsed time is measured from
    pub fn restart_clock(&self) {
        *self.started.write() = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.started.read().elapsed()
    }

    /// Install or remove (`None`) the template rewrite hook
    pub fn set_translator(&self, translator: Option<Translator>) {
        *self.translator.write() = translator;
    }

    pub fn counters(&self) -> &LogCounters {
        &self.counters
    }

    pub fn warning_count(&self) -> u64 {
        self.counters.warnings()
    }

    pub fn error_count(&self) -> u64 {
        self.counters.errors()
    }

    fn base_title(&self) -> String {
        let flags = self.config.read().flags();
        self.titles.title(flags, self.elapsed())
    }

    fn present(&self, level: LogLevel, line: &str) {
        if self.config.read().console_echo {
            crate::appenders::console::echo(level, line);
        }
        let result = match level {
            LogLevel::Analysis => self.presenter.present_analysis(line),
            LogLevel::Info => self.presenter.present_info(line),
            LogLevel::Warn => self.presenter.present_warning(line),
            LogLevel::Error => self.presenter.present_error(line),
        };
        if let Err(e) = result {
            self.discard(e);
        }
    }
}

impl<P: Presenter, T: TitleFormat> Log for FormattingLogger<P, T> {
    fn analysis_out(&self, msg: &str, id: &str) {
        let title = self.titles.analysis_title(&self.base_title(), id);
        self.present(LogLevel::Analysis, &format!("{}{}", title, msg));
    }

    fn info_out(&self, msg: &str, id: &str) {
        let title = self.titles.user_title(&self.base_title(), id);
        self.present(LogLevel::Info, &format!("{}{}", title, msg));
    }

    fn warn_out(&self, msg: &str, id: &str) {
        self.counters.record_warning();
        let title = self.titles.warning_title(&self.base_title(), id);
        self.present(LogLevel::Warn, &format!("{}{}", title, msg));
    }

    fn error_out(&self, msg: &str, id: &str) {
        self.counters.record_error();
        let title = self.titles.error_title(&self.base_title(), id);
        self.present(LogLevel::Error, &format!("{}{}", title, msg));
    }

    fn translate(&self, id: &str, template: &str) -> String {
        let translator = self.translator.read().clone();
        match translator {
            Some(translate) => translate(id, template),
            None => normalize_duration_placeholder(template),
        }
    }

    fn on_start(&self, info: bool, warn: bool, error: bool) {
        self.presenter.on_start(info, warn, error);
    }

    fn on_finish(&self, info: bool, warn: bool, error: bool) {
        self.presenter.on_finish(info, warn, error);
    }

    fn discard(&self, error: LoggerError) {
        self.counters.record_dropped();
        if !error.is_formatting() {
            eprintln!("[LOGGER WARNING] Message dropped: {}", error);
        }
    }
}

impl<P: Presenter, T: TitleFormat> Drop for FormattingLogger<P, T> {
    fn drop(&mut self) {
        let (info, warn, error) = self.presenter.distinct_levels();
        self.on_finish(info, warn, error);
    }
}

/// Copies keep counters, start time and translator, and start their own
/// destinations
impl<P, T> Clone for FormattingLogger<P, T>
where
    P: Presenter + Clone,
    T: TitleFormat + Clone,
{
    fn clone(&self) -> Self {
        Self::assemble(
            self.presenter.clone(),
            self.titles.clone(),
            self.config(),
            *self.started.read(),
            self.counters.clone(),
            self.translator.read().clone(),
        )
    }
}

impl<P: Presenter + fmt::Debug, T: TitleFormat> fmt::Debug for FormattingLogger<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormattingLogger")
            .field("presenter", &self.presenter)
            .field("config", &*self.config.read())
            .field("counters", &self.counters)
            .field("translator", &self.translator.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Arg;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default, Clone)]
    struct Lines {
        info: Arc<Mutex<Vec<String>>>,
        warnings: Arc<Mutex<Vec<String>>>,
        errors: Arc<Mutex<Vec<String>>>,
        starts: Arc<AtomicUsize>,
        finishes: Arc<AtomicUsize>,
    }

    impl Presenter for Lines {
        fn present_info(&self, line: &str) -> Result<()> {
            self.info.lock().push(line.to_string());
            Ok(())
        }
        fn present_warning(&self, line: &str) -> Result<()> {
            self.warnings.lock().push(line.to_string());
            Ok(())
        }
        fn present_error(&self, line: &str) -> Result<()> {
            self.errors.lock().push(line.to_string());
            Ok(())
        }
        fn on_start(&self, _info: bool, _warn: bool, _error: bool) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_finish(&self, _info: bool, _warn: bool, _error: bool) {
            self.finishes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Failing;

    impl Presenter for Failing {
        fn present_info(&self, _line: &str) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into())
        }
        fn present_warning(&self, line: &str) -> Result<()> {
            self.present_info(line)
        }
        fn present_error(&self, line: &str) -> Result<()> {
            self.present_info(line)
        }
    }

    fn plain(lines: &Lines) -> FormattingLogger<Lines> {
        FormattingLogger::with_config(lines.clone(), FormatterConfig::plain())
    }

    #[test]
    fn test_level_titles() {
        let lines = Lines::default();
        let logger = plain(&lines);
        logger.analysis("Mesh", "nodes=%d", &[Arg::from(10)]);
        logger.info("Mesh", "ready", &[]);
        logger.warn("Mesh", "skewed", &[]);
        logger.error("Mesh", "broken", &[]);

        assert_eq!(*lines.info.lock(), vec!["[Mesh] nodes=10", "ready"]);
        assert_eq!(*lines.warnings.lock(), vec!["WARNING: skewed"]);
        assert_eq!(*lines.errors.lock(), vec!["ERROR: broken"]);
    }

    #[test]
    fn test_counts_warnings_and_errors() {
        let lines = Lines::default();
        let logger = plain(&lines);
        logger.warn("A", "one", &[]);
        logger.warn("A", "two", &[]);
        logger.error("A", "three", &[]);
        logger.info("A", "four", &[]);

        assert_eq!(logger.warning_count(), 2);
        assert_eq!(logger.error_count(), 1);
    }

    #[test]
    fn test_format_failure_is_dropped_not_counted() {
        let lines = Lines::default();
        let logger = plain(&lines);
        logger.error("A", "%d", &[Arg::from("text")]);

        assert_eq!(logger.error_count(), 0);
        assert_eq!(logger.counters().dropped(), 1);
        assert!(lines.errors.lock().is_empty());
    }

    #[test]
    fn test_presentation_failure_is_dropped() {
        let logger = FormattingLogger::with_config(Failing, FormatterConfig::plain());
        logger.info("A", "lost", &[]);
        logger.error("A", "lost", &[]);
        assert_eq!(logger.counters().dropped(), 2);
        assert_eq!(logger.error_count(), 1);
    }

    #[test]
    fn test_elapsed_title() {
        let lines = Lines::default();
        let logger = plain(&lines);
        logger.set_title_flags(TitleFlags::ELAPSED);
        logger.info("A", "tick", &[]);

        let line = lines.info.lock()[0].clone();
        assert!(line.starts_with("+0."), "unexpected title in {:?}", line);
        assert!(line.ends_with("s tick"));
    }

    #[test]
    fn test_translator_hook() {
        let lines = Lines::default();
        let logger = plain(&lines);
        logger.set_translator(Some(Arc::new(|id: &str, template: &str| {
            format!("{}: {}", id, template)
        })));
        logger.info("Solver", "%d steps", &[Arg::from(3)]);
        assert_eq!(lines.info.lock()[0], "Solver: 3 steps");

        logger.set_translator(None);
        assert_eq!(logger.translate("x", "%t"), "%f");
    }

    #[test]
    fn test_lifecycle_and_clone() {
        let lines = Lines::default();
        let logger = plain(&lines);
        logger.warn("A", "w", &[]);
        assert_eq!(lines.starts.load(Ordering::SeqCst), 1);

        let copy = logger.clone();
        assert_eq!(lines.starts.load(Ordering::SeqCst), 2);
        assert_eq!(copy.warning_count(), 1);

        drop(copy);
        drop(logger);
        assert_eq!(lines.finishes.load(Ordering::SeqCst), 2);
    }
}
