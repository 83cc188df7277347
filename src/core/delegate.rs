//! Delegating logger: personal, then parent, then silence
//!
//! Every object that reports progress embeds a [`DelegatingLogger`] and logs
//! through it. Where output ends up is decided late and can change at any time:
//!
//! - a personal logger assigned to the object wins,
//! - otherwise the parent logger inherited from an enclosing object is used,
//! - otherwise messages are dropped without error.
//!
//! Both slots sit behind their own locks, so they can be reassigned through a
//! shared reference without making the rest of the owning object mutable.
//!
//! A chain always ends at a concrete logger or at silence. `adopt` refuses
//! links that would close a loop, and forwarding deeper than
//! [`MAX_DELEGATION_DEPTH`] on one thread is dropped.

use super::args::Arg;
use super::contract::{Log, NullLogger};
use super::error::LoggerError;
use parking_lot::RwLock;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

/// Forwarding hops allowed on one thread before a call falls silent
pub const MAX_DELEGATION_DEPTH: usize = 64;

thread_local! {
    static DEPTH: Cell<usize> = Cell::new(0);
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<DepthGuard> {
        DEPTH.with(|depth| {
            if depth.get() >= MAX_DELEGATION_DEPTH {
                None
            } else {
                depth.set(depth.get() + 1);
                Some(DepthGuard)
            }
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Parent link; `origin` is set when the link was made by `adopt`
#[derive(Clone)]
struct Parent {
    logger: Arc<dyn Log>,
    origin: Option<Arc<Slots>>,
}

#[derive(Default)]
struct Slots {
    personal: RwLock<Option<Arc<dyn Log>>>,
    parent: RwLock<Option<Parent>>,
}

impl Slots {
    fn current(&self) -> Option<Arc<dyn Log>> {
        if let Some(personal) = self.personal.read().as_ref() {
            return Some(Arc::clone(personal));
        }
        self.parent.read().as_ref().map(|p| Arc::clone(&p.logger))
    }

    fn origin(&self) -> Option<Arc<Slots>> {
        self.parent.read().as_ref().and_then(|p| p.origin.clone())
    }
}

/// Logger that forwards every call along the personal/parent chain
///
/// # Example
///
/// ```
/// use rust_section_logger::prelude::*;
/// use std::sync::Arc;
///
/// let outer = DelegatingLogger::new();
/// let inner = DelegatingLogger::new();
/// outer.adopt(&inner);
///
/// // Nothing configured yet: silent, never an error
/// inner.info("Step", "ignored", &[]);
///
/// let memory = MemoryLogger::shared();
/// outer.set_personal_logger(Some(memory.clone()));
/// inner.info("Step", "reaches the outer logger", &[]);
///
/// assert_eq!(memory.messages(LogLevel::Info), vec!["reaches the outer logger"]);
/// ```
pub struct DelegatingLogger {
    slots: Arc<Slots>,
}

impl DelegatingLogger {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Slots::default()),
        }
    }

    /// Start with a personal logger already assigned
    pub fn with_personal(logger: Arc<dyn Log>) -> Self {
        let this = Self::new();
        this.set_personal_logger(Some(logger));
        this
    }

    /// Start with a parent logger, for enclosing objects building their parts
    pub fn with_parent(parent: Arc<dyn Log>) -> Self {
        let this = Self::new();
        this.set_parent_logger(Some(parent));
        this
    }

    pub fn personal_logger(&self) -> Option<Arc<dyn Log>> {
        self.slots.personal.read().clone()
    }

    /// Assign or clear (`None`) the personal logger
    pub fn set_personal_logger(&self, logger: Option<Arc<dyn Log>>) {
        *self.slots.personal.write() = logger;
    }

    pub fn parent_logger(&self) -> Option<Arc<dyn Log>> {
        self.slots.parent.read().as_ref().map(|p| Arc::clone(&p.logger))
    }

    pub(crate) fn set_parent_logger(&self, logger: Option<Arc<dyn Log>>) {
        *self.slots.parent.write() = logger.map(|logger| Parent {
            logger,
            origin: None,
        });
    }

    /// Make this logger the parent of `child`
    ///
    /// The child follows later reconfiguration of this logger. Returns `false`
    /// and leaves `child` untouched when `child` is this logger or one of its
    /// adopted ancestors.
    pub fn adopt(&self, child: &DelegatingLogger) -> bool {
        if self.descends_from(&child.slots) {
            eprintln!("[LOGGER WARNING] Refusing to adopt a logger into its own delegation chain");
            return false;
        }
        *child.slots.parent.write() = Some(Parent {
            logger: self.handle(),
            origin: Some(Arc::clone(&self.slots)),
        });
        true
    }

    /// Detach `child` if this logger adopted it
    ///
    /// Returns `false` when `child` inherits from some other logger.
    pub fn release(&self, child: &DelegatingLogger) -> bool {
        let mut parent = child.slots.parent.write();
        let adopted_here = parent
            .as_ref()
            .and_then(|p| p.origin.as_ref())
            .is_some_and(|origin| Arc::ptr_eq(origin, &self.slots));
        if adopted_here {
            *parent = None;
        }
        adopted_here
    }

    /// True when `ancestor` is this logger or sits on its adopted parent chain
    fn descends_from(&self, ancestor: &Arc<Slots>) -> bool {
        let mut current = Some(Arc::clone(&self.slots));
        for _ in 0..MAX_DELEGATION_DEPTH {
            match current {
                Some(slots) if Arc::ptr_eq(&slots, ancestor) => return true,
                Some(slots) => current = slots.origin(),
                None => return false,
            }
        }
        true
    }

    /// A shared handle that always resolves through this logger's current slots
    pub fn handle(&self) -> Arc<dyn Log> {
        Arc::new(DelegatingLogger {
            slots: Arc::clone(&self.slots),
        })
    }

    /// True when neither slot is set
    pub fn is_silent(&self) -> bool {
        self.slots.current().is_none()
    }

    fn with_target<R>(&self, f: impl FnOnce(&dyn Log) -> R) -> R {
        let Some(_depth) = DepthGuard::enter() else {
            return f(&NullLogger);
        };
        match self.slots.current() {
            Some(target) => f(target.as_ref()),
            None => f(&NullLogger),
        }
    }
}

impl Default for DelegatingLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones get their own slots, starting from the current assignments
impl Clone for DelegatingLogger {
    fn clone(&self) -> Self {
        let copy = Self::new();
        copy.set_personal_logger(self.personal_logger());
        *copy.slots.parent.write() = self.slots.parent.read().clone();
        copy
    }
}

impl fmt::Debug for DelegatingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatingLogger")
            .field("personal", &self.slots.personal.read().is_some())
            .field("parent", &self.slots.parent.read().is_some())
            .finish()
    }
}

impl Log for DelegatingLogger {
    fn analysis_out(&self, msg: &str, id: &str) {
        self.with_target(|target| target.analysis_out(msg, id));
    }

    fn info_out(&self, msg: &str, id: &str) {
        self.with_target(|target| target.info_out(msg, id));
    }

    fn warn_out(&self, msg: &str, id: &str) {
        self.with_target(|target| target.warn_out(msg, id));
    }

    fn error_out(&self, msg: &str, id: &str) {
        self.with_target(|target| target.error_out(msg, id));
    }

    fn translate(&self, id: &str, template: &str) -> String {
        let Some(_depth) = DepthGuard::enter() else {
            return template.to_string();
        };
        match self.slots.current() {
            Some(target) => target.translate(id, template),
            None => template.to_string(),
        }
    }

    fn progress_hint(&self, param: i32) -> f64 {
        self.with_target(|target| target.progress_hint(param))
    }

    fn discard(&self, error: LoggerError) {
        self.with_target(|target| target.discard(error));
    }

    fn debug(&self, template: &str, args: &[Arg]) {
        self.with_target(|target| target.debug(template, args));
    }
}

/// Objects that log through an embedded [`DelegatingLogger`]
///
/// ```
/// use rust_section_logger::prelude::*;
///
/// struct Solver {
///     logging: DelegatingLogger,
/// }
///
/// impl Loggable for Solver {
///     fn logging(&self) -> &DelegatingLogger {
///         &self.logging
///     }
/// }
///
/// let solver = Solver { logging: DelegatingLogger::new() };
/// let memory = MemoryLogger::shared();
/// solver.set_personal_logger(Some(memory.clone()));
/// solver.logger().warn("Solver", "residual %.1e", &[Arg::from(0.002)]);
///
/// assert_eq!(memory.messages(LogLevel::Warn), vec!["residual 2.0e-03"]);
/// ```
pub trait Loggable {
    fn logging(&self) -> &DelegatingLogger;

    /// The contract to log through
    fn logger(&self) -> &dyn Log {
        self.logging()
    }

    fn personal_logger(&self) -> Option<Arc<dyn Log>> {
        self.logging().personal_logger()
    }

    fn set_personal_logger(&self, logger: Option<Arc<dyn Log>>) {
        self.logging().set_personal_logger(logger);
    }

    /// Make `child` inherit this object's logging
    fn adopt(&self, child: &dyn Loggable) -> bool {
        self.logging().adopt(child.logging())
    }

    /// Detach `child` if this object adopted it
    fn release(&self, child: &dyn Loggable) -> bool {
        self.logging().release(child.logging())
    }
}
