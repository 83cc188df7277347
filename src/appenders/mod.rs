//! Output destinations and concrete loggers

pub mod console;
pub mod destination;
pub mod memory;
pub mod multiplexed;

pub use destination::{shared_writer, OpenMode, SharedWriter, SlotKind, Target};
pub use memory::{MemoryLogger, Record, SharedBuffer};
pub use multiplexed::{Banner, MultiplexedSink, StreamLogger, StreamLoggerBuilder};
