//! Integration tests for the section logger
//!
//! These tests verify:
//! - Delegation along personal and parent loggers
//! - File destinations, aliasing and ownership
//! - Section bracketing over real sinks
//! - Counters and the no-throw guarantee
//! - Thread safety of shared loggers

use rust_section_logger::appenders::{OpenMode, SharedBuffer, SlotKind, StreamLogger, Target};
use rust_section_logger::core::section::{self, Section, SECTION_FAILURE_ID};
use rust_section_logger::core::{Arg, Channel, DelegatingLogger, Log, LogLevel, Loggable, TitleFlags};
use rust_section_logger::{MemoryLogger, MessageStream};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

struct Mesh {
    logging: DelegatingLogger,
}

impl Loggable for Mesh {
    fn logging(&self) -> &DelegatingLogger {
        &self.logging
    }
}

struct Model {
    logging: DelegatingLogger,
    mesh: Mesh,
}

impl Model {
    fn new() -> Self {
        let model = Model {
            logging: DelegatingLogger::new(),
            mesh: Mesh {
                logging: DelegatingLogger::new(),
            },
        };
        model.adopt(&model.mesh);
        model
    }

    fn build(&self) -> Result<usize, String> {
        section::run(self.logger(), "Build", || {
            self.mesh.logger().info("Mesh", "%d cells", &[Arg::from(64)]);
            Ok(64)
        })
    }
}

impl Loggable for Model {
    fn logging(&self) -> &DelegatingLogger {
        &self.logging
    }
}

fn plain_file_logger(info: &Path, warn: &Path, err: &Path) -> StreamLogger {
    let logger = StreamLogger::from_paths(info, warn, err, OpenMode::Truncate);
    logger.set_title_flags(TitleFlags::NONE);
    logger
}

#[test]
fn test_object_tree_delegation() {
    let model = Model::new();
    assert_eq!(model.build(), Ok(64));

    let buffer = SharedBuffer::new();
    let host = StreamLogger::builder()
        .info(buffer.writer())
        .title_flags(TitleFlags::NONE)
        .build();
    model.set_personal_logger(Some(Arc::new(host)));
    assert_eq!(model.build(), Ok(64));

    assert_eq!(
        buffer.lines(),
        vec!["Section Build started", "64 cells", "Section Build finished"]
    );
}

#[test]
fn test_child_personal_logger_overrides_parent() {
    let model = Model::new();
    let parent = Arc::new(MemoryLogger::new());
    let own = Arc::new(MemoryLogger::new());
    model.set_personal_logger(Some(parent.clone()));
    model.mesh.set_personal_logger(Some(own.clone()));

    model.build().unwrap();

    assert_eq!(parent.count(LogLevel::Info), 2);
    assert_eq!(own.messages(LogLevel::Info), vec!["64 cells"]);
}

#[test]
fn test_separate_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let info = temp_dir.path().join("info.log");
    let warn = temp_dir.path().join("warn.log");
    let err = temp_dir.path().join("err.log");

    let logger = plain_file_logger(&info, &warn, &err);
    logger.info("Run", "start", &[]);
    logger.warn("Run", "slow", &[]);
    logger.error("Run", "failed", &[]);
    drop(logger);

    assert_eq!(fs::read_to_string(&info).unwrap(), "start\n");
    assert_eq!(fs::read_to_string(&warn).unwrap(), "WARNING: slow\n");
    assert_eq!(fs::read_to_string(&err).unwrap(), "ERROR: failed\n");
}

#[test]
fn test_same_file_for_all_levels_is_written_once_in_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("all.log");

    let logger = plain_file_logger(&path, &path, &path);
    assert_eq!(logger.sink().slot_kind(Channel::Info), SlotKind::Owned);
    assert_eq!(logger.sink().slot_kind(Channel::Warning), SlotKind::Alias(Channel::Info));
    assert_eq!(logger.sink().slot_kind(Channel::Error), SlotKind::Alias(Channel::Info));

    for i in 0..3 {
        logger.info("Run", "info %d", &[Arg::from(i)]);
        logger.warn("Run", "warn %d", &[Arg::from(i)]);
        logger.error("Run", "error %d", &[Arg::from(i)]);
    }
    drop(logger);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 9, "every message written exactly once");
    assert_eq!(lines[0], "info 0");
    assert_eq!(lines[1], "WARNING: warn 0");
    assert_eq!(lines[8], "ERROR: error 2");
}

#[test]
fn test_disabled_and_unopenable_destinations() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bad = temp_dir.path().join("no_such_dir").join("x.log");
    let err = temp_dir.path().join("err.log");

    let logger = StreamLogger::from_paths("", &bad, &err, OpenMode::Truncate);
    logger.set_title_flags(TitleFlags::NONE);
    assert!(logger.sink().is_disabled(Channel::Info));
    assert!(logger.sink().is_disabled(Channel::Warning));

    logger.info("Run", "nowhere", &[]);
    logger.warn("Run", "nowhere", &[]);
    logger.error("Run", "kept", &[]);
    drop(logger);

    assert_eq!(logger_file(&err), "ERROR: kept\n");
    assert!(!bad.exists());
}

#[test]
fn test_alias_of_unopenable_file_is_disabled() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let bad = temp_dir.path().join("missing").join("x.log");

    let logger = StreamLogger::from_paths(&bad, &bad, "", OpenMode::Truncate);
    assert_eq!(logger.sink().slot_kind(Channel::Warning), SlotKind::Alias(Channel::Info));
    assert!(logger.sink().is_disabled(Channel::Warning));
    logger.warn("Run", "dropped", &[]);
    assert_eq!(logger.warning_count(), 1);
}

#[test]
fn test_append_mode_keeps_previous_runs() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("runs.log");

    for run in 1..=2 {
        let logger = StreamLogger::builder()
            .info(Target::path(&path))
            .open_mode(OpenMode::Append)
            .title_flags(TitleFlags::NONE)
            .build();
        logger.info("Run", "run %d", &[Arg::from(run)]);
    }

    assert_eq!(logger_file(&path), "run 1\nrun 2\n");
}

#[test]
fn test_copy_does_not_own_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("owned.log");
    let buffer = SharedBuffer::new();

    let logger = StreamLogger::builder()
        .info(Target::path(&path))
        .warnings(buffer.writer())
        .title_flags(TitleFlags::NONE)
        .build();
    logger.warn("Run", "before copy", &[]);

    let copy = logger.clone();
    assert_eq!(copy.sink().slot_kind(Channel::Info), SlotKind::Disabled);
    assert_eq!(copy.warning_count(), 1);

    copy.info("Copy", "not written", &[]);
    copy.warn("Copy", "shared writer", &[]);
    drop(copy);

    logger.info("Run", "original still writes", &[]);
    drop(logger);

    assert_eq!(logger_file(&path), "original still writes\n");
    assert_eq!(buffer.lines(), vec!["WARNING: before copy", "WARNING: shared writer"]);
}

#[test]
fn test_banner_on_file_destinations() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("banner.log");

    let logger = StreamLogger::builder()
        .info(Target::path(&path))
        .warnings(Target::path(&path))
        .header("--- begin ---")
        .footer("--- end ---")
        .title_flags(TitleFlags::NONE)
        .build();
    logger.warn("Run", "middle", &[]);
    drop(logger);

    assert_eq!(logger_file(&path), "--- begin ---\nWARNING: middle\n--- end ---\n");
}

#[test]
fn test_section_failure_over_stream_logger() {
    let buffer = SharedBuffer::new();
    let shared = buffer.writer();
    let logger = StreamLogger::builder()
        .info(shared.clone())
        .warnings(shared)
        .title_flags(TitleFlags::NONE)
        .build();

    let result: Result<(), std::io::Error> = section::run(&logger, "Read", || {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "mesh.dat missing"))
    });

    let err = result.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    assert_eq!(
        buffer.lines(),
        vec![
            "Section Read started",
            "WARNING: Section Read not completed due to: mesh.dat missing",
        ]
    );
    assert_eq!(logger.warning_count(), 1);
}

#[test]
fn test_section_guard_with_question_mark() {
    fn load(logger: &dyn Log, fail: bool) -> Result<u32, String> {
        let section = Section::begin(logger, "Load");
        if fail {
            Err::<(), _>("bad header".to_string())?;
        }
        section.end();
        Ok(1)
    }

    let memory = MemoryLogger::new();
    assert!(load(&memory, true).is_err());
    assert!(load(&memory, false).is_ok());

    let records = memory.records();
    let failures: Vec<_> = records.iter().filter(|r| r.id == SECTION_FAILURE_ID).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].message, "Section Load not completed due to: unknown");
}

#[test]
fn test_message_stream_over_delegation() {
    let memory = Arc::new(MemoryLogger::new());
    let logger = DelegatingLogger::with_personal(memory.clone());
    {
        let mut stream = MessageStream::warn(&logger, "Check");
        stream.append("faces: ").append(12).append(", bad: ").append(0);
    }
    assert_eq!(memory.messages(LogLevel::Warn), vec!["faces: 12, bad: 0"]);
}

#[test]
fn test_no_throw_on_bad_templates() {
    let buffer = SharedBuffer::new();
    let logger = StreamLogger::from_writers(Some(buffer.writer()), None, None);

    logger.info("Bad", "%d", &[]);
    logger.info("Bad", "%s %s", &[Arg::from("only one")]);
    logger.info("Bad", "%d", &[Arg::from("text")]);
    logger.info("Bad", "100%", &[]);
    logger.error("Bad", "%y", &[]);

    assert!(buffer.contents().is_empty());
    assert_eq!(logger.counters().dropped(), 5);
    assert_eq!(logger.error_count(), 0);
}

#[test]
fn test_concurrent_logging_through_shared_logger() {
    let buffer = SharedBuffer::new();
    let host: Arc<dyn Log> = Arc::new(
        StreamLogger::builder()
            .info(buffer.writer())
            .title_flags(TitleFlags::NONE)
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = DelegatingLogger::with_parent(Arc::clone(&host));
            thread::spawn(move || {
                for i in 0..50 {
                    logger.info("Worker", "thread %d message %d", &[Arg::from(t), Arg::from(i)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = buffer.lines();
    assert_eq!(lines.len(), 200);
    assert!(lines.iter().all(|l| l.starts_with("thread ")));
}

fn logger_file(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}
