//! Stress tests for shared destinations and delegation
//!
//! These tests verify:
//! - No message is lost or duplicated on a file shared by all levels
//! - Counters stay exact under concurrent logging
//! - Reconfiguring a delegation chain while threads log through it is safe
//! - Sections stay balanced when many threads open them at once

use rust_section_logger::appenders::{OpenMode, SharedBuffer, StreamLogger};
use rust_section_logger::core::section;
use rust_section_logger::core::{Arg, DelegatingLogger, Log, LogLevel, TitleFlags};
use rust_section_logger::MemoryLogger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const MESSAGES: usize = 250;

/// Every message written to a file shared by all three levels appears once
#[test]
fn test_shared_file_under_concurrent_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("shared_stress.log");

    let logger = Arc::new(StreamLogger::from_paths(
        &log_file,
        &log_file,
        &log_file,
        OpenMode::Truncate,
    ));
    logger.set_title_flags(TitleFlags::NONE);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..MESSAGES {
                    let level = match i % 3 {
                        0 => LogLevel::Info,
                        1 => LogLevel::Warn,
                        _ => LogLevel::Error,
                    };
                    logger.log(level, "Stress", "t%d m%d", &[Arg::from(t), Arg::from(i)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let warnings = logger.warning_count();
    let errors = logger.error_count();
    drop(logger);

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), THREADS * MESSAGES);
    for t in 0..THREADS {
        for i in 0..MESSAGES {
            let needle = format!("t{} m{}", t, i);
            let hits = lines.iter().filter(|l| l.ends_with(&needle)).count();
            assert_eq!(hits, 1, "message '{}' written {} times", needle, hits);
        }
    }

    let per_thread_warnings = (0..MESSAGES).filter(|i| i % 3 == 1).count();
    let per_thread_errors = (0..MESSAGES).filter(|i| i % 3 == 2).count();
    assert_eq!(warnings, (THREADS * per_thread_warnings) as u64);
    assert_eq!(errors, (THREADS * per_thread_errors) as u64);
}

/// Swapping the personal logger while other threads log never loses the
/// chain: every message lands in exactly one of the two loggers
#[test]
fn test_reconfiguration_while_logging() {
    let first = Arc::new(MemoryLogger::new());
    let second = Arc::new(MemoryLogger::new());
    let root = Arc::new(DelegatingLogger::with_personal(first.clone()));
    let stop = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let child = DelegatingLogger::new();
            root.adopt(&child);
            thread::spawn(move || {
                for i in 0..MESSAGES {
                    child.info("Worker", "message %d", &[Arg::from(i)]);
                }
            })
        })
        .collect();

    let switcher = {
        let root = Arc::clone(&root);
        let stop = Arc::clone(&stop);
        let (first, second) = (first.clone(), second.clone());
        thread::spawn(move || {
            let mut use_first = false;
            while !stop.load(Ordering::Relaxed) {
                let target: Arc<dyn Log> = if use_first {
                    first.clone()
                } else {
                    second.clone()
                };
                root.set_personal_logger(Some(target));
                use_first = !use_first;
                thread::yield_now();
            }
        })
    };

    for handle in handles {
        handle.join().expect("logging thread panicked");
    }
    stop.store(true, Ordering::Relaxed);
    switcher.join().expect("switcher panicked");

    assert_eq!(first.len() + second.len(), THREADS * MESSAGES);
}

/// Concurrent sections each produce a balanced begin/end pair
#[test]
fn test_concurrent_sections_stay_balanced() {
    let buffer = SharedBuffer::new();
    let logger: Arc<dyn Log> = Arc::new(
        StreamLogger::builder()
            .info(buffer.writer())
            .warnings(buffer.writer())
            .title_flags(TitleFlags::NONE)
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..20 {
                    let outcome: Result<(), String> =
                        section::run_indexed(logger.as_ref(), "Job", (t * 100 + i) as i64, || {
                            if i % 5 == 4 {
                                Err(format!("job {} failed", i))
                            } else {
                                Ok(())
                            }
                        });
                    assert_eq!(outcome.is_err(), i % 5 == 4);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("section thread panicked");
    }

    let lines = buffer.lines();
    let started = lines.iter().filter(|l| l.ends_with("started")).count();
    let finished = lines.iter().filter(|l| l.ends_with("finished")).count();
    let failed = lines.iter().filter(|l| l.contains("not completed")).count();
    assert_eq!(started, THREADS * 20);
    assert_eq!(finished + failed, started);
    assert_eq!(failed, THREADS * 4);
}
