//! Panic recovery on the process logger. Own binary: initializes the
//! process-wide logger and installs a panic hook.

use std::thread;

use corrlog::{LoggingConfig, PANIC_OP};

mod common;

#[test]
fn test_panics_become_fatal_records() {
    let capture = common::Captured::new();
    corrlog::init_with(capture.builder(LoggingConfig::production()));
    corrlog::install_panic_hook();

    // Work that returns normally is untouched.
    let value = thread::spawn(|| corrlog::recover_and_log_panic(|| 5))
        .join()
        .unwrap();
    assert_eq!(value, 5);
    assert!(capture.out.records().iter().all(|r| r["level"] != "fatal"));

    // A panicking unit of work yields one fatal record; nothing is returned.
    let result = thread::spawn(|| {
        corrlog::recover_and_log_panic(|| -> () { panic!("boom") });
    })
    .join();
    assert!(result.is_err());

    let fatal: Vec<_> = capture
        .out
        .records()
        .into_iter()
        .filter(|r| r["level"] == "fatal")
        .collect();
    assert_eq!(fatal.len(), 1);
    assert_eq!(fatal[0]["op"], PANIC_OP);
    assert_eq!(fatal[0]["msg"], "panic: boom");
    assert!(!fatal[0]["stacktrace"].as_str().unwrap().is_empty());

    // Spawned tasks.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let joined = runtime.block_on(async {
        tokio::spawn(corrlog::recover_and_log_panic_async(async {
            panic!("task boom");
        }))
        .await
    });
    assert!(joined.unwrap_err().is_panic());
    assert_eq!(capture.records_with_msg("panic: task boom").len(), 1);

    // Panics outside a wrapper are still recorded by the hook, at error level.
    let _ = thread::spawn(|| panic!("loose")).join();
    let loose = capture.records_with_msg("panic: loose");
    assert_eq!(loose.len(), 1);
    assert_eq!(loose[0]["level"], "error");
    assert!(loose[0]["panic_location"]
        .as_str()
        .unwrap()
        .contains("panic_recovery.rs"));
}
