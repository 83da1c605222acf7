//! Panic recovery.
//!
//! A unit of work wrapped in [`recover_and_log_panic`] that panics produces
//! one fatal record tagged `op = "panic_logger"` with the payload and stack
//! trace; the logger's fatal hook then ends the process. The panic is never
//! swallowed.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::pin;
use std::sync::Once;

use futures_util::future::{poll_fn, FutureExt};

use crate::core::entry::Caller;
use crate::core::field::Field;
use crate::core::hook;
use crate::core::level::Level;
use crate::lifecycle::{sugared_logger, try_logger};
use crate::logger::SugaredLogger;

pub const PANIC_OP: &str = "panic_logger";

thread_local! {
    static RECOVER_DEPTH: Cell<usize> = const { Cell::new(0) };
    static PANIC_STACK: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Marks the current thread as running inside a recovery wrapper.
struct RecoverScope;

impl RecoverScope {
    fn enter() -> Self {
        RECOVER_DEPTH.with(|d| d.set(d.get() + 1));
        RecoverScope
    }
}

impl Drop for RecoverScope {
    fn drop(&mut self) {
        RECOVER_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Run `f`, turning a panic into a fatal record on the process logger.
///
/// ```no_run
/// corrlog::init(false, false);
/// std::thread::spawn(|| {
///     corrlog::recover_and_log_panic(|| {
///         // work
///     })
/// });
/// ```
///
/// # Panics
///
/// If `f` panics before [`init`](crate::init) was called.
#[track_caller]
pub fn recover_and_log_panic<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let caller = Caller::here();
    match run_scoped(f) {
        Ok(value) => value,
        Err(payload) => fatal_panic(&sugared_logger(), caller, payload.as_ref()),
    }
}

/// [`recover_and_log_panic`] with an explicit logger.
#[track_caller]
pub fn recover_and_log_panic_with<F, R>(logger: &SugaredLogger, f: F) -> R
where
    F: FnOnce() -> R,
{
    let caller = Caller::here();
    match run_scoped(f) {
        Ok(value) => value,
        Err(payload) => fatal_panic(logger, caller, payload.as_ref()),
    }
}

/// [`recover_and_log_panic`] for futures, e.g. the body of a spawned task.
#[track_caller]
pub fn recover_and_log_panic_async<F>(fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let caller = Caller::here();
    async move {
        match poll_scoped(fut).await {
            Ok(value) => value,
            Err(payload) => fatal_panic(&sugared_logger(), caller, payload.as_ref()),
        }
    }
}

/// [`recover_and_log_panic_async`] with an explicit logger.
#[track_caller]
pub fn recover_and_log_panic_async_with<F>(
    logger: SugaredLogger,
    fut: F,
) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let caller = Caller::here();
    async move {
        match poll_scoped(fut).await {
            Ok(value) => value,
            Err(payload) => fatal_panic(&logger, caller, payload.as_ref()),
        }
    }
}

/// Emit the fatal record for a caught panic payload, then run the fatal hook.
#[track_caller]
pub fn log_panic(logger: &SugaredLogger, payload: &(dyn Any + Send)) -> ! {
    fatal_panic(logger, Caller::here(), payload)
}

/// Install a process-wide panic hook.
///
/// Inside a recovery wrapper the hook keeps the stack of the panicking
/// frame for the fatal record. Elsewhere it emits an error record with the
/// panic location on the process logger, if one is initialized. Panics
/// raised by `panic`, `dpanic` and `fatal` after writing their own record
/// are not recorded again. The previously installed hook runs afterwards
/// in every case.
pub fn install_panic_hook() {
    HOOK.call_once(|| {
        hook::watch_logged_panics();
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if hook::take_logged_panic() {
                // already on record
            } else if RECOVER_DEPTH.with(Cell::get) > 0 {
                let stack = Backtrace::force_capture().to_string();
                PANIC_STACK.with(|s| *s.borrow_mut() = Some(stack));
            } else if let Some(logger) = try_logger() {
                let location = info
                    .location()
                    .map(|l| l.to_string())
                    .unwrap_or_default();
                logger.log(
                    Level::Error,
                    Caller::here(),
                    &format!("panic: {}", panic_message(info.payload())),
                    &[Field::string("panic_location", location)],
                );
            }
            previous(info);
        }));
    });
}

pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    }
}

fn run_scoped<F, R>(f: F) -> std::thread::Result<R>
where
    F: FnOnce() -> R,
{
    let _scope = RecoverScope::enter();
    panic::catch_unwind(AssertUnwindSafe(f))
}

async fn poll_scoped<F>(fut: F) -> std::thread::Result<F::Output>
where
    F: Future,
{
    let mut fut = pin!(AssertUnwindSafe(fut).catch_unwind());
    poll_fn(|cx| {
        let _scope = RecoverScope::enter();
        fut.as_mut().poll(cx)
    })
    .await
}

fn fatal_panic(logger: &SugaredLogger, caller: Caller, payload: &(dyn Any + Send)) -> ! {
    let stack = PANIC_STACK
        .with(|s| s.borrow_mut().take())
        .unwrap_or_else(|| Backtrace::force_capture().to_string());
    logger.with("op", PANIC_OP).fatal_with_stack(
        caller,
        &format!("panic: {}", panic_message(payload)),
        stack,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use crate::core::hook::PanicHook;
    use crate::core::sink::MemoryWriter;
    use crate::logger::Logger;
    use std::panic::catch_unwind;

    fn sugared() -> (SugaredLogger, MemoryWriter) {
        let out = MemoryWriter::new();
        let logger = Logger::builder(LoggingConfig::production())
            .writer(out.clone())
            .error_writer(MemoryWriter::new())
            .fatal_hook(PanicHook)
            .build()
            .unwrap();
        (logger.sugar(), out)
    }

    #[test]
    fn test_normal_return_passes_through() {
        let (log, out) = sugared();

        let value = recover_and_log_panic_with(&log, || 7);

        assert_eq!(value, 7);
        assert!(out.records().is_empty());
    }

    #[test]
    fn test_panic_becomes_one_fatal_record() {
        let (log, out) = sugared();

        let result = catch_unwind(AssertUnwindSafe(|| {
            recover_and_log_panic_with(&log, || -> () { panic!("boom") })
        }));

        assert!(result.is_err());
        let records = out.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["level"], "fatal");
        assert_eq!(record["op"], PANIC_OP);
        assert_eq!(record["msg"], "panic: boom");
        assert!(!record["stacktrace"].as_str().unwrap().is_empty());
        assert!(record["caller"].as_str().unwrap().contains("recovery.rs:"));
    }

    #[test]
    fn test_formatted_payload() {
        let (log, out) = sugared();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            recover_and_log_panic_with(&log, || -> () { panic!("code {}", 3) })
        }));

        assert_eq!(out.records()[0]["msg"], "panic: code 3");
    }

    #[test]
    fn test_panic_message_for_opaque_payload() {
        assert_eq!(panic_message(&42u8), "Box<dyn Any>");
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
    }

    #[test]
    fn test_scope_depth_is_restored() {
        let (log, _) = sugared();

        recover_and_log_panic_with(&log, || {
            assert_eq!(RECOVER_DEPTH.with(Cell::get), 1);
        });

        assert_eq!(RECOVER_DEPTH.with(Cell::get), 0);
    }

    #[tokio::test]
    async fn test_async_normal_return() {
        let (log, out) = sugared();

        let value = recover_and_log_panic_async_with(log, async { "done" }).await;

        assert_eq!(value, "done");
        assert!(out.records().is_empty());
    }

    #[tokio::test]
    async fn test_async_panic_is_logged() {
        let (log, out) = sugared();

        let result = AssertUnwindSafe(recover_and_log_panic_async_with(log, async {
            panic!("task boom");
        }))
        .catch_unwind()
        .await;

        assert!(result.is_err());
        let record = &out.records()[0];
        assert_eq!(record["level"], "fatal");
        assert_eq!(record["msg"], "panic: task boom");
        assert_eq!(record["op"], PANIC_OP);
    }
}
