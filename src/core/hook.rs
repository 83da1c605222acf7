//! What happens after a fatal record has been written.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Termination policy for `fatal` records.
///
/// The logger writes and flushes the record before calling the hook.
pub trait FatalHook: Send + Sync + fmt::Debug {
    fn terminate(&self, message: &str) -> !;
}

static WATCH_LOGGED_PANICS: AtomicBool = AtomicBool::new(false);

thread_local! {
    static LOGGED_PANIC: Cell<bool> = const { Cell::new(false) };
}

/// Start tracking panics raised by the logger itself after writing their
/// record, so a process panic hook can skip them.
pub(crate) fn watch_logged_panics() {
    WATCH_LOGGED_PANICS.store(true, Ordering::Relaxed);
}

/// The next panic on this thread comes from a record already written.
pub(crate) fn mark_logged_panic() {
    if WATCH_LOGGED_PANICS.load(Ordering::Relaxed) {
        LOGGED_PANIC.with(|flag| flag.set(true));
    }
}

/// Whether the panic in progress on this thread was marked; clears the mark.
pub(crate) fn take_logged_panic() -> bool {
    LOGGED_PANIC.with(|flag| flag.replace(false))
}

/// Exit the process with a status code. The default hook.
#[derive(Debug, Clone, Copy)]
pub struct ExitHook {
    pub code: i32,
}

impl Default for ExitHook {
    fn default() -> Self {
        Self { code: 1 }
    }
}

impl FatalHook for ExitHook {
    fn terminate(&self, _message: &str) -> ! {
        std::process::exit(self.code)
    }
}

/// Unwind instead of exiting, so a test harness can observe the termination.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicHook;

impl FatalHook for PanicHook {
    fn terminate(&self, message: &str) -> ! {
        panic!("fatal: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "fatal: out of disk")]
    fn test_panic_hook_unwinds() {
        PanicHook.terminate("out of disk");
    }

    #[test]
    fn test_exit_hook_default_code() {
        assert_eq!(ExitHook::default().code, 1);
    }
}
