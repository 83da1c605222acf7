//! Logging macros.
//!
//! The macros work on both handle types and, unlike the methods, record the
//! enclosing function path under the `func` key in development mode.
//!
//! ```no_run
//! let log = corrlog::logger().with_correlation_id(&"abc-123");
//! corrlog::info!(log, "order {} accepted", 42);
//! ```

/// Fully qualified path of the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// [`Caller`](crate::Caller) for the macro invocation site.
#[macro_export]
macro_rules! caller {
    () => {
        $crate::Caller::new(file!(), line!(), Some($crate::__function_path!()))
    };
}

/// Emit at an explicit [`Level`](crate::Level).
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_args($level, $crate::caller!(), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Fatal record; the logger's fatal hook runs afterwards.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}
