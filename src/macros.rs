// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logging macros capturing their call site.
//!
//! Each macro writes to the process-wide [`logger`](crate::logger()) unless a leading
//! `logger: <expr>,` names an explicit [`Logger`](crate::Logger).
//!
//! ```
//! use logforth_ini::LoggerConfig;
//!
//! let logger = logforth_ini::builder(&LoggerConfig::default()).build().unwrap();
//!
//! logforth_ini::info!(logger: logger, "listening on port {}", 8080);
//! logforth_ini::error_str!(logger: logger, "connection refused");
//! ```

/// Return the name of the enclosing function, without its module path.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }};
}

/// Capture the current [`CallSite`](crate::detail::CallSite).
#[macro_export]
macro_rules! callsite {
    () => {
        $crate::detail::CallSite::new(::std::file!(), $crate::function_name!(), ::std::line!())
    };
}

/// Log a formatted message at the given level.
///
/// ```
/// use logforth_ini::record::Level;
///
/// logforth_ini::log!(Level::Warn, "{} retries left", 3);
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {{
        let level: $crate::record::Level = $level;
        let logger: &$crate::Logger = &$logger;
        if logger.enabled(level) {
            logger.log(level, &$crate::callsite!(), ::std::format_args!($($arg)+));
        }
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::logger(), $level, $($arg)+)
    };
}

/// Log a pre-built message at the given level, without formatting it.
#[macro_export]
macro_rules! log_str {
    (logger: $logger:expr, $level:expr, $msg:expr) => {{
        let level: $crate::record::Level = $level;
        let logger: &$crate::Logger = &$logger;
        if logger.enabled(level) {
            let msg = &$msg;
            logger.log_str(level, &$crate::callsite!(), ::std::convert::AsRef::<str>::as_ref(msg));
        }
    }};
    ($level:expr, $msg:expr) => {
        $crate::log_str!(logger: $crate::logger(), $level, $msg)
    };
}

/// Log a formatted message at the `trace` level.
#[macro_export]
macro_rules! trace {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::record::Level::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::record::Level::Trace, $($arg)+)
    };
}

/// Log a pre-built message at the `trace` level.
#[macro_export]
macro_rules! trace_str {
    (logger: $logger:expr, $msg:expr) => {
        $crate::log_str!(logger: $logger, $crate::record::Level::Trace, $msg)
    };
    ($msg:expr) => {
        $crate::log_str!($crate::record::Level::Trace, $msg)
    };
}

/// Log a formatted message at the `debug` level.
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::record::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::record::Level::Debug, $($arg)+)
    };
}

/// Log a pre-built message at the `debug` level.
#[macro_export]
macro_rules! debug_str {
    (logger: $logger:expr, $msg:expr) => {
        $crate::log_str!(logger: $logger, $crate::record::Level::Debug, $msg)
    };
    ($msg:expr) => {
        $crate::log_str!($crate::record::Level::Debug, $msg)
    };
}

/// Log a formatted message at the `info` level.
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::record::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::record::Level::Info, $($arg)+)
    };
}

/// Log a pre-built message at the `info` level.
#[macro_export]
macro_rules! info_str {
    (logger: $logger:expr, $msg:expr) => {
        $crate::log_str!(logger: $logger, $crate::record::Level::Info, $msg)
    };
    ($msg:expr) => {
        $crate::log_str!($crate::record::Level::Info, $msg)
    };
}

/// Log a formatted message at the `warn` level.
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::record::Level::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::record::Level::Warn, $($arg)+)
    };
}

/// Log a pre-built message at the `warn` level.
#[macro_export]
macro_rules! warn_str {
    (logger: $logger:expr, $msg:expr) => {
        $crate::log_str!(logger: $logger, $crate::record::Level::Warn, $msg)
    };
    ($msg:expr) => {
        $crate::log_str!($crate::record::Level::Warn, $msg)
    };
}

/// Log a formatted message at the `error` level.
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::record::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::record::Level::Error, $($arg)+)
    };
}

/// Log a pre-built message at the `error` level.
#[macro_export]
macro_rules! error_str {
    (logger: $logger:expr, $msg:expr) => {
        $crate::log_str!(logger: $logger, $crate::record::Level::Error, $msg)
    };
    ($msg:expr) => {
        $crate::log_str!($crate::record::Level::Error, $msg)
    };
}

/// Log a formatted message at the `critical` level.
#[macro_export]
macro_rules! critical {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::record::Level::Critical, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::record::Level::Critical, $($arg)+)
    };
}

/// Log a pre-built message at the `critical` level.
#[macro_export]
macro_rules! critical_str {
    (logger: $logger:expr, $msg:expr) => {
        $crate::log_str!(logger: $logger, $crate::record::Level::Critical, $msg)
    };
    ($msg:expr) => {
        $crate::log_str!($crate::record::Level::Critical, $msg)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_function_name() {
        assert_eq!(function_name!(), "test_function_name");

        let in_closure = || function_name!();
        assert_eq!(in_closure(), "test_function_name");
    }

    #[test]
    fn test_callsite() {
        let site = callsite!();
        assert!(site.file.ends_with("macros.rs"));
        assert_eq!(site.filename(), "macros.rs");
        assert_eq!(site.function, "test_callsite");
        assert!(site.line > 0);
    }
}
