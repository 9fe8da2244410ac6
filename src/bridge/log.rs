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

use crate::Error;
use crate::ErrorKind;
use crate::Logger;
use crate::detail::CallSite;
use crate::record::Level;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        log::Log::enabled(crate::logger(), metadata)
    }

    fn log(&self, record: &log::Record) {
        log::Log::log(crate::logger(), record);
    }

    fn flush(&self) {
        crate::flush();
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from
/// the log crate will be forwarded to the process-wide [`Logger`], which is assembled on
/// first use.
///
/// This function will set the global maximum log level to `Trace`. The sinks of the
/// process-wide logger decide what is written.
///
/// # Errors
///
/// Return [`ErrorKind::AlreadyInitialized`] if the log crate global logger has already been
/// set.
pub fn try_setup_log_crate() -> Result<(), Error> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER).map_err(|err| {
        Error::new(
            ErrorKind::AlreadyInitialized,
            "the log crate global logger is already set",
        )
        .with_source(err)
    })?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// logforth_ini::bridge::setup_log_crate();
/// log::info!("forwarded to the console");
/// ```
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logforth_ini::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let site = CallSite::new(
            record.file().unwrap_or_default(),
            record.module_path().unwrap_or_default(),
            record.line().unwrap_or_default(),
        );
        Logger::log(self, record.level().into(), &site, *record.args());
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::config::LoggerConfig;
    use crate::config::RotatingFileConfig;

    #[test]
    fn test_level_conversion() {
        assert_eq!(Level::from(log::Level::Error), Level::Error);
        assert_eq!(Level::from(log::Level::Warn), Level::Warn);
        assert_eq!(Level::from(log::Level::Info), Level::Info);
        assert_eq!(Level::from(log::Level::Debug), Level::Debug);
        assert_eq!(Level::from(log::Level::Trace), Level::Trace);
    }

    #[test]
    fn test_log_record_through_logger() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = LoggerConfig::default();
        config.set_flush_every(0);
        let mut rotating = RotatingFileConfig::default();
        rotating
            .file_mut()
            .set_level(Level::Info)
            .set_directory(temp_dir.path().to_string_lossy())
            .set_pattern("%l %v");
        config.add_rotating(rotating);
        let logger = crate::builder(&config).build().unwrap();

        let debug = log::Record::builder()
            .args(format_args!("skipped"))
            .level(log::Level::Debug)
            .build();
        assert!(!log::Log::enabled(&logger, debug.metadata()));
        log::Log::log(&logger, &debug);

        log::Log::log(
            &logger,
            &log::Record::builder()
                .args(format_args!("disk {}", "full"))
                .level(log::Level::Error)
                .file(Some("src/storage/disk.rs"))
                .module_path(Some("app::storage"))
                .line(Some(7))
                .build(),
        );
        log::Log::flush(&logger);

        let content = fs::read_to_string(temp_dir.path().join("log.log")).unwrap();
        assert_eq!(content, "error disk full <disk.rs> <app::storage> <7>\n");
    }
}
