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

use std::num::NonZeroU64;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU8;

use super::log_impl::Logger;
use super::log_impl::Shared;
use super::log_impl::Sink;
use super::log_impl::SinkKind;
use crate::Error;
use crate::ErrorKind;
use crate::append::Stdout;
use crate::append::file::FileBuilder;
use crate::append::file::FileRollover;
use crate::config;
use crate::config::ConsoleConfig;
use crate::config::FileConfig;
use crate::config::LoggerConfig;
use crate::layout::PatternLayout;
use crate::record::LevelFilter;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Create a [`LoggerBuilder`] assembling a logger from `config`.
///
/// ```rust
/// use logforth_ini::LoggerConfig;
///
/// let config = LoggerConfig::default();
/// let logger = logforth_ini::builder(&config).build().unwrap();
///
/// // no sink configured: a default console sink is added
/// assert_eq!(logger.sinks().len(), 1);
/// ```
pub fn builder(config: &LoggerConfig) -> LoggerBuilder {
    LoggerBuilder {
        config: config.clone(),
        bin_dir: None,
        trap: Arc::new(DefaultTrap::default()),
    }
}

/// A builder turning a [`LoggerConfig`] into a running [`Logger`].
#[must_use = "call `build`, `try_apply` or `apply` to assemble the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    config: LoggerConfig,
    bin_dir: Option<String>,
    trap: Arc<dyn Trap>,
}

impl LoggerBuilder {
    /// Set the directory substituted for the `${bin}` placeholder.
    ///
    /// Default to the directory of the running executable.
    pub fn bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into().to_string_lossy().into_owned();
        self.bin_dir = Some(config::format_dir(&dir));
        self
    }

    /// Set the trap receiving write, rollover and flush failures.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Assemble the logger.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The executable directory cannot be determined for a `${bin}` directory.
    /// * A log directory cannot be created ([`ErrorKind::DirectoryCreate`]).
    /// * A log file cannot be opened.
    /// * The periodic flusher thread cannot be spawned.
    pub fn build(self) -> Result<Logger, Error> {
        let LoggerBuilder {
            config,
            bin_dir,
            trap,
        } = self;

        let mut bin_dir = bin_dir;
        let mut sinks = Vec::new();

        let default_console = [ConsoleConfig::default()];
        let console = if config.has_no_sinks() {
            &default_console[..]
        } else {
            config.console()
        };
        for console in console {
            sinks.push(console_sink(console));
        }

        for daily in config.daily() {
            let file = daily.file();
            let dir = prepare_dir(file, &mut bin_dir)?;
            let append = FileBuilder::new(&dir, file.base_name())
                .filename_suffix(file.normalized_ext())
                .rollover(FileRollover::Daily)
                .layout(PatternLayout::new(file.pattern()).no_color())
                .trap(trap.clone())
                .build()?;
            let path = PathBuf::from(format!("{dir}{}", file.file_name()));
            sinks.push(Sink::new(
                SinkKind::DailyFile { path },
                file.level(),
                file.pattern(),
                append,
            ));
        }

        for rotating in config.rotating() {
            let file = rotating.file();
            let max_file_size = NonZeroU64::new(rotating.max_file_size()).ok_or_else(|| {
                Error::new(ErrorKind::InvalidNumericValue, "max_file_size must be positive")
            })?;
            let dir = prepare_dir(file, &mut bin_dir)?;
            let append = FileBuilder::new(&dir, file.base_name())
                .filename_suffix(file.normalized_ext())
                .rollover(FileRollover::Size {
                    max_file_size,
                    max_files: rotating.max_files_count(),
                })
                .layout(PatternLayout::new(file.pattern()).no_color())
                .trap(trap.clone())
                .build()?;
            let path = append.current_path();
            sinks.push(Sink::new(
                SinkKind::RotatingFile {
                    path,
                    max_file_size: max_file_size.get(),
                    max_files: rotating.max_files_count(),
                },
                file.level(),
                file.pattern(),
                append,
            ));
        }

        let level = sinks
            .iter()
            .map(|sink| LevelFilter::from(sink.level()))
            .min()
            .unwrap_or(LevelFilter::Off);

        let shared = Shared {
            name: config.name().to_string(),
            level,
            flush_on: config.flush_on(),
            detailed_min: AtomicU8::new(config.detailed_min() as u8),
            filename_type: config.detailed_filename_type(),
            sinks,
            trap,
        };
        Logger::new(shared, config.flush_every())
    }

    /// Assemble the logger and install it as the process-wide logger.
    ///
    /// # Errors
    ///
    /// Return an error if the logger cannot be assembled, or if the process-wide logger has
    /// already been initialized ([`ErrorKind::AlreadyInitialized`]).
    pub fn try_apply(self) -> Result<(), Error> {
        let logger = self.build()?;
        super::global::install(logger)
    }

    /// Assemble the logger and install it as the process-wide logger.
    ///
    /// This function will panic if it is called more than once, or if another library has
    /// already initialized the process-wide logger.
    ///
    /// This function will also panic if the logger cannot be assembled.
    pub fn apply(self) {
        self.try_apply()
            .expect("LoggerBuilder::apply must be called before the global logger initialized");
    }
}

fn console_sink(console: &ConsoleConfig) -> Sink {
    let color = console.has_color();
    let layout = PatternLayout::new(console.pattern());
    let layout = if color { layout } else { layout.no_color() };
    Sink::new(
        SinkKind::Console { color },
        console.level(),
        console.pattern(),
        Stdout::default().with_layout(layout),
    )
}

fn prepare_dir(file: &FileConfig, bin_dir: &mut Option<String>) -> Result<String, Error> {
    if bin_dir.is_none() && file.directory().starts_with(config::BIN_PLACEHOLDER) {
        *bin_dir = Some(config::bin_dir()?);
    }
    let dir = file.resolved_directory(bin_dir.as_deref().unwrap_or(""));
    config::create_dir(&dir)?;
    Ok(dir)
}
