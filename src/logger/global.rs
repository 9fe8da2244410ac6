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

//! The process-wide logger used by the logging macros.

use std::sync::OnceLock;

use super::builder::builder;
use super::log_impl::Logger;
use crate::Error;
use crate::ErrorKind;
use crate::config::LoggerConfig;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// The exit status used when the process-wide logger cannot set up its storage.
pub const EXIT_STORAGE_FAILURE: i32 = 100;

static CONFIG: OnceLock<LoggerConfig> = OnceLock::new();
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Set the configuration the process-wide logger is lazily assembled from.
///
/// # Errors
///
/// Return [`ErrorKind::AlreadyInitialized`] if a configuration was already set, or if the
/// process-wide logger is already running.
pub fn set_config(config: LoggerConfig) -> Result<(), Error> {
    if LOGGER.get().is_some() {
        return Err(already_initialized("logger"));
    }
    CONFIG
        .set(config)
        .map_err(|_| already_initialized("configuration"))?;
    // the logger may have been created between the check and the set
    if LOGGER.get().is_some() {
        return Err(already_initialized("logger"));
    }
    Ok(())
}

/// Return the process-wide logger, assembling it on first use.
///
/// The logger is assembled from the configuration given to [`set_config`], or from
/// [`LoggerConfig::default`] which writes to the console. If it cannot be assembled, the
/// error is reported on stderr and the process exits with [`EXIT_STORAGE_FAILURE`]. Use
/// [`try_init`] to handle the error instead.
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(|| {
        let config = CONFIG.get_or_init(LoggerConfig::default);
        match builder(config).build() {
            Ok(logger) => logger,
            Err(err) => {
                DefaultTrap::default().trap(&err);
                std::process::exit(EXIT_STORAGE_FAILURE);
            }
        }
    })
}

/// Assemble the process-wide logger from `config` now.
///
/// # Errors
///
/// Return an error if the logger cannot be assembled, or [`ErrorKind::AlreadyInitialized`]
/// if the process-wide logger is already running.
pub fn try_init(config: LoggerConfig) -> Result<&'static Logger, Error> {
    if LOGGER.get().is_some() {
        return Err(already_initialized("logger"));
    }
    let logger = builder(&config).build()?;
    install(logger)?;
    // a second configuration is harmless once the logger exists
    let _ = CONFIG.set(config);
    LOGGER
        .get()
        .ok_or_else(|| Error::new(ErrorKind::Unexpected, "the global logger is not installed"))
}

/// Flush every sink of the process-wide logger, if it is running.
///
/// Statics are never dropped, so call this before the process exits.
pub fn flush() {
    if let Some(logger) = LOGGER.get() {
        logger.flush();
    }
}

pub(super) fn install(logger: Logger) -> Result<(), Error> {
    LOGGER
        .set(logger)
        .map_err(|_| already_initialized("logger"))
}

fn already_initialized(what: &'static str) -> Error {
    Error::new(
        ErrorKind::AlreadyInitialized,
        format!("the global {what} is already initialized"),
    )
}
