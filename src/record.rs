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

//! Log record, severity levels and level filters.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::SystemTime;

use crate::Error;
use crate::ErrorKind;

/// The payload of a log message.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    now: SystemTime,

    // the metadata
    level: Level,
    logger: &'a str,
    file: Option<&'a str>,
    function: Option<&'a str>,
    line: Option<u32>,

    // the payload
    payload: &'a str,
}

impl<'a> Record<'a> {
    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.now
    }

    /// The verbosity level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The name of the logger emitting the message.
    pub fn logger(&self) -> &'a str {
        self.logger
    }

    /// The source file containing the message.
    pub fn file(&self) -> Option<&'a str> {
        self.file
    }

    /// The filename of the source file.
    pub fn filename(&self) -> Cow<'a, str> {
        self.file
            .map(Path::new)
            .and_then(Path::file_name)
            .map(std::ffi::OsStr::to_string_lossy)
            .unwrap_or_default()
    }

    /// The function containing the message.
    pub fn function(&self) -> Option<&'a str> {
        self.function
    }

    /// The line containing the message.
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// The message body.
    pub fn payload(&self) -> &'a str {
        self.payload
    }

    /// Returns a new builder.
    pub fn builder() -> RecordBuilder<'a> {
        RecordBuilder::default()
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    record: Record<'a>,
}

impl Default for RecordBuilder<'_> {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                now: SystemTime::now(),
                level: Level::Info,
                logger: "",
                file: None,
                function: None,
                line: None,
                payload: "",
            },
        }
    }
}

impl<'a> RecordBuilder<'a> {
    /// Set [`time`](Record::time).
    pub fn time(mut self, now: SystemTime) -> Self {
        self.record.now = now;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`logger`](Record::logger).
    pub fn logger(mut self, logger: &'a str) -> Self {
        self.record.logger = logger;
        self
    }

    /// Set [`file`](Record::file).
    pub fn file(mut self, file: Option<&'a str>) -> Self {
        self.record.file = file;
        self
    }

    /// Set [`function`](Record::function).
    pub fn function(mut self, function: Option<&'a str>) -> Self {
        self.record.function = function;
        self
    }

    /// Set [`line`](Record::line).
    pub fn line(mut self, line: Option<u32>) -> Self {
        self.record.line = line;
        self
    }

    /// Set [`payload`](Record::payload).
    pub fn payload(mut self, payload: &'a str) -> Self {
        self.record.payload = payload;
        self
    }

    /// Invoke the builder and return a `Record`
    pub fn build(self) -> Record<'a> {
        self.record
    }
}

/// The severity of a log record, ordered from the most verbose to the most severe.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Designates very low priority, often extremely verbose, information.
    Trace = 0,
    /// Designates lower priority information.
    Debug = 1,
    /// Designates useful information.
    Info = 2,
    /// Designates hazardous situations.
    Warn = 3,
    /// Designates very serious errors.
    Error = 4,
    /// Designates errors the application cannot continue from.
    Critical = 5,
}

impl Level {
    /// All levels, from the most verbose to the most severe.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Critical,
    ];

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation, and it is the
    /// form written back to configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Critical => "critical",
        }
    }

    /// Return the one-letter representation of the `Level`.
    pub fn as_short_str(&self) -> &'static str {
        match self {
            Level::Trace => "T",
            Level::Debug => "D",
            Level::Info => "I",
            Level::Warn => "W",
            Level::Error => "E",
            Level::Critical => "C",
        }
    }

    fn from_u8(n: u8) -> Option<Level> {
        Level::ALL.get(n as usize).copied()
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    /// Parse a level name, rejecting `off`.
    ///
    /// Use this for fields that assign a severity (a sink's level, the flush trigger).
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        match LevelFilter::from_str(s)? {
            LevelFilter::Off => Err(Error::new(
                ErrorKind::InvalidEnumValue,
                "level `off` is not allowed here",
            )),
            filter => filter.level().ok_or_else(|| {
                Error::new(ErrorKind::Unexpected, format!("malformed level: {s:?}"))
            }),
        }
    }
}

/// A severity threshold: a [`Level`] or `off`, which is above every level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum LevelFilter {
    /// Enables all levels.
    Trace = 0,
    /// Enables debug and above.
    Debug = 1,
    /// Enables info and above.
    Info = 2,
    /// Enables warn and above.
    Warn = 3,
    /// Enables error and above.
    Error = 4,
    /// Enables critical only.
    Critical = 5,
    /// Disables all levels.
    Off = 6,
}

impl LevelFilter {
    /// Checks whether the given level reaches this threshold.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_ini::record::Level;
    /// use logforth_ini::record::LevelFilter;
    ///
    /// let filter = LevelFilter::Error;
    ///
    /// assert_eq!(filter.test(Level::Trace), false);
    /// assert_eq!(filter.test(Level::Error), true);
    /// assert_eq!(filter.test(Level::Critical), true);
    /// assert_eq!(LevelFilter::Off.test(Level::Critical), false);
    /// ```
    pub fn test(&self, level: Level) -> bool {
        self.level().is_some_and(|min| level >= min)
    }

    /// Return the lowest enabled level, or `None` for `off`.
    pub fn level(&self) -> Option<Level> {
        match self {
            LevelFilter::Off => None,
            filter => Level::from_u8(*filter as u8),
        }
    }

    /// Return the string representation of the `LevelFilter`.
    pub fn as_str(&self) -> &'static str {
        match self.level() {
            Some(level) => level.as_str(),
            None => "off",
        }
    }

    pub(crate) fn from_u8(n: u8) -> LevelFilter {
        match Level::from_u8(n) {
            Some(level) => level.into(),
            None => LevelFilter::Off,
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LevelFilter::Trace,
            Level::Debug => LevelFilter::Debug,
            Level::Info => LevelFilter::Info,
            Level::Warn => LevelFilter::Warn,
            Level::Error => LevelFilter::Error,
            Level::Critical => LevelFilter::Critical,
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LevelFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<LevelFilter, Self::Err> {
        for (name, filter) in [
            ("trace", LevelFilter::Trace),
            ("debug", LevelFilter::Debug),
            ("info", LevelFilter::Info),
            ("warn", LevelFilter::Warn),
            ("warning", LevelFilter::Warn),
            ("error", LevelFilter::Error),
            ("err", LevelFilter::Error),
            ("critical", LevelFilter::Critical),
            ("crit", LevelFilter::Critical),
            ("off", LevelFilter::Off),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(filter);
            }
        }

        Err(Error::new(
            ErrorKind::InvalidEnumValue,
            format!("malformed level: {s:?}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Error < Level::Critical);
        assert!(LevelFilter::Critical < LevelFilter::Off);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("err".parse::<Level>().unwrap(), Level::Error);

        let err = "off".parse::<Level>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
        let err = "verbose".parse::<Level>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);

        assert_eq!("off".parse::<LevelFilter>().unwrap(), LevelFilter::Off);
    }

    #[test]
    fn test_level_filter_roundtrip_u8() {
        for level in Level::ALL {
            let filter = LevelFilter::from(level);
            assert_eq!(LevelFilter::from_u8(filter as u8), filter);
            assert_eq!(filter.level(), Some(level));
        }
        assert_eq!(LevelFilter::from_u8(LevelFilter::Off as u8), LevelFilter::Off);
    }
}
