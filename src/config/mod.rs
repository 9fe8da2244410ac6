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

//! The typed logger configuration and its INI representation.
//!
//! A configuration document has one mandatory `[basic]` section and any number of sink
//! sections whose names start with `console`, `daily` or `rotating`:
//!
//! ```ini
//! [basic]
//! name = app
//! flush_every = 1
//! flush_on = warn
//! detailed_min = error
//! detailed_filename_type = name_only
//!
//! [console]
//! level = info
//! pattern = [%H:%M:%S.%e] %^[%l]%$ %v
//!
//! [rotating-1]
//! level = debug
//! pattern = [%Y-%m-%d %H:%M:%S.%e] [%l] %v
//! directory = ${bin}/logs/
//! name = app
//! ext = .log
//! max_files_count = 10
//! max_file_size = 5MB
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;
use crate::detail::FilenameType;
use crate::ini::Document;
use crate::ini::LineFeed;
use crate::ini::Section;
use crate::record::Level;
use crate::record::LevelFilter;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

mod console;
mod file;
mod keys;
mod path;
mod size;

pub use self::console::ConsoleConfig;
pub use self::console::DEFAULT_CONSOLE_PATTERN;
pub use self::file::DEFAULT_DIRECTORY;
pub use self::file::DEFAULT_FILE_EXT;
pub use self::file::DEFAULT_FILE_NAME;
pub use self::file::DEFAULT_FILE_PATTERN;
pub use self::file::DailyFileConfig;
pub use self::file::FileConfig;
pub use self::file::RotatingFileConfig;
pub use self::path::BIN_PLACEHOLDER;
pub use self::path::bin_dir;
pub use self::path::format_dir;
pub(crate) use self::path::create_dir;
pub use self::size::format_filesize;
pub use self::size::parse_filesize;

const BASIC: &str = "basic";
const CONSOLE: &str = "console";
const DAILY: &str = "daily";
const ROTATING: &str = "rotating";

/// The whole configuration of a logger: global settings plus its sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    name: String,
    detailed_min: LevelFilter,
    detailed_filename_type: FilenameType,
    flush_on: Level,
    flush_every: u64,
    console: Vec<ConsoleConfig>,
    daily: Vec<DailyFileConfig>,
    rotating: Vec<RotatingFileConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_FILE_NAME.to_string(),
            detailed_min: LevelFilter::Error,
            detailed_filename_type: FilenameType::NameOnly,
            flush_on: Level::Trace,
            flush_every: 1,
            console: vec![],
            daily: vec![],
            rotating: vec![],
        }
    }
}

impl LoggerConfig {
    const REQUIRED_BASIC_KEYS: &[&'static str] = &["name", "flush_every", "flush_on"];

    /// Create the example configuration: defaults plus one console, one daily file and one
    /// rotating file sink.
    pub fn with_default_sinks() -> Self {
        Self {
            console: vec![ConsoleConfig::default()],
            daily: vec![DailyFileConfig::default()],
            rotating: vec![RotatingFileConfig::default()],
            ..Self::default()
        }
    }

    /// The logger name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records at or above this threshold carry their call site.
    pub fn detailed_min(&self) -> LevelFilter {
        self.detailed_min
    }

    /// How the file of a call site is rendered.
    pub fn detailed_filename_type(&self) -> FilenameType {
        self.detailed_filename_type
    }

    /// Records at or above this level flush every sink right after being written.
    pub fn flush_on(&self) -> Level {
        self.flush_on
    }

    /// The period of background flushing in seconds. `0` disables it.
    pub fn flush_every(&self) -> u64 {
        self.flush_every
    }

    /// The console sinks.
    pub fn console(&self) -> &[ConsoleConfig] {
        &self.console
    }

    /// The daily file sinks.
    pub fn daily(&self) -> &[DailyFileConfig] {
        &self.daily
    }

    /// The rotating file sinks.
    pub fn rotating(&self) -> &[RotatingFileConfig] {
        &self.rotating
    }

    /// Return whether no sink is configured.
    pub fn has_no_sinks(&self) -> bool {
        self.console.is_empty() && self.daily.is_empty() && self.rotating.is_empty()
    }

    /// Set the logger name. A blank name becomes `log`.
    pub fn set_name(&mut self, name: impl AsRef<str>) -> &mut Self {
        let name = name.as_ref().trim_matches([' ', '\r', '\n', '\t']);
        self.name = if name.is_empty() {
            DEFAULT_FILE_NAME.to_string()
        } else {
            name.to_string()
        };
        self
    }

    /// Set the detail threshold.
    pub fn set_detailed_min(&mut self, filter: impl Into<LevelFilter>) -> &mut Self {
        self.detailed_min = filter.into();
        self
    }

    /// Set how the file of a call site is rendered.
    pub fn set_detailed_filename_type(&mut self, filename_type: FilenameType) -> &mut Self {
        self.detailed_filename_type = filename_type;
        self
    }

    /// Set the flush trigger level.
    pub fn set_flush_on(&mut self, level: Level) -> &mut Self {
        self.flush_on = level;
        self
    }

    /// Set the background flush period in seconds. `0` disables it.
    pub fn set_flush_every(&mut self, seconds: u64) -> &mut Self {
        self.flush_every = seconds;
        self
    }

    /// Add a console sink.
    pub fn add_console(&mut self, config: ConsoleConfig) -> &mut Self {
        self.console.push(config);
        self
    }

    /// Add a daily file sink.
    pub fn add_daily(&mut self, config: DailyFileConfig) -> &mut Self {
        self.daily.push(config);
        self
    }

    /// Add a rotating file sink.
    pub fn add_rotating(&mut self, config: RotatingFileConfig) -> &mut Self {
        self.rotating.push(config);
        self
    }

    /// Load a configuration from a parsed document.
    ///
    /// An invalid `detailed_filename_type` is reported to the [`DefaultTrap`] and otherwise
    /// ignored. See [`LoggerConfig::from_document_with_trap`].
    pub fn from_document(doc: &Document) -> Result<Self, Error> {
        Self::from_document_with_trap(doc, &DefaultTrap::default())
    }

    /// Load a configuration from a parsed document, reporting non-fatal problems to `trap`.
    ///
    /// The `basic` section is mandatory. Every other section is classified by the first of
    /// `console`, `daily` and `rotating` its name starts with.
    ///
    /// # Errors
    ///
    /// Return the first error met. Errors about a section carry its name in the `section`
    /// context. Nothing is kept from a failed load.
    pub fn from_document_with_trap(doc: &Document, trap: &dyn Trap) -> Result<Self, Error> {
        let mut config = LoggerConfig::default();

        let basic = doc.section(BASIC).ok_or_else(|| {
            Error::new(ErrorKind::MissingSection, "missing section").with_context("section", BASIC)
        })?;
        config
            .read_basic(basic, trap)
            .map_err(|err| err.with_context("section", BASIC))?;

        for (name, section) in doc.sections() {
            if name == BASIC {
                continue;
            }
            config
                .read_sink(name, section)
                .map_err(|err| err.with_context("section", name))?;
        }

        Ok(config)
    }

    /// Parse and load a configuration from text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Self::from_document(&Document::parse(text)?)
    }

    /// Read and load the configuration file at `path`.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let doc = Document::read_file(path)?;
        Self::from_document(&doc).map_err(|err| err.with_context("file", path.display()))
    }

    /// Serialize the configuration.
    ///
    /// A sink section is named after its kind when it is the only one of that kind, and
    /// `<kind>-<n>` (1-based) otherwise.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();

        let basic = doc.section_mut(BASIC);
        basic.insert("name", self.name.as_str());
        basic.insert("detailed_min", self.detailed_min.as_str());
        basic.insert("detailed_filename_type", self.detailed_filename_type.as_str());
        basic.insert("flush_every", self.flush_every.to_string());
        basic.insert("flush_on", self.flush_on.as_str());

        insert_sinks(&mut doc, CONSOLE, self.console.iter().map(ConsoleConfig::to_section));
        insert_sinks(&mut doc, DAILY, self.daily.iter().map(DailyFileConfig::to_section));
        insert_sinks(
            &mut doc,
            ROTATING,
            self.rotating.iter().map(RotatingFileConfig::to_section),
        );

        doc
    }

    /// Serialize the configuration to the file at `path`.
    pub fn write_file(&self, path: impl AsRef<Path>, line_feed: LineFeed) -> Result<(), Error> {
        self.to_document().write_file(path, line_feed)
    }

    /// Write the example configuration of [`LoggerConfig::with_default_sinks`] to `path`.
    pub fn write_default_file(path: impl AsRef<Path>, line_feed: LineFeed) -> Result<(), Error> {
        Self::with_default_sinks().write_file(path, line_feed)
    }

    fn read_basic(&mut self, section: &Section, trap: &dyn Trap) -> Result<(), Error> {
        keys::require(section, Self::REQUIRED_BASIC_KEYS)?;
        self.set_name(keys::value(section, "name")?);
        self.flush_every = keys::integer(section, "flush_every")?;
        self.flush_on = keys::level(section, "flush_on")?;

        if section.get("detailed_min").is_some_and(|v| !v.is_empty()) {
            self.detailed_min = keys::level_filter(section, "detailed_min")?;
        }

        if let Some(value) = section.get("detailed_filename_type") {
            match value.parse::<FilenameType>() {
                Ok(filename_type) => self.detailed_filename_type = filename_type,
                Err(err) => trap.trap(
                    &err.with_context("section", BASIC)
                        .with_context("key", "detailed_filename_type"),
                ),
            }
        }

        Ok(())
    }

    fn read_sink(&mut self, name: &str, section: &Section) -> Result<(), Error> {
        if name.starts_with(CONSOLE) {
            self.console.push(ConsoleConfig::from_section(section)?);
        } else if name.starts_with(DAILY) {
            self.daily.push(DailyFileConfig::from_section(section)?);
        } else if name.starts_with(ROTATING) {
            self.rotating.push(RotatingFileConfig::from_section(section)?);
        } else {
            return Err(Error::new(ErrorKind::UnknownSection, "unknown section"));
        }
        Ok(())
    }
}

fn insert_sinks(doc: &mut Document, kind: &str, sections: impl ExactSizeIterator<Item = Section>) {
    let count = sections.len();
    for (i, section) in sections.enumerate() {
        let name = if count == 1 {
            kind.to_string()
        } else {
            format!("{kind}-{}", i + 1)
        };
        doc.insert_section(name, section);
    }
}

impl FromStr for LoggerConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_document(), f)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingTrap {
        errors: Mutex<Vec<String>>,
    }

    impl Trap for RecordingTrap {
        fn trap(&self, err: &Error) {
            self.errors.lock().unwrap().push(err.to_string());
        }
    }

    const BASIC_ONLY: &str = "[basic]\nname = app\nflush_every = 3\nflush_on = warn\n";

    #[test]
    fn test_load_basic() {
        let config = LoggerConfig::parse(BASIC_ONLY).unwrap();
        assert_eq!(config.name(), "app");
        assert_eq!(config.flush_every(), 3);
        assert_eq!(config.flush_on(), Level::Warn);
        assert_eq!(config.detailed_min(), LevelFilter::Error);
        assert_eq!(config.detailed_filename_type(), FilenameType::NameOnly);
        assert!(config.has_no_sinks());
    }

    #[test]
    fn test_missing_basic() {
        let err = LoggerConfig::parse("[console]\nlevel = info\npattern = %v\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingSection);
        assert_eq!(err.context("section"), Some("basic"));
    }

    #[test]
    fn test_unknown_section() {
        let text = format!("{BASIC_ONLY}[foo]\nlevel = info\n");
        let err = LoggerConfig::parse(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownSection);
        assert_eq!(err.context("section"), Some("foo"));
    }

    #[test]
    fn test_classify_by_prefix() {
        let text = format!(
            "{BASIC_ONLY}\
             [console-b]\nlevel = info\npattern = %v\n\
             [consoleA]\nlevel = err\npattern = %l %v\n\
             [daily_x]\nlevel = debug\npattern = %v\ndirectory = logs\nname = d\next = txt\n"
        );
        let config = LoggerConfig::parse(&text).unwrap();
        assert_eq!(config.console().len(), 2);
        // sections come in name order
        assert_eq!(config.console()[0].level(), Level::Info);
        assert_eq!(config.console()[1].level(), Level::Error);
        assert_eq!(config.daily().len(), 1);
        assert_eq!(config.daily()[0].file().file_name(), "d.txt");
    }

    #[test]
    fn test_failure_names_section() {
        let text = format!("{BASIC_ONLY}[rotating]\nlevel = info\n");
        let err = LoggerConfig::parse(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
        assert_eq!(err.context("section"), Some("rotating"));
        assert_eq!(err.context("key"), Some("max_files_count"));
    }

    #[test]
    fn test_basic_rejects() {
        for (text, kind) in [
            ("[basic]\nname = a\nflush_every = 1\n", ErrorKind::MissingKey),
            ("[basic]\nname =\nflush_every = 1\nflush_on = info\n", ErrorKind::EmptyValue),
            ("[basic]\nname = a\nflush_every = x\nflush_on = info\n", ErrorKind::InvalidNumericValue),
            ("[basic]\nname = a\nflush_every = 1\nflush_on = off\n", ErrorKind::InvalidEnumValue),
            (
                "[basic]\nname = a\nflush_every = 1\nflush_on = info\ndetailed_min = loud\n",
                ErrorKind::InvalidEnumValue,
            ),
        ] {
            let err = LoggerConfig::parse(text).unwrap_err();
            assert_eq!(err.kind(), kind, "{text}");
        }
    }

    #[test]
    fn test_detailed_fields() {
        let text = format!("{BASIC_ONLY}detailed_min = off\ndetailed_filename_type = full_path\n");
        let config = LoggerConfig::parse(&text).unwrap();
        assert_eq!(config.detailed_min(), LevelFilter::Off);
        assert_eq!(config.detailed_filename_type(), FilenameType::FullPath);
    }

    #[test]
    fn test_invalid_filename_type_is_not_fatal() {
        let text = format!("{BASIC_ONLY}detailed_filename_type = basename\n");
        let doc = Document::parse(&text).unwrap();
        let trap = RecordingTrap::default();

        let config = LoggerConfig::from_document_with_trap(&doc, &trap).unwrap();
        assert_eq!(config.detailed_filename_type(), FilenameType::NameOnly);

        let errors = trap.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("detailed_filename_type"), "{}", errors[0]);
    }

    #[test]
    fn test_blank_name_defaults() {
        let mut config = LoggerConfig::default();
        config.set_name("  \t");
        assert_eq!(config.name(), "log");
    }

    #[test]
    fn test_to_document_section_names() {
        let mut config = LoggerConfig::default();
        config
            .add_console(ConsoleConfig::default())
            .add_rotating(RotatingFileConfig::default())
            .add_rotating(RotatingFileConfig::default());

        let doc = config.to_document();
        let names = doc.sections().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["basic", "console", "rotating-1", "rotating-2"]);

        let basic = doc.section("basic").unwrap();
        assert_eq!(basic.get("detailed_min"), Some("error"));
        assert_eq!(basic.get("detailed_filename_type"), Some("name_only"));
        assert_eq!(basic.get("flush_on"), Some("trace"));

        let rotating = doc.section("rotating-2").unwrap();
        assert_eq!(rotating.get("max_file_size"), Some("5MB"));
        assert_eq!(rotating.get("max_files_count"), Some("10"));
    }

    #[test]
    fn test_default_sinks_round_trip() {
        let config = LoggerConfig::with_default_sinks();
        let reloaded = LoggerConfig::parse(&config.to_string()).unwrap();
        assert_eq!(reloaded, config);
    }
}
