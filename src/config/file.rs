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
use crate::config::keys;
use crate::config::path;
use crate::config::size::format_filesize;
use crate::ini::Section;
use crate::record::Level;

/// The pattern of file sinks unless configured otherwise.
pub const DEFAULT_FILE_PATTERN: &str = "[%H:%M:%S.%e] [%l] %v";

/// The directory of file sinks unless configured otherwise.
pub const DEFAULT_DIRECTORY: &str = "${bin}/logs/";

/// The file name used when a configured name is blank.
pub const DEFAULT_FILE_NAME: &str = "log";

/// The extension of file sinks unless configured otherwise.
pub const DEFAULT_FILE_EXT: &str = ".log";

/// The fields shared by every file sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    level: Level,
    directory: String,
    name: String,
    ext: String,
    pattern: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            level: Level::Trace,
            directory: DEFAULT_DIRECTORY.to_string(),
            name: DEFAULT_FILE_NAME.to_string(),
            ext: DEFAULT_FILE_EXT.to_string(),
            pattern: DEFAULT_FILE_PATTERN.to_string(),
        }
    }
}

impl FileConfig {
    const REQUIRED_KEYS: &[&'static str] = &["name", "ext", "directory", "level", "pattern"];

    fn with_name(name: &str) -> Self {
        let mut config = FileConfig::default();
        config.set_name(name);
        config
    }

    /// The lowest level written by this sink.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The directory as configured, possibly starting with `${bin}`.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// The base file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file extension as configured.
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// The pattern used to format records.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Set the lowest level written by this sink.
    pub fn set_level(&mut self, level: Level) -> &mut Self {
        self.level = level;
        self
    }

    /// Set the directory. A leading `${bin}` is expanded when the logger is assembled.
    pub fn set_directory(&mut self, directory: impl AsRef<str>) -> &mut Self {
        self.directory = trim(directory.as_ref()).to_string();
        self
    }

    /// Set the base file name. Path separators are replaced with `_`.
    pub fn set_name(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.name = trim(name.as_ref()).replace(['/', '\\'], "_");
        self
    }

    /// Set the file extension, with or without the leading `.`.
    pub fn set_ext(&mut self, ext: impl AsRef<str>) -> &mut Self {
        self.ext = trim(ext.as_ref()).to_string();
        self
    }

    /// Set the pattern used to format records.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.pattern = pattern.into();
        self
    }

    /// The file name the sink writes to: the name, or `log` when blank, followed by the
    /// normalized extension.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.base_name(), self.normalized_ext())
    }

    pub(crate) fn base_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_FILE_NAME
        } else {
            self.name.as_str()
        }
    }

    pub(crate) fn normalized_ext(&self) -> String {
        path::format_ext(&self.ext)
    }

    /// The directory with `${bin}` replaced by `bin_dir` and normalized to end with `/`.
    pub fn resolved_directory(&self, bin_dir: &str) -> String {
        path::resolve_dir(&self.directory, bin_dir)
    }

    fn read(&mut self, section: &Section) -> Result<(), Error> {
        keys::require(section, Self::REQUIRED_KEYS)?;
        self.set_name(keys::value(section, "name")?);
        self.set_ext(keys::value(section, "ext")?);
        self.set_directory(keys::value(section, "directory")?);
        self.level = keys::level(section, "level")?;
        self.pattern = keys::value(section, "pattern")?.to_string();
        Ok(())
    }

    fn write(&self, section: &mut Section) {
        section.insert("level", self.level.as_str());
        section.insert("pattern", self.pattern.as_str());
        section.insert("directory", self.directory.as_str());
        section.insert("name", self.name.as_str());
        section.insert("ext", self.ext.as_str());
    }
}

fn trim(s: &str) -> &str {
    s.trim_matches([' ', '\r', '\n', '\t'])
}

/// A file sink rolling over to a new dated file at local midnight.
///
/// Files are named `<directory><name>_<YYYY-MM-DD><ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFileConfig {
    file: FileConfig,
}

impl Default for DailyFileConfig {
    fn default() -> Self {
        Self {
            file: FileConfig::with_name("daily"),
        }
    }
}

impl DailyFileConfig {
    /// The shared file fields.
    pub fn file(&self) -> &FileConfig {
        &self.file
    }

    /// The shared file fields, mutably.
    pub fn file_mut(&mut self) -> &mut FileConfig {
        &mut self.file
    }

    /// Read a daily file sink from its section.
    pub fn from_section(section: &Section) -> Result<Self, Error> {
        let mut config = Self::default();
        config.file.read(section)?;
        Ok(config)
    }

    /// Write this sink back into a section.
    pub fn to_section(&self) -> Section {
        let mut section = Section::new();
        self.file.write(&mut section);
        section
    }
}

/// A file sink rolling over when the active file would exceed a size.
///
/// The active file is `<directory><name><ext>`; archives are `<name>.1<ext>` (newest) up to
/// `<name>.<max_files_count><ext>` (oldest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatingFileConfig {
    file: FileConfig,
    max_files_count: usize,
    max_file_size: u64,
}

impl Default for RotatingFileConfig {
    fn default() -> Self {
        Self {
            file: FileConfig::with_name(DEFAULT_FILE_NAME),
            max_files_count: 10,
            max_file_size: 5 * 1024 * 1024,
        }
    }
}

impl RotatingFileConfig {
    const REQUIRED_KEYS: &[&'static str] = &["max_files_count", "max_file_size"];

    /// The shared file fields.
    pub fn file(&self) -> &FileConfig {
        &self.file
    }

    /// The shared file fields, mutably.
    pub fn file_mut(&mut self) -> &mut FileConfig {
        &mut self.file
    }

    /// The number of archived files kept next to the active one.
    pub fn max_files_count(&self) -> usize {
        self.max_files_count
    }

    /// The size in bytes the active file does not grow beyond.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Set the number of archived files kept. With `0` the active file is truncated on
    /// rollover.
    pub fn set_max_files_count(&mut self, n: usize) -> &mut Self {
        self.max_files_count = n;
        self
    }

    /// Set the maximum size of the active file.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::InvalidNumericValue`] error if `n` is zero.
    pub fn set_max_file_size(&mut self, n: u64) -> Result<&mut Self, Error> {
        if n == 0 {
            return Err(Error::new(
                ErrorKind::InvalidNumericValue,
                "max file size must be greater than zero",
            )
            .with_context("key", "max_file_size"));
        }
        self.max_file_size = n;
        Ok(self)
    }

    /// Read a rotating file sink from its section.
    pub fn from_section(section: &Section) -> Result<Self, Error> {
        keys::require(section, Self::REQUIRED_KEYS)?;
        let mut config = Self::default();
        config.max_files_count = keys::integer(section, "max_files_count")?;
        config.set_max_file_size(keys::filesize(section, "max_file_size")?)?;
        config.file.read(section)?;
        Ok(config)
    }

    /// Write this sink back into a section.
    pub fn to_section(&self) -> Section {
        let mut section = Section::new();
        self.file.write(&mut section);
        section.insert("max_files_count", self.max_files_count.to_string());
        section.insert("max_file_size", format_filesize(self.max_file_size));
        section
    }
}
