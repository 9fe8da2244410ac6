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
use crate::config::keys;
use crate::ini::Section;
use crate::record::Level;

/// The pattern of console sinks unless configured otherwise.
pub const DEFAULT_CONSOLE_PATTERN: &str = "[%H:%M:%S.%e] %^[%l]%$ %v";

/// A sink writing to standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    level: Level,
    pattern: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            level: Level::Trace,
            pattern: DEFAULT_CONSOLE_PATTERN.to_string(),
        }
    }
}

impl ConsoleConfig {
    const REQUIRED_KEYS: &[&'static str] = &["level", "pattern"];

    /// The lowest level written by this sink.
    pub fn level(&self) -> Level {
        self.level
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

    /// Set the pattern used to format records.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.pattern = pattern.into();
        self
    }

    /// Whether the pattern contains a color range: `%^` followed later by `%$`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_ini::config::ConsoleConfig;
    ///
    /// let mut config = ConsoleConfig::default();
    /// assert!(config.has_color());
    ///
    /// config.set_pattern("%$ %^ %v");
    /// assert!(!config.has_color());
    /// ```
    pub fn has_color(&self) -> bool {
        self.pattern
            .find("%^")
            .is_some_and(|start| self.pattern[start + 2..].contains("%$"))
    }

    /// Read a console sink from its section.
    pub fn from_section(section: &Section) -> Result<Self, Error> {
        keys::require(section, Self::REQUIRED_KEYS)?;
        Ok(Self {
            level: keys::level(section, "level")?,
            pattern: keys::value(section, "pattern")?.to_string(),
        })
    }

    /// Write this sink back into a section.
    pub fn to_section(&self) -> Section {
        Section::from_iter([("level", self.level.as_str()), ("pattern", self.pattern.as_str())])
    }
}
