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

//! Decide whether a message is emitted as is or enriched with its call site.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;
use crate::record::Level;
use crate::record::LevelFilter;

/// How the source file of a call site is rendered in detailed messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilenameType {
    /// The path exactly as captured at compile time.
    FullPath,
    /// Only the last path component.
    #[default]
    NameOnly,
}

impl FilenameType {
    /// Return the configuration spelling of this value.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilenameType::FullPath => "full_path",
            FilenameType::NameOnly => "name_only",
        }
    }
}

impl fmt::Display for FilenameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilenameType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_path" => Ok(FilenameType::FullPath),
            "name_only" => Ok(FilenameType::NameOnly),
            _ => Err(Error::new(
                ErrorKind::InvalidEnumValue,
                format!("invalid filename type {s:?}, acceptable: full_path, name_only"),
            )),
        }
    }
}

/// The source location of a log call.
///
/// Usually captured by the logging macros with [`callsite!`](crate::callsite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// The source file.
    pub file: &'a str,
    /// The enclosing function.
    pub function: &'a str,
    /// The line number.
    pub line: u32,
}

impl<'a> CallSite<'a> {
    /// Create a call site.
    pub const fn new(file: &'a str, function: &'a str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// Return the last component of the file path, splitting on both `/` and `\`.
    pub fn filename(&self) -> &'a str {
        self.file.rsplit(['/', '\\']).next().unwrap_or(self.file)
    }
}

/// The per-call choice between a concise and a detailed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailPolicy {
    /// Records at or above this threshold carry their call site.
    pub detailed_min: LevelFilter,
    /// How the file of the call site is rendered.
    pub filename_type: FilenameType,
}

impl Default for DetailPolicy {
    fn default() -> Self {
        Self {
            detailed_min: LevelFilter::Error,
            filename_type: FilenameType::NameOnly,
        }
    }
}

impl DetailPolicy {
    /// Return `message` unchanged when `level` is below the threshold. Otherwise append
    /// `" <file> <function> <line>"` to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_ini::detail::CallSite;
    /// use logforth_ini::detail::DetailPolicy;
    /// use logforth_ini::record::Level;
    ///
    /// let policy = DetailPolicy::default();
    /// let site = CallSite::new("src/net/conn.rs", "connect", 42);
    ///
    /// assert_eq!(policy.decorate(Level::Info, "hello", &site), "hello");
    /// assert_eq!(
    ///     policy.decorate(Level::Error, "oops", &site),
    ///     "oops <conn.rs> <connect> <42>"
    /// );
    /// ```
    pub fn decorate<'m>(&self, level: Level, message: &'m str, site: &CallSite<'_>) -> Cow<'m, str> {
        if !self.detailed_min.test(level) {
            return Cow::Borrowed(message);
        }

        let file = match self.filename_type {
            FilenameType::FullPath => site.file,
            FilenameType::NameOnly => site.filename(),
        };
        Cow::Owned(format!(
            "{message} <{file}> <{}> <{}>",
            site.function, site.line
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename() {
        assert_eq!(CallSite::new("a/b/c.rs", "f", 1).filename(), "c.rs");
        assert_eq!(CallSite::new("a\\b\\c.rs", "f", 1).filename(), "c.rs");
        assert_eq!(CallSite::new("c.rs", "f", 1).filename(), "c.rs");
        assert_eq!(CallSite::new("", "f", 1).filename(), "");
    }

    #[test]
    fn test_decorate() {
        let site = CallSite::new("/src/app/main.rs", "run", 7);
        let mut policy = DetailPolicy {
            detailed_min: LevelFilter::Warn,
            filename_type: FilenameType::FullPath,
        };

        assert_eq!(policy.decorate(Level::Info, "m", &site), "m");
        assert_eq!(
            policy.decorate(Level::Warn, "m", &site),
            "m </src/app/main.rs> <run> <7>"
        );

        policy.filename_type = FilenameType::NameOnly;
        assert_eq!(
            policy.decorate(Level::Critical, "", &site),
            " <main.rs> <run> <7>"
        );

        policy.detailed_min = LevelFilter::Off;
        assert!(matches!(
            policy.decorate(Level::Critical, "m", &site),
            Cow::Borrowed("m")
        ));

        policy.detailed_min = LevelFilter::Trace;
        assert_eq!(
            policy.decorate(Level::Trace, "m", &site),
            "m <main.rs> <run> <7>"
        );
    }

    #[test]
    fn test_filename_type_parse() {
        assert_eq!("full_path".parse::<FilenameType>().unwrap(), FilenameType::FullPath);
        assert_eq!("name_only".parse::<FilenameType>().unwrap(), FilenameType::NameOnly);
        let err = "Full_Path".parse::<FilenameType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
    }
}
