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

//! Reading and writing INI documents.
//!
//! The dialect is deliberately small:
//!
//! ```ini
//! ; a comment
//! # another comment
//! [section]
//! key = value        ; trailing comment
//! "quoted key" = "quoted value"
//! escaped = 50\% \# not a comment
//! ```
//!
//! Sections are kept ordered by name and keys ordered within a section, so serializing a
//! document is deterministic.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;

const SPACES: &[char] = &[' ', '\r', '\n', '\t'];
const SPACES_AND_QUOTES: &[char] = &[' ', '"', '\r', '\n', '\t'];
const BOM: char = '\u{feff}';

/// The line terminator used when serializing a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFeed {
    /// `\n`, as on Unix.
    Lf,
    /// `\r\n`, as on Windows.
    Crlf,
    /// [`LineFeed::Crlf`] on Windows, [`LineFeed::Lf`] elsewhere.
    #[default]
    Auto,
}

impl LineFeed {
    /// Return the line terminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineFeed::Lf => "\n",
            LineFeed::Crlf => "\r\n",
            LineFeed::Auto => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

/// A named group of unique keys mapped to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    entries: BTreeMap<String, String>,
}

impl Section {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Return whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Iterate over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the section has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Section {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Section {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An INI document: sections ordered by name.
///
/// # Examples
///
/// ```
/// use logforth_ini::ini::Document;
///
/// let doc: Document = "[basic]\nname = app\n".parse().unwrap();
/// assert_eq!(doc.section("basic").unwrap().get("name"), Some("app"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: BTreeMap<String, Section>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from text.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::MalformedDocument`] error at the first offending line. The
    /// 1-based line number is recorded in the `line` context of the error.
    pub fn parse(text: &str) -> Result<Document, Error> {
        let mut parser = Parser::default();
        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            parser
                .parse_line(lineno, line)
                .map_err(|message| malformed(lineno, message))?;
        }
        Ok(parser.document)
    }

    /// Read and parse the document stored at `path`.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Document, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to read document")
                .with_context("file", path.display())
                .with_source(err)
        })?;
        Document::parse(&text).map_err(|err| err.with_context("file", path.display()))
    }

    /// Serialize the document and write it to `path`, replacing any existing file.
    pub fn write_file(&self, path: impl AsRef<Path>, line_feed: LineFeed) -> Result<(), Error> {
        let path = path.as_ref();
        fs::write(path, self.to_string_with(line_feed)).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to write document")
                .with_context("file", path.display())
                .with_source(err)
        })
    }

    /// Serialize the document.
    ///
    /// Each section is written as `[name]` followed by one `key = value` line per entry and a
    /// blank separator line. Sections and keys come out in name order.
    pub fn to_string_with(&self, line_feed: LineFeed) -> String {
        let lf = line_feed.as_str();
        let mut result = String::with_capacity(128);
        for (name, section) in &self.sections {
            result.push('[');
            result.push_str(name);
            result.push(']');
            result.push_str(lf);
            for (key, value) in section.iter() {
                write_key(&mut result, key);
                result.push_str(" = ");
                write_value(&mut result, value);
                result.push_str(lf);
            }
            result.push_str(lf);
        }
        result
    }

    /// Return the section called `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Return the section called `name`, creating it if absent.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }

    /// Insert a whole section, returning the section it replaced.
    pub fn insert_section(&mut self, name: impl Into<String>, section: Section) -> Option<Section> {
        self.sections.insert(name.into(), section)
    }

    /// Iterate over the sections in name order.
    pub fn sections(&self) -> btree_map::Iter<'_, String, Section> {
        self.sections.iter()
    }

    /// Return the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Return whether the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(LineFeed::Auto))
    }
}

fn malformed(lineno: usize, message: &'static str) -> Error {
    Error::new(ErrorKind::MalformedDocument, message).with_context("line", lineno)
}

#[derive(Debug, Default)]
struct Parser {
    document: Document,
    current: Option<String>,
}

impl Parser {
    fn parse_line(&mut self, lineno: usize, line: &str) -> Result<(), &'static str> {
        let mut line = line.trim_matches(SPACES);
        if lineno == 1 {
            line = line.strip_prefix(BOM).unwrap_or(line);
        }

        if line.is_empty() || line.starts_with([';', '#']) {
            return Ok(());
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(name) = header.strip_suffix(']') else {
                return Err("section name not end with ']'");
            };
            if name.is_empty() {
                return Err("section name can not be empty");
            }
            self.document.section_mut(name);
            self.current = Some(name.to_string());
            return Ok(());
        }

        let Some((key, rest)) = line.split_once('=') else {
            return Err("invalid content");
        };
        let key = key.trim_matches(SPACES_AND_QUOTES);
        if key.is_empty() {
            return Err("key is empty");
        }
        let value = unescape_value(rest);
        let value = value.trim_matches(SPACES_AND_QUOTES);

        let Some(current) = self.current.as_deref() else {
            return Err("not belong to any section");
        };
        self.document.section_mut(current).insert(key, value);
        Ok(())
    }
}

// Cut the value at the first unescaped comment character. `\#` and `\;` stand for the
// literal characters; any other backslash is kept as is.
fn unescape_value(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '#' | ';' => break,
            '\\' => match chars.peek() {
                Some(&next @ ('#' | ';')) => {
                    value.push(next);
                    chars.next();
                }
                _ => value.push('\\'),
            },
            c => value.push(c),
        }
    }
    value
}

fn write_key(out: &mut String, key: &str) {
    if key.starts_with(['[', ';', '#']) {
        out.push('"');
        out.push_str(key);
        out.push('"');
    } else {
        out.push_str(key);
    }
}

fn write_value(out: &mut String, value: &str) {
    for c in value.chars() {
        if matches!(c, '#' | ';') {
            out.push('\\');
        }
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(text: &str) -> (usize, String) {
        let err = Document::parse(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        let line = err.context("line").unwrap().parse().unwrap();
        (line, err.message().to_string())
    }

    #[test]
    fn test_parse_sections_and_comments() {
        let text = "\u{feff}; leading comment\n\
                    \n\
                    [basic]\n\
                    name = app   # trailing comment\n\
                    \"flush_on\" = \"warn\"\n\
                    # comment\n\
                    [console]\n\
                    pattern = [%H:%M:%S.%e] %^[%l]%$ %v\n";
        let doc = Document::parse(text).unwrap();
        assert_eq!(doc.len(), 2);

        let basic = doc.section("basic").unwrap();
        assert_eq!(basic.get("name"), Some("app"));
        assert_eq!(basic.get("flush_on"), Some("warn"));

        let console = doc.section("console").unwrap();
        assert_eq!(console.get("pattern"), Some("[%H:%M:%S.%e] %^[%l]%$ %v"));
    }

    #[test]
    fn test_bom_only_stripped_on_first_line() {
        let doc = Document::parse("\u{feff}[a]\nk = v\n").unwrap();
        assert!(doc.section("a").is_some());

        let doc = Document::parse("[a]\n\u{feff}k = v\n").unwrap();
        let a = doc.section("a").unwrap();
        assert_eq!(a.get("\u{feff}k"), Some("v"));
        assert_eq!(a.get("k"), None);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let doc = Document::parse("[a]\nk = 1\nk = 2\n").unwrap();
        assert_eq!(doc.section("a").unwrap().get("k"), Some("2"));
    }

    #[test]
    fn test_sections_can_be_reopened() {
        let doc = Document::parse("[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3\n").unwrap();
        let a = doc.section("a").unwrap();
        assert_eq!(a.get("x"), Some("1"));
        assert_eq!(a.get("z"), Some("3"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_err("[basic]\nname = a\n[foo\n"),
            (3, "section name not end with ']'".to_string())
        );
        assert_eq!(
            parse_err("[]\n"),
            (1, "section name can not be empty".to_string())
        );
        assert_eq!(
            parse_err("[a]\njust text\n"),
            (2, "invalid content".to_string())
        );
        assert_eq!(parse_err("[a]\n \"\" = 1\n"), (2, "key is empty".to_string()));
        assert_eq!(
            parse_err("\n\nk = v\n"),
            (3, "not belong to any section".to_string())
        );
    }

    #[test]
    fn test_value_escapes() {
        let doc = Document::parse("[a]\nk = 50\\% \\#1 \\; two ; comment\nw = C:\\logs\\\n").unwrap();
        let a = doc.section("a").unwrap();
        assert_eq!(a.get("k"), Some("50\\% #1 ; two"));
        assert_eq!(a.get("w"), Some("C:\\logs\\"));
    }

    #[test]
    fn test_serialize_line_feeds() {
        let mut doc = Document::new();
        doc.section_mut("b").insert("k", "v");
        doc.section_mut("a").insert("y", "2");
        doc.section_mut("a").insert("x", "1");

        assert_eq!(
            doc.to_string_with(LineFeed::Lf),
            "[a]\nx = 1\ny = 2\n\n[b]\nk = v\n\n"
        );
        assert_eq!(
            doc.to_string_with(LineFeed::Crlf),
            "[a]\r\nx = 1\r\ny = 2\r\n\r\n[b]\r\nk = v\r\n\r\n"
        );
    }

    #[test]
    fn test_serialize_then_parse_is_stable() {
        let text = "[z]\n\"#odd\" = a#b\nempty =\n[a]\nk = x \\; y\npath = C:\\x\n";
        let doc = Document::parse(text).unwrap();
        let reparsed = Document::parse(&doc.to_string_with(LineFeed::Crlf)).unwrap();
        assert_eq!(doc, reparsed);
        assert_eq!(doc.section("z").unwrap().get("#odd"), Some("a"));
        assert_eq!(doc.section("z").unwrap().get("empty"), Some(""));
    }
}
