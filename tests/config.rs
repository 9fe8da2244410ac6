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

use std::fs;

use logforth_ini::ErrorKind;
use logforth_ini::Level;
use logforth_ini::LevelFilter;
use logforth_ini::LoggerConfig;
use logforth_ini::detail::FilenameType;
use logforth_ini::ini::LineFeed;
use tempfile::TempDir;

const FULL: &str = "\u{feff}; service logging
[basic]
name = billing
detailed_min = warning
detailed_filename_type = full_path
flush_on = err
flush_every = 3

[console-a]
level = info
pattern = %^[%l]%$ %v

[console-b]
level = critical
pattern = %v

[daily]
level = debug
directory = ${bin}/logs
name = audit
ext = txt
pattern = [%Y-%m-%d %H:%M:%S] %v

[rotating]
level = trace
directory = /var/log/billing
name = app
ext = .log
pattern = %v
max_files_count = 3
max_file_size = 1.5M
";

#[test]
fn test_load_full_document() {
    let config: LoggerConfig = FULL.parse().unwrap();

    assert_eq!(config.name(), "billing");
    assert_eq!(config.detailed_min(), LevelFilter::Warn);
    assert_eq!(config.detailed_filename_type(), FilenameType::FullPath);
    assert_eq!(config.flush_on(), Level::Error);
    assert_eq!(config.flush_every(), 3);

    assert_eq!(config.console().len(), 2);
    assert_eq!(config.console()[0].level(), Level::Info);
    assert!(config.console()[0].has_color());
    assert_eq!(config.console()[1].level(), Level::Critical);
    assert!(!config.console()[1].has_color());

    let daily = config.daily()[0].file();
    assert_eq!(daily.level(), Level::Debug);
    assert_eq!(daily.file_name(), "audit.txt");
    assert_eq!(daily.resolved_directory("/opt/billing/"), "/opt/billing/logs/");

    let rotating = &config.rotating()[0];
    assert_eq!(rotating.max_files_count(), 3);
    assert_eq!(rotating.max_file_size(), 1024 * 1024 * 3 / 2);
    assert_eq!(rotating.file().file_name(), "app.log");
}

#[test]
fn test_round_trip_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("log.ini");

    let config: LoggerConfig = FULL.parse().unwrap();
    config.write_file(&path, LineFeed::Crlf).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("\r\n"));

    let reloaded = LoggerConfig::read_file(&path).unwrap();
    assert_eq!(reloaded, config);
    assert_eq!(reloaded.rotating()[0].to_section().get("max_file_size"), Some("1.5MB"));

    // two consoles keep numbered section names
    let doc = reloaded.to_document();
    assert!(doc.section("console-1").is_some());
    assert!(doc.section("console-2").is_some());
    assert!(doc.section("daily").is_some());
}

#[test]
fn test_default_file_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("default.ini");

    LoggerConfig::write_default_file(&path, LineFeed::Lf).unwrap();
    let config = LoggerConfig::read_file(&path).unwrap();
    assert_eq!(config, LoggerConfig::with_default_sinks());
}

#[test]
fn test_load_errors() {
    let cases = [
        (
            "[console]\nlevel = info\npattern = %v\n",
            ErrorKind::MissingSection,
            "basic",
            None,
        ),
        (
            "[basic]\nname = a\nflush_on = info\n",
            ErrorKind::MissingKey,
            "basic",
            Some("flush_every"),
        ),
        (
            "[basic]\nname = a\nflush_every = 1\nflush_on = off\n",
            ErrorKind::InvalidEnumValue,
            "basic",
            Some("flush_on"),
        ),
        (
            "[basic]\nname = a\nflush_every = -1\nflush_on = info\n",
            ErrorKind::InvalidNumericValue,
            "basic",
            Some("flush_every"),
        ),
        (
            "[basic]\nname = a\nflush_every = 1\nflush_on = info\n[syslog]\nlevel = info\n",
            ErrorKind::UnknownSection,
            "syslog",
            None,
        ),
        (
            "[basic]\nname = a\nflush_every = 1\nflush_on = info\n[console]\nlevel =\npattern = %v\n",
            ErrorKind::EmptyValue,
            "console",
            Some("level"),
        ),
        (
            "[basic]\nname = a\nflush_every = 1\nflush_on = info\n[rotating]\nlevel = info\n\
             directory = .\nname = a\next = .log\npattern = %v\nmax_files_count = 1\n\
             max_file_size = 0\n",
            ErrorKind::InvalidNumericValue,
            "rotating",
            Some("max_file_size"),
        ),
    ];

    for (text, kind, section, key) in cases {
        let err = LoggerConfig::parse(text).unwrap_err();
        assert_eq!(err.kind(), kind, "{text}");
        assert_eq!(err.context("section"), Some(section), "{text}");
        assert_eq!(err.context("key"), key, "{text}");
    }
}

#[test]
fn test_malformed_document() {
    let err = LoggerConfig::parse("[basic]\nname = a\nflush_every\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    assert_eq!(err.context("line"), Some("3"));
}
