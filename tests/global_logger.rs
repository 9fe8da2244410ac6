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
use logforth_ini::LoggerConfig;
use tempfile::TempDir;

// The global logger lives for the whole process, so everything is checked in one test.
#[test]
fn test_global_logger_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let config: LoggerConfig = format!(
        "[basic]\nname = global\nflush_on = critical\nflush_every = 1\n\
         [rotating]\nlevel = debug\ndirectory = {}\nname = app\next = .log\npattern = [%n] %v\n\
         max_files_count = 1\nmax_file_size = 1MB\n",
        temp_dir.path().display()
    )
    .parse()
    .unwrap();

    logforth_ini::set_config(config.clone()).unwrap();
    let err = logforth_ini::set_config(config.clone()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyInitialized);

    logforth_ini::trace!("below every sink");
    logforth_ini::debug!("hello {}", "global");
    logforth_ini::warn_str!("careful");
    logforth_ini::log!(logforth_ini::Level::Info, "{}+{}={}", 1, 2, 3);
    logforth_ini::flush();

    let logger = logforth_ini::logger();
    assert_eq!(logger.name(), "global");
    assert_eq!(logger.sinks().len(), 1);

    let err = logforth_ini::try_init(config.clone()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyInitialized);
    let err = logforth_ini::builder(&LoggerConfig::default())
        .try_apply()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyInitialized);
    let err = logforth_ini::set_config(LoggerConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyInitialized);

    let content = fs::read_to_string(temp_dir.path().join("app.log")).unwrap();
    assert_eq!(content, "[global] hello global\n[global] careful\n[global] 1+2=3\n");

    #[cfg(feature = "bridge-log")]
    {
        logforth_ini::bridge::setup_log_crate();
        let err = logforth_ini::bridge::try_setup_log_crate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyInitialized);

        log::info!("through the log facade");
        log::logger().flush();
        let content = fs::read_to_string(temp_dir.path().join("app.log")).unwrap();
        assert!(content.ends_with("[global] through the log facade\n"), "{content}");
    }
}
