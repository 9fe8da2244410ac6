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

//! A logger configured by an INI document.
//!
//! # Overview
//!
//! A `[basic]` section sets the logger name, the detail threshold and the flush policy. Every
//! other section declares a sink: `console`, `daily` for files rolling over at midnight, or
//! `rotating` for files rolling over by size. Each log call writes a concise line, or a line
//! carrying its call site when its level reaches `detailed_min`.
//!
//! # Examples
//!
//! Assemble a logger from a document:
//!
//! ```
//! use logforth_ini::LoggerConfig;
//!
//! let config: LoggerConfig = r#"
//! [basic]
//! name = app
//! detailed_min = error
//! flush_on = warn
//! flush_every = 0
//!
//! [console]
//! level = info
//! pattern = [%H:%M:%S.%e] %^[%l]%$ %v
//! "#
//! .parse()
//! .unwrap();
//!
//! let logger = logforth_ini::builder(&config).build().unwrap();
//! logforth_ini::info!(logger: logger, "started with {} workers", 4);
//! logforth_ini::error!(logger: logger, "this line carries its call site");
//! ```
//!
//! Or configure the process-wide logger used by the macros:
//!
//! ```
//! use logforth_ini::LoggerConfig;
//!
//! logforth_ini::set_config(LoggerConfig::default()).unwrap();
//!
//! logforth_ini::warn!("low disk space");
//! logforth_ini::flush();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod bridge;
pub mod config;
pub mod detail;
pub mod ini;
pub mod layout;
pub mod record;
pub mod trap;

mod error;
mod logger;
mod macros;

pub use append::Append;
pub use config::LoggerConfig;
pub use error::Error;
pub use error::ErrorKind;
pub use layout::Layout;
pub use logger::*;
pub use record::Level;
pub use record::LevelFilter;
