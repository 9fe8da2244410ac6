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

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use super::flusher::PeriodicFlusher;
use crate::Error;
use crate::append::Append;
use crate::detail::CallSite;
use crate::detail::DetailPolicy;
use crate::detail::FilenameType;
use crate::record::Level;
use crate::record::LevelFilter;
use crate::record::Record;
use crate::trap::Trap;

/// The kind of destination a [`Sink`] writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    /// Standard output.
    Console {
        /// Whether the pattern carries a color range.
        color: bool,
    },
    /// A file that rolls over at local midnight.
    DailyFile {
        /// The base path; the current date is inserted before the extension.
        path: PathBuf,
    },
    /// A file that rolls over by size.
    RotatingFile {
        /// The active file.
        path: PathBuf,
        /// The size above which the active file is archived.
        max_file_size: u64,
        /// The number of archives kept.
        max_files: usize,
    },
}

/// One configured destination of a [`Logger`].
#[derive(Debug)]
pub struct Sink {
    kind: SinkKind,
    level: Level,
    pattern: String,
    append: Box<dyn Append>,
}

impl Sink {
    pub(super) fn new(
        kind: SinkKind,
        level: Level,
        pattern: impl Into<String>,
        append: impl Into<Box<dyn Append>>,
    ) -> Self {
        Self {
            kind,
            level,
            pattern: pattern.into(),
            append: append.into(),
        }
    }

    /// The kind of this sink.
    pub fn kind(&self) -> &SinkKind {
        &self.kind
    }

    /// The minimum level written by this sink.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The pattern rendering each record.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The path of the file sink, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.kind {
            SinkKind::Console { .. } => None,
            SinkKind::DailyFile { path } | SinkKind::RotatingFile { path, .. } => Some(path),
        }
    }
}

/// A composite logger writing each accepted record to every sink whose level admits it.
///
/// Build one with [`builder`](crate::builder), or use the process-wide instance returned by
/// [`logger`](crate::logger()).
#[derive(Debug)]
pub struct Logger {
    shared: Arc<Shared>,
    flusher: Option<PeriodicFlusher>,
}

#[derive(Debug)]
pub(super) struct Shared {
    pub(super) name: String,
    pub(super) level: LevelFilter,
    pub(super) flush_on: Level,
    pub(super) detailed_min: AtomicU8,
    pub(super) filename_type: FilenameType,
    pub(super) sinks: Vec<Sink>,
    pub(super) trap: Arc<dyn Trap>,
}

impl Shared {
    pub(super) fn flush(&self) {
        for sink in &self.sinks {
            if let Err(err) = sink.append.flush() {
                let err = Error::new(err.kind(), "failed to flush sink")
                    .with_context("sink", sink.kind.describe())
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }
}

impl SinkKind {
    fn describe(&self) -> String {
        match self {
            SinkKind::Console { .. } => "console".to_string(),
            SinkKind::DailyFile { path } => format!("daily:{}", path.display()),
            SinkKind::RotatingFile { path, .. } => format!("rotating:{}", path.display()),
        }
    }
}

impl Logger {
    pub(super) fn new(shared: Shared, flush_every: u64) -> Result<Self, Error> {
        let shared = Arc::new(shared);
        let flusher = match flush_every {
            0 => None,
            secs => Some(PeriodicFlusher::spawn(shared.clone(), secs)?),
        };
        Ok(Self { shared, flusher })
    }

    /// The logger name, rendered by `%n`.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// The aggregate threshold: the lowest level of any sink.
    pub fn level(&self) -> LevelFilter {
        self.shared.level
    }

    /// Records at or above this level flush every sink right after being written.
    pub fn flush_on(&self) -> Level {
        self.shared.flush_on
    }

    /// The configured sinks, in console, daily, rotating order.
    pub fn sinks(&self) -> &[Sink] {
        &self.shared.sinks
    }

    /// Records at or above this threshold carry their call site.
    pub fn detailed_min(&self) -> LevelFilter {
        LevelFilter::from_u8(self.shared.detailed_min.load(Ordering::Relaxed))
    }

    /// Change the detail threshold. Takes effect on the next call.
    pub fn set_detailed_min(&self, filter: impl Into<LevelFilter>) {
        let filter = filter.into();
        self.shared
            .detailed_min
            .store(filter as u8, Ordering::Relaxed);
    }

    /// The policy currently applied to each call.
    pub fn detail_policy(&self) -> DetailPolicy {
        DetailPolicy {
            detailed_min: self.detailed_min(),
            filename_type: self.shared.filename_type,
        }
    }

    /// Whether a record at `level` passes the aggregate threshold.
    pub fn enabled(&self, level: Level) -> bool {
        self.shared.level.test(level)
    }

    /// Log a formatted message.
    pub fn log(&self, level: Level, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let message = match args.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(args.to_string()),
        };
        self.write(level, site, &message);
    }

    /// Log a pre-built message without any formatting.
    pub fn log_str(&self, level: Level, site: &CallSite<'_>, message: &str) {
        if !self.enabled(level) {
            return;
        }

        self.write(level, site, message);
    }

    /// Flush every sink. Failures are reported to the trap.
    pub fn flush(&self) {
        self.shared.flush();
    }

    fn write(&self, level: Level, site: &CallSite<'_>, message: &str) {
        let payload = self.detail_policy().decorate(level, message, site);
        let record = Record::builder()
            .level(level)
            .logger(&self.shared.name)
            .file(Some(site.file))
            .function(Some(site.function))
            .line(Some(site.line))
            .payload(&payload)
            .build();

        for sink in &self.shared.sinks {
            if level < sink.level {
                continue;
            }
            if let Err(err) = sink.append.append(&record) {
                let err = Error::new(err.kind(), "failed to write record")
                    .with_context("sink", sink.kind.describe())
                    .with_source(err);
                self.shared.trap.trap(&err);
            }
        }

        if level >= self.shared.flush_on {
            self.flush();
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // stop the flusher before the final flush so the two never race
        drop(self.flusher.take());
        self.flush();
    }
}
