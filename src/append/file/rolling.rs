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
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;

use crate::Error;
use crate::ErrorKind;
use crate::append::file::FileRollover;
use crate::append::file::clock::Clock;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A writer for rolling files.
#[derive(Debug)]
pub struct RollingFileWriter {
    state: State,
    writer: File,
}

impl Drop for RollingFileWriter {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            let err = Error::new(ErrorKind::Io, "failed to flush file writer on dropped")
                .with_source(err);
            self.state.trap.trap(&err);
        }
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let now = self.state.clock.now();
        let writer = &mut self.writer;

        if self.state.should_rollover_on_date(&now) {
            self.state.advance_date(&now);
            self.state.refresh_writer(&now, writer);
        }

        if self.state.should_rollover_on_size(buf.len()) {
            self.state.rotate_files(writer);
        }

        writer
            .write(buf)
            .inspect(|&n| self.state.current_filesize += n as u64)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl RollingFileWriter {
    /// The file currently written to.
    pub fn current_path(&self) -> &Path {
        &self.state.current_path
    }
}

/// A builder for configuring [`RollingFileWriter`].
#[derive(Debug)]
pub struct RollingFileWriterBuilder {
    // required
    basedir: PathBuf,
    filename: String,

    // has default
    rollover: FileRollover,
    filename_suffix: String,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl RollingFileWriterBuilder {
    /// Creates a new [`RollingFileWriterBuilder`].
    #[must_use]
    pub fn new(basedir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            basedir: basedir.into(),
            filename: filename.into(),
            rollover: FileRollover::Daily,
            filename_suffix: String::new(),
            clock: Clock::DefaultClock,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the trap for the rolling file writer.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Set the rollover policy.
    #[must_use]
    pub fn rollover(mut self, rollover: FileRollover) -> Self {
        self.rollover = rollover;
        self
    }

    /// Set the filename suffix, usually an extension starting with `.`.
    #[must_use]
    pub fn filename_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.filename_suffix = suffix.into();
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RollingFileWriter`].
    pub fn build(self) -> Result<RollingFileWriter, Error> {
        let Self {
            basedir,
            filename,
            rollover,
            filename_suffix,
            clock,
            trap,
        } = self;

        if filename.is_empty() {
            return Err(Error::new(ErrorKind::Unexpected, "filename must not be empty"));
        }

        let (state, writer) = State::new(rollover, basedir, filename, filename_suffix, clock, trap)?;
        Ok(RollingFileWriter { state, writer })
    }
}

#[derive(Debug)]
struct State {
    log_dir: PathBuf,
    log_filename: String,
    log_filename_suffix: String,
    rollover: FileRollover,
    current_path: PathBuf,
    current_filesize: u64,
    next_rollover: Option<Zoned>,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl State {
    fn new(
        rollover: FileRollover,
        dir: impl AsRef<Path>,
        log_filename: String,
        log_filename_suffix: String,
        clock: Clock,
        trap: Box<dyn Trap>,
    ) -> Result<(Self, File), Error> {
        let now = clock.now();
        let log_dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&log_dir).map_err(|err| {
            Error::new(ErrorKind::DirectoryCreate, "failed to create log directory")
                .with_context("directory", log_dir.display())
                .with_source(err)
        })?;

        let mut state = State {
            log_dir,
            log_filename,
            log_filename_suffix,
            rollover,
            current_path: PathBuf::new(),
            current_filesize: 0,
            next_rollover: rollover.next_rollover(&now)?,
            clock,
            trap,
        };

        state.current_path = state.filename_at(&now);
        let file = state.open_current(false)?;
        Ok((state, file))
    }

    fn filename_at(&self, now: &Zoned) -> PathBuf {
        let name = &self.log_filename;
        let suffix = &self.log_filename_suffix;
        let filename = match self.rollover {
            FileRollover::Daily => format!("{name}_{}{suffix}", now.strftime(DATE_FORMAT)),
            FileRollover::Size { .. } => format!("{name}{suffix}"),
        };
        self.log_dir.join(filename)
    }

    fn archive_filename(&self, index: usize) -> PathBuf {
        let name = &self.log_filename;
        let suffix = &self.log_filename_suffix;
        if index == 0 {
            self.log_dir.join(format!("{name}{suffix}"))
        } else {
            self.log_dir.join(format!("{name}.{index}{suffix}"))
        }
    }

    // Continue an existing file unless told to start over.
    fn open_current(&mut self, truncate: bool) -> Result<File, Error> {
        let mut options = OpenOptions::new();
        if truncate {
            options.write(true).create(true).truncate(true);
        } else {
            options.append(true).create(true);
        }

        let file = options.open(&self.current_path).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to open log file")
                .with_context("file", self.current_path.display())
                .with_source(err)
        })?;
        self.current_filesize = file.metadata().map(|m| m.len()).unwrap_or_default();
        Ok(file)
    }

    fn refresh_writer(&mut self, now: &Zoned, file: &mut File) {
        self.current_path = self.filename_at(now);
        match self.open_current(false) {
            Ok(new_file) => {
                if let Err(err) = file.flush() {
                    let err = Error::new(ErrorKind::Io, "failed to flush previous writer")
                        .with_source(err);
                    self.trap.trap(&err);
                }
                *file = new_file;
            }
            Err(err) => {
                let err = Error::new(ErrorKind::Io, "failed to create writer for logs")
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    // The archives shift up by one: `name.(i-1)` becomes `name.i`, the active file becomes
    // `name.1` and the oldest archive is overwritten.
    fn rotate_files(&mut self, file: &mut File) {
        let FileRollover::Size { max_files, .. } = self.rollover else {
            return;
        };

        if let Err(err) = file.flush() {
            let err =
                Error::new(ErrorKind::Io, "failed to flush previous writer").with_source(err);
            self.trap.trap(&err);
        }

        for index in (1..=max_files).rev() {
            let src = self.archive_filename(index - 1);
            if !src.exists() {
                continue;
            }
            let target = self.archive_filename(index);
            if let Err(err) = rename(&src, &target) {
                self.trap.trap(&err);
            }
        }

        match self.open_current(true) {
            Ok(new_file) => *file = new_file,
            Err(err) => {
                let err = Error::new(ErrorKind::Io, "failed to create writer for logs")
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    fn should_rollover_on_date(&self, now: &Zoned) -> bool {
        self.next_rollover.as_ref().is_some_and(|next| now >= next)
    }

    fn should_rollover_on_size(&self, incoming: usize) -> bool {
        match self.rollover {
            FileRollover::Daily => false,
            FileRollover::Size { max_file_size, .. } => {
                self.current_filesize > 0
                    && self.current_filesize.saturating_add(incoming as u64) > max_file_size.get()
            }
        }
    }

    fn advance_date(&mut self, now: &Zoned) {
        match self.rollover.next_rollover(now) {
            Ok(next) => self.next_rollover = next,
            Err(err) => {
                self.next_rollover = None;
                self.trap.trap(&err);
            }
        }
    }
}

fn rename(src: &Path, target: &Path) -> Result<(), Error> {
    if target.exists() {
        fs::remove_file(target).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to remove old log")
                .with_context("file", target.display())
                .with_source(err)
        })?;
    }
    fs::rename(src, target).map_err(|err| {
        Error::new(ErrorKind::Io, "failed to rename log file")
            .with_context("from", src.display())
            .with_context("to", target.display())
            .with_source(err)
    })
}
