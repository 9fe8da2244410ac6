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

use std::num::NonZeroU64;

use jiff::Zoned;

use crate::Error;
use crate::ErrorKind;

/// When a file appender moves on to a new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRollover {
    /// Start a new dated file, `<name>_<YYYY-MM-DD><ext>`, at local midnight.
    Daily,
    /// Keep writing `<name><ext>` and shift it to `<name>.1<ext>` once the next record would
    /// make it exceed `max_file_size` bytes. At most `max_files` archives are kept.
    Size {
        /// The size the active file does not grow beyond, unless a single record is larger.
        max_file_size: NonZeroU64,
        /// The number of archives kept.
        max_files: usize,
    },
}

impl FileRollover {
    /// Return the start of the local day after `now`, or `None` if this rollover does not
    /// depend on time.
    pub(crate) fn next_rollover(&self, now: &Zoned) -> Result<Option<Zoned>, Error> {
        match self {
            FileRollover::Size { .. } => Ok(None),
            FileRollover::Daily => now
                .tomorrow()
                .and_then(|tomorrow| tomorrow.start_of_day())
                .map(Some)
                .map_err(|err| {
                    Error::new(ErrorKind::Unexpected, "failed to compute next midnight")
                        .with_source(err)
                }),
        }
    }
}
