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

//! Typed access to the keys of a configuration section.

use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;
use crate::config::size::parse_filesize;
use crate::ini::Section;
use crate::record::Level;
use crate::record::LevelFilter;

/// Check that every key in `keys` is present and non-empty, in order.
pub(crate) fn require(section: &Section, keys: &[&'static str]) -> Result<(), Error> {
    for &key in keys {
        match section.get(key) {
            None => {
                return Err(Error::new(ErrorKind::MissingKey, "missing key").with_context("key", key));
            }
            Some("") => {
                return Err(Error::new(ErrorKind::EmptyValue, "value of key is empty")
                    .with_context("key", key));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Return the value of a key already checked by [`require`].
pub(crate) fn value<'a>(section: &'a Section, key: &'static str) -> Result<&'a str, Error> {
    section
        .get(key)
        .ok_or_else(|| Error::new(ErrorKind::MissingKey, "missing key").with_context("key", key))
}

pub(crate) fn level(section: &Section, key: &'static str) -> Result<Level, Error> {
    value(section, key)?
        .parse::<Level>()
        .map_err(|err| err.with_context("key", key))
}

pub(crate) fn level_filter(section: &Section, key: &'static str) -> Result<LevelFilter, Error> {
    value(section, key)?
        .parse::<LevelFilter>()
        .map_err(|err| err.with_context("key", key))
}

/// Parse an unsigned integer made of ASCII digits only.
pub(crate) fn integer<T: FromStr>(section: &Section, key: &'static str) -> Result<T, Error> {
    let text = value(section, key)?;
    let invalid = || {
        Error::new(
            ErrorKind::InvalidNumericValue,
            format!("invalid integer: {text:?}"),
        )
        .with_context("key", key)
    };

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    text.parse::<T>().map_err(|_| invalid())
}

pub(crate) fn filesize(section: &Section, key: &'static str) -> Result<u64, Error> {
    parse_filesize(value(section, key)?).map_err(|err| err.with_context("key", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(entries: &[(&str, &str)]) -> Section {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_require() {
        let s = section(&[("level", "info"), ("pattern", "")]);
        assert!(require(&s, &["level"]).is_ok());

        let err = require(&s, &["level", "name", "pattern"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
        assert_eq!(err.context("key"), Some("name"));

        let err = require(&s, &["pattern", "name"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyValue);
        assert_eq!(err.context("key"), Some("pattern"));
    }

    #[test]
    fn test_integer() {
        let s = section(&[("a", "42"), ("b", "+1"), ("c", "4294967296"), ("d", " 1")]);
        assert_eq!(integer::<u32>(&s, "a").unwrap(), 42);

        for key in ["b", "d"] {
            let err = integer::<u32>(&s, key).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidNumericValue);
        }
        let err = integer::<u32>(&s, "c").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumericValue);
        assert_eq!(integer::<u64>(&s, "c").unwrap(), 4294967296);
    }

    #[test]
    fn test_levels() {
        let s = section(&[("level", "Warning"), ("flush_on", "off"), ("min", "off")]);
        assert_eq!(level(&s, "level").unwrap(), Level::Warn);

        let err = level(&s, "flush_on").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnumValue);
        assert_eq!(err.context("key"), Some("flush_on"));

        assert_eq!(level_filter(&s, "min").unwrap(), LevelFilter::Off);
    }
}
