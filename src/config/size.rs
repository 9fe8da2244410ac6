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

//! Human readable file sizes such as `512`, `1.5KB` or `5 M`.

use crate::Error;
use crate::ErrorKind;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

// 10^18 * GB still fits in a u128.
const MAX_FRACTION_DIGITS: usize = 18;

/// Parse a file size into a number of bytes.
///
/// The accepted form is a number starting with a digit, with at most one decimal point,
/// optionally followed by whitespace and one of the units `B`, `K`, `KB`, `M`, `MB`, `G`
/// or `GB`. Units are case-sensitive and powers of 1024. Fractional bytes are truncated.
///
/// # Examples
///
/// ```
/// use logforth_ini::config::parse_filesize;
///
/// assert_eq!(parse_filesize("512").unwrap(), 512);
/// assert_eq!(parse_filesize("1.5KB").unwrap(), 1536);
/// assert_eq!(parse_filesize("5 M").unwrap(), 5 * 1024 * 1024);
/// assert!(parse_filesize("5mb").is_err());
/// ```
pub fn parse_filesize(text: &str) -> Result<u64, Error> {
    let invalid = || {
        Error::new(
            ErrorKind::InvalidNumericValue,
            format!("invalid file size: {text:?}"),
        )
    };

    let text = text.trim_matches([' ', '\r', '\n', '\t']);
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let end = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(end);
    let (integer, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains('.') {
        return Err(invalid());
    }

    let scale = match unit.trim_start_matches([' ', '\t']) {
        "" | "B" => 1,
        "K" | "KB" => KB,
        "M" | "MB" => MB,
        "G" | "GB" => GB,
        _ => return Err(invalid()),
    };
    let scale = u128::from(scale);

    let mut bytes = digits_to_u128(integer)
        .and_then(|n| n.checked_mul(scale))
        .ok_or_else(invalid)?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let numerator = digits_to_u128(fraction).ok_or_else(invalid)? * scale;
        let denominator = 10u128.pow(fraction.len() as u32);
        bytes = bytes
            .checked_add(numerator / denominator)
            .ok_or_else(invalid)?;
    }

    u64::try_from(bytes).map_err(|_| invalid())
}

/// Render a number of bytes in the largest fitting unit with at most two decimals.
///
/// The rendered text always parses back to exactly `size` bytes; when the rounded form would
/// not, the plain byte count is rendered instead.
///
/// # Examples
///
/// ```
/// use logforth_ini::config::format_filesize;
///
/// assert_eq!(format_filesize(5 * 1024 * 1024), "5MB");
/// assert_eq!(format_filesize(1536), "1.5KB");
/// assert_eq!(format_filesize(1000), "1000B");
/// assert_eq!(format_filesize(1025), "1025B");
/// ```
pub fn format_filesize(size: u64) -> String {
    let fallback = format!("{size}B");
    let (scale, unit) = match size {
        n if n < KB => return fallback,
        n if n < MB => (KB, "KB"),
        n if n < GB => (MB, "MB"),
        _ => (GB, "GB"),
    };

    let scale = u128::from(scale);
    let hundredths = (u128::from(size) * 100 + scale / 2) / scale;
    let (integer, fraction) = (hundredths / 100, hundredths % 100);
    let number = if fraction == 0 {
        integer.to_string()
    } else {
        let fraction = format!("{fraction:02}");
        format!("{integer}.{}", fraction.trim_end_matches('0'))
    };

    let rendered = format!("{number}{unit}");
    match parse_filesize(&rendered) {
        Ok(n) if n == size => rendered,
        _ => fallback,
    }
}

fn digits_to_u128(digits: &str) -> Option<u128> {
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok()
}
