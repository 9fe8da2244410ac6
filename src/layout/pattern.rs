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

use std::fmt::Write;
use std::process;
use std::thread;

#[cfg(feature = "colored")]
use colored::Color;
use jiff::Timestamp;
use jiff::Zoned;
use jiff::tz::TimeZone;

use crate::Error;
use crate::ErrorKind;
use crate::layout::Layout;
use crate::record::Level;
use crate::record::Record;

/// A layout that formats log records after a `%`-flag pattern.
///
/// Supported flags:
///
/// | flag | output |
/// |------|--------|
/// | `%v` | the message |
/// | `%n` | the logger name |
/// | `%l` / `%L` | the level, full (`info`) or one letter (`I`) |
/// | `%Y` `%y` `%m` `%d` | year, two-digit year, month, day |
/// | `%H` `%M` `%S` | hours, minutes, seconds |
/// | `%e` `%f` `%F` | milliseconds, microseconds, nanoseconds |
/// | `%T` / `%D` | `%H:%M:%S` / `%m/%d/%y` |
/// | `%z` | UTC offset as `+hh:mm` |
/// | `%P` / `%t` | process id / thread name |
/// | `%s` / `%g` | source file name / full path |
/// | `%#` / `%!` | source line / function |
/// | `%^` ... `%$` | the enclosed text is colored by level, also when not writing to a terminal |
/// | `%%` | a literal `%` |
///
/// Any other flag is written out as is.
///
/// # Examples
///
/// ```
/// use logforth_ini::layout::PatternLayout;
///
/// let layout = PatternLayout::new("[%H:%M:%S.%e] %^[%l]%$ %v");
/// ```
#[derive(Debug, Clone)]
pub struct PatternLayout {
    pattern: String,
    tokens: Vec<Token>,
    no_color: bool,
    timezone: TimeZone,
    #[cfg(feature = "colored")]
    colors: LevelColor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Payload,
    LoggerName,
    Level,
    ShortLevel,
    Year,
    ShortYear,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millis,
    Micros,
    Nanos,
    Offset,
    ProcessId,
    Thread,
    ShortFile,
    FullFile,
    Line,
    Function,
    ColorStart,
    ColorEnd,
}

impl PatternLayout {
    /// Compile a pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let tokens = compile(&pattern);
        Self {
            pattern,
            tokens,
            no_color: false,
            timezone: TimeZone::system(),
            #[cfg(feature = "colored")]
            colors: LevelColor::default(),
        }
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Disable colored output. Color ranges are still honored but left plain.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Set the timezone for timestamps.
    ///
    /// Defaults to the system timezone if not set.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use logforth_ini::layout::PatternLayout;
    ///
    /// let layout = PatternLayout::new("%T %v").timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    fn colorize(&self, level: Level, text: &str) -> String {
        if self.no_color {
            return text.to_string();
        }

        #[cfg(feature = "colored")]
        return self.colors.colorize(level, text);

        #[cfg(not(feature = "colored"))]
        {
            let _ = level;
            text.to_string()
        }
    }
}

impl Layout for PatternLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let ts = Timestamp::try_from(record.time()).map_err(|err| {
            Error::new(ErrorKind::Unexpected, "record time out of range").with_source(err)
        })?;
        let time = ts.to_zoned(self.timezone.clone());

        let mut out = String::with_capacity(self.pattern.len() + record.payload().len() + 32);
        let mut color_start = None;
        for token in &self.tokens {
            match token {
                Token::ColorStart => color_start = Some(out.len()),
                Token::ColorEnd => {
                    if let Some(start) = color_start.take() {
                        let colored = self.colorize(record.level(), &out[start..]);
                        out.truncate(start);
                        out.push_str(&colored);
                    }
                }
                token => write_token(&mut out, token, record, &time)
                    .map_err(Error::from_fmt_error)?,
            }
        }

        Ok(out.into_bytes())
    }
}

fn write_token(
    out: &mut String,
    token: &Token,
    record: &Record,
    time: &Zoned,
) -> std::fmt::Result {
    match token {
        Token::Literal(text) => out.push_str(text),
        Token::Payload => out.push_str(record.payload()),
        Token::LoggerName => out.push_str(record.logger()),
        Token::Level => out.push_str(record.level().as_str()),
        Token::ShortLevel => out.push_str(record.level().as_short_str()),
        Token::Year => write!(out, "{:04}", time.year())?,
        Token::ShortYear => write!(out, "{:02}", time.year().rem_euclid(100))?,
        Token::Month => write!(out, "{:02}", time.month())?,
        Token::Day => write!(out, "{:02}", time.day())?,
        Token::Hour => write!(out, "{:02}", time.hour())?,
        Token::Minute => write!(out, "{:02}", time.minute())?,
        Token::Second => write!(out, "{:02}", time.second())?,
        Token::Millis => write!(out, "{:03}", time.subsec_nanosecond() / 1_000_000)?,
        Token::Micros => write!(out, "{:06}", time.subsec_nanosecond() / 1_000)?,
        Token::Nanos => write!(out, "{:09}", time.subsec_nanosecond())?,
        Token::Offset => {
            let seconds = time.offset().seconds();
            let sign = if seconds < 0 { '-' } else { '+' };
            let minutes = seconds.unsigned_abs() / 60;
            write!(out, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)?
        }
        Token::ProcessId => write!(out, "{}", process::id())?,
        Token::Thread => {
            let current = thread::current();
            match current.name() {
                Some(name) => out.push_str(name),
                None => write!(out, "{:?}", current.id())?,
            }
        }
        Token::ShortFile => out.push_str(&record.filename()),
        Token::FullFile => out.push_str(record.file().unwrap_or_default()),
        Token::Line => {
            if let Some(line) = record.line() {
                write!(out, "{line}")?
            }
        }
        Token::Function => out.push_str(record.function().unwrap_or_default()),
        Token::ColorStart | Token::ColorEnd => {}
    }
    Ok(())
}

fn compile(pattern: &str) -> Vec<Token> {
    fn push(tokens: &mut Vec<Token>, token: Token) {
        if let Token::Literal(text) = &token {
            if let Some(Token::Literal(last)) = tokens.last_mut() {
                last.push_str(text);
                return;
            }
        }
        tokens.push(token);
    }

    let literal = |s: &str| Token::Literal(s.to_string());

    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            push(&mut tokens, Token::Literal(c.to_string()));
            continue;
        }

        let Some(flag) = chars.next() else {
            push(&mut tokens, literal("%"));
            break;
        };
        let token = match flag {
            'v' => Token::Payload,
            'n' => Token::LoggerName,
            'l' => Token::Level,
            'L' => Token::ShortLevel,
            'Y' => Token::Year,
            'y' => Token::ShortYear,
            'm' => Token::Month,
            'd' => Token::Day,
            'H' => Token::Hour,
            'M' => Token::Minute,
            'S' => Token::Second,
            'e' => Token::Millis,
            'f' => Token::Micros,
            'F' => Token::Nanos,
            'z' => Token::Offset,
            'P' => Token::ProcessId,
            't' => Token::Thread,
            's' => Token::ShortFile,
            'g' => Token::FullFile,
            '#' => Token::Line,
            '!' => Token::Function,
            '^' => Token::ColorStart,
            '$' => Token::ColorEnd,
            '%' => literal("%"),
            'T' => {
                for token in [Token::Hour, literal(":"), Token::Minute, literal(":")] {
                    push(&mut tokens, token);
                }
                Token::Second
            }
            'D' => {
                for token in [Token::Month, literal("/"), Token::Day, literal("/")] {
                    push(&mut tokens, token);
                }
                Token::ShortYear
            }
            other => Token::Literal(format!("%{other}")),
        };
        push(&mut tokens, token);
    }
    tokens
}

/// Colors for different log levels.
#[cfg(feature = "colored")]
#[derive(Debug, Clone)]
struct LevelColor {
    trace: Color,
    debug: Color,
    info: Color,
    warn: Color,
    error: Color,
    critical: Color,
}

#[cfg(feature = "colored")]
impl Default for LevelColor {
    fn default() -> Self {
        Self {
            trace: Color::White,
            debug: Color::Cyan,
            info: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            critical: Color::Red,
        }
    }
}

#[cfg(feature = "colored")]
impl LevelColor {
    // Colored ranges are always rendered, whether or not stdout is a terminal, so the escape
    // codes are written directly instead of going through `colored::control`.
    fn colorize(&self, level: Level, text: &str) -> String {
        let (fg, bg, bold) = match level {
            Level::Trace => (&self.trace, None, false),
            Level::Debug => (&self.debug, None, false),
            Level::Info => (&self.info, None, false),
            Level::Warn => (&self.warn, None, true),
            Level::Error => (&self.error, None, true),
            Level::Critical => (&Color::White, Some(&self.critical), true),
        };

        let mut codes = Vec::with_capacity(3);
        if bold {
            codes.push("1".into());
        }
        codes.push(fg.to_fg_str());
        if let Some(bg) = bg {
            codes.push(bg.to_bg_str());
        }
        format!("\x1b[{}m{text}\x1b[0m", codes.join(";"))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::time::SystemTime;

    use super::*;

    fn render(pattern: &str, level: Level, payload: &str) -> String {
        let time = Timestamp::from_str("2024-08-10T17:12:52.123456789Z").unwrap();
        let record = Record::builder()
            .time(SystemTime::from(time))
            .level(level)
            .logger("app")
            .file(Some("src/net/conn.rs"))
            .function(Some("connect"))
            .line(Some(42))
            .payload(payload)
            .build();

        let tz = TimeZone::fixed(jiff::tz::offset(8));
        let layout = PatternLayout::new(pattern).timezone(tz).no_color();
        String::from_utf8(layout.format(&record).unwrap()).unwrap()
    }

    #[test]
    fn test_time_flags() {
        assert_eq!(
            render("[%Y-%m-%d %H:%M:%S.%e] %v", Level::Info, "hi"),
            "[2024-08-11 01:12:52.123] hi"
        );
        assert_eq!(render("%T|%D|%z", Level::Info, ""), "01:12:52|08/11/24|+08:00");
        assert_eq!(render("%f %F", Level::Info, ""), "123456 123456789");
    }

    #[test]
    fn test_record_flags() {
        assert_eq!(
            render("[%n] [%l] [%L] %s:%# %! %g", Level::Warn, ""),
            "[app] [warn] [W] conn.rs:42 connect src/net/conn.rs"
        );
        assert_eq!(render("%P", Level::Info, ""), process::id().to_string());
    }

    #[test]
    fn test_literal_flags() {
        assert_eq!(render("100%% %q %", Level::Info, ""), "100% %q %");
        assert_eq!(render("%^[%l]%$ %v", Level::Error, "x"), "[error] x");
        assert_eq!(render("no flags", Level::Error, "x"), "no flags");
    }

    #[test]
    fn test_compile_merges_literals() {
        assert_eq!(
            compile("ab%%c%v"),
            vec![Token::Literal("ab%c".to_string()), Token::Payload]
        );
    }

    #[cfg(feature = "colored")]
    #[test]
    fn test_color_range() {
        // not a terminal, colors disabled globally: ranges are still colored
        colored::control::set_override(false);
        let layout = PatternLayout::new("%^[%l]%$ %v").timezone(TimeZone::UTC);
        let format = |level| {
            let record = Record::builder().level(level).payload("x").build();
            String::from_utf8(layout.format(&record).unwrap()).unwrap()
        };

        assert_eq!(format(Level::Info), "\x1b[32m[info]\x1b[0m x");
        assert_eq!(format(Level::Error), "\x1b[1;31m[error]\x1b[0m x");
        assert_eq!(format(Level::Critical), "\x1b[1;37;41m[critical]\x1b[0m x");

        let plain = PatternLayout::new("%^[%l]%$ %v").no_color();
        let record = Record::builder().level(Level::Info).payload("x").build();
        assert_eq!(plain.format(&record).unwrap(), b"[info] x");
    }
}
