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

use std::env;
use std::fs;
use std::path::Path;

use crate::Error;
use crate::ErrorKind;

/// The placeholder standing for the directory of the running executable.
pub const BIN_PLACEHOLDER: &str = "${bin}";

/// Return the directory containing the running executable, with a trailing `/`.
pub fn bin_dir() -> Result<String, Error> {
    let exe = env::current_exe().map_err(|err| {
        Error::new(ErrorKind::Io, "failed to locate the running executable").with_source(err)
    })?;
    let dir = exe.parent().unwrap_or(Path::new("/"));
    Ok(format_dir(&dir.to_string_lossy()))
}

/// Expand a leading `${bin}` in `directory` with `bin_dir` and normalize the result with
/// [`format_dir`].
///
/// A separator right after the placeholder is absorbed, so both `${bin}/logs` and
/// `${bin}logs` land in `<bin_dir>logs/`.
pub fn resolve_dir(directory: &str, bin_dir: &str) -> String {
    let directory = directory.trim_matches([' ', '\r', '\n', '\t']);
    match directory.strip_prefix(BIN_PLACEHOLDER) {
        None => format_dir(directory),
        Some(rest) => {
            let rest = rest
                .strip_prefix(['/', '\\'])
                .unwrap_or(rest);
            format_dir(&format!("{}{rest}", format_dir(bin_dir)))
        }
    }
}

/// Normalize a directory path: backslashes become `/` and the path ends with exactly one
/// `/`. An empty path is the current directory.
pub fn format_dir(dir: &str) -> String {
    let dir = dir.replace('\\', "/");
    if dir.is_empty() {
        return "./".to_string();
    }
    match dir.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => format!("{trimmed}/"),
    }
}

/// Normalize a file extension so that it is empty or starts with `.`.
pub fn format_ext(ext: &str) -> String {
    let ext = ext.trim_matches([' ', '\r', '\n', '\t']);
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Create `dir` and all of its missing parents.
pub fn create_dir(dir: &str) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|err| {
        Error::new(ErrorKind::DirectoryCreate, "failed to create log directory")
            .with_context("directory", dir)
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dir() {
        assert_eq!(resolve_dir("${bin}/logs/", "/opt/app/"), "/opt/app/logs/");
        assert_eq!(resolve_dir("${bin}logs", "/opt/app"), "/opt/app/logs/");
        assert_eq!(resolve_dir("${bin}\\logs\\", "/opt/app/"), "/opt/app/logs/");
        assert_eq!(resolve_dir(" ${bin} ", "/opt/app/"), "/opt/app/");
        assert_eq!(resolve_dir("/var/log/${bin}", "/opt/app/"), "/var/log/${bin}/");
        assert_eq!(resolve_dir("logs", "/opt/app/"), "logs/");
    }

    #[test]
    fn test_format_dir() {
        assert_eq!(format_dir(""), "./");
        assert_eq!(format_dir("/"), "/");
        assert_eq!(format_dir("a\\b"), "a/b/");
        assert_eq!(format_dir("a/b//"), "a/b/");
    }

    #[test]
    fn test_format_ext() {
        assert_eq!(format_ext(""), "");
        assert_eq!(format_ext(" txt "), ".txt");
        assert_eq!(format_ext(".log"), ".log");
    }

    #[test]
    fn test_create_dir_failure() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let target = format!("{}/nested/", blocker.display());
        let err = create_dir(&target).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DirectoryCreate);
        assert_eq!(err.context("directory"), Some(target.as_str()));
    }
}
