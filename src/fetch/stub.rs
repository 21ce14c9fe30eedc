//! Local stub repository source.
//!
//! A stub repository is a UTF-8 text file with one record per line:
//!
//! ```text
//! # comment
//! A: B C
//! B: C
//! C:
//! ```
//!
//! `NAME: dep dep dep` declares a package and its whitespace-separated
//! direct dependencies. Blank lines and `#` comments are ignored. The first
//! record whose name matches case-insensitively wins; a package with no
//! record has no dependencies, which is a successful lookup, not an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{DependencySource, FetchError, FetchResult};

/// A dependency source backed by a stub repository file.
///
/// The file is re-read on every lookup, so a test can rewrite it between
/// calls without rebuilding the source.
#[derive(Debug, Clone)]
pub struct StubRepository {
    path: PathBuf,
}

impl StubRepository {
    /// Creates a source reading from the stub file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The stub file path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self) -> FetchResult<String> {
        fs::read_to_string(&self.path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                FetchError::StubFileMissing {
                    path: self.path.clone(),
                }
            } else {
                FetchError::IoError(err)
            }
        })
    }
}

impl DependencySource for StubRepository {
    fn direct_dependencies(&self, package: &str) -> FetchResult<Vec<String>> {
        let content = self.read_records()?;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, deps)) = line.split_once(':') else {
                continue;
            };
            if name.trim().eq_ignore_ascii_case(package) {
                return Ok(deps.split_whitespace().map(str::to_string).collect());
            }
        }

        // No record means no dependencies, not an unknown package.
        Ok(Vec::new())
    }
}
