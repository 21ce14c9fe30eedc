//! Dependency sources for depscope.
//!
//! A [`DependencySource`] answers one question: given a package name, what
//! are its direct dependencies? Two implementations are provided:
//!
//! - [`RegistrySource`] - queries a PyPI-compatible package index over HTTP
//! - [`StubRepository`] - reads a line-oriented local file, used for testing
//!
//! The graph builder only sees the trait; which source backs it is decided
//! from the run configuration via [`source_for`].

pub mod registry;
pub mod stub;

use std::path::PathBuf;

use crate::config::Config;

pub use registry::RegistrySource;
pub use stub::StubRepository;

/// Errors that can occur while fetching direct dependencies.
///
/// The graph builder treats every variant the same way (the affected node
/// gets an empty dependency list), but callers that fetch the root package
/// directly report them, so the variants stay distinguishable.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The package index has no record of this package.
    #[error("Package '{package}' not found in the index")]
    PackageNotFound {
        /// The package that was looked up.
        package: String,
    },

    /// The index request failed (transport error or bad status).
    #[error("Index request failed: {0}")]
    Registry(#[from] reqwest::Error),

    /// The index answered, but the payload did not decode.
    #[error("Malformed index response for '{package}': {source}")]
    MalformedResponse {
        /// The package that was looked up.
        package: String,
        /// The decode failure.
        source: reqwest::Error,
    },

    /// The stub repository file does not exist.
    #[error("Stub repository file '{}' not found", path.display())]
    StubFileMissing {
        /// Path that was probed.
        path: PathBuf,
    },

    /// Reading the stub repository failed.
    #[error("Failed to read stub repository: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// A provider of direct dependency lists.
pub trait DependencySource {
    /// Returns the direct dependencies of `package`, in declaration order.
    ///
    /// Version constraints, extras, and environment markers are already
    /// stripped; only bare package identifiers are returned.
    fn direct_dependencies(&self, package: &str) -> FetchResult<Vec<String>>;
}

/// Builds the dependency source described by the configuration.
///
/// In test mode `repo_url` names a stub repository file; otherwise it is
/// the base URL of a package index.
///
/// # Example
///
/// ```
/// use depscope::config::parse_str;
/// use depscope::fetch::source_for;
///
/// let config = parse_str(r#"{
///     "package_name": "A",
///     "repo_url": "deps.txt",
///     "test_mode": true,
///     "output_file": "out.svg"
/// }"#).unwrap();
///
/// let _source = source_for(&config);
/// ```
pub fn source_for(config: &Config) -> Box<dyn DependencySource> {
    if config.test_mode {
        Box::new(StubRepository::new(&config.repo_url))
    } else {
        Box::new(RegistrySource::new(&config.repo_url))
    }
}
