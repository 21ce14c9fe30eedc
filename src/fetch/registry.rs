//! PyPI-compatible package index source.
//!
//! Looks packages up by exact name against the index JSON API
//! (`{base}/pypi/{name}/json`) and reduces each `requires_dist` entry to a
//! bare package identifier.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{DependencySource, FetchError, FetchResult};

/// Per-request timeout for index lookups.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The subset of the index response needed for dependency extraction.
#[derive(Debug, Deserialize)]
struct IndexResponse {
    info: PackageInfo,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    /// Requirement declarations; null for packages with no dependencies.
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

/// A dependency source backed by a remote package index.
///
/// # Example
///
/// ```no_run
/// use depscope::fetch::{DependencySource, RegistrySource};
///
/// let source = RegistrySource::new("https://pypi.org");
/// let deps = source.direct_dependencies("requests").unwrap();
/// println!("{} direct dependencies", deps.len());
/// ```
#[derive(Debug, Clone)]
pub struct RegistrySource {
    base_url: String,
    client: Client,
}

impl RegistrySource {
    /// Creates a source for the index at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn package_url(&self, package: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, package)
    }
}

impl DependencySource for RegistrySource {
    fn direct_dependencies(&self, package: &str) -> FetchResult<Vec<String>> {
        let url = self.package_url(package);
        log::debug!("querying index: {url}");

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::PackageNotFound {
                package: package.to_string(),
            });
        }
        let response = response.error_for_status()?;

        let payload: IndexResponse =
            response
                .json()
                .map_err(|source| FetchError::MalformedResponse {
                    package: package.to_string(),
                    source,
                })?;

        let requirements = payload.info.requires_dist.unwrap_or_default();
        Ok(requirements
            .iter()
            .filter_map(|spec| requirement_name(spec))
            .collect())
    }
}

/// Extracts the bare package identifier from a requirement declaration.
///
/// Declarations carry version constraints, extras, and environment markers
/// in several syntaxes (`requests (>=2.0)`, `idna<4,>=2.5`,
/// `urllib3[socks] ; extra == "socks"`). The identifier is the leading run
/// of name characters; everything after it is discarded.
///
/// # Example
///
/// ```
/// use depscope::fetch::registry::requirement_name;
///
/// assert_eq!(requirement_name("charset-normalizer (<4,>=2)"), Some("charset-normalizer".to_string()));
/// assert_eq!(requirement_name("idna<4,>=2.5"), Some("idna".to_string()));
/// assert_eq!(requirement_name("   "), None);
/// ```
pub fn requirement_name(spec: &str) -> Option<String> {
    let trimmed = spec.trim_start();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .unwrap_or(trimmed.len());
    let name = &trimmed[..end];
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
