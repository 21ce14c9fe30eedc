//! Configuration module for depscope.
//!
//! A run is described by a small JSON file naming the root package, the
//! package index (or stub repository file) to resolve against, and the
//! diagram output path.
//!
//! # Example
//!
//! ```
//! use depscope::config::parse_str;
//!
//! let json = r#"{
//!     "package_name": "requests",
//!     "repo_url": "https://pypi.org",
//!     "test_mode": false,
//!     "output_file": "graph.svg"
//! }"#;
//!
//! let config = parse_str(json).unwrap();
//! assert_eq!(config.package_name, "requests");
//! assert!(config.filter_substring.is_empty());
//! ```

pub mod settings;

// Re-export commonly used types for convenience
pub use settings::{load_file, parse_str, Config, ConfigError, ConfigResult};
