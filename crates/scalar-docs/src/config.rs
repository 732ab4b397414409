//! Middleware configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Default URL prefix of the docs UI.
pub const DEFAULT_DOCS_PATH: &str = "/scalar";

/// Directories probed when no explicit spec path is configured.
const DEFAULT_SEARCH_DIRS: &[&str] = &["api", "doc", "."];

/// Directories walked by the zero-config auto-discovery entry point.
const AUTO_SEARCH_DIRS: &[&str] = &["api", "doc", "docs", "openapi", "."];

/// Configuration for one middleware instance.
///
/// Treated as immutable once a [`crate::ScalarDocsLayer`] is built from it;
/// a different configuration means a new layer (and a fresh discovery).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Explicit JSON spec file. Skips directory search when set.
    pub json_spec_path: Option<PathBuf>,

    /// Explicit YAML spec file. Skips directory search when set.
    pub yaml_spec_path: Option<PathBuf>,

    /// Directories probed in order when neither explicit path is set. In
    /// auto mode these are walked recursively instead.
    pub search_dirs: Vec<PathBuf>,

    /// URL prefix the docs UI is served under.
    pub docs_path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            json_spec_path: None,
            yaml_spec_path: None,
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect(),
            docs_path: DEFAULT_DOCS_PATH.to_string(),
        }
    }
}

impl DocsConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for auto-discovery: the wider directory list, walked
    /// recursively.
    pub fn auto() -> Self {
        Self::default().with_search_dirs(Self::auto_search_dirs())
    }

    /// The directory list used by auto-discovery.
    pub fn auto_search_dirs() -> Vec<PathBuf> {
        AUTO_SEARCH_DIRS.iter().map(PathBuf::from).collect()
    }

    /// Set the explicit JSON spec path.
    pub fn with_json_spec(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_spec_path = Some(path.into());
        self
    }

    /// Set the explicit YAML spec path.
    pub fn with_yaml_spec(mut self, path: impl Into<PathBuf>) -> Self {
        self.yaml_spec_path = Some(path.into());
        self
    }

    /// Replace the search directories.
    pub fn with_search_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the docs UI path prefix.
    pub fn with_docs_path(mut self, path: impl Into<String>) -> Self {
        self.docs_path = path.into();
        self
    }

    /// Whether directory search is active (no explicit path configured).
    pub fn search_mode(&self) -> bool {
        self.json_spec_path.is_none() && self.yaml_spec_path.is_none()
    }

    /// Fill empty values with the defaults.
    ///
    /// An empty docs path or search list means "use the default", and an
    /// empty explicit path counts as unset.
    pub fn normalized(mut self) -> Self {
        if self.docs_path.is_empty() {
            self.docs_path = DEFAULT_DOCS_PATH.to_string();
        }
        if self.search_dirs.is_empty() {
            self.search_dirs = DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect();
        }
        self.json_spec_path = self.json_spec_path.filter(|p| !p.as_os_str().is_empty());
        self.yaml_spec_path = self.yaml_spec_path.filter(|p| !p.as_os_str().is_empty());
        self
    }
}
