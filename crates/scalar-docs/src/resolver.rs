//! Spec discovery: turns a [`DocsConfig`] into an [`InitOutcome`].

use std::path::{Path, PathBuf};

use bytes::Bytes;

use scalar_docs_telemetry::log_spec_discovered;

use crate::config::DocsConfig;
use crate::error::DiscoveryError;
use crate::fs::SpecFs;
use crate::html::render_docs_html;
use crate::probe::{decode_path, probe, served_path_for_explicit, Probed};
use crate::sniff::SpecFormat;

/// File names probed in search mode, YAML first.
const YAML_FILENAMES: &[&str] = &["openapi.yaml", "openapi.yml"];
const JSON_FILENAME: &str = "openapi.json";

/// A spec file ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSpec {
    pub format: SpecFormat,
    pub content: Bytes,
    /// URL path the raw file is served under.
    pub served_path: String,
    /// Where the file was read from.
    pub source_path: PathBuf,
}

/// Everything the dispatcher serves after a successful discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsBundle {
    pub json: Option<DiscoveredSpec>,
    pub yaml: Option<DiscoveredSpec>,
    /// Served path of the spec the UI points at.
    pub primary_url: String,
    /// Rendered docs page.
    pub html: String,
}

impl DocsBundle {
    /// The spec served at exactly `path`, if any. JSON is checked first.
    ///
    /// Both sides are percent-decoded, so `/my%20docs/openapi.json` and
    /// `/my docs/openapi.json` name the same file.
    pub fn spec_at(&self, path: &str) -> Option<&DiscoveredSpec> {
        let wanted = decode_path(path);
        [self.json.as_ref(), self.yaml.as_ref()]
            .into_iter()
            .flatten()
            .find(|spec| decode_path(&spec.served_path) == wanted)
    }
}

/// Result of spec discovery. Built once, never mutated.
#[derive(Debug)]
pub enum InitOutcome {
    Ready(DocsBundle),
    Failed(DiscoveryError),
}

impl InitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn bundle(&self) -> Option<&DocsBundle> {
        match self {
            Self::Ready(bundle) => Some(bundle),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&DiscoveryError> {
        match self {
            Self::Ready(_) => None,
            Self::Failed(e) => Some(e),
        }
    }
}

/// Accumulates specs and the first error while the resolver runs.
#[derive(Default)]
struct Resolution {
    json: Option<DiscoveredSpec>,
    yaml: Option<DiscoveredSpec>,
    primary_url: Option<String>,
    first_error: Option<DiscoveryError>,
}

impl Resolution {
    fn accept(&mut self, spec: DiscoveredSpec) {
        log_spec_discovered!(
            format = %spec.format,
            source = %spec.source_path.display(),
            served_path = %spec.served_path,
            "spec file loaded"
        );

        if self.primary_url.is_none() && !spec.served_path.is_empty() {
            self.primary_url = Some(spec.served_path.clone());
        }
        match spec.format {
            SpecFormat::Json => self.json = Some(spec),
            SpecFormat::Yaml => self.yaml = Some(spec),
        }
    }

    fn record(&mut self, error: DiscoveryError) {
        tracing::warn!(error = %error, "spec file could not be loaded");
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }

    fn finish(self) -> InitOutcome {
        match self.primary_url {
            Some(primary_url) => InitOutcome::Ready(DocsBundle {
                html: render_docs_html(&primary_url),
                json: self.json,
                yaml: self.yaml,
                primary_url,
            }),
            None => InitOutcome::Failed(self.first_error.unwrap_or(DiscoveryError::NotFound)),
        }
    }
}

/// Locate the spec file(s) for `config`.
///
/// Explicit paths are read as-is, without content checks, and disable
/// directory search. Otherwise `openapi.yaml` (then `openapi.yml`) and
/// `openapi.json` are probed across the search directories; the first spec
/// found, in that order, becomes the primary one. The earliest read error
/// wins when nothing could be loaded.
pub fn resolve(config: &DocsConfig, fs: &dyn SpecFs) -> InitOutcome {
    let mut resolution = Resolution::default();

    if let Some(path) = &config.json_spec_path {
        match read_explicit(fs, path, SpecFormat::Json) {
            Ok(spec) => resolution.accept(spec),
            Err(e) => resolution.record(e),
        }
    }

    if let Some(path) = &config.yaml_spec_path {
        match read_explicit(fs, path, SpecFormat::Yaml) {
            Ok(spec) => resolution.accept(spec),
            Err(e) => resolution.record(e),
        }
    }

    if config.search_mode() {
        match probe_first(fs, YAML_FILENAMES, &config.search_dirs) {
            Ok(Some(probed)) => resolution.accept(discovered(probed, SpecFormat::Yaml)),
            Ok(None) => {}
            Err(e) => resolution.record(e),
        }

        match probe(fs, JSON_FILENAME, &config.search_dirs) {
            Ok(Some(probed)) => resolution.accept(discovered(probed, SpecFormat::Json)),
            Ok(None) => {}
            Err(e) => resolution.record(e),
        }
    }

    resolution.finish()
}

/// Outcome serving a single spec that was already read.
pub(crate) fn ready_with(spec: DiscoveredSpec) -> InitOutcome {
    let mut resolution = Resolution::default();
    resolution.accept(spec);
    resolution.finish()
}

fn read_explicit(
    fs: &dyn SpecFs,
    path: &Path,
    format: SpecFormat,
) -> Result<DiscoveredSpec, DiscoveryError> {
    let content = fs
        .read(path)
        .map_err(|source| DiscoveryError::ExplicitSpec {
            format,
            path: path.to_path_buf(),
            source,
        })?;

    Ok(DiscoveredSpec {
        format,
        content: Bytes::from(content),
        served_path: served_path_for_explicit(path),
        source_path: path.to_path_buf(),
    })
}

/// Probe each file name in turn; the first name found anywhere wins.
fn probe_first(
    fs: &dyn SpecFs,
    filenames: &[&str],
    dirs: &[PathBuf],
) -> Result<Option<Probed>, DiscoveryError> {
    for filename in filenames {
        if let Some(probed) = probe(fs, filename, dirs)? {
            return Ok(Some(probed));
        }
    }
    Ok(None)
}

fn discovered(probed: Probed, format: SpecFormat) -> DiscoveredSpec {
    DiscoveredSpec {
        format,
        content: Bytes::from(probed.content),
        served_path: probed.served_path,
        source_path: probed.source_path,
    }
}
