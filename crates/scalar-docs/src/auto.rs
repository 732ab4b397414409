//! Zero-config spec auto-discovery.
//!
//! Walks whole directory subtrees for `.json`, `.yaml` and `.yml` files and
//! content-sniffs them until one looks like an OpenAPI document. Candidates
//! are tried YAML first, then by search directory, then in walk order, the
//! same priority search mode uses. The winner is served from the bytes read
//! while sniffing it.

use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;

use crate::error::DiscoveryError;
use crate::fs::SpecFs;
use crate::probe::served_path_for_explicit;
use crate::resolver::{ready_with, DiscoveredSpec, InitOutcome};
use crate::sniff::{looks_like_openapi, SpecFormat};

/// The spec file auto-discovery settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSpec {
    pub path: PathBuf,
    pub format: SpecFormat,
    pub content: Bytes,
}

/// Result of one auto-discovery run.
#[derive(Debug)]
pub struct AutoDiscovery {
    found: Vec<PathBuf>,
    selected: Option<SelectedSpec>,
    error: Option<DiscoveryError>,
}

impl AutoDiscovery {
    /// Walk `dirs` and select the first valid spec file.
    ///
    /// Missing directories are skipped; any other traversal failure stops
    /// discovery. Unreadable and invalid candidates are skipped.
    pub fn run(fs: &dyn SpecFs, dirs: &[PathBuf]) -> Self {
        let candidates = match collect_candidates(fs, dirs) {
            Ok(candidates) => candidates,
            Err(error) => {
                tracing::warn!(error = %error, "auto-discovery failed");
                return Self {
                    found: Vec::new(),
                    selected: None,
                    error: Some(error),
                };
            }
        };

        tracing::debug!(candidates = candidates.len(), "auto-discovery candidates collected");

        let selected = candidates
            .into_iter()
            .find_map(|(format, path)| sniff_candidate(fs, path, format));

        match selected {
            Some(spec) => {
                tracing::info!(path = %spec.path.display(), format = %spec.format, "auto-discovered spec file");
                Self {
                    found: vec![spec.path.clone()],
                    selected: Some(spec),
                    error: None,
                }
            }
            None => Self {
                found: Vec::new(),
                selected: None,
                error: Some(DiscoveryError::NotFound),
            },
        }
    }

    /// Valid spec files found, the selected one first.
    pub fn found_files(&self) -> &[PathBuf] {
        &self.found
    }

    pub fn selected(&self) -> Option<&SelectedSpec> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&DiscoveryError> {
        self.error.as_ref()
    }

    /// Whether a valid spec file was found.
    pub fn is_initialized(&self) -> bool {
        self.selected.is_some()
    }

    /// Turn this run into a middleware outcome.
    ///
    /// The selected file is served at `/` + its base name from the content
    /// already read during sniffing. Without a selection the outcome is
    /// `Failed` with the discovery error; rejected files are never served.
    pub fn into_outcome(self) -> InitOutcome {
        match self.selected {
            Some(spec) => ready_with(DiscoveredSpec {
                format: spec.format,
                content: spec.content,
                served_path: served_path_for_explicit(&spec.path),
                source_path: spec.path,
            }),
            None => InitOutcome::Failed(self.error.unwrap_or(DiscoveryError::NotFound)),
        }
    }
}

/// All spec-like files below `dirs`, ordered YAML first, then by directory
/// and walk order. Files reachable from several directories appear once.
fn collect_candidates(
    fs: &dyn SpecFs,
    dirs: &[PathBuf],
) -> Result<Vec<(SpecFormat, PathBuf)>, DiscoveryError> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for dir in dirs {
        let files = match fs.walk(dir) {
            Ok(files) => files,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(DiscoveryError::Walk {
                    dir: dir.clone(),
                    source,
                })
            }
        };

        for path in files {
            let Some(format) = SpecFormat::from_path(&path) else {
                continue;
            };
            if seen.insert(dedup_key(&path)) {
                candidates.push((format, path));
            }
        }
    }

    // Stable: keeps directory and walk order within each format.
    candidates.sort_by_key(|(format, _)| match format {
        SpecFormat::Yaml => 0,
        SpecFormat::Json => 1,
    });

    Ok(candidates)
}

fn sniff_candidate(fs: &dyn SpecFs, path: PathBuf, format: SpecFormat) -> Option<SelectedSpec> {
    let content = match fs.read(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable candidate");
            return None;
        }
    };

    if !looks_like_openapi(&content, format) {
        tracing::debug!(path = %path.display(), "skipping file that does not look like OpenAPI");
        return None;
    }

    Some(SelectedSpec {
        path,
        format,
        content: Bytes::from(content),
    })
}

fn dedup_key(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
