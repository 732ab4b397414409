use std::path::PathBuf;

use thiserror::Error;

use crate::sniff::SpecFormat;

/// Errors produced while locating the spec file.
///
/// A missing file is not an error on its own; it only becomes
/// [`DiscoveryError::NotFound`] once every route has come up empty.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A candidate file exists but could not be read.
    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An explicitly configured spec file could not be read.
    #[error("cannot read configured {format} spec file {}: {source}", path.display())]
    ExplicitSpec {
        format: SpecFormat,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A search directory could not be traversed.
    #[error("cannot walk directory {}: {source}", dir.display())]
    Walk {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No spec file was found by any route.
    #[error("no OpenAPI spec file found")]
    NotFound,

    /// The discovery task did not run to completion.
    #[error("spec discovery aborted: {0}")]
    InitializationAborted(String),
}
