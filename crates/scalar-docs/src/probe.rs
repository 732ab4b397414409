//! Probe search directories for a file by name.

use std::borrow::Cow;
use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::DiscoveryError;
use crate::fs::SpecFs;

/// A file found by [`probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probed {
    pub content: Vec<u8>,
    /// URL path the file is served under (e.g. `/api/openapi.json`).
    pub served_path: String,
    /// Path the file was read from.
    pub source_path: PathBuf,
}

/// Look for `filename` in each of `dirs`, in order.
///
/// Returns the first readable hit, `Ok(None)` if no directory has the file,
/// or an error as soon as a candidate exists but cannot be read. Absence
/// is never reported as an error.
pub fn probe(
    fs: &dyn SpecFs,
    filename: &str,
    dirs: &[PathBuf],
) -> Result<Option<Probed>, DiscoveryError> {
    for dir in dirs {
        let candidate = dir.join(filename);
        tracing::debug!(candidate = %candidate.display(), "probing for spec file");

        match fs.read(&candidate) {
            Ok(content) => {
                return Ok(Some(Probed {
                    content,
                    served_path: served_path_for(&candidate),
                    source_path: candidate,
                }));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(DiscoveryError::Read {
                    path: candidate,
                    source,
                });
            }
        }
    }

    Ok(None)
}

/// Characters escaped inside a URL path segment. Non-ASCII bytes are always
/// escaped.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL path for a file found below a search directory.
///
/// `.` components are dropped, `..` removes the preceding segment, and each
/// remaining segment is percent-encoded. A file in the `.` directory is
/// served at `/<filename>` and `my docs/openapi.json` at
/// `/my%20docs/openapi.json`. Root and drive prefixes are dropped as well.
pub fn served_path_for(path: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => {
                segments.push(encode_segment(&segment.to_string_lossy()));
            }
            // Clients clamp `..` at the root, so an unmatched one is dropped.
            Component::ParentDir => {
                segments.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    format!("/{}", segments.join("/"))
}

/// URL path for an explicitly configured file: `/` + its encoded base name.
pub fn served_path_for_explicit(path: &Path) -> String {
    match path.file_name() {
        Some(name) => format!("/{}", encode_segment(&name.to_string_lossy())),
        None => served_path_for(path),
    }
}

/// Decode a request path for comparison with a served path.
pub fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path).decode_utf8_lossy()
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
