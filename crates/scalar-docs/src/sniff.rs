//! Lightweight OpenAPI content sniffing.
//!
//! This is not a parser or validator. JSON documents are checked for the
//! top-level keys every OpenAPI/Swagger document carries; YAML documents
//! are only searched for the key markers as substrings, so a YAML file
//! that mentions `openapi:`, `info:` and `paths:` anywhere (even in a
//! comment) is accepted, and a document with quoted keys
//! (`"openapi": 3.0.0`) is rejected.

use std::fmt;
use std::path::Path;

use serde_json::Value;

/// Serialization format of a spec file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Detect the format from a file extension (`.json`, `.yaml`, `.yml`,
    /// case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// `Content-Type` used when serving a file of this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json; charset=utf-8",
            Self::Yaml => "text/yaml; charset=utf-8",
        }
    }
}

impl fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

/// Check whether `content` plausibly is an OpenAPI document.
///
/// Never fails: unparseable content is simply `false`.
pub fn looks_like_openapi(content: &[u8], format: SpecFormat) -> bool {
    match format {
        SpecFormat::Json => json_looks_like_openapi(content),
        SpecFormat::Yaml => yaml_looks_like_openapi(content),
    }
}

fn json_looks_like_openapi(content: &[u8]) -> bool {
    let Ok(Value::Object(root)) = serde_json::from_slice::<Value>(content) else {
        return false;
    };

    let has_version = root.contains_key("openapi") || root.contains_key("swagger");
    let has_info = root.get("info").is_some_and(Value::is_object);
    let has_paths = root.contains_key("paths");

    has_version && has_info && has_paths
}

fn yaml_looks_like_openapi(content: &[u8]) -> bool {
    let text = String::from_utf8_lossy(content);

    let has_version = text.contains("openapi:") || text.contains("swagger:");
    has_version && text.contains("info:") && text.contains("paths:")
}
