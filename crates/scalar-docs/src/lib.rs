//! Scalar API reference middleware.
//!
//! Wraps an existing tower service and serves an interactive API reference
//! UI under a docs path prefix (default `/scalar`), together with the raw
//! OpenAPI spec file(s) it points at. Every other request goes to the
//! wrapped service untouched.
//!
//! The OpenAPI spec is located once per middleware instance: either from explicit
//! file paths, or by probing a list of search directories for
//! `openapi.yaml` / `openapi.yml` / `openapi.json`. The outcome (success or
//! failure) is cached for the lifetime of the [`ScalarDocsLayer`].
//!
//! # Usage
//!
//! ```ignore
//! use scalar_docs::{DocsConfig, ScalarDocsLayer};
//! use tower::Layer;
//!
//! let layer = ScalarDocsLayer::new(DocsConfig::default().with_docs_path("/docs"));
//! let service = layer.layer(my_app);
//! ```

pub mod auto;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fs;
pub mod html;
pub mod init;
pub mod layer;
pub mod probe;
pub mod resolver;
pub mod sniff;

pub use auto::{AutoDiscovery, SelectedSpec};
pub use config::{DocsConfig, DEFAULT_DOCS_PATH};
pub use error::DiscoveryError;
pub use fs::{MemoryFs, OsFs, SpecFs};
pub use init::{DiscoveryMode, InitState, Initializer};
pub use layer::{ScalarDocs, ScalarDocsLayer};
pub use resolver::{resolve, DiscoveredSpec, DocsBundle, InitOutcome};
pub use sniff::{looks_like_openapi, SpecFormat};
