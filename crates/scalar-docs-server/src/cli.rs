//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "scalar-docs",
    about = "Serve a Scalar API reference next to your OpenAPI spec",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the demo server with the docs middleware in front of it.
    Serve(ServeArgs),

    /// Auto-discover spec files and report what was found.
    Discover {
        /// Directory to walk (repeatable). Defaults to api, doc, docs, openapi, .
        #[arg(long = "search-dir")]
        search_dirs: Vec<PathBuf>,

        /// Resolve relative paths against this directory.
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// YAML config file. Flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Listen address.
    #[arg(long, env = "SCALAR_DOCS_LISTEN")]
    pub listen: Option<String>,

    /// Explicit JSON spec file (disables directory search).
    #[arg(long, env = "SCALAR_DOCS_JSON_SPEC")]
    pub json_spec: Option<PathBuf>,

    /// Explicit YAML spec file (disables directory search).
    #[arg(long, env = "SCALAR_DOCS_YAML_SPEC")]
    pub yaml_spec: Option<PathBuf>,

    /// Search directory (repeatable), probed in the given order.
    #[arg(long = "search-dir")]
    pub search_dirs: Vec<PathBuf>,

    /// URL prefix of the docs UI.
    #[arg(long, env = "SCALAR_DOCS_PATH")]
    pub docs_path: Option<String>,

    /// Walk the default directories for the first valid spec file.
    #[arg(long)]
    pub auto: bool,

    /// Resolve relative paths against this directory.
    #[arg(long, env = "SCALAR_DOCS_ROOT")]
    pub root: Option<PathBuf>,

    /// Log level.
    #[arg(long, env = "SCALAR_DOCS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format (json or pretty).
    #[arg(long, env = "SCALAR_DOCS_LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl ServeArgs {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(path) = self.json_spec {
            config.docs.json_spec_path = Some(path);
        }
        if let Some(path) = self.yaml_spec {
            config.docs.yaml_spec_path = Some(path);
        }
        if !self.search_dirs.is_empty() {
            config.docs.search_dirs = self.search_dirs;
        }
        if let Some(docs_path) = self.docs_path {
            config.docs.docs_path = docs_path;
        }
        if self.auto {
            config.auto = true;
        }
        if let Some(root) = self.root {
            config.root = Some(root);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }
}
