//! The demo application and middleware assembly.

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http::{header, Request, Response, StatusCode};
use http_body_util::Full;

use scalar_docs::{DocsConfig, OsFs, ScalarDocsLayer, SpecFs};

use crate::config::ServerConfig;

/// Fallback application behind the docs middleware.
///
/// Answers `/hello-world` and 404s everything else.
pub async fn hello_world<B>(req: Request<B>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (status, body) = if req.uri().path() == "/hello-world" {
        (StatusCode::OK, "Hello, world from the main application!\n")
    } else {
        (StatusCode::NOT_FOUND, "404 page not found\n")
    };

    let mut response = Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    Ok(response)
}

/// Filesystem for spec discovery, honoring the configured root.
pub fn spec_fs(config: &ServerConfig) -> Arc<dyn SpecFs> {
    match &config.root {
        Some(root) => Arc::new(OsFs::with_root(root)),
        None => Arc::new(OsFs::new()),
    }
}

/// Build the docs middleware for `config`.
///
/// In auto mode the default directories are walked for the first valid spec
/// and the configured docs path is kept. Discovery itself runs later, on the
/// blocking pool.
pub fn build_layer(config: &ServerConfig) -> ScalarDocsLayer {
    let fs = spec_fs(config);

    if config.auto {
        let docs = DocsConfig::auto().with_docs_path(config.docs.docs_path.clone());
        return ScalarDocsLayer::auto_with_fs(docs, fs);
    }
    ScalarDocsLayer::with_fs(config.docs.clone(), fs)
}
