//! Tower middleware wiring.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{Request, Response};
use tower::{Layer, Service};

use crate::config::DocsConfig;
use crate::dispatch::{route, Route};
use crate::fs::{OsFs, SpecFs};
use crate::init::Initializer;
use crate::resolver::InitOutcome;

/// A tower [`Layer`] that serves the docs UI and spec files in front of the
/// wrapped service.
///
/// Each layer owns its own [`Initializer`]; services produced by the same
/// layer (and its clones) share one discovery outcome.
#[derive(Debug, Clone)]
pub struct ScalarDocsLayer {
    init: Arc<Initializer>,
}

impl ScalarDocsLayer {
    /// Discover specs on the real filesystem, relative to the working
    /// directory.
    pub fn new(config: DocsConfig) -> Self {
        Self::with_fs(config, Arc::new(OsFs::new()))
    }

    /// Discover specs through a custom filesystem.
    pub fn with_fs(config: DocsConfig, fs: Arc<dyn SpecFs>) -> Self {
        Self {
            init: Arc::new(Initializer::new(config, fs)),
        }
    }

    /// Zero-config entry point: walk the default directories for the first
    /// valid spec file and serve it.
    pub fn auto() -> Self {
        Self::auto_with_fs(DocsConfig::auto(), Arc::new(OsFs::new()))
    }

    /// Auto-discovery below `config.search_dirs` through a custom
    /// filesystem. The walk runs with the first request (or
    /// [`ScalarDocsLayer::warm_up`]), like search mode.
    pub fn auto_with_fs(config: DocsConfig, fs: Arc<dyn SpecFs>) -> Self {
        Self {
            init: Arc::new(Initializer::auto(config, fs)),
        }
    }

    /// Run discovery now instead of on the first request.
    pub fn warm_up(self) -> Self {
        self.init.outcome_blocking();
        self
    }

    /// The outcome, running discovery first if needed.
    pub fn outcome(&self) -> Arc<InitOutcome> {
        self.init.outcome_blocking()
    }

    pub fn initializer(&self) -> &Arc<Initializer> {
        &self.init
    }
}

impl<S> Layer<S> for ScalarDocsLayer {
    type Service = ScalarDocs<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ScalarDocs {
            inner,
            init: Arc::clone(&self.init),
        }
    }
}

/// The middleware service produced by [`ScalarDocsLayer`].
#[derive(Debug, Clone)]
pub struct ScalarDocs<S> {
    inner: S,
    init: Arc<Initializer>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for ScalarDocs<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: From<Bytes> + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // Keep the service that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let init = Arc::clone(&self.init);

        Box::pin(async move {
            let outcome = init.outcome().await;
            match route(&outcome, &init.config().docs_path, req.uri().path()) {
                Route::Respond(response) => Ok(response.map(ResBody::from)),
                Route::Next => inner.call(req).await,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    use http::{header::CONTENT_TYPE, StatusCode};
    use http_body_util::{BodyExt, Full};
    use tower::ServiceExt;

    use crate::fs::MemoryFs;

    const MINIMAL_JSON: &str = r#"{"openapi":"3.0.0","info":{"title":"x"},"paths":{}}"#;

    type Body = Full<Bytes>;

    async fn app(req: Request<Body>) -> Result<Response<Body>, Infallible> {
        let body = format!("app saw {}", req.uri().path());
        Ok(Response::builder()
            .status(StatusCode::IM_A_TEAPOT)
            .body(Full::new(Bytes::from(body)))
            .unwrap())
    }

    fn service(
        layer: &ScalarDocsLayer,
    ) -> impl Service<Request<Body>, Response = Response<Body>, Error = Infallible, Future = impl Send>
           + Clone
           + Send
           + 'static {
        layer.layer(tower::service_fn(app))
    }

    fn get(path: &str) -> Request<Body> {
        Request::get(path).body(Full::new(Bytes::new())).unwrap()
    }

    async fn body_string(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn fixture() -> Arc<MemoryFs> {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("api/openapi.json", MINIMAL_JSON);
        fs
    }

    #[tokio::test]
    async fn serves_docs_and_spec() {
        let layer = ScalarDocsLayer::with_fs(DocsConfig::default(), fixture());
        let svc = service(&layer);

        let resp = svc.clone().oneshot(get("/scalar")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        assert!(body_string(resp).await.contains(r#"data-url="/api/openapi.json""#));

        let resp = svc.clone().oneshot(get("/api/openapi.json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json; charset=utf-8");
        assert_eq!(body_string(resp).await, MINIMAL_JSON);
    }

    #[tokio::test]
    async fn other_requests_reach_inner_service() {
        let layer = ScalarDocsLayer::with_fs(DocsConfig::default(), fixture());

        let resp = service(&layer).oneshot(get("/unrelated")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(body_string(resp).await, "app saw /unrelated");
    }

    #[tokio::test]
    async fn failure_does_not_break_the_app() {
        let fs = Arc::new(MemoryFs::new());
        let layer = ScalarDocsLayer::with_fs(DocsConfig::default(), fs);
        let svc = service(&layer);

        let resp = svc.clone().oneshot(get("/scalar")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(resp).await.starts_with("Scalar UI unavailable: "));

        let resp = svc.clone().oneshot(get("/hello-world")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn custom_docs_path() {
        let config = DocsConfig::default().with_docs_path("/api-docs");
        let layer = ScalarDocsLayer::with_fs(config, fixture());
        let svc = service(&layer);

        let resp = svc.clone().oneshot(get("/api-docs")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = svc.clone().oneshot(get("/scalar")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_requests_discover_once() {
        let fs = fixture();
        let layer = ScalarDocsLayer::with_fs(DocsConfig::default(), fs.clone());
        let svc = service(&layer);

        let tasks: Vec<_> = (0..24)
            .map(|i| {
                let svc = svc.clone();
                let path = if i % 2 == 0 { "/scalar" } else { "/api/openapi.json" };
                tokio::spawn(async move { svc.oneshot(get(path)).await.unwrap().status() })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::OK);
        }
        assert_eq!(fs.read_count(), 7);
    }

    #[tokio::test]
    async fn warm_up_runs_discovery_eagerly() {
        let fs = fixture();
        let layer = ScalarDocsLayer::with_fs(DocsConfig::default(), fs.clone()).warm_up();
        assert!(layer.initializer().get().is_some());
        let reads = fs.read_count();

        service(&layer).oneshot(get("/scalar")).await.unwrap();
        assert_eq!(fs.read_count(), reads);
    }

    #[tokio::test]
    async fn separate_layers_do_not_share_outcomes() {
        let fs = fixture();
        let first = ScalarDocsLayer::with_fs(DocsConfig::default(), fs.clone()).warm_up();

        fs.insert("openapi.yaml", "openapi: 3.0.0\ninfo: {}\npaths: {}\n");
        let second = ScalarDocsLayer::with_fs(DocsConfig::default(), fs).warm_up();

        assert_eq!(first.outcome().bundle().unwrap().primary_url, "/api/openapi.json");
        assert_eq!(second.outcome().bundle().unwrap().primary_url, "/openapi.yaml");
    }

    #[tokio::test]
    async fn auto_layer_serves_first_valid_file() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("docs/notes.json", r#"{"not":"a spec"}"#)
            .insert("docs/v1/petstore.json", MINIMAL_JSON);

        let layer = ScalarDocsLayer::auto_with_fs(DocsConfig::auto(), fs.clone());
        assert_eq!(fs.read_count(), 0);
        let svc = service(&layer);

        let resp = svc.clone().oneshot(get("/scalar")).await.unwrap();
        assert!(body_string(resp).await.contains(r#"data-url="/petstore.json""#));

        let resp = svc.clone().oneshot(get("/petstore.json")).await.unwrap();
        assert_eq!(body_string(resp).await, MINIMAL_JSON);
    }

    #[tokio::test]
    async fn auto_layer_never_serves_rejected_files() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("api/openapi.json", r#"{"port":8080}"#);

        let layer = ScalarDocsLayer::auto_with_fs(DocsConfig::auto(), fs);
        let svc = service(&layer);

        let resp = svc.clone().oneshot(get("/scalar")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = svc.clone().oneshot(get("/api/openapi.json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn directory_with_space_is_reachable() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("my docs/openapi.json", MINIMAL_JSON);
        let config = DocsConfig::new().with_search_dirs(["my docs"]);
        let svc = service(&ScalarDocsLayer::with_fs(config, fs));

        let resp = svc.clone().oneshot(get("/scalar")).await.unwrap();
        assert!(body_string(resp).await.contains(r#"data-url="/my%20docs/openapi.json""#));

        let resp = svc.clone().oneshot(get("/my%20docs/openapi.json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, MINIMAL_JSON);
    }

    #[tokio::test]
    async fn non_ascii_explicit_name_is_reachable() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("spec/api-\u{fc}.json", MINIMAL_JSON);
        let config = DocsConfig::new().with_json_spec("spec/api-\u{fc}.json");
        let svc = service(&ScalarDocsLayer::with_fs(config, fs));

        let resp = svc.clone().oneshot(get("/scalar")).await.unwrap();
        assert!(body_string(resp).await.contains(r#"data-url="/api-%C3%BC.json""#));

        let resp = svc.clone().oneshot(get("/api-%C3%BC.json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json; charset=utf-8");
    }
}
