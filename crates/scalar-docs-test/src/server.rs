//! TestServer: full-stack integration test harness.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use hyper::body::Incoming;
use tempfile::TempDir;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::Layer;

use scalar_docs::DocsConfig;
use scalar_docs_server::app::{build_layer, hello_world};
use scalar_docs_server::server::serve;
use scalar_docs_server::ServerConfig;

/// Errors from TestServer operations.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server failed to start: {0}")]
    StartupFailed(String),
}

/// A throwaway project directory holding spec files.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self, TestError> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, content: &str) -> Result<&Self, TestError> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Server config rooted at this project.
    pub fn config(&self, docs: DocsConfig) -> ServerConfig {
        ServerConfig {
            root: Some(self.path().to_path_buf()),
            docs,
            ..Default::default()
        }
    }
}

/// Full-stack test harness.
///
/// Runs the demo application behind the docs middleware on a random local
/// port and provides HTTP request helpers. The server stops on drop.
pub struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Serve `project` with the given docs settings.
    pub async fn start(project: &TestProject, docs: DocsConfig) -> Result<Self, TestError> {
        Self::from_config(project.config(docs)).await
    }

    /// Serve `project` in auto-discovery mode.
    pub async fn start_auto(project: &TestProject) -> Result<Self, TestError> {
        let mut config = project.config(DocsConfig::default());
        config.auto = true;
        Self::from_config(config).await
    }

    /// Serve with a fully specified config. `listen` is ignored.
    pub async fn from_config(config: ServerConfig) -> Result<Self, TestError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let service = build_layer(&config).layer(tower::service_fn(hello_world::<Incoming>));
        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(serve(listener, service, async {
            let _ = rx.await;
        }));

        let server = TestServer {
            addr,
            client: reqwest::Client::new(),
            shutdown: Some(tx),
            task,
        };
        server.wait_for_ready().await?;
        Ok(server)
    }

    /// Poll the fallback route until the server answers.
    async fn wait_for_ready(&self) -> Result<(), TestError> {
        let url = format!("{}/hello-world", self.base_url());
        let max_attempts = 50;
        let delay = Duration::from_millis(20);

        for _ in 0..max_attempts {
            if let Ok(resp) = self.client.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }

            if self.task.is_finished() {
                return Err(TestError::StartupFailed("accept loop exited".to_string()));
            }

            tokio::time::sleep(delay).await;
        }

        Err(TestError::StartupFailed(
            "server did not become ready in time".to_string(),
        ))
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port())
    }

    /// Make a GET request to the given path.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, TestError> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a request with any method.
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::Response, TestError> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.request(method, &url).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task.abort();
    }
}
