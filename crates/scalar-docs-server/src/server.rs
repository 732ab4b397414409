//! HTTP/1 accept loop.

use std::convert::Infallible;
use std::future::Future;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tower::{Service, ServiceExt};

use scalar_docs_telemetry::{log_request_served, log_shutdown};

/// Serve `service` on `listener` until `shutdown` resolves.
///
/// Each connection runs on its own task. Accept and connection errors are
/// logged and do not stop the loop.
pub async fn serve<S, F>(listener: TcpListener, service: S, shutdown: F)
where
    S: Service<Request<Incoming>, Response = Response<Full<Bytes>>, Error = Infallible>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            _ = &mut shutdown => {
                log_shutdown!("shutting down");
                return;
            }
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            },
        };

        let service = service.clone();
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            let handler = hyper::service::service_fn(move |req: Request<Incoming>| {
                let service = service.clone();
                let method = req.method().clone();
                let path = req.uri().path().to_string();
                async move {
                    let response = service.oneshot(req).await?;
                    log_request_served!(
                        method = %method,
                        path = %path,
                        status = response.status().as_u16()
                    );
                    Ok::<_, Infallible>(response)
                }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, handler).await {
                tracing::debug!(peer = %peer, error = %e, "connection error");
            }
        });
    }
}
