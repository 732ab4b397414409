//! Per-request routing against a completed [`InitOutcome`].

use bytes::Bytes;
use http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderValue, Response, StatusCode};

use crate::resolver::InitOutcome;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// What to do with a request.
#[derive(Debug)]
pub enum Route {
    /// Answer directly.
    Respond(Response<Bytes>),
    /// Hand the request to the wrapped service.
    Next,
}

/// Decide how to answer a request for `path`.
///
/// Checks, in order: the docs path prefix, the JSON spec path, the YAML spec
/// path. Spec paths match exactly. A spec path that also starts with the docs
/// path is therefore answered with the docs page.
pub fn route(outcome: &InitOutcome, docs_path: &str, path: &str) -> Route {
    if path.starts_with(docs_path) {
        return Route::Respond(match outcome {
            InitOutcome::Ready(bundle) => {
                respond(StatusCode::OK, HTML_CONTENT_TYPE, Bytes::from(bundle.html.clone()))
            }
            InitOutcome::Failed(error) => text_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Scalar UI unavailable: {error}"),
            ),
        });
    }

    let Some(spec) = outcome.bundle().and_then(|bundle| bundle.spec_at(path)) else {
        return Route::Next;
    };

    if spec.content.is_empty() {
        return Route::Respond(text_error(StatusCode::NOT_FOUND, "404 page not found"));
    }

    Route::Respond(respond(
        StatusCode::OK,
        spec.format.content_type(),
        spec.content.clone(),
    ))
}

fn respond(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Bytes> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn text_error(status: StatusCode, message: &str) -> Response<Bytes> {
    let mut response = respond(status, TEXT_CONTENT_TYPE, Bytes::from(format!("{message}\n")));
    response
        .headers_mut()
        .insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}
