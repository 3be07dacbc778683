use std::path::Path;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, Method, header, request::Parts},
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error};

use crate::AppState;
use crate::error::ServeError;
use crate::resolver::{Resolution, display_path, render_listing};

// ============================================================================
// Helper functions
// ============================================================================

/// Whether the client will take an HTML response.
///
/// A missing `Accept` header accepts anything. Otherwise one of `text/html`,
/// `text/*` or `*/*` must be listed without `q=0`.
fn accepts_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT) else {
        return true;
    };
    let Ok(accept) = accept.to_str() else {
        return false;
    };

    accept.split(',').any(|range| {
        let mut params = range.split(';');
        let media = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        let refused = params.any(|param| {
            param
                .trim()
                .strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .is_some_and(|q| q <= 0.0)
        });
        !refused && matches!(media.as_str(), "text/html" | "text/*" | "*/*")
    })
}

/// Hand a file to the content-serving primitive.
///
/// `ServeFile` takes care of content type, `Last-Modified`, conditional
/// requests and ranges, and owns the file handle until the body is done.
async fn serve_file(mut parts: Parts, path: &Path) -> Response {
    if parts.method != Method::HEAD {
        parts.method = Method::GET;
    }
    let request = Request::from_parts(parts, Body::empty());

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Any method, any path - resolve against the configured roots
pub async fn serve_request(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, ServeError> {
    let (parts, _body) = request.into_parts();

    // Segments are decoded by the resolver, one at a time
    let raw_path = parts.uri.path().to_string();
    let request_path = display_path(&raw_path);
    let accepts_html = accepts_html(&parts.headers);

    debug!(
        "{} {} (accepts html: {})",
        parts.method, request_path, accepts_html
    );

    let resolver = state.resolver.clone();
    let resolution = tokio::task::spawn_blocking(move || {
        resolver.resolve(&raw_path, accepts_html)
    })
    .await
    .map_err(|err| {
        error!("Resolution task failed for {}: {}", request_path, err);
        ServeError::Io(std::io::Error::other(err.to_string()))
    })??;

    match resolution {
        Resolution::File(path) | Resolution::Fallback(path) => {
            Ok(serve_file(parts, &path).await)
        }
        Resolution::Listing(listing) => Ok(Html(render_listing(&listing)).into_response()),
        Resolution::NotFound => Err(ServeError::NotFound(request_path)),
    }
}
