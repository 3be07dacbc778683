use axum::Router;

use crate::AppState;
use crate::handlers;

/// Create the file serving routes.
///
/// A single catch-all handler receives every path and method.
pub fn serve_routes() -> Router<AppState> {
    Router::new().fallback(handlers::serve_request)
}
