//! Test utilities and common setup.

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use tempfile::TempDir;
use tower::ServiceExt;

use multiserve::{AppState, Config, routes};

/// Build the full router over the given configuration.
pub fn test_app(config: Config) -> Router {
    routes::serve_routes().with_state(AppState::new(config))
}

/// Config serving the given temp directories in order.
pub fn config_for(roots: &[&TempDir]) -> Config {
    Config {
        roots: roots.iter().map(|dir| dir.path().to_path_buf()).collect(),
        ..Config::default()
    }
}

/// Write a file under `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Send a request with a browser-like Accept header.
pub async fn send(app: &Router, method: Method, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .method(method)
                .header("accept", "text/html,application/xhtml+xml,*/*;q=0.8")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn body_string(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Extract every `href` value from a rendered listing, in document order.
pub fn hrefs(html: &str) -> Vec<String> {
    html.split("href=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(|href| href.replace("&amp;", "&"))
        .collect()
}
