//! HTTP file server that overlays several directory roots into one tree.
//!
//! Each request path is looked up in every configured root in priority
//! order. The first regular file (or `index.html`) wins; otherwise, for
//! directory requests, the listings of all roots are merged into a single
//! HTML page. A configured fallback file catches everything else.

pub mod config;
pub mod error;
pub mod handlers;
pub mod resolver;
pub mod routes;

use std::sync::Arc;

pub use config::Config;
pub use error::ServeError;
pub use resolver::{Resolution, Resolver};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable resolver built from the startup configuration
    pub resolver: Arc<Resolver>,
}

impl AppState {
    /// Create a new AppState from a configuration.
    pub fn new(config: Config) -> Self {
        Self {
            resolver: Arc::new(Resolver::new(config)),
        }
    }
}
