//! Request path resolution across an ordered list of roots.
//!
//! Resolution runs as a fixed chain, each stage consulted only when the
//! previous one came up empty:
//!
//! 1. validate the path (`..` segments are rejected outright)
//! 2. locate a regular file, or a directory's `index.html`, in the first
//!    root that has one
//! 3. for `/dir/` requests from HTML clients, merge the directory listings
//!    of every root
//! 4. the configured fallback file
//! 5. not found
//!
//! Filesystem errors never escape the chain; they count as absence and move
//! resolution on to the next stage.
//!
//! Request paths are taken raw, as they appear in the URI. Each `/`-separated
//! segment is percent-decoded on its own into file name bytes, so an encoded
//! `%2F` never acts as a separator and non-UTF-8 names round-trip.

mod listing;
mod locate;
mod render;
mod validate;

use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::error::ServeError;

pub use listing::{DirEntry, MergedListing, RootListing};
pub use locate::display_path;
pub use render::{escape_html, render_listing};
pub use validate::validate_request_path;

/// Name served when a request path resolves to a directory
pub const INDEX_FILE: &str = "index.html";

/// Terminal outcome of resolving one request
#[derive(Debug)]
pub enum Resolution {
    /// A file located in one of the roots
    File(PathBuf),
    /// Merged directory listing
    Listing(MergedListing),
    /// The configured fallback file
    Fallback(PathBuf),
    NotFound,
}

/// Immutable resolver shared by all requests
#[derive(Debug, Clone)]
pub struct Resolver {
    roots: Vec<PathBuf>,
    fallback: Option<PathBuf>,
    listing: bool,
}

impl Resolver {
    pub fn new(config: Config) -> Self {
        Self {
            roots: config.normalized_roots(),
            fallback: config.fallback,
            listing: config.listing,
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn fallback(&self) -> Option<&PathBuf> {
        self.fallback.as_ref()
    }

    pub fn listing_enabled(&self) -> bool {
        self.listing
    }

    /// Resolve a raw (percent-encoded) request path. Blocks on filesystem calls.
    ///
    /// `accepts_html` gates directory listings; the only error returned is
    /// [`ServeError::PathTraversal`].
    pub fn resolve(&self, request_path: &str, accepts_html: bool) -> Result<Resolution, ServeError> {
        validate_request_path(request_path)?;

        if let Some(path) = locate::locate_file(&self.roots, request_path) {
            debug!("{} -> file {}", request_path, path.display());
            return Ok(Resolution::File(path));
        }

        let listing = self
            .wants_listing(request_path, accepts_html)
            .then(|| listing::aggregate(&self.roots, request_path))
            .flatten();
        if let Some(listing) = listing {
            debug!(
                "{} -> listing from {} root(s)",
                request_path,
                listing.roots.len()
            );
            return Ok(Resolution::Listing(listing));
        }

        if let Some(fallback) = self
            .fallback
            .as_ref()
            .filter(|path| locate::is_regular_file(path))
        {
            debug!("{} -> fallback {}", request_path, fallback.display());
            return Ok(Resolution::Fallback(fallback.clone()));
        }

        debug!("{} -> not found", request_path);
        Ok(Resolution::NotFound)
    }

    fn wants_listing(&self, request_path: &str, accepts_html: bool) -> bool {
        self.listing && accepts_html && request_path.ends_with('/')
    }
}
