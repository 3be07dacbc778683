use std::path::{Path, PathBuf};

use tracing::debug;

use super::locate::{candidate_path, decode_segment, display_path, name_bytes};

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Display name, with a trailing `/` for directories
    pub name: String,
    pub is_dir: bool,
    /// Percent-encoded href resolving back to this entry
    pub link: String,
}

impl DirEntry {
    fn parent() -> Self {
        Self {
            name: "../".to_string(),
            is_dir: true,
            link: "../".to_string(),
        }
    }

    /// `display_name` is only shown; the link is built from the raw name bytes.
    fn new(base_link: &str, display_name: &str, raw_name: &[u8], is_dir: bool) -> Self {
        let mut name = display_name.to_string();
        let mut link = format!("{}{}", base_link, urlencoding::encode_binary(raw_name));
        if is_dir {
            name.push('/');
            link.push('/');
        }
        Self { name, is_dir, link }
    }
}

/// Entries contributed by a single root
#[derive(Debug, Clone)]
pub struct RootListing {
    pub root: PathBuf,
    pub entries: Vec<DirEntry>,
}

/// Listings of every root that has the requested directory, in root order
#[derive(Debug, Clone)]
pub struct MergedListing {
    /// Decoded request path, for display
    pub request_path: String,
    pub roots: Vec<RootListing>,
}

/// Whether the request path names the top of the merged namespace
pub(crate) fn is_namespace_root(request_path: &str) -> bool {
    request_path.split('/').all(str::is_empty)
}

/// Re-encode each segment of a raw request path in canonical form, keeping
/// separators.
fn encode_request_path(request_path: &str) -> String {
    let mut encoded = request_path
        .split('/')
        .map(|raw| urlencoding::encode_binary(&decode_segment(raw)).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    if !encoded.ends_with('/') {
        encoded.push('/');
    }
    encoded
}

/// Read one root's copy of the requested directory.
fn read_root(root: &Path, request_path: &str, base_link: &str) -> Option<RootListing> {
    let dir = candidate_path(root, request_path)?;

    let read_dir = match std::fs::read_dir(&dir) {
        Ok(read_dir) => read_dir,
        Err(err) => {
            debug!("No listing for {} in {}: {}", request_path, root.display(), err);
            return None;
        }
    };

    let mut entries = Vec::new();
    if !is_namespace_root(request_path) {
        entries.push(DirEntry::parent());
    }

    for entry in read_dir.flatten() {
        let file_name = entry.file_name();
        let Some(raw_name) = name_bytes(&file_name) else {
            debug!("Skipping entry with unrepresentable name {:?}", file_name);
            continue;
        };
        // Follow symlinks so a linked directory lists (and links) as a directory
        let is_dir = std::fs::metadata(entry.path())
            .map(|metadata| metadata.is_dir())
            .or_else(|_| entry.file_type().map(|file_type| file_type.is_dir()))
            .unwrap_or(false);
        entries.push(DirEntry::new(
            base_link,
            &file_name.to_string_lossy(),
            raw_name,
            is_dir,
        ));
    }

    Some(RootListing {
        root: root.to_path_buf(),
        entries,
    })
}

/// Merge the listings of `request_path` across all roots.
///
/// Roots that lack the directory, or cannot read it, are skipped. Returns
/// `None` when no root contributed.
pub(crate) fn aggregate(roots: &[PathBuf], request_path: &str) -> Option<MergedListing> {
    let base_link = encode_request_path(request_path);

    let listings: Vec<RootListing> = roots
        .iter()
        .filter_map(|root| read_root(root, request_path, &base_link))
        .collect();

    if listings.is_empty() {
        return None;
    }

    Some(MergedListing {
        request_path: display_path(request_path),
        roots: listings,
    })
}
