use std::borrow::Cow;
use std::ffi::OsStr;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::INDEX_FILE;

/// Percent-decode one raw path segment to the bytes of a file name.
pub(crate) fn decode_segment(raw: &str) -> Cow<'_, [u8]> {
    urlencoding::decode_binary(raw.as_bytes())
}

/// Human-readable form of a raw request path, for titles and log lines.
pub fn display_path(request_path: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(request_path.as_bytes())).into_owned()
}

/// File name bytes as an `OsStr`. Unix names are arbitrary bytes; elsewhere
/// they must be UTF-8.
#[cfg(unix)]
fn segment_os_str(bytes: &[u8]) -> Option<&OsStr> {
    Some(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn segment_os_str(bytes: &[u8]) -> Option<&OsStr> {
    std::str::from_utf8(bytes).ok().map(OsStr::new)
}

/// Raw bytes of a directory entry name, the inverse of [`segment_os_str`].
#[cfg(unix)]
pub(crate) fn name_bytes(name: &OsStr) -> Option<&[u8]> {
    Some(name.as_bytes())
}

#[cfg(not(unix))]
pub(crate) fn name_bytes(name: &OsStr) -> Option<&[u8]> {
    name.to_str().map(str::as_bytes)
}

/// Join a raw request path onto a root, one decoded segment at a time.
///
/// Empty and `.` segments are skipped. Returns `None` when a segment is
/// anything other than a plain name (including one carrying an encoded
/// `/`), in which case the root contributes nothing for this request.
pub(crate) fn candidate_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut result = root.to_path_buf();

    for raw in request_path.split('/') {
        let decoded = decode_segment(raw);
        if decoded.contains(&b'/') {
            debug!("Encoded separator in segment {:?}", raw);
            return None;
        }
        let segment = segment_os_str(&decoded)?;

        for component in Path::new(segment).components() {
            match component {
                Component::Normal(name) => result.push(name),
                Component::CurDir => continue,
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    debug!("Unusable path segment {:?} under {}", raw, root.display());
                    return None;
                }
            }
        }
    }

    Some(result)
}

/// Whether `path` names an existing regular file. Any stat failure is absence.
pub(crate) fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Find the first root holding `request_path` as a file, or as a directory
/// with an `index.html` inside it.
pub(crate) fn locate_file(roots: &[PathBuf], request_path: &str) -> Option<PathBuf> {
    roots.iter().find_map(|root| {
        let candidate = candidate_path(root, request_path)?;
        if is_regular_file(&candidate) {
            return Some(candidate);
        }

        let index = candidate.join(INDEX_FILE);
        if is_regular_file(&index) {
            return Some(index);
        }

        debug!("{} not found in {}", request_path, root.display());
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_path_joins_segments() {
        let root = PathBuf::from("/srv/site");

        assert_eq!(
            candidate_path(&root, "/docs/guide.html"),
            Some(root.join("docs").join("guide.html"))
        );
        assert_eq!(candidate_path(&root, "/"), Some(root.clone()));
        assert_eq!(candidate_path(&root, ""), Some(root.clone()));
        assert_eq!(
            candidate_path(&root, "//docs/./guide/"),
            Some(root.join("docs").join("guide"))
        );
    }

    #[test]
    fn test_candidate_path_decodes_each_segment() {
        let root = PathBuf::from("/srv/site");

        assert_eq!(
            candidate_path(&root, "/my%20docs/a%26b.txt"),
            Some(root.join("my docs").join("a&b.txt"))
        );
        // An encoded slash never becomes a separator
        assert_eq!(candidate_path(&root, "/a%2Fb"), None);
        assert_eq!(candidate_path(&root, "/a%2fb"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_candidate_path_keeps_non_utf8_bytes() {
        let root = PathBuf::from("/srv/site");
        let expected = root.join(OsStr::from_bytes(b"caf\xe9.txt"));

        assert_eq!(candidate_path(&root, "/caf%E9.txt"), Some(expected));
        assert_eq!(name_bytes(OsStr::from_bytes(b"caf\xe9.txt")), Some(&b"caf\xe9.txt"[..]));
    }

    #[test]
    fn test_candidate_path_refuses_parent_components() {
        let root = PathBuf::from("/srv/site");
        assert_eq!(candidate_path(&root, "/docs/../secret"), None);
    }

    #[test]
    fn test_first_root_with_file_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(first.path().join("x.txt"), "first").unwrap();
        std::fs::write(second.path().join("x.txt"), "second").unwrap();

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            locate_file(&roots, "/x.txt"),
            Some(first.path().join("x.txt"))
        );
    }

    #[test]
    fn test_absent_in_first_root_falls_through() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(second.path().join("x.txt"), "second").unwrap();

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            locate_file(&roots, "/x.txt"),
            Some(second.path().join("x.txt"))
        );
    }

    #[test]
    fn test_stat_error_in_first_root_falls_through() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        // `d` is a plain file here, so stat of `d/x` fails with ENOTDIR
        std::fs::write(first.path().join("d"), "not a directory").unwrap();
        std::fs::create_dir_all(second.path().join("d")).unwrap();
        std::fs::write(second.path().join("d/x"), "second").unwrap();

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            locate_file(&roots, "/d/x"),
            Some(second.path().join("d").join("x"))
        );
    }

    #[test]
    fn test_directory_index_is_located() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("docs")).unwrap();
        std::fs::write(root.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();

        let roots = vec![root.path().to_path_buf()];
        let expected = Some(root.path().join("docs").join(INDEX_FILE));
        assert_eq!(locate_file(&roots, "/docs/"), expected);
        assert_eq!(locate_file(&roots, "/docs"), expected);
    }

    #[test]
    fn test_directory_without_index_is_not_a_file() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("docs")).unwrap();

        let roots = vec![root.path().to_path_buf()];
        assert_eq!(locate_file(&roots, "/docs/"), None);
    }

    #[test]
    fn test_earlier_index_beats_later_file() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::create_dir_all(first.path().join("page")).unwrap();
        std::fs::write(first.path().join("page/index.html"), "index").unwrap();
        std::fs::write(second.path().join("page"), "plain file").unwrap();

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            locate_file(&roots, "/page"),
            Some(first.path().join("page").join(INDEX_FILE))
        );
    }

    #[test]
    fn test_missing_roots_are_absence() {
        let roots = vec![PathBuf::from("/definitely/not/a/real/root")];
        assert_eq!(locate_file(&roots, "/x.txt"), None);
        assert!(!is_regular_file(Path::new("/definitely/not/a/real/root")));
    }
}
