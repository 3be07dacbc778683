use tracing::warn;

use crate::error::ServeError;

/// Reject request paths that contain a standalone `..` segment.
///
/// Takes the raw (percent-encoded) URI path. Each segment is decoded before
/// the check, and both `/` and `\` count as separators inside the decoded
/// bytes, so neither `%2e%2e` nor mixed-separator input can smuggle a parent
/// reference past it. `..` inside a longer name (`a..b`, `..hidden`) is a
/// legitimate filename and is accepted.
pub fn validate_request_path(request_path: &str) -> Result<(), ServeError> {
    let traversal = request_path.split('/').any(|raw| {
        urlencoding::decode_binary(raw.as_bytes())
            .split(|byte| *byte == b'/' || *byte == b'\\')
            .any(|segment| segment == b"..")
    });

    if traversal {
        warn!("Path traversal attempt rejected: {:?}", request_path);
        return Err(ServeError::PathTraversal);
    }
    Ok(())
}
