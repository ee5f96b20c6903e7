//! Decoding helpers for the contents API.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::ServiceError;
use crate::github::models::{ApiContentEntry, FileContent};

/// Converts a contents API entry into decoded file content.
///
/// The contents API returns file bodies base64-encoded with embedded line
/// breaks; directories and non-file entries are rejected before decoding.
pub(super) fn decode_file_content(entry: ApiContentEntry) -> Result<FileContent, ServiceError> {
    if entry.kind != "file" {
        return Err(ServiceError::Validation {
            message: format!("path is a {kind}, not a file", kind = entry.kind),
        });
    }

    let encoded = entry.content.ok_or_else(|| ServiceError::Upstream {
        message: format!(
            "file content missing from response for `{path}`",
            path = entry.path
        ),
    })?;

    let compact: String = encoded
        .chars()
        .filter(|character| !character.is_ascii_whitespace())
        .collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|error| ServiceError::Upstream {
            message: format!("failed to decode file content: {error}"),
        })?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    Ok(FileContent {
        path: entry.path,
        content,
        size: entry.size,
        sha: entry.sha,
        url: entry.html_url,
    })
}
