//! File browsing endpoints.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::github::models::{FileContent, FileEntry};
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::extract::RepoConnection;

/// Query parameters for file listing and content endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FilesQuery {
    /// Repository-relative path; defaults to the repository root.
    pub path: Option<String>,
}

/// File listing response.
#[derive(Debug, Serialize)]
pub struct FilesResponse {
    /// Entries at the requested path.
    pub files: Vec<FileEntry>,
}

/// Lists files and directories at the requested path.
///
/// # Errors
///
/// Returns 401 without a connection header and mapped upstream statuses on
/// gateway failures.
pub async fn list_files(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Query(query): Query<FilesQuery>,
) -> Result<Json<FilesResponse>, ApiError> {
    let gateway = state.gateway(&connection)?;
    let files = gateway
        .list_files(query.path.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(FilesResponse { files }))
}

/// Fetches the decoded content of a single file.
///
/// # Errors
///
/// Returns 400 when `path` is missing, 401 without a connection header,
/// 404 when the path does not exist, and mapped upstream statuses
/// otherwise.
pub async fn file_content(
    State(state): State<AppState>,
    RepoConnection(connection): RepoConnection,
    Query(query): Query<FilesQuery>,
) -> Result<Json<FileContent>, ApiError> {
    let path = query
        .path
        .as_deref()
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .ok_or_else(|| ApiError::from(ServiceError::missing_field("path")))?;

    let gateway = state.gateway(&connection)?;
    let content = gateway.file_content(path).await?;
    Ok(Json(content))
}
