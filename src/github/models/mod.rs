//! Data models representing normalized snapshots of GitHub resources.
//!
//! Types prefixed with `Api` are internal deserialisation targets for raw
//! GitHub responses; they convert into the public domain types, which never
//! leak upstream field names (`stargazers_count` becomes `stars`,
//! `html_url` becomes `url`). Domain types serialise with camelCase names
//! for the HTTP surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Normalized repository metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoInfo {
    /// Repository name.
    pub name: String,
    /// `owner/name` form.
    pub full_name: Option<String>,
    /// Repository description.
    pub description: Option<String>,
    /// Star count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Primary language.
    pub language: Option<String>,
    /// Repository topics.
    pub topics: Vec<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
    /// Default branch name.
    pub default_branch: Option<String>,
    /// Repository size in kilobytes.
    pub size: u64,
    /// Open issue count.
    pub open_issues: u64,
    /// Homepage URL if set.
    pub homepage: Option<String>,
    /// Licence name if detected.
    pub license: Option<String>,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Entry name.
    pub name: String,
    /// Repository-relative path.
    pub path: String,
    /// Entry kind (`file`, `dir`, `symlink`, `submodule`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Size in bytes; zero for directories.
    pub size: u64,
    /// Git object SHA.
    pub sha: String,
    /// HTML URL for displaying to a user.
    pub url: Option<String>,
}

/// Decoded contents of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    /// Repository-relative path.
    pub path: String,
    /// File content decoded from base64 to UTF-8.
    pub content: String,
    /// Size in bytes.
    pub size: u64,
    /// Git blob SHA.
    pub sha: String,
    /// HTML URL for displaying to a user.
    pub url: Option<String>,
}

/// Commit author identity with avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitAuthor {
    /// Author name from the commit.
    pub name: Option<String>,
    /// Author email from the commit.
    pub email: Option<String>,
    /// Author date (ISO 8601 format).
    pub date: Option<String>,
    /// Avatar URL of the associated GitHub account, if any.
    pub avatar: Option<String>,
}

/// Lightweight commit summary for listing views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    /// Commit SHA.
    pub sha: String,
    /// Full commit message.
    pub message: String,
    /// Author identity.
    pub author: CommitAuthor,
    /// HTML URL for displaying to a user.
    pub url: Option<String>,
}

/// Aggregate line statistics for a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStats {
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
    /// Total lines touched.
    pub total: u64,
}

/// One changed file within a commit or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// Path of the changed file.
    pub filename: String,
    /// Change status (`added`, `modified`, `removed`, `renamed`).
    pub status: Option<String>,
    /// Lines added in this file.
    pub additions: u64,
    /// Lines deleted in this file.
    pub deletions: u64,
    /// Total lines touched in this file.
    pub changes: u64,
    /// Unified diff hunk; absent for binary files and very large diffs.
    pub patch: Option<String>,
    /// Previous path for renamed files.
    #[serde(rename = "previous_filename", skip_serializing_if = "Option::is_none")]
    pub previous_filename: Option<String>,
}

/// Commit detail including per-file diffs, merged in a single fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDetail {
    /// Commit SHA.
    pub sha: String,
    /// Full commit message.
    pub message: String,
    /// Author identity.
    pub author: CommitAuthor,
    /// Aggregate line statistics.
    pub stats: CommitStats,
    /// Changed files with diff data.
    pub files: Vec<FileChange>,
    /// HTML URL for displaying to a user.
    pub url: Option<String>,
}

/// Pull request author identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestAuthor {
    /// Author login.
    pub login: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
}

/// Lightweight pull request summary for listing views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSummary {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// State (`open`, `closed`).
    pub state: Option<String>,
    /// Author identity.
    pub author: PullRequestAuthor,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
    /// HTML URL for displaying to a user.
    pub url: Option<String>,
}

/// Pull request detail including per-file diffs, merged in a single logical
/// fetch so callers never need a second round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestDetail {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// Pull request body.
    pub body: Option<String>,
    /// State (`open`, `closed`).
    pub state: Option<String>,
    /// Author identity.
    pub author: PullRequestAuthor,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
    /// Merge timestamp, if merged (ISO 8601 format).
    pub merged_at: Option<String>,
    /// Lines added across the pull request.
    pub additions: u64,
    /// Lines deleted across the pull request.
    pub deletions: u64,
    /// Number of changed files.
    pub changed_files: u64,
    /// Number of commits on the branch.
    pub commits: u64,
    /// HTML URL for displaying to a user.
    pub url: Option<String>,
    /// Head branch name.
    pub head: Option<String>,
    /// Base branch name.
    pub base: Option<String>,
    /// Changed files with diff data.
    pub files: Vec<FileChange>,
}

/// One entry of the recursive repository tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeEntry {
    /// Repository-relative path.
    pub path: String,
    /// Entry kind (`blob`, `tree`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Size in bytes for blobs.
    pub size: Option<u64>,
    /// Git object SHA.
    pub sha: Option<String>,
}

/// One repository contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    /// Contributor login.
    pub login: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
    /// Contribution count.
    pub contributions: u64,
    /// HTML URL of the contributor profile.
    pub url: Option<String>,
}

/// Bytes of code per language, as reported by GitHub.
pub type Languages = BTreeMap<String, u64>;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    #[serde(default)]
    pub(crate) login: Option<String>,
    #[serde(default)]
    pub(crate) avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLicense {
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepo {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) full_name: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) stargazers_count: u64,
    #[serde(default)]
    pub(crate) forks_count: u64,
    #[serde(default)]
    pub(crate) language: Option<String>,
    #[serde(default)]
    pub(crate) topics: Vec<String>,
    #[serde(default)]
    pub(crate) created_at: Option<String>,
    #[serde(default)]
    pub(crate) updated_at: Option<String>,
    #[serde(default)]
    pub(crate) default_branch: Option<String>,
    #[serde(default)]
    pub(crate) size: u64,
    #[serde(default)]
    pub(crate) open_issues_count: u64,
    #[serde(default)]
    pub(crate) homepage: Option<String>,
    #[serde(default)]
    pub(crate) license: Option<ApiLicense>,
}

impl From<ApiRepo> for RepoInfo {
    fn from(value: ApiRepo) -> Self {
        Self {
            name: value.name,
            full_name: value.full_name,
            description: value.description,
            stars: value.stargazers_count,
            forks: value.forks_count,
            language: value.language,
            topics: value.topics,
            created_at: value.created_at,
            updated_at: value.updated_at,
            default_branch: value.default_branch,
            size: value.size,
            open_issues: value.open_issues_count,
            homepage: value.homepage,
            license: value.license.and_then(|license| license.name),
        }
    }
}

/// Contents API entry; a file response additionally carries base64 content.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiContentEntry {
    pub(crate) name: String,
    pub(crate) path: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) size: u64,
    pub(crate) sha: String,
    #[serde(default)]
    pub(crate) html_url: Option<String>,
    #[serde(default)]
    pub(crate) content: Option<String>,
}

/// Directory listings come back as an array; a file path yields one object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiContents {
    Listing(Vec<ApiContentEntry>),
    Single(ApiContentEntry),
}

impl From<ApiContentEntry> for FileEntry {
    fn from(value: ApiContentEntry) -> Self {
        Self {
            name: value.name,
            path: value.path,
            kind: value.kind,
            size: value.size,
            sha: value.sha,
            url: value.html_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitAuthor {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitCommit {
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) author: Option<ApiGitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitSummary {
    pub(crate) sha: String,
    pub(crate) commit: ApiGitCommit,
    #[serde(default)]
    pub(crate) author: Option<ApiUser>,
    #[serde(default)]
    pub(crate) html_url: Option<String>,
}

fn merge_commit_author(git: Option<ApiGitAuthor>, account: Option<ApiUser>) -> CommitAuthor {
    let avatar = account.and_then(|user| user.avatar_url);
    match git {
        Some(author) => CommitAuthor {
            name: author.name,
            email: author.email,
            date: author.date,
            avatar,
        },
        None => CommitAuthor {
            avatar,
            ..CommitAuthor::default()
        },
    }
}

impl From<ApiCommitSummary> for CommitSummary {
    fn from(value: ApiCommitSummary) -> Self {
        Self {
            sha: value.sha,
            message: value.commit.message,
            author: merge_commit_author(value.commit.author, value.author),
            url: value.html_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiCommitStats {
    #[serde(default)]
    pub(crate) additions: u64,
    #[serde(default)]
    pub(crate) deletions: u64,
    #[serde(default)]
    pub(crate) total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiFileChange {
    pub(crate) filename: String,
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) additions: u64,
    #[serde(default)]
    pub(crate) deletions: u64,
    #[serde(default)]
    pub(crate) changes: u64,
    #[serde(default)]
    pub(crate) patch: Option<String>,
    #[serde(default)]
    pub(crate) previous_filename: Option<String>,
}

impl From<ApiFileChange> for FileChange {
    fn from(value: ApiFileChange) -> Self {
        Self {
            filename: value.filename,
            status: value.status,
            additions: value.additions,
            deletions: value.deletions,
            changes: value.changes,
            patch: value.patch,
            previous_filename: value.previous_filename,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitDetail {
    pub(crate) sha: String,
    pub(crate) commit: ApiGitCommit,
    #[serde(default)]
    pub(crate) author: Option<ApiUser>,
    #[serde(default)]
    pub(crate) stats: Option<ApiCommitStats>,
    #[serde(default)]
    pub(crate) files: Vec<ApiFileChange>,
    #[serde(default)]
    pub(crate) html_url: Option<String>,
}

impl From<ApiCommitDetail> for CommitDetail {
    fn from(value: ApiCommitDetail) -> Self {
        let stats = value.stats.unwrap_or_default();
        Self {
            sha: value.sha,
            message: value.commit.message,
            author: merge_commit_author(value.commit.author, value.author),
            stats: CommitStats {
                additions: stats.additions,
                deletions: stats.deletions,
                total: stats.total,
            },
            files: value.files.into_iter().map(ApiFileChange::into).collect(),
            url: value.html_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestSummary {
    pub(crate) number: u64,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) state: Option<String>,
    #[serde(default)]
    pub(crate) user: Option<ApiUser>,
    #[serde(default)]
    pub(crate) created_at: Option<String>,
    #[serde(default)]
    pub(crate) updated_at: Option<String>,
    #[serde(default)]
    pub(crate) html_url: Option<String>,
}

fn pull_request_author(user: Option<ApiUser>) -> PullRequestAuthor {
    user.map_or_else(PullRequestAuthor::default, |account| PullRequestAuthor {
        login: account.login,
        avatar: account.avatar_url,
    })
}

impl From<ApiPullRequestSummary> for PullRequestSummary {
    fn from(value: ApiPullRequestSummary) -> Self {
        Self {
            number: value.number,
            title: value.title,
            state: value.state,
            author: pull_request_author(value.user),
            created_at: value.created_at,
            updated_at: value.updated_at,
            url: value.html_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranchRef {
    #[serde(rename = "ref", default)]
    pub(crate) branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestDetail {
    pub(crate) number: u64,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) body: Option<String>,
    #[serde(default)]
    pub(crate) state: Option<String>,
    #[serde(default)]
    pub(crate) user: Option<ApiUser>,
    #[serde(default)]
    pub(crate) created_at: Option<String>,
    #[serde(default)]
    pub(crate) updated_at: Option<String>,
    #[serde(default)]
    pub(crate) merged_at: Option<String>,
    #[serde(default)]
    pub(crate) additions: u64,
    #[serde(default)]
    pub(crate) deletions: u64,
    #[serde(default)]
    pub(crate) changed_files: u64,
    #[serde(default)]
    pub(crate) commits: u64,
    #[serde(default)]
    pub(crate) html_url: Option<String>,
    #[serde(default)]
    pub(crate) head: Option<ApiBranchRef>,
    #[serde(default)]
    pub(crate) base: Option<ApiBranchRef>,
}

impl ApiPullRequestDetail {
    /// Merges the detail response with its separately fetched file list.
    pub(crate) fn into_detail(self, files: Vec<ApiFileChange>) -> PullRequestDetail {
        PullRequestDetail {
            number: self.number,
            title: self.title,
            body: self.body,
            state: self.state,
            author: pull_request_author(self.user),
            created_at: self.created_at,
            updated_at: self.updated_at,
            merged_at: self.merged_at,
            additions: self.additions,
            deletions: self.deletions,
            changed_files: self.changed_files,
            commits: self.commits,
            url: self.html_url,
            head: self.head.and_then(|branch| branch.branch),
            base: self.base.and_then(|branch| branch.branch),
            files: files.into_iter().map(ApiFileChange::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTreeEntry {
    #[serde(default)]
    pub(crate) path: Option<String>,
    #[serde(rename = "type", default)]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) size: Option<u64>,
    #[serde(default)]
    pub(crate) sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTree {
    #[serde(default)]
    pub(crate) tree: Vec<ApiTreeEntry>,
}

impl From<ApiTreeEntry> for TreeEntry {
    fn from(value: ApiTreeEntry) -> Self {
        Self {
            path: value.path.unwrap_or_default(),
            kind: value.kind,
            size: value.size,
            sha: value.sha,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiContributor {
    #[serde(default)]
    pub(crate) login: Option<String>,
    #[serde(default)]
    pub(crate) avatar_url: Option<String>,
    #[serde(default)]
    pub(crate) contributions: u64,
    #[serde(default)]
    pub(crate) html_url: Option<String>,
}

impl From<ApiContributor> for Contributor {
    fn from(value: ApiContributor) -> Self {
        Self {
            login: value.login,
            avatar: value.avatar_url,
            contributions: value.contributions,
            url: value.html_url,
        }
    }
}
