//! Gateways for reading repository resources through Octocrab.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation handles real HTTP requests. A gateway is bound to one
//! repository connection for its whole lifetime; a fresh instance is built
//! per request so credentials can never leak between connections.

mod client;
mod contents;
mod error_mapping;
mod factory;
mod repository;
mod types;

pub use client::GatewayTimeouts;
pub use factory::{GatewayFactory, OctocrabGatewayFactory};
#[cfg(test)]
pub use factory::MockGatewayFactory;
pub use repository::OctocrabRepositoryGateway;
pub use types::{ListCommitsParams, ListPullRequestsParams, PullRequestState, ResultLimit};

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::github::locator::{CommitSha, PullRequestNumber};
use crate::github::models::{
    CommitDetail, CommitSummary, Contributor, FileContent, FileEntry, Languages,
    PullRequestDetail, PullRequestSummary, RepoInfo, TreeEntry,
};

/// Gateway over one connected repository's resources.
///
/// Every operation is a stateless projection of the corresponding upstream
/// resource; nothing is cached beyond the lifetime of a single call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Fetch normalized repository metadata.
    async fn repo_info(&self) -> Result<RepoInfo, ServiceError>;

    /// List files and directories at the given repository path.
    async fn list_files(&self, path: &str) -> Result<Vec<FileEntry>, ServiceError>;

    /// Fetch and decode the content of a single file.
    async fn file_content(&self, path: &str) -> Result<FileContent, ServiceError>;

    /// List commits, newest first.
    async fn list_commits(
        &self,
        params: &ListCommitsParams,
    ) -> Result<Vec<CommitSummary>, ServiceError>;

    /// Fetch one commit with per-file diff data merged in.
    async fn commit(&self, sha: &CommitSha) -> Result<CommitDetail, ServiceError>;

    /// List pull requests with an optional state filter.
    async fn list_pull_requests(
        &self,
        params: &ListPullRequestsParams,
    ) -> Result<Vec<PullRequestSummary>, ServiceError>;

    /// Fetch one pull request with its changed files merged in.
    async fn pull_request(
        &self,
        number: PullRequestNumber,
    ) -> Result<PullRequestDetail, ServiceError>;

    /// Fetch the recursive tree of the default branch head.
    async fn tree(&self) -> Result<Vec<TreeEntry>, ServiceError>;

    /// Fetch bytes of code per language.
    async fn languages(&self) -> Result<Languages, ServiceError>;

    /// List top contributors.
    async fn contributors(&self, limit: ResultLimit) -> Result<Vec<Contributor>, ServiceError>;
}
