//! Test helpers for constructing repository fact fixtures.
//!
//! These builders keep prompt and handler tests free of repetitive model
//! construction and ensure the same shapes are used across test modules.
//!
//! # Examples
//!
//! ```
//! use repolens::github::models::test_support::commit_detail_with_files;
//!
//! let commit = commit_detail_with_files(3);
//! assert_eq!(commit.files.len(), 3);
//! ```

use super::{
    CommitAuthor, CommitDetail, CommitStats, CommitSummary, Contributor, FileChange, FileContent,
    PullRequestAuthor, PullRequestDetail, PullRequestSummary, RepoInfo, TreeEntry,
};

/// Constructs repository metadata for a small fictional project.
#[must_use]
pub fn sample_repo_info() -> RepoInfo {
    RepoInfo {
        name: "hello-world".to_owned(),
        full_name: Some("octo/hello-world".to_owned()),
        description: Some("A demonstration repository".to_owned()),
        stars: 42,
        forks: 7,
        language: Some("Rust".to_owned()),
        topics: vec!["demo".to_owned(), "rust".to_owned()],
        created_at: Some("2024-01-01T00:00:00Z".to_owned()),
        updated_at: Some("2025-06-01T00:00:00Z".to_owned()),
        default_branch: Some("main".to_owned()),
        size: 128,
        open_issues: 3,
        homepage: None,
        license: Some("MIT License".to_owned()),
    }
}

/// Constructs decoded file content for a small source file.
#[must_use]
pub fn sample_file_content() -> FileContent {
    FileContent {
        path: "src/lib.rs".to_owned(),
        content: "pub fn add(a: u32, b: u32) -> u32 { a + b }\n".to_owned(),
        size: 44,
        sha: "blob123".to_owned(),
        url: Some("https://github.com/octo/hello-world/blob/main/src/lib.rs".to_owned()),
    }
}

/// Constructs one changed file; even indices carry a patch, odd ones do not.
#[must_use]
pub fn file_change(index: usize) -> FileChange {
    let patch = (index % 2 == 0).then(|| {
        format!("@@ -1,2 +1,3 @@\n+line added in file {index}\n context line")
    });
    FileChange {
        filename: format!("src/module_{index}.rs"),
        status: Some("modified".to_owned()),
        additions: 3,
        deletions: 1,
        changes: 4,
        patch,
        previous_filename: None,
    }
}

/// Constructs a commit detail carrying the requested number of files.
#[must_use]
pub fn commit_detail_with_files(count: usize) -> CommitDetail {
    CommitDetail {
        sha: "abc1234def5678".to_owned(),
        message: "Refactor the parser module".to_owned(),
        author: CommitAuthor {
            name: Some("Octo Cat".to_owned()),
            email: Some("octo@example.com".to_owned()),
            date: Some("2025-05-01T12:00:00Z".to_owned()),
            avatar: None,
        },
        stats: CommitStats {
            additions: 30,
            deletions: 12,
            total: 42,
        },
        files: (0..count).map(file_change).collect(),
        url: Some("https://github.com/octo/hello-world/commit/abc1234".to_owned()),
    }
}

/// Constructs a pull request detail carrying the requested number of files.
#[must_use]
pub fn pull_request_detail_with_files(count: usize) -> PullRequestDetail {
    PullRequestDetail {
        number: 12,
        title: Some("Add streaming support".to_owned()),
        body: Some("Streams analysis output chunk by chunk.".to_owned()),
        state: Some("open".to_owned()),
        author: PullRequestAuthor {
            login: Some("octocat".to_owned()),
            avatar: None,
        },
        created_at: Some("2025-05-02T09:00:00Z".to_owned()),
        updated_at: Some("2025-05-03T10:00:00Z".to_owned()),
        merged_at: None,
        additions: 120,
        deletions: 40,
        changed_files: count as u64,
        commits: 4,
        url: Some("https://github.com/octo/hello-world/pull/12".to_owned()),
        head: Some("feature/streaming".to_owned()),
        base: Some("main".to_owned()),
        files: (0..count).map(file_change).collect(),
    }
}

/// Constructs a commit summary with a deterministic sha and message.
#[must_use]
pub fn commit_summary(index: usize) -> CommitSummary {
    CommitSummary {
        sha: format!("sha{index:05}"),
        message: format!("Commit number {index}\n\nLonger body text."),
        author: CommitAuthor {
            name: Some("Octo Cat".to_owned()),
            email: Some("octo@example.com".to_owned()),
            date: Some(format!("2025-05-{:02}T00:00:00Z", (index % 27) + 1)),
            avatar: None,
        },
        url: None,
    }
}

/// Constructs a pull request summary in the given state.
#[must_use]
pub fn pull_request_summary(number: u64, state: &str) -> PullRequestSummary {
    PullRequestSummary {
        number,
        title: Some(format!("Pull request {number}")),
        state: Some(state.to_owned()),
        author: PullRequestAuthor {
            login: Some("octocat".to_owned()),
            avatar: None,
        },
        created_at: Some("2025-04-01T00:00:00Z".to_owned()),
        updated_at: Some("2025-04-02T00:00:00Z".to_owned()),
        url: None,
    }
}

/// Constructs a recursive tree listing with the requested number of blobs.
#[must_use]
pub fn sample_tree(count: usize) -> Vec<TreeEntry> {
    (0..count)
        .map(|index| TreeEntry {
            path: format!("src/file_{index}.rs"),
            kind: Some("blob".to_owned()),
            size: Some(100),
            sha: Some(format!("tree{index:04}")),
        })
        .collect()
}

/// Constructs a contributor entry.
#[must_use]
pub fn contributor(login: &str, contributions: u64) -> Contributor {
    Contributor {
        login: Some(login.to_owned()),
        avatar: None,
        contributions,
        url: None,
    }
}
