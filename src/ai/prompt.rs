//! Prompt construction for each analysis kind.
//!
//! Every builder is a pure function from fetched repository facts to a
//! prompt string: no I/O, no side effects, and the same facts always yield
//! an identical prompt. Large change sets are truncated at fixed caps so
//! prompt size stays bounded regardless of upstream payloads.

use crate::github::models::{
    CommitDetail, CommitSummary, FileChange, FileContent, PullRequestDetail, PullRequestSummary,
    RepoInfo, TreeEntry,
};

/// Maximum number of changed files whose diffs are embedded in a prompt.
pub const DIFF_FILE_CAP: usize = 10;

/// Maximum number of tree paths included in a repository overview prompt.
pub const TREE_SAMPLE_CAP: usize = 100;

/// Marker rendered for a changed file that has no diff available.
pub const NO_DIFF_MARKER: &str = "Binary or no diff available";

/// Optional context assembled for a chat turn.
///
/// Each section is fetched only when the user's message suggests it is
/// relevant; absent sections are omitted from the prompt entirely.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// Repository metadata.
    pub repo_info: Option<RepoInfo>,
    /// Recursive tree of the default branch.
    pub structure: Option<Vec<TreeEntry>>,
    /// Recent commits.
    pub commits: Option<Vec<CommitSummary>>,
    /// Recent pull requests.
    pub pull_requests: Option<Vec<PullRequestSummary>>,
}

/// One prior turn of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatTurn {
    /// Either `user` or `assistant`.
    pub role: String,
    /// The turn's text.
    pub content: String,
}

/// Builds the analysis prompt for a single file.
#[must_use]
pub fn file_analysis_prompt(file: &FileContent) -> String {
    let mut prompt = String::new();
    prompt.push_str("Analyze this file from a GitHub repository:\n\n");
    prompt.push_str(&format!("File: {}\n", file.path));
    prompt.push_str(&format!("Size: {} bytes\n\n", file.size));
    prompt.push_str("Content:\n");
    prompt.push_str(&file.content);
    prompt.push_str("\n\nProvide a comprehensive analysis including:\n");
    prompt.push_str("1. **Purpose and Functionality**: What does this file do?\n");
    prompt.push_str(
        "2. **Code Quality**: Assessment of code structure, readability, and best practices\n",
    );
    prompt.push_str("3. **Dependencies**: What other files or libraries does it depend on?\n");
    prompt.push_str("4. **Potential Improvements**: Suggestions for enhancement\n");
    prompt.push_str("5. **Security Considerations**: Any security concerns or recommendations\n");
    prompt.push_str("\nPlease be concise but thorough.");
    prompt
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

fn changed_files_overview(files: &[FileChange]) -> String {
    if files.is_empty() {
        return "No file details available".to_owned();
    }
    files
        .iter()
        .map(|file| {
            format!(
                "- {} (+{}/-{})",
                file.filename, file.additions, file.deletions
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn embedded_diffs(files: &[FileChange]) -> String {
    files
        .iter()
        .take(DIFF_FILE_CAP)
        .map(|file| {
            let status = file.status.as_deref().unwrap_or("unknown");
            file.patch.as_deref().map_or_else(
                || format!("\n### {} ({status}) - {NO_DIFF_MARKER}", file.filename),
                |patch| {
                    format!(
                        "\n### {} ({status})\n```diff\n{patch}\n```",
                        file.filename
                    )
                },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the analysis prompt for a commit, embedding up to
/// [`DIFF_FILE_CAP`] per-file diffs.
#[must_use]
pub fn commit_analysis_prompt(commit: &CommitDetail) -> String {
    let author = commit.author.name.as_deref().unwrap_or("unknown author");
    let date = commit.author.date.as_deref().unwrap_or("unknown date");

    let mut prompt = String::new();
    prompt.push_str("Analyze this commit from a GitHub repository:\n\n");
    prompt.push_str(&format!("**Commit**: {}\n", short_sha(&commit.sha)));
    prompt.push_str(&format!("**Author**: {author}\n"));
    prompt.push_str(&format!("**Date**: {date}\n"));
    prompt.push_str(&format!("**Message**: {}\n\n", commit.message));
    prompt.push_str("**Statistics**:\n");
    prompt.push_str(&format!("- Additions: {}\n", commit.stats.additions));
    prompt.push_str(&format!("- Deletions: {}\n", commit.stats.deletions));
    prompt.push_str(&format!("- Files Changed: {}\n\n", commit.files.len()));
    prompt.push_str("**Files Changed**:\n");
    prompt.push_str(&changed_files_overview(&commit.files));
    prompt.push_str(&format!(
        "\n\n**Code Changes** (showing up to {DIFF_FILE_CAP} files with diffs):\n"
    ));
    prompt.push_str(&embedded_diffs(&commit.files));
    prompt.push_str("\n\nProvide detailed analysis on:\n");
    prompt.push_str("1. **Impact**: What is the scope and impact of these changes?\n");
    prompt.push_str(
        "2. **Code Quality**: Assessment of the actual code changes, patterns, and practices\n",
    );
    prompt.push_str(
        "3. **Security & Risks**: Potential security issues or risks in the code changes\n",
    );
    prompt.push_str("4. **Suggestions**: Specific improvements based on the code diffs\n");
    prompt.push_str("5. **Context**: How this fits into the project's development\n");
    prompt.push_str("\nBe thorough, specific, and actionable based on the actual code changes.");
    prompt
}

/// Builds the analysis prompt for a pull request, embedding up to
/// [`DIFF_FILE_CAP`] per-file diffs.
#[must_use]
pub fn pull_request_analysis_prompt(pull: &PullRequestDetail) -> String {
    let title = pull.title.as_deref().unwrap_or("untitled pull request");
    let state = pull.state.as_deref().unwrap_or("unknown");
    let author = pull.author.login.as_deref().unwrap_or("unknown author");
    let body = pull.body.as_deref().unwrap_or("No description provided");
    let head = pull.head.as_deref().unwrap_or("unknown");
    let base = pull.base.as_deref().unwrap_or("unknown");

    let mut prompt = String::new();
    prompt.push_str("Analyze this pull request from a GitHub repository:\n\n");
    prompt.push_str(&format!("**PR #{}**: {title}\n", pull.number));
    prompt.push_str(&format!("**Author**: {author}\n"));
    prompt.push_str(&format!("**State**: {state}\n"));
    prompt.push_str(&format!("**Branches**: {head} -> {base}\n\n"));
    prompt.push_str("**Description**:\n");
    prompt.push_str(body);
    prompt.push_str("\n\n**Statistics**:\n");
    prompt.push_str(&format!("- Additions: {}\n", pull.additions));
    prompt.push_str(&format!("- Deletions: {}\n", pull.deletions));
    prompt.push_str(&format!("- Files Changed: {}\n", pull.changed_files));
    prompt.push_str(&format!("- Commits: {}\n\n", pull.commits));
    prompt.push_str("**Files Changed**:\n");
    prompt.push_str(&changed_files_overview(&pull.files));
    prompt.push_str(&format!(
        "\n\n**Code Changes** (showing up to {DIFF_FILE_CAP} files with diffs):\n"
    ));
    prompt.push_str(&embedded_diffs(&pull.files));
    prompt.push_str("\n\nProvide detailed analysis on:\n");
    prompt.push_str("1. **Purpose**: What does this pull request set out to do?\n");
    prompt.push_str("2. **Code Quality**: Assessment of the changes, patterns, and practices\n");
    prompt.push_str("3. **Security & Risks**: Potential security issues or regressions\n");
    prompt.push_str("4. **Review Suggestions**: Specific feedback a reviewer should raise\n");
    prompt.push_str("5. **Merge Readiness**: Whether the change looks ready to merge\n");
    prompt.push_str("\nBe thorough, specific, and actionable based on the actual code changes.");
    prompt
}

fn tree_sample(tree: &[TreeEntry]) -> String {
    let mut section = tree
        .iter()
        .take(TREE_SAMPLE_CAP)
        .map(|entry| format!("- {}", entry.path))
        .collect::<Vec<_>>()
        .join("\n");
    if tree.len() > TREE_SAMPLE_CAP {
        section.push_str(&format!(
            "\n... and {} more entries",
            tree.len() - TREE_SAMPLE_CAP
        ));
    }
    section
}

fn commit_lines(commits: &[CommitSummary]) -> String {
    commits
        .iter()
        .map(|commit| {
            let first_line = commit.message.lines().next().unwrap_or("");
            format!("- {} {first_line}", short_sha(&commit.sha))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pull_request_lines(pulls: &[PullRequestSummary]) -> String {
    pulls
        .iter()
        .map(|pull| {
            let title = pull.title.as_deref().unwrap_or("untitled");
            let state = pull.state.as_deref().unwrap_or("unknown");
            format!("- #{} {title} ({state})", pull.number)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn repo_overview(info: &RepoInfo) -> String {
    let mut section = String::new();
    section.push_str(&format!("Name: {}\n", info.name));
    if let Some(full_name) = info.full_name.as_deref() {
        section.push_str(&format!("Full name: {full_name}\n"));
    }
    if let Some(description) = info.description.as_deref() {
        section.push_str(&format!("Description: {description}\n"));
    }
    if let Some(language) = info.language.as_deref() {
        section.push_str(&format!("Primary language: {language}\n"));
    }
    section.push_str(&format!(
        "Stars: {} | Forks: {} | Open issues: {}\n",
        info.stars, info.forks, info.open_issues
    ));
    if !info.topics.is_empty() {
        section.push_str(&format!("Topics: {}\n", info.topics.join(", ")));
    }
    section
}

/// Builds the whole-repository analysis prompt from independently fetched
/// facts.
#[must_use]
pub fn repo_analysis_prompt(
    info: &RepoInfo,
    tree: &[TreeEntry],
    commits: &[CommitSummary],
    pulls: &[PullRequestSummary],
) -> String {
    let mut prompt = String::new();
    prompt.push_str("Analyze this GitHub repository as a whole:\n\n");
    prompt.push_str("**Repository**:\n");
    prompt.push_str(&repo_overview(info));
    prompt.push_str(&format!(
        "\n**Structure** (showing up to {TREE_SAMPLE_CAP} of {} entries):\n",
        tree.len()
    ));
    prompt.push_str(&tree_sample(tree));
    prompt.push_str(&format!("\n\n**Recent Commits** ({}):\n", commits.len()));
    prompt.push_str(&commit_lines(commits));
    prompt.push_str(&format!("\n\n**Pull Requests** ({}):\n", pulls.len()));
    prompt.push_str(&pull_request_lines(pulls));
    prompt.push_str("\n\nProvide a comprehensive analysis including:\n");
    prompt.push_str("1. **Purpose**: What problem does this repository solve?\n");
    prompt.push_str("2. **Architecture**: How is the codebase organised?\n");
    prompt.push_str("3. **Activity**: What does recent development focus on?\n");
    prompt.push_str("4. **Health**: Signals about maintenance, testing, and documentation\n");
    prompt.push_str("5. **Recommendations**: Concrete suggestions for contributors\n");
    prompt.push_str("\nPlease be concise but thorough.");
    prompt
}

/// Builds the chat prompt from the user's message, gathered context, and
/// prior turns.
#[must_use]
pub fn chat_prompt(message: &str, context: &ChatContext, history: &[ChatTurn]) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are an assistant answering questions about a connected GitHub repository. \
         Use only the context provided below.\n",
    );

    if let Some(info) = &context.repo_info {
        prompt.push_str("\n**Repository**:\n");
        prompt.push_str(&repo_overview(info));
    }
    if let Some(tree) = &context.structure {
        prompt.push_str(&format!(
            "\n**Structure** (showing up to {TREE_SAMPLE_CAP} of {} entries):\n",
            tree.len()
        ));
        prompt.push_str(&tree_sample(tree));
        prompt.push('\n');
    }
    if let Some(commits) = &context.commits {
        prompt.push_str(&format!("\n**Recent Commits** ({}):\n", commits.len()));
        prompt.push_str(&commit_lines(commits));
        prompt.push('\n');
    }
    if let Some(pulls) = &context.pull_requests {
        prompt.push_str(&format!("\n**Pull Requests** ({}):\n", pulls.len()));
        prompt.push_str(&pull_request_lines(pulls));
        prompt.push('\n');
    }

    if !history.is_empty() {
        prompt.push_str("\n**Conversation so far**:\n");
        for turn in history {
            prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
        }
    }

    prompt.push_str(&format!("\n**User question**: {message}\n"));
    prompt.push_str("\nAnswer the question directly and concisely.");
    prompt
}
