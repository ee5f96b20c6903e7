//! Identity wrappers and API path derivation for repository access.

use url::Url;

use crate::error::ServiceError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, ServiceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::missing_field("owner"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, ServiceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::missing_field("repo"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ServiceError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ServiceError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Commit SHA or ref selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSha(String);

impl CommitSha {
    /// Validates that the SHA or ref is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, ServiceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::missing_field("sha"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the SHA value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Validates that the number is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when the value is zero.
    pub fn new(value: u64) -> Result<Self, ServiceError> {
        if value == 0 {
            return Err(ServiceError::Validation {
                message: "pull request number must be a positive integer".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, ServiceError> {
    if host.eq_ignore_ascii_case("github.com") {
        Url::parse("https://api.github.com")
            .map_err(|error| ServiceError::InvalidUrl(error.to_string()))
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|error| ServiceError::InvalidUrl(error.to_string()))?;

        api_url
            .set_port(port)
            .map_err(|()| ServiceError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// A repository identity plus the API base URL all its resources live under.
///
/// # Example
///
/// ```
/// use repolens::github::locator::RepositoryLocator;
///
/// let locator = RepositoryLocator::from_owner_repo("octo", "hello-world")
///     .expect("should create repository locator");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repo_path(), "/repos/octo/hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator from owner and repository name strings.
    ///
    /// Uses the public `api.github.com` base.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, ServiceError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let repository = RepositoryName::new(repo)?;
        let api_base = Url::parse("https://api.github.com")
            .map_err(|error| ServiceError::InvalidUrl(error.to_string()))?;

        Ok(Self {
            api_base,
            owner: validated_owner,
            repository,
        })
    }

    /// Creates a repository locator with an explicit API base URL.
    ///
    /// Used for GitHub Enterprise deployments and for pointing tests at a
    /// local mock server.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when owner or repo is empty or
    /// [`ServiceError::InvalidUrl`] when the base URL cannot be parsed.
    pub fn with_api_base(owner: &str, repo: &str, api_base: &str) -> Result<Self, ServiceError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let repository = RepositoryName::new(repo)?;
        let base =
            Url::parse(api_base).map_err(|error| ServiceError::InvalidUrl(error.to_string()))?;

        Ok(Self {
            api_base: base,
            owner: validated_owner,
            repository,
        })
    }

    /// Parses a GitHub repository URL in the form
    /// `https://github.com/<owner>/<repo>`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] when parsing fails or
    /// [`ServiceError::Validation`] when the URL path is not `/owner/repo`.
    pub fn parse(input: &str) -> Result<Self, ServiceError> {
        let parsed =
            Url::parse(input).map_err(|error| ServiceError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed.path_segments().ok_or_else(|| {
            ServiceError::InvalidUrl("URL must include an /owner/repo path".to_owned())
        })?;

        let owner_segment = segments
            .next()
            .ok_or_else(|| ServiceError::missing_field("owner"))?;
        let repository_segment = segments
            .next()
            .ok_or_else(|| ServiceError::missing_field("repo"))?;

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ServiceError::InvalidUrl("URL must include a host".to_owned()))?;
        let api_base = derive_api_base_from_host(parsed.scheme(), host, parsed.port())?;

        Ok(Self {
            api_base,
            owner,
            repository,
        })
    }

    /// API base URL the repository's resources live under.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Returns the API path for repository metadata.
    #[must_use]
    pub fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn contents_path(&self, path: &str) -> String {
        format!("{}/contents/{path}", self.repo_path())
    }

    pub(crate) fn commits_path(&self) -> String {
        format!("{}/commits", self.repo_path())
    }

    pub(crate) fn commit_path(&self, sha: &CommitSha) -> String {
        format!("{}/commits/{}", self.repo_path(), sha.as_str())
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repo_path())
    }

    pub(crate) fn pull_path(&self, number: PullRequestNumber) -> String {
        format!("{}/pulls/{}", self.repo_path(), number.get())
    }

    pub(crate) fn pull_files_path(&self, number: PullRequestNumber) -> String {
        format!("{}/pulls/{}/files", self.repo_path(), number.get())
    }

    pub(crate) fn tree_path(&self) -> String {
        format!("{}/git/trees/HEAD", self.repo_path())
    }

    pub(crate) fn languages_path(&self) -> String {
        format!("{}/languages", self.repo_path())
    }

    pub(crate) fn contributors_path(&self) -> String {
        format!("{}/contributors", self.repo_path())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{CommitSha, PersonalAccessToken, PullRequestNumber, RepositoryLocator};
    use crate::error::ServiceError;

    #[test]
    fn from_owner_repo_uses_public_api_base() {
        let locator = RepositoryLocator::from_owner_repo("octo", "hello-world")
            .expect("should create locator");
        assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
    }

    #[test]
    fn parse_derives_enterprise_api_base() {
        let locator = RepositoryLocator::parse("https://ghe.example.com/octo/hello-world")
            .expect("should parse enterprise URL");
        assert_eq!(
            locator.api_base().as_str(),
            "https://ghe.example.com/api/v3"
        );
    }

    #[rstest]
    #[case("", "repo")]
    #[case("owner", "")]
    #[case("  ", "repo")]
    fn from_owner_repo_rejects_blank_segments(#[case] owner: &str, #[case] repo: &str) {
        let error = RepositoryLocator::from_owner_repo(owner, repo)
            .expect_err("blank segment should fail");
        assert!(
            matches!(error, ServiceError::Validation { .. }),
            "expected Validation, got {error:?}"
        );
    }

    #[test]
    fn resource_paths_include_owner_and_repo() {
        let locator = RepositoryLocator::from_owner_repo("octo", "hello-world")
            .expect("should create locator");
        let number = PullRequestNumber::new(7).expect("number should be valid");
        let sha = CommitSha::new("abc123").expect("sha should be valid");

        assert_eq!(locator.repo_path(), "/repos/octo/hello-world");
        assert_eq!(
            locator.contents_path("src/lib.rs"),
            "/repos/octo/hello-world/contents/src/lib.rs"
        );
        assert_eq!(
            locator.commit_path(&sha),
            "/repos/octo/hello-world/commits/abc123"
        );
        assert_eq!(locator.pull_path(number), "/repos/octo/hello-world/pulls/7");
        assert_eq!(
            locator.pull_files_path(number),
            "/repos/octo/hello-world/pulls/7/files"
        );
        assert_eq!(locator.tree_path(), "/repos/octo/hello-world/git/trees/HEAD");
    }

    #[test]
    fn personal_access_token_trims_whitespace() {
        let token = PersonalAccessToken::new("  ghp_token  ").expect("token should be valid");
        assert_eq!(token.value(), "ghp_token");
    }

    #[test]
    fn personal_access_token_rejects_blank_input() {
        let error = PersonalAccessToken::new("   ").expect_err("blank token should fail");
        assert_eq!(error, ServiceError::MissingToken);
    }

    #[test]
    fn pull_request_number_rejects_zero() {
        let error = PullRequestNumber::new(0).expect_err("zero should fail");
        assert!(
            matches!(error, ServiceError::Validation { .. }),
            "expected Validation, got {error:?}"
        );
    }
}
