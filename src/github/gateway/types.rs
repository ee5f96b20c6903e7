//! Public types for repository gateway operations.

use std::str::FromStr;

use crate::error::ServiceError;
use crate::github::locator::CommitSha;

/// Pull request state filter for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullRequestState {
    /// Only open pull requests.
    Open,
    /// Only closed pull requests.
    Closed,
    /// All pull requests regardless of state.
    #[default]
    All,
}

impl PullRequestState {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl FromStr for PullRequestState {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            other => Err(ServiceError::Validation {
                message: format!("state must be open, closed, or all, got `{other}`"),
            }),
        }
    }
}

/// Result-size limit for listing operations, bounded to GitHub's 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLimit(u8);

impl ResultLimit {
    /// Default limit for commit and pull request listings.
    pub const LISTING: Self = Self(30);
    /// Default limit for contributor listings.
    pub const CONTRIBUTORS: Self = Self(10);

    /// Validates a limit supplied by a caller.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidLimit`] when the value is zero or
    /// exceeds 100.
    pub fn new(value: u8) -> Result<Self, ServiceError> {
        if value == 0 {
            return Err(ServiceError::InvalidLimit {
                message: "limit must be at least 1".to_owned(),
            });
        }
        if value > 100 {
            return Err(ServiceError::InvalidLimit {
                message: "limit must not exceed 100".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Clamps a compile-time constant into the accepted range.
    #[must_use]
    pub const fn capped(value: u8) -> Self {
        if value == 0 {
            Self(1)
        } else if value > 100 {
            Self(100)
        } else {
            Self(value)
        }
    }

    /// Returns the numeric limit.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for ResultLimit {
    fn default() -> Self {
        Self::LISTING
    }
}

/// Parameters for listing commits.
#[derive(Debug, Clone, Default)]
pub struct ListCommitsParams {
    /// Number of commits to retrieve. Defaults to 30.
    pub limit: Option<ResultLimit>,
    /// Branch name or commit SHA to start listing from.
    pub sha: Option<CommitSha>,
}

/// Parameters for listing pull requests.
#[derive(Debug, Clone, Default)]
pub struct ListPullRequestsParams {
    /// Filter by state. Defaults to all.
    pub state: Option<PullRequestState>,
    /// Number of pull requests to retrieve. Defaults to 30.
    pub limit: Option<ResultLimit>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PullRequestState, ResultLimit};
    use crate::error::ServiceError;

    #[rstest]
    #[case("open", PullRequestState::Open)]
    #[case("closed", PullRequestState::Closed)]
    #[case("all", PullRequestState::All)]
    fn pull_request_state_parses_api_values(
        #[case] input: &str,
        #[case] expected: PullRequestState,
    ) {
        let state: PullRequestState = input.parse().expect("state should parse");
        assert_eq!(state, expected);
        assert_eq!(state.as_str(), input);
    }

    #[test]
    fn pull_request_state_rejects_unknown_values() {
        let error = "merged"
            .parse::<PullRequestState>()
            .expect_err("unknown state should fail");
        assert!(
            matches!(error, ServiceError::Validation { .. }),
            "expected Validation, got {error:?}"
        );
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    fn result_limit_rejects_out_of_range(#[case] value: u8) {
        let error = ResultLimit::new(value).expect_err("out-of-range limit should fail");
        assert!(
            matches!(error, ServiceError::InvalidLimit { .. }),
            "expected InvalidLimit, got {error:?}"
        );
    }

    #[test]
    fn result_limit_capped_clamps_into_range() {
        assert_eq!(ResultLimit::capped(0).get(), 1);
        assert_eq!(ResultLimit::capped(50).get(), 50);
        assert_eq!(ResultLimit::capped(200).get(), 100);
    }
}
