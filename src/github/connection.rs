//! The repository connection triple carried on every request.
//!
//! Clients hold the triple in ephemeral session state and attach it to each
//! request as the `x-repo-connection` header, serialised as JSON. Nothing is
//! persisted server-side; every request re-supplies the connection.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

use super::locator::{PersonalAccessToken, RepositoryLocator, RepositoryName, RepositoryOwner};

/// Name of the header carrying the serialised connection.
pub const CONNECTION_HEADER: &str = "x-repo-connection";

/// The owner/repo/token triple identifying which repository and credentials
/// a request operates against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Repository owner or organisation.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Personal access token; optional for public repositories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Connection {
    /// Creates a connection after validating owner and repo are non-blank.
    ///
    /// A blank token is normalised to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when owner or repo is blank.
    pub fn new(owner: &str, repo: &str, token: Option<&str>) -> Result<Self, ServiceError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let validated_repo = RepositoryName::new(repo)?;
        let token = token
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            owner: validated_owner.as_str().to_owned(),
            repo: validated_repo.as_str().to_owned(),
            token,
        })
    }

    /// Parses the JSON header value carrying the connection triple.
    ///
    /// Browser session storage serialises absent values as the literal
    /// strings `undefined` or `null`; both are treated as a missing header.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingConnection`] when the value is absent
    /// or a sentinel, [`ServiceError::InvalidConnection`] when the JSON does
    /// not parse, and [`ServiceError::Validation`] when owner or repo is
    /// blank.
    pub fn from_header_value(value: Option<&str>) -> Result<Self, ServiceError> {
        let raw = value
            .map(str::trim)
            .filter(|candidate| {
                !candidate.is_empty() && *candidate != "undefined" && *candidate != "null"
            })
            .ok_or(ServiceError::MissingConnection)?;

        let parsed: Self =
            serde_json::from_str(raw).map_err(|error| ServiceError::InvalidConnection {
                message: error.to_string(),
            })?;

        Self::new(&parsed.owner, &parsed.repo, parsed.token.as_deref())
    }

    /// Serialises the connection for the `x-repo-connection` header.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidConnection`] when serialisation fails.
    pub fn to_header_value(&self) -> Result<String, ServiceError> {
        serde_json::to_string(self).map_err(|error| ServiceError::InvalidConnection {
            message: error.to_string(),
        })
    }

    /// Returns the validated token wrapper, if a token is present.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingToken`] when the stored token is blank.
    pub fn token(&self) -> Result<Option<PersonalAccessToken>, ServiceError> {
        self.token
            .as_deref()
            .map(PersonalAccessToken::new)
            .transpose()
    }

    /// Builds a repository locator for this connection against an API base.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] when the base URL cannot be
    /// parsed or [`ServiceError::Validation`] when owner or repo is blank.
    pub fn locator(&self, api_base: &str) -> Result<RepositoryLocator, ServiceError> {
        RepositoryLocator::with_api_base(&self.owner, &self.repo, api_base)
    }
}
