//! GitHub access layer: connections, locators, models, and gateways.
//!
//! This module wraps Octocrab behind a narrow gateway trait. Every
//! operation is a stateless projection of one upstream resource into a
//! normalized model; credentials arrive with each request's connection and
//! are never shared across requests.

pub mod connection;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use connection::{CONNECTION_HEADER, Connection};
pub use gateway::{
    GatewayFactory, GatewayTimeouts, ListCommitsParams, ListPullRequestsParams,
    OctocrabGatewayFactory, OctocrabRepositoryGateway, PullRequestState, RepositoryGateway,
    ResultLimit,
};
pub use locator::{
    CommitSha, PersonalAccessToken, PullRequestNumber, RepositoryLocator, RepositoryName,
    RepositoryOwner,
};
