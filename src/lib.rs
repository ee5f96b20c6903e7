//! Repolens library crate: connect a GitHub repository, browse its files,
//! commits, and pull requests, and stream AI-generated analyses of each.
//!
//! The library wraps Octocrab behind a per-request gateway, builds prompts
//! from normalized repository facts, and relays the model's token stream to
//! HTTP callers chunk by chunk. A small client counterpart consumes those
//! streams incrementally.

pub mod ai;
pub mod client;
pub mod config;
pub mod error;
pub mod github;
pub mod server;
pub mod telemetry;

pub use ai::{GeneratorConfig, OpenAiTextGenerator, TextGenerator};
pub use client::{ApiClient, StreamBuffer};
pub use config::RepolensConfig;
pub use error::ServiceError;
pub use github::{
    Connection, GatewayFactory, OctocrabGatewayFactory, PersonalAccessToken, RepositoryGateway,
    RepositoryLocator,
};
pub use server::{AppState, router, serve};
