//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.repolens.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `REPOLENS_BIND_ADDR`,
//!    `REPOLENS_AI_API_KEY`, or legacy `GEMINI_API_KEY`
//! 4. **Command-line arguments** – `--bind-addr`, `--ai-api-key`, and
//!    friends
//!
//! # Configuration File
//!
//! Place `.repolens.toml` in the current directory, home directory, or XDG
//! config directory with:
//!
//! ```toml
//! bind_addr = "127.0.0.1:8080"
//! github_api_base = "https://api.github.com"
//! ai_model = "gemini-2.0-flash"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::ai::GeneratorConfig;
use crate::error::ServiceError;
use crate::github::GatewayTimeouts;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_AI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GITHUB_CONNECT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_GITHUB_READ_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_AI_TIMEOUT_SECONDS: u64 = 120;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `REPOLENS_BIND_ADDR` or `--bind-addr`: Listen address
/// - `REPOLENS_GITHUB_API_BASE` or `--github-api-base`: GitHub API base URL
/// - `REPOLENS_AI_BASE_URL` or `--ai-base-url`: Model endpoint base URL
/// - `REPOLENS_AI_MODEL` or `--ai-model`: Model identifier
/// - `REPOLENS_AI_API_KEY`, `GEMINI_API_KEY` (legacy), or `--ai-api-key`:
///   Model API key
///
/// # Example
///
/// ```no_run
/// use repolens::RepolensConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = RepolensConfig::load().expect("failed to load configuration");
/// let timeouts = config.gateway_timeouts();
/// assert!(timeouts.read >= timeouts.connect);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REPOLENS",
    discovery(
        dotfile_name = ".repolens.toml",
        config_file_name = "repolens.toml",
        app_name = "repolens"
    )
)]
pub struct RepolensConfig {
    /// Address the HTTP server binds to.
    ///
    /// Can be provided via:
    /// - CLI: `--bind-addr <ADDR>` or `-b <ADDR>`
    /// - Environment: `REPOLENS_BIND_ADDR`
    /// - Config file: `bind_addr = "..."`
    #[ortho_config(cli_short = 'b')]
    pub bind_addr: String,

    /// GitHub API base URL; override for GitHub Enterprise.
    #[ortho_config()]
    pub github_api_base: String,

    /// Connect timeout for upstream GitHub calls, in seconds.
    #[ortho_config()]
    pub github_connect_timeout_seconds: u64,

    /// Read timeout for upstream GitHub calls, in seconds.
    #[ortho_config()]
    pub github_read_timeout_seconds: u64,

    /// Base URL of the OpenAI-compatible model endpoint.
    #[ortho_config()]
    pub ai_base_url: String,

    /// Model identifier sent with every generation request.
    #[ortho_config()]
    pub ai_model: String,

    /// API key for the model endpoint.
    ///
    /// Can be provided via:
    /// - CLI: `--ai-api-key <KEY>` or `-k <KEY>`
    /// - Environment: `REPOLENS_AI_API_KEY` or `GEMINI_API_KEY` (legacy)
    /// - Config file: `ai_api_key = "..."`
    #[ortho_config(cli_short = 'k')]
    pub ai_api_key: Option<String>,

    /// Timeout for opening a generation stream, in seconds.
    ///
    /// Does not bound an already-open stream.
    #[ortho_config()]
    pub ai_timeout_seconds: u64,
}

impl Default for RepolensConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            github_api_base: DEFAULT_GITHUB_API_BASE.to_owned(),
            github_connect_timeout_seconds: DEFAULT_GITHUB_CONNECT_TIMEOUT_SECONDS,
            github_read_timeout_seconds: DEFAULT_GITHUB_READ_TIMEOUT_SECONDS,
            ai_base_url: DEFAULT_AI_BASE_URL.to_owned(),
            ai_model: DEFAULT_AI_MODEL.to_owned(),
            ai_api_key: None,
            ai_timeout_seconds: DEFAULT_AI_TIMEOUT_SECONDS,
        }
    }
}

impl RepolensConfig {
    /// Resolves the model API key from configuration or the legacy
    /// `GEMINI_API_KEY` environment variable.
    ///
    /// The key stays optional here; the generator reports a configuration
    /// error on first use when no key is available, so data endpoints keep
    /// working without one.
    #[must_use]
    pub fn resolve_ai_api_key(&self) -> Option<String> {
        resolve_key(self.ai_api_key.as_deref(), env::var("GEMINI_API_KEY").ok())
    }

    /// Builds the gateway timeouts from the configured values.
    #[must_use]
    pub const fn gateway_timeouts(&self) -> GatewayTimeouts {
        GatewayTimeouts {
            connect: Duration::from_secs(self.github_connect_timeout_seconds),
            read: Duration::from_secs(self.github_read_timeout_seconds),
        }
    }

    /// Builds the text generator configuration, resolving the API key.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            base_url: self.ai_base_url.clone(),
            model: self.ai_model.clone(),
            api_key: self.resolve_ai_api_key(),
            timeout: Duration::from_secs(self.ai_timeout_seconds),
        }
    }

    /// Validates values that cannot be checked by parsing alone.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Configuration`] when the bind address or a
    /// timeout is blank or zero.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ServiceError::Configuration {
                message: "bind_addr must not be blank".to_owned(),
            });
        }
        if self.github_connect_timeout_seconds == 0 || self.github_read_timeout_seconds == 0 {
            return Err(ServiceError::Configuration {
                message: "GitHub timeouts must be at least 1 second".to_owned(),
            });
        }
        if self.ai_timeout_seconds == 0 {
            return Err(ServiceError::Configuration {
                message: "ai_timeout_seconds must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Resolution order: explicit configuration first, then the legacy
/// environment variable.
fn resolve_key(configured: Option<&str>, legacy_env: Option<String>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .or(legacy_env)
}
