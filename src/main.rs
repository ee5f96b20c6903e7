//! Repolens service entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use repolens::config::RepolensConfig;
use repolens::error::ServiceError;
use repolens::github::OctocrabGatewayFactory;
use repolens::server::{self, AppState};
use repolens::{OpenAiTextGenerator, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServiceError> {
    let config = load_config()?;
    config.validate()?;
    telemetry::init();

    let gateways = Arc::new(OctocrabGatewayFactory::new(
        config.github_api_base.clone(),
        config.gateway_timeouts(),
    ));
    let generator = Arc::new(OpenAiTextGenerator::new(config.generator_config()));
    let state = AppState::new(gateways, generator);

    server::serve(&config.bind_addr, state).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ServiceError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<RepolensConfig, ServiceError> {
    RepolensConfig::load().map_err(|error| ServiceError::Configuration {
        message: error.to_string(),
    })
}
