//! OpenAI-compatible streaming text generation client.
//!
//! The hosted model is addressed through its OpenAI-compatible
//! chat-completions endpoint with `stream: true`. Tokens arrive as
//! server-sent `data:` lines and are relayed through a bounded channel in
//! arrival order; the channel closes when the provider signals completion.
//! If the receiving side goes away mid-stream the relay stops reading,
//! which drops the upstream response and aborts the generation request.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::error::ServiceError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const CHANNEL_CAPACITY: usize = 32;
const ERROR_BODY_PREVIEW_CHARS: usize = 160;

/// An ordered, finite stream of generated text fragments.
pub type TokenStream = BoxStream<'static, Result<String, ServiceError>>;

/// Streaming text generation seam, mockable in handler tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Opens a token stream for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Configuration`] when no API key is available,
    /// [`ServiceError::Network`] when the request cannot be sent after one
    /// retry, and mapped upstream errors for non-2xx responses.
    async fn stream_text(&self, prompt: String) -> Result<TokenStream, ServiceError>;
}

/// Configuration for [`OpenAiTextGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Base API URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Model identifier sent in chat-completions requests.
    pub model: String,
    /// API key used for bearer authentication.
    pub api_key: Option<String>,
    /// Timeout for opening the stream; does not bound the stream itself.
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// OpenAI-compatible streaming generator implementation.
#[derive(Debug, Clone, Default)]
pub struct OpenAiTextGenerator {
    config: GeneratorConfig,
}

impl OpenAiTextGenerator {
    /// Creates a generator from explicit configuration.
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    fn extract_api_key(&self) -> Result<&str, ServiceError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Configuration {
                message: concat!(
                    "AI API key is required (use --ai-api-key, ",
                    "REPOLENS_AI_API_KEY, or GEMINI_API_KEY)"
                )
                .to_owned(),
            })
    }

    fn create_http_client(&self) -> Result<reqwest::Client, ServiceError> {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|error| ServiceError::Configuration {
                message: format!("failed to configure AI HTTP client: {error}"),
            })
    }

    async fn send_request(
        &self,
        client: &reqwest::Client,
        payload: &ChatCompletionsRequest<'_>,
    ) -> Result<reqwest::Response, ServiceError> {
        let api_key = self.extract_api_key()?;
        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let send = client.post(endpoint).bearer_auth(api_key).json(payload).send();
        tokio::time::timeout(self.config.timeout, send)
            .await
            .map_err(|_elapsed| ServiceError::Network {
                message: format!(
                    "AI request timed out after {} seconds",
                    self.config.timeout.as_secs()
                ),
            })?
            .map_err(|error| ServiceError::Network {
                message: format!("AI request transport failed: {error}"),
            })
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn stream_text(&self, prompt: String) -> Result<TokenStream, ServiceError> {
        let payload = ChatCompletionsRequest {
            model: self.config.model.as_str(),
            messages: vec![ChatCompletionsMessage {
                role: "user",
                content: prompt,
            }],
            stream: true,
        };
        let client = self.create_http_client()?;

        // Opening the stream is side-effect free, so one retry on a
        // transport failure is safe; mid-stream errors are never retried.
        let response = match self.send_request(&client, &payload).await {
            Err(ServiceError::Network { message }) => {
                debug!(error = %message, "retrying AI request after transport failure");
                self.send_request(&client, &payload).await
            }
            other => other,
        }?;

        if response.status() != StatusCode::OK {
            return Err(map_error_response(response).await);
        }

        let (tx, rx) = mpsc::channel::<Result<String, ServiceError>>(CHANNEL_CAPACITY);
        tokio::spawn(relay_sse(response, tx));

        Ok(ReceiverStream::new(rx).boxed())
    }
}

/// Maps a non-2xx chat-completions response to the service taxonomy.
async fn map_error_response(response: reqwest::Response) -> ServiceError {
    let status = response.status();
    let body = response.text().await.map_or_else(
        |_| "(failed to read error response body)".to_owned(),
        |content| truncate_for_message(content.as_str(), ERROR_BODY_PREVIEW_CHARS),
    );
    let message = format!("AI request failed with status {}: {body}", status.as_u16());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ServiceError::Authentication { message }
        }
        StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimitExceeded {
            rate_limit: None,
            message,
        },
        _ => ServiceError::Upstream { message },
    }
}

enum LineOutcome {
    Continue,
    Done,
    ReceiverGone,
}

/// Reads the SSE body and forwards content fragments in arrival order.
async fn relay_sse(response: reqwest::Response, tx: mpsc::Sender<Result<String, ServiceError>>) {
    let mut stream = response.bytes_stream();
    let mut buffer = String::new();

    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(error) => {
                let _ignored = tx
                    .send(Err(ServiceError::Stream {
                        message: format!("AI stream read failed: {error}"),
                    }))
                    .await;
                return;
            }
        };

        buffer.push_str(&String::from_utf8_lossy(&bytes));
        while let Some(position) = buffer.find('\n') {
            let line = buffer.get(..position).unwrap_or_default().trim().to_owned();
            buffer = buffer.get(position + 1..).unwrap_or_default().to_owned();

            match process_line(&line, &tx).await {
                LineOutcome::Continue => {}
                LineOutcome::Done | LineOutcome::ReceiverGone => return,
            }
        }
    }
}

async fn process_line(
    line: &str,
    tx: &mpsc::Sender<Result<String, ServiceError>>,
) -> LineOutcome {
    let Some(data) = line.strip_prefix("data:").map(str::trim_start) else {
        return LineOutcome::Continue;
    };

    if data == "[DONE]" {
        return LineOutcome::Done;
    }

    let Ok(parsed) = serde_json::from_str::<StreamResponse>(data) else {
        // Providers interleave comments and unknown payloads; skip them.
        return LineOutcome::Continue;
    };

    let Some(choice) = parsed.choices.into_iter().next() else {
        return LineOutcome::Continue;
    };

    if let Some(content) = choice.delta.content
        && !content.is_empty()
        && tx.send(Ok(content)).await.is_err()
    {
        // The caller hung up; stop relaying so the upstream request drops.
        return LineOutcome::ReceiverGone;
    }

    if choice.finish_reason.is_some() {
        return LineOutcome::Done;
    }

    LineOutcome::Continue
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionsMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}
