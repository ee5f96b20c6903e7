//! Library client for the HTTP surface, including the stream consumer.
//!
//! The client keeps the connection triple in memory for its own lifetime
//! (the counterpart of browser session storage), attaches it to every
//! request as the `x-repo-connection` header, and clears it on disconnect.
//! Streamed analyses are decoded incrementally into a [`StreamBuffer`].

use futures::StreamExt;
use serde_json::Value;

use crate::error::ServiceError;
use crate::github::connection::{CONNECTION_HEADER, Connection};

/// Growing buffer a streamed analysis is decoded into.
///
/// `streaming` is true from the moment a request is issued until the body
/// is exhausted or an error occurs. On error the partial content is
/// replaced with an `Error: <message>` marker; the discarded partial text
/// is handed back to the caller instead.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamBuffer {
    content: String,
    streaming: bool,
    error: Option<String>,
}

impl StreamBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated (or error-marker) content.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// True while the response body is still being consumed.
    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// The error message, if the stream failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Resets the buffer for a new request.
    pub fn begin(&mut self) {
        self.content.clear();
        self.error = None;
        self.streaming = true;
    }

    /// Appends one decoded fragment.
    pub fn push_chunk(&mut self, chunk: &str) {
        self.content.push_str(chunk);
    }

    /// Marks the stream as finished successfully.
    pub fn complete(&mut self) {
        self.streaming = false;
    }

    /// Replaces the partial content with an error marker and returns the
    /// discarded partial text.
    #[must_use]
    pub fn fail(&mut self, error: &ServiceError) -> String {
        let message = error.to_string();
        let partial = std::mem::replace(&mut self.content, format!("Error: {message}"));
        self.error = Some(message);
        self.streaming = false;
        partial
    }
}

/// Client for the analysis service's HTTP surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    connection: Option<Connection>,
}

impl ApiClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Configuration`] when the HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|error| ServiceError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;

        Ok(Self {
            base_url: base_url.into(),
            http,
            connection: None,
        })
    }

    /// The connection currently attached to requests, if any.
    #[must_use]
    pub const fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// Connects to a repository and stores the triple for later requests.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when owner or repo is blank and
    /// mapped errors when the service rejects the connection.
    pub async fn connect(
        &mut self,
        owner: &str,
        repo: &str,
        token: Option<&str>,
    ) -> Result<Value, ServiceError> {
        let candidate = Connection::new(owner, repo, token)?;
        let body = serde_json::json!({
            "owner": candidate.owner,
            "repo": candidate.repo,
            "token": candidate.token,
        });

        let response = self
            .http
            .post(self.url("/api/connect"))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let payload = decode_json(response).await?;

        self.connection = Some(candidate);
        Ok(payload)
    }

    /// Clears the stored connection.
    pub fn disconnect(&mut self) {
        self.connection = None;
    }

    /// Issues a GET request with the connection header attached.
    ///
    /// # Errors
    ///
    /// Returns mapped errors for transport failures and non-2xx responses.
    pub async fn get_json(&self, path: &str) -> Result<Value, ServiceError> {
        let request = self.attach(self.http.get(self.url(path)));
        let response = request.send().await.map_err(transport_error)?;
        decode_json(response).await
    }

    /// Streams an analysis into the supplied buffer, invoking `on_chunk`
    /// for every decoded fragment, and returns the full concatenated text.
    ///
    /// # Errors
    ///
    /// On failure the buffer content is replaced with an `Error: <message>`
    /// marker and the error is returned.
    pub async fn stream_analysis(
        &self,
        path: &str,
        body: Value,
        buffer: &mut StreamBuffer,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<String, ServiceError> {
        buffer.begin();
        match self.stream_inner(path, body, buffer, &mut on_chunk).await {
            Ok(full_text) => {
                buffer.complete();
                Ok(full_text)
            }
            Err(error) => {
                let _partial = buffer.fail(&error);
                Err(error)
            }
        }
    }

    async fn stream_inner(
        &self,
        path: &str,
        body: Value,
        buffer: &mut StreamBuffer,
        on_chunk: &mut impl FnMut(&str),
    ) -> Result<String, ServiceError> {
        let request = self.attach(self.http.post(self.url(path))).json(&body);
        let response = request.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let mut byte_stream = response.bytes_stream();
        let mut full_text = String::new();
        while let Some(chunk) = byte_stream.next().await {
            let bytes = chunk.map_err(|error| ServiceError::Stream {
                message: format!("stream read failed: {error}"),
            })?;
            let fragment = String::from_utf8_lossy(&bytes);
            full_text.push_str(&fragment);
            buffer.push_chunk(&fragment);
            on_chunk(&fragment);
        }

        Ok(full_text)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn attach(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self
            .connection
            .as_ref()
            .and_then(|connection| connection.to_header_value().ok())
        {
            Some(header) => request.header(CONNECTION_HEADER, header),
            None => request,
        }
    }
}

fn transport_error(error: reqwest::Error) -> ServiceError {
    ServiceError::Network {
        message: format!("request transport failed: {error}"),
    }
}

async fn error_from_response(response: reqwest::Response) -> ServiceError {
    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|payload| {
            payload
                .get("error")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| format!("request failed with status {status}"));

    ServiceError::Upstream { message }
}

async fn decode_json(response: reqwest::Response) -> Result<Value, ServiceError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    response
        .json::<Value>()
        .await
        .map_err(|error| ServiceError::Upstream {
            message: format!("response JSON decoding failed: {error}"),
        })
}
