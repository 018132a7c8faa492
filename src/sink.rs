use std::time::Duration;

use async_trait::async_trait;

use crate::intake::record::IntakeRecord;

#[derive(Debug)]
pub enum SinkError {
    /// Non-success HTTP status from the sink.
    Rejected { status: u16, body: String },
    /// The request never produced a readable response.
    Transport(String),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::Rejected { status, body } => write!(f, "Sink returned {status}: {body}"),
            SinkError::Transport(msg) => write!(f, "Sink request failed: {msg}"),
        }
    }
}

/// Destination for normalized records. Returns the sink's response body on
/// success.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn send(&self, record: &IntakeRecord) -> Result<String, SinkError>;
}

/// Posts records as JSON to a fixed URL. One attempt, no retries.
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, String> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn send(&self, record: &IntakeRecord) -> Result<String, SinkError> {
        let resp = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(record)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SinkError::Transport(format!("Failed to read sink response: {e}")))?;

        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
