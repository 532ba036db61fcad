//! Inference backend abstraction
//!
//! The backend is a single HTTP endpoint that takes a three-part prompt and
//! returns the model's reply. The gateway only sees the [`Backend`] trait.

mod http;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use http::HttpBackend;

/// System turn and opening of the user turn
pub const PROMPT_PREAMBLE: &str =
    "<|im_start|>system You are a helpful assistant. <|im_end|> <|im_start|>user ";

/// Close of the user turn and opening of the assistant turn
pub const PROMPT_POSTFIX: &str = "<|im_end|><|im_start|>assistant ";

/// Request body sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    #[serde(rename = "PROMPT_TEXT_PREFIX")]
    pub prefix: String,
    #[serde(rename = "input_str")]
    pub input: String,
    #[serde(rename = "PROMPT_TEXT_POSTFIX")]
    pub postfix: String,
}

impl Prompt {
    /// Compose a prompt from rendered history and the live question
    ///
    /// History goes directly ahead of the question, and the input ends with a
    /// single space before the assistant turn opens.
    #[must_use]
    pub fn compose(history: &str, question: &str) -> Self {
        Self {
            prefix: PROMPT_PREAMBLE.to_string(),
            input: format!("{history}{question} "),
            postfix: PROMPT_POSTFIX.to_string(),
        }
    }

    /// The prompt as one string, in the order the model reads it
    #[must_use]
    pub fn full_text(&self) -> String {
        format!("{}{}{}", self.prefix, self.input, self.postfix)
    }
}

/// Transport-level backend failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// No response within the configured bound
    #[error("request timed out")]
    Timeout,

    /// Could not reach the backend
    #[error("connection failed: {0}")]
    Connection(String),

    /// Non-2xx response
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body without a usable `content` field
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A completion endpoint
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send a prompt and return the model's reply
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the backend cannot be reached, answers with
    /// a failure status, times out, or answers without a reply.
    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
