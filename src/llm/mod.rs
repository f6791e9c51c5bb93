//! Reasoning client abstraction.
//!
//! The agent loop talks to a [`LlmClient`] trait object and never sees
//! provider wire formats. The one production implementation speaks the
//! OpenAI-compatible chat completions protocol, which also covers Groq.

use async_trait::async_trait;
use thiserror::Error;

use crate::conversation::{AssistantMessage, Turn};

pub mod openai;

pub use openai::OpenAiClient;

/// Failure modes of a reasoning call. All of them are fatal for the request
/// in flight; the loop does not retry.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-level failure: connect, TLS, or deadline.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider rejected our credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider answered with a non-success status.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered 200 with a body we could not make sense of.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// A stateless chat-completion backend.
///
/// The full ordered turn history goes in on every call; one assistant
/// message comes back. Tool descriptors are bound once at construction, not
/// passed per call.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, turns: &[Turn]) -> Result<AssistantMessage, LlmError>;
}
