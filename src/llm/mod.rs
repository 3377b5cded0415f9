//! Remote completion client.
//!
//! One provider is supported: the OpenAI Responses API. The trait seam keeps
//! the orchestration testable without a live service.

mod openai;

pub use openai::OpenAiResponsesClient;

use async_trait::async_trait;

use crate::error::LlmError;

/// Result of one completion call.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Extracted answer text. May be empty if the service returned no text.
    pub text: String,
    /// Continuation handle the service assigned to this exchange.
    pub response_id: Option<String>,
    /// Usage metrics as reported by the service, kept opaque.
    pub usage: Option<serde_json::Value>,
}

/// A hosted completion service that can thread calls together server-side.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete `input`, optionally linking the call to a prior exchange via
    /// its continuation handle.
    async fn complete(
        &self,
        input: &str,
        previous_response_id: Option<&str>,
    ) -> Result<Completion, LlmError>;

    /// Model identifier recorded alongside each exchange.
    fn model_name(&self) -> &str;
}
