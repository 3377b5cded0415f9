//! OpenAI Responses API client.
//!
//! Sends the question as a single-turn `/v1/responses` call; conversation
//! continuity is carried by `previous_response_id` instead of resending the
//! full history, so each request links to exactly one predecessor.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::llm::{Completion, CompletionClient};

/// Client for the OpenAI Responses API.
pub struct OpenAiResponsesClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiResponsesClient {
    pub fn new(config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(600))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1/responses",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn send_request(&self, body: &ResponsesRequest<'_>) -> Result<ResponsesResponse, LlmError> {
        let url = self.api_url();

        tracing::debug!("Sending completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {}", e);
                LlmError::RequestFailed {
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        let response_text = response.text().await.unwrap_or_default();

        tracing::debug!("Completion response status: {}", status);

        if !status.is_success() {
            if status.as_u16() == 401 {
                return Err(LlmError::AuthFailed);
            }
            if status.as_u16() == 429 {
                return Err(LlmError::RateLimited);
            }
            return Err(LlmError::RequestFailed {
                reason: format!("HTTP {}: {}", status, response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| LlmError::InvalidResponse {
            reason: format!("JSON parse error: {}", e),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiResponsesClient {
    async fn complete(
        &self,
        input: &str,
        previous_response_id: Option<&str>,
    ) -> Result<Completion, LlmError> {
        let request = ResponsesRequest {
            model: &self.config.model,
            input,
            previous_response_id,
        };

        let response = self.send_request(&request).await?;
        let text = extract_answer(&response);

        Ok(Completion {
            text,
            response_id: response.id,
            usage: response.usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Responses API wire types. Only the fields we consume are modeled; the
// usage block stays an opaque `Value` so it round-trips into history as-is.

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response_id: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesResponse {
    id: Option<String>,
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputItem {
    #[serde(rename = "type", default)]
    item_type: String,
    #[serde(default)]
    content: Vec<ContentSegment>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentSegment {
    #[serde(rename = "type", default)]
    segment_type: String,
    #[serde(default)]
    text: String,
}

/// Extraction strategies, tried in order; the first non-empty answer wins.
const EXTRACTORS: &[fn(&ResponsesResponse) -> Option<String>] =
    &[extract_output_text, extract_from_output_items];

fn extract_answer(response: &ResponsesResponse) -> String {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(response))
        .unwrap_or_default()
}

/// Primary strategy: the top-level `output_text` convenience field.
fn extract_output_text(response: &ResponsesResponse) -> Option<String> {
    response
        .output_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Fallback strategy: walk `output[]` message items and join their
/// `output_text` segments.
fn extract_from_output_items(response: &ResponsesResponse) -> Option<String> {
    let joined = response
        .output
        .iter()
        .filter(|item| item.item_type == "message")
        .flat_map(|item| item.content.iter())
        .filter(|segment| segment.segment_type == "output_text")
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
