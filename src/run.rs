//! One relay run: request file in, response file out, history appended.
//!
//! The run is a stateless function of (request text, history tail). Order
//! matters: the request is validated before any remote call, and nothing is
//! persisted unless the completion succeeds.

use std::path::Path;

use chrono::Utc;

use crate::error::Error;
use crate::history::{ExchangeRecord, HistoryStore};
use crate::llm::CompletionClient;

/// Execute a single exchange.
///
/// Reads and validates the request file, resolves the continuation handle
/// from the store's last record, calls the completion service, overwrites
/// the response file with the answer, and appends one exchange record.
pub async fn run_once(
    request_path: &Path,
    response_path: &Path,
    store: &HistoryStore,
    client: &dyn CompletionClient,
) -> Result<(), Error> {
    let question = read_request(request_path)?;

    let previous_id = store.last_response_id();
    tracing::info!(
        model = client.model_name(),
        continuing = previous_id.is_some(),
        "Sending completion request"
    );

    let completion = client.complete(&question, previous_id.as_deref()).await?;

    // Response file first: downstream consumers only ever see the latest
    // answer there, history is the durable record.
    std::fs::write(response_path, &completion.text)?;

    let record = ExchangeRecord {
        ts: Utc::now(),
        model: client.model_name().to_string(),
        request: question,
        response: completion.text,
        response_id: completion.response_id,
        usage: completion.usage,
    };
    store.append(&record)?;

    Ok(())
}

/// Read the request file; missing or whitespace-only contents abort the run
/// before any remote call is attempted.
fn read_request(path: &Path) -> Result<String, Error> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::Config {
                reason: format!(
                    "Request file {} does not exist; write your question there first",
                    path.display()
                ),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let question = raw.trim();
    if question.is_empty() {
        return Err(Error::Config {
            reason: format!("Request file {} is empty", path.display()),
        });
    }

    Ok(question.to_string())
}
