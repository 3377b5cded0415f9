//! threadline: single-shot Q&A relay with file-persisted conversation
//! continuity.
//!
//! Each invocation reads a question from a request file, sends it to the
//! completion service, overwrites a response file with the answer, and
//! appends the exchange to an append-only JSONL history. The next invocation
//! continues the same server-side conversation by passing the continuation
//! handle found on the history's last line.

pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod run;
