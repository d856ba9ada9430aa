//! Wire schema for the summary board.
//!
//! This crate is shared by the client and any snapshot producer to prevent
//! schema drift. Snapshot decoding is deliberately tolerant: the producer is
//! an agent pipeline whose output can be partial or garbled mid-stream, and a
//! bad message must never take the board down. Missing fields default,
//! unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Seconds between idle heartbeats while the channel is open.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 10;

/// Opaque heartbeat payload. The server consumes it without replying.
pub const HEARTBEAT_PAYLOAD: &str = "ping";

/// Hard ceiling on a single snapshot message.
pub const MAX_SNAPSHOT_BYTES: usize = 4 * 1024 * 1024; // 4MB

/// Maximum number of presets the store retains.
pub const PRESET_LIMIT: usize = 20;

/// Maximum accepted preset length, matching the store's own validation.
pub const MAX_PROMPT_CHARS: usize = 4000;

/// One analysis finding as pushed by the backend agent.
///
/// Every snapshot carries the complete current list of these; there is no
/// partial update. All fields are optional on the wire so a sparse record
/// renders as empty strings and default styling instead of failing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ResultRecord {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub very_short_summary_of_content: Option<String>,
    #[serde(default)]
    pub color_circle: Option<String>,
}

/// Decodes one channel message into a snapshot.
///
/// `[]` is valid and means "no results yet". Anything that is not a JSON
/// array of records is an error; the caller drops the message and keeps the
/// previous snapshot.
pub fn parse_snapshot(text: &str) -> Result<Vec<ResultRecord>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Structured error for protocol-boundary validation failures.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preset store contract (collaborator, not part of the snapshot core)
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for adding or deleting a single preset prompt.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PromptIn {
    pub prompt: String,
}

impl PromptIn {
    pub fn validate(&self) -> Result<(), ErrorInfo> {
        if self.prompt.trim().is_empty() {
            return Err(ErrorInfo::new("invalid_prompt", "prompt is required"));
        }
        if self.prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(ErrorInfo::new(
                "invalid_prompt",
                format!("prompt must be {} characters or fewer", MAX_PROMPT_CHARS),
            ));
        }
        Ok(())
    }
}

/// Response body for every preset operation: the full updated list.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PromptList {
    pub prompts: Vec<String>,
}

/// Acknowledgement for the fire-and-forget start trigger.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StartAck {
    pub status: String,
    pub message: String,
}
