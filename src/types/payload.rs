//! Data-shaped error payload returned in place of upstream JSON.

use serde_json::{Value, json};

/// Build `{"status": "error", "message": ...}`.
///
/// An empty message is replaced so the payload always carries a
/// description.
pub fn error_payload(message: impl Into<String>) -> Value {
    let mut message = message.into();
    if message.trim().is_empty() {
        message = "upstream request failed".to_string();
    }
    json!({ "status": "error", "message": message })
}
