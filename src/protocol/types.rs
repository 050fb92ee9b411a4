use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound body for the strategy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRequest {
    pub industry: String,
    pub client: String,
    pub region: String,
}

impl StrategyRequest {
    pub fn new(
        industry: impl Into<String>,
        client: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            industry: industry.into(),
            client: client.into(),
            region: region.into(),
        }
    }
}

/// Raw JSON record carried after a `data: ` prefix.
///
/// Every field is optional; the backend sends whichever apply. An empty
/// `error` or `status` counts as absent, but an empty `content` is still
/// content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamPayload {
    /// Usually a string, but any truthy value is a backend failure.
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_complete: Option<bool>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl StreamPayload {
    /// Whether the payload marks the end of generation.
    pub fn completes(&self) -> bool {
        self.is_complete.unwrap_or(false) || self.kind.as_deref() == Some("complete")
    }

    /// Expand this payload into events, in precedence order.
    ///
    /// An `error` short-circuits: nothing after it in the same payload is
    /// reported.
    pub fn into_events(self) -> Vec<StreamEvent> {
        let complete = self.completes();
        if let Some(message) = self.error.and_then(error_message) {
            return vec![StreamEvent::Error { message }];
        }
        let mut events = Vec::new();
        if let Some(message) = self.status.filter(|m| !m.is_empty()) {
            events.push(StreamEvent::Status { message });
        }
        match self.content {
            Some(text) => events.push(StreamEvent::Content { text, complete }),
            None if complete => events.push(StreamEvent::Finished),
            None => {}
        }
        events
    }
}

/// Text to show for an `error` value, or `None` when it is falsy.
fn error_message(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message),
        other => Some(other.to_string()),
    }
}

/// One decoded message from the strategy stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Progress note shown before any content arrives.
    Status { message: String },
    /// The entire text generated so far. `complete` marks the final version.
    Content { text: String, complete: bool },
    /// A completion marker without a `content` key.
    Finished,
    /// Backend failure; ends the stream.
    Error { message: String },
    /// The `[DONE]` sentinel.
    Done,
}
