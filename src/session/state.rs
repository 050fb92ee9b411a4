use std::time::Duration;

/// Shown when the request is missing a client or region.
pub const VALIDATION_MESSAGE: &str =
    "Please enter both the target enterprise client and region of focus.";

/// Shown for any transport-level failure. The underlying cause goes to the log.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to generate strategy. Please try again.";

/// Snapshot of a submission as the display should show it.
///
/// Each snapshot replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultState {
    pub success: bool,
    pub strategy: Option<String>,
    pub error: Option<String>,
    pub elapsed_secs: u64,
    pub is_streaming: bool,
    /// Progress note from the backend; cleared once content arrives.
    pub status: Option<String>,
}

impl ResultState {
    /// Placeholder emitted as soon as the request is sent.
    pub fn streaming() -> Self {
        Self {
            success: true,
            strategy: Some(String::new()),
            error: None,
            elapsed_secs: 0,
            is_streaming: true,
            status: None,
        }
    }

    pub fn with_status(message: String, elapsed_secs: u64) -> Self {
        Self {
            status: Some(message),
            elapsed_secs,
            ..Self::streaming()
        }
    }

    pub fn with_content(strategy: Option<String>, complete: bool, elapsed_secs: u64) -> Self {
        Self {
            success: true,
            strategy,
            error: None,
            elapsed_secs,
            is_streaming: !complete,
            status: None,
        }
    }

    pub fn failed(message: impl Into<String>, elapsed_secs: u64) -> Self {
        Self {
            success: false,
            strategy: None,
            error: Some(message.into()),
            elapsed_secs,
            is_streaming: false,
            status: None,
        }
    }

    /// Whether this snapshot ends the submission.
    pub fn is_terminal(&self) -> bool {
        !self.is_streaming
    }
}

/// Whole seconds, rounded to nearest.
pub fn rounded_secs(elapsed: Duration) -> u64 {
    let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    millis.saturating_add(500) / 1000
}
