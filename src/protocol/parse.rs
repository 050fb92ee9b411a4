use super::types::{StreamEvent, StreamPayload};

/// Prefix that marks a payload line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Parse a single stream line into the events it carries.
///
/// Returns `Ok(None)` for lines that carry nothing: lines without the
/// `data: ` prefix and payload lines that are blank after the prefix.
/// Returns `Err` for a payload that is not valid JSON (caller should skip
/// the line, not abort the stream).
pub fn parse_line(line: &str) -> serde_json::Result<Option<Vec<StreamEvent>>> {
    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }
    if data == DONE_SENTINEL {
        return Ok(Some(vec![StreamEvent::Done]));
    }
    let payload: StreamPayload = serde_json::from_str(data)?;
    Ok(Some(payload.into_events()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_unprefixed_lines_are_ignored() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line(": keep-alive").unwrap().is_none());
        assert!(parse_line("event: message").unwrap().is_none());
        assert!(parse_line("data:{\"content\":\"x\"}").unwrap().is_none());
    }

    #[test]
    fn whitespace_payload_is_ignored() {
        assert!(parse_line("data: ").unwrap().is_none());
        assert!(parse_line("data:    \t").unwrap().is_none());
    }

    #[test]
    fn done_sentinel() {
        assert_eq!(parse_line("data: [DONE]").unwrap(), Some(vec![StreamEvent::Done]));
        assert_eq!(
            parse_line("data: [DONE]  ").unwrap(),
            Some(vec![StreamEvent::Done])
        );
    }

    #[test]
    fn status_payload() {
        let events = parse_line(r#"data: {"status":"Thinking..."}"#).unwrap();
        assert_eq!(
            events,
            Some(vec![StreamEvent::Status {
                message: "Thinking...".into()
            }])
        );
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_line("data: {not valid json").is_err());
        assert!(parse_line(r#"data: {"content":"trunc"#).is_err());
    }

    #[test]
    fn empty_object_carries_no_events() {
        assert_eq!(parse_line("data: {}").unwrap(), Some(vec![]));
    }
}
