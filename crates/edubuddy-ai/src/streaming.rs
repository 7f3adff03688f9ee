//! Server-Sent Events (SSE) streaming parser.
//!
//! Gemini's `streamGenerateContent?alt=sse` endpoint delivers the reply as
//! a sequence of SSE events, each carrying a partial JSON response.

use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    /// The event type, when the server names one.
    pub event: Option<String>,
    /// The event data (JSON string).
    pub data: String,
}

/// Parse an SSE stream from a reqwest response, calling `on_event` for each event.
pub async fn parse_sse_stream(
    response: reqwest::Response,
    on_event: impl FnMut(SseEvent),
) -> Result<(), AiError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    parse_sse_reader(reader, on_event).await
}

/// Parse SSE events from any buffered reader.
pub async fn parse_sse_reader<R>(reader: R, mut on_event: impl FnMut(SseEvent)) -> Result<(), AiError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    let mut current_event: Option<String> = None;
    let mut current_data = String::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AiError::NetworkError(e.to_string()))?
    {
        let line = line.strip_suffix('\r').unwrap_or(&line);

        if line.is_empty() {
            // Empty line = end of event
            if !current_data.is_empty() {
                on_event(SseEvent {
                    event: current_event.take(),
                    data: std::mem::take(&mut current_data),
                });
            }
            current_event = None;
            continue;
        }

        if let Some(event_type) = line.strip_prefix("event:") {
            current_event = Some(event_type.trim_start().to_string());
        } else if let Some(data) = line.strip_prefix("data:") {
            if !current_data.is_empty() {
                current_data.push('\n');
            }
            current_data.push_str(data.strip_prefix(' ').unwrap_or(data));
        }
        // Ignore other fields (id:, retry:, comments)
    }

    // Flush any remaining event
    if !current_data.is_empty() {
        on_event(SseEvent {
            event: current_event,
            data: current_data,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(input: &str) -> Vec<SseEvent> {
        let mut events = Vec::new();
        parse_sse_reader(input.as_bytes(), |e| events.push(e))
            .await
            .unwrap();
        events
    }

    #[tokio::test]
    async fn splits_events_on_blank_lines() {
        let events = collect("data: {\"a\":1}\n\ndata: {\"a\":2}\n\n").await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "{\"a\":1}");
        assert_eq!(events[1].data, "{\"a\":2}");
        assert_eq!(events[0].event, None);
    }

    #[tokio::test]
    async fn joins_multi_line_data() {
        let events = collect("event: chunk\ndata: first\ndata: second\n\n").await;
        assert_eq!(
            events,
            vec![SseEvent {
                event: Some("chunk".into()),
                data: "first\nsecond".into(),
            }]
        );
    }

    #[tokio::test]
    async fn handles_crlf_and_unterminated_tail() {
        let events = collect("data: one\r\n\r\n: comment\r\ndata: two").await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "one");
        assert_eq!(events[1].data, "two");
    }

    #[tokio::test]
    async fn ignores_events_without_data() {
        let events = collect("event: ping\n\nid: 7\nretry: 100\n\n").await;
        assert!(events.is_empty());
    }
}
