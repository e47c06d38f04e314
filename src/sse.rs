//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! This module converts the raw byte stream of a `streamGenerateContent`
//! response into parsed [`GenerateContentResponse`] chunks. The service
//! emits data-only events: each event is a single `data:` line carrying one
//! JSON chunk, delimited by a blank line, with no `event:` type line. The
//! stream ends when the HTTP body ends.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability;
use crate::types::GenerateContentResponse;

/// Process a stream of bytes into a stream of response chunks.
///
/// Handles event framing across chunk boundaries, buffering partial events
/// until the delimiter arrives. Malformed payloads become in-stream error
/// items so that chunks already delivered stay delivered.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    // Use a state machine to process the SSE stream
    let buffer = String::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // First check if we have a complete event in the buffer
                if let Some((event, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    if let Some(event) = event {
                        return Some((event, (stream, buffer)));
                    }
                    // Comment or empty event; keep scanning.
                    continue;
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        observability::STREAM_BYTES.count(bytes.len() as u64);
                        match String::from_utf8(bytes.to_vec()) {
                            Ok(text) => buffer.push_str(&text),
                            Err(e) => {
                                return Some((
                                    Err(Error::encoding(
                                        format!("Invalid UTF-8 in stream: {e}"),
                                        Some(Box::new(e)),
                                    )),
                                    (stream, buffer),
                                ));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // End of stream; flush a trailing buffered event.
                        if !buffer.trim().is_empty() {
                            if let Some((Some(event), _)) = extract_trailing_event(&buffer) {
                                buffer.clear();
                                return Some((event, (stream, buffer)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Extract a complete SSE event from the buffer.
///
/// Returns `None` if no full event is buffered yet. Returns
/// `Some((None, rest))` for events with no data payload (comments,
/// keep-alive blank lines), which callers skip.
fn extract_event(buffer: &str) -> Option<(Option<Result<GenerateContentResponse>>, String)> {
    // Events are delimited by a blank line.
    let parts: Vec<&str> = buffer.splitn(2, "\n\n").collect();
    if parts.len() != 2 {
        return None;
    }
    let event_text = parts[0];
    let rest = parts[1].to_string();

    Some((parse_event(event_text), rest))
}

/// Like `extract_event`, but for the undelimited tail left at end of stream.
fn extract_trailing_event(
    buffer: &str,
) -> Option<(Option<Result<GenerateContentResponse>>, String)> {
    Some((parse_event(buffer.trim_end()), String::new()))
}

/// Parse the data payload of one event.
fn parse_event(event_text: &str) -> Option<Result<GenerateContentResponse>> {
    let mut data = None;
    for line in event_text.lines() {
        if let Some(payload) = line.strip_prefix("data:") {
            data = Some(payload.trim());
        }
    }

    let json_str = data?;
    if json_str.is_empty() {
        return None;
    }

    match serde_json::from_str::<GenerateContentResponse>(json_str) {
        Ok(chunk) => {
            observability::STREAM_EVENTS.click();
            Some(Ok(chunk))
        }
        Err(e) => {
            observability::STREAM_ERRORS.click();
            Some(Err(Error::serialization(
                format!("Failed to parse chunk JSON: {e}"),
                Some(Box::new(e)),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn byte_stream(
        chunks: Vec<&'static [u8]>,
    ) -> impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin {
        Box::pin(stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from(c))),
        ))
    }

    #[tokio::test]
    async fn parse_single_chunk() {
        let data: &[u8] =
            b"data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hi\"}]}}]}\n\n";
        let mut sse = Box::pin(process_sse(byte_stream(vec![data])));

        let chunk = sse.next().await.unwrap().unwrap();
        assert_eq!(chunk.text(), "Hi");
        assert!(sse.next().await.is_none());
    }

    #[tokio::test]
    async fn parse_multiple_chunks() {
        let data: &[u8] = b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}]}}]}\n\ndata: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"}]}}]}\n\n";
        let mut sse = Box::pin(process_sse(byte_stream(vec![data])));

        assert_eq!(sse.next().await.unwrap().unwrap().text(), "Hel");
        assert_eq!(sse.next().await.unwrap().unwrap().text(), "lo");
        assert!(sse.next().await.is_none());
    }

    #[tokio::test]
    async fn handle_event_split_across_reads() {
        let chunk1: &[u8] = b"data: {\"candidates\":[{\"content\":";
        let chunk2: &[u8] = b"{\"parts\":[{\"text\":\"Hi\"}]}}]}\n\n";
        let mut sse = Box::pin(process_sse(byte_stream(vec![chunk1, chunk2])));

        assert_eq!(sse.next().await.unwrap().unwrap().text(), "Hi");
        assert!(sse.next().await.is_none());
    }

    #[tokio::test]
    async fn handle_trailing_event_without_delimiter() {
        let data: &[u8] = b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"tail\"}]}}]}";
        let mut sse = Box::pin(process_sse(byte_stream(vec![data])));

        assert_eq!(sse.next().await.unwrap().unwrap().text(), "tail");
        assert!(sse.next().await.is_none());
    }

    #[tokio::test]
    async fn handle_malformed_payload() {
        let data: &[u8] = b"data: {not json}\n\n";
        let mut sse = Box::pin(process_sse(byte_stream(vec![data])));

        let item = sse.next().await.unwrap();
        assert!(item.is_err());
    }

    #[tokio::test]
    async fn skip_dataless_events() {
        let data: &[u8] = b": keep-alive\n\ndata: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hi\"}]}}]}\n\n";
        let mut sse = Box::pin(process_sse(byte_stream(vec![data])));

        assert_eq!(sse.next().await.unwrap().unwrap().text(), "Hi");
        assert!(sse.next().await.is_none());
    }

    #[tokio::test]
    async fn error_after_delivered_chunks() {
        let data: &[u8] = b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Par\"}]}}]}\n\ndata: {broken\n\n";
        let mut sse = Box::pin(process_sse(byte_stream(vec![data])));

        assert_eq!(sse.next().await.unwrap().unwrap().text(), "Par");
        assert!(sse.next().await.unwrap().is_err());
    }
}
