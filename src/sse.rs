//! Server-Sent Events (SSE) processing for streaming agent responses.
//!
//! This module turns the raw byte stream of an invocation response into a
//! lazy sequence of typed [`StreamEvent`]s, handling chunk boundaries that
//! split lines or multi-byte characters.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};

use crate::observability::{STREAM_BYTES, STREAM_DECODE_ERRORS, STREAM_EVENTS};
use crate::{Error, Result, StreamEvent};

/// Line prefix that marks an event-carrying line.
const DATA_PREFIX: &str = "data: ";

/// Sentinel payload signalling no further content. It is not an event and
/// not an error; the decoder keeps reading until the transport ends.
const DONE_SENTINEL: &str = "[DONE]";

struct DecodeState<S> {
    stream: S,
    buffer: BytesMut,
    ended: bool,
    failed: bool,
}

/// Process a stream of bytes into a stream of decoded agent events.
///
/// The wire framing is line-oriented: only lines prefixed `data: ` carry
/// events, and each payload is an independent JSON document. Incoming chunks
/// are buffered as raw bytes and split at newlines, so a line or a multi-byte
/// UTF-8 sequence fragmented across chunks is reassembled before decoding.
///
/// Unknown event types and empty text deltas are dropped without a trace. A
/// payload that fails to parse as JSON is fatal: the error is yielded once
/// and the stream terminates, on the theory that partial corruption means the
/// transport cannot be trusted for the rest of the response.
///
/// # Examples
///
/// ```
/// use agentchat::{StreamEvent, process_sse};
/// use bytes::Bytes;
/// use futures::StreamExt;
///
/// # tokio_test::block_on(async {
/// let chunks = vec![Ok::<Bytes, std::convert::Infallible>(Bytes::from_static(
///     b"data: {\"type\":\"text\",\"data\":\"hello\"}\n",
/// ))];
/// let events = process_sse(futures::stream::iter(chunks));
/// futures::pin_mut!(events);
///
/// let event = events.next().await.unwrap().unwrap();
/// assert_eq!(event, StreamEvent::TextDelta { data: "hello".to_string() });
/// assert!(events.next().await.is_none());
/// # });
/// ```
pub fn process_sse<S, E>(byte_stream: S) -> impl Stream<Item = Result<StreamEvent>>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let state = DecodeState {
        stream: byte_stream,
        buffer: BytesMut::new(),
        ended: false,
        failed: false,
    };

    stream::unfold(state, move |mut state| async move {
        if state.failed {
            return None;
        }
        loop {
            // Drain every complete line already buffered before reading more,
            // so all events from one chunk apply before the next chunk.
            while let Some(pos) = state.buffer.iter().position(|&b| b == b'\n') {
                let line = state.buffer.split_to(pos + 1);
                match decode_line(&line[..pos]) {
                    Ok(Some(event)) => {
                        STREAM_EVENTS.click();
                        return Some((Ok(event), state));
                    }
                    Ok(None) => continue,
                    Err(err) => {
                        STREAM_DECODE_ERRORS.click();
                        state.failed = true;
                        return Some((Err(err), state));
                    }
                }
            }

            if state.ended {
                // A final line without a trailing newline still counts.
                if state.buffer.is_empty() {
                    return None;
                }
                let line = state.buffer.split();
                return match decode_line(&line) {
                    Ok(Some(event)) => {
                        STREAM_EVENTS.click();
                        Some((Ok(event), state))
                    }
                    Ok(None) => None,
                    Err(err) => {
                        STREAM_DECODE_ERRORS.click();
                        state.failed = true;
                        Some((Err(err), state))
                    }
                };
            }

            match state.stream.next().await {
                Some(Ok(bytes)) => {
                    STREAM_BYTES.count(bytes.len() as u64);
                    state.buffer.extend_from_slice(&bytes);
                }
                Some(Err(err)) => {
                    state.failed = true;
                    return Some((
                        Err(Error::streaming(
                            format!("Error in HTTP stream: {err}"),
                            Some(Box::new(err)),
                        )),
                        state,
                    ));
                }
                None => {
                    state.ended = true;
                }
            }
        }
    })
}

/// Decodes one assembled line (without its newline) into at most one event.
fn decode_line(line: &[u8]) -> Result<Option<StreamEvent>> {
    let line = match line {
        [head @ .., b'\r'] => head,
        other => other,
    };
    let text = std::str::from_utf8(line)?;
    let Some(payload) = text.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };
    if payload == DONE_SENTINEL {
        return Ok(None);
    }
    StreamEvent::from_payload(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::convert::Infallible;

    fn chunks(parts: Vec<&'static [u8]>) -> impl Stream<Item = Result<StreamEvent>> {
        let items: Vec<std::result::Result<Bytes, Infallible>> =
            parts.into_iter().map(|p| Ok(Bytes::from(p))).collect();
        process_sse(Box::pin(stream::iter(items)))
    }

    async fn collect(parts: Vec<&'static [u8]>) -> Vec<Result<StreamEvent>> {
        Box::pin(chunks(parts)).collect::<Vec<_>>().await
    }

    #[tokio::test]
    async fn parses_text_events() {
        let events = collect(vec![
            b"data: {\"type\":\"text\",\"data\":\"Hello\"}\n" as &[u8],
        ])
        .await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::TextDelta {
                data: "Hello".to_string()
            }
        );
    }

    #[tokio::test]
    async fn parses_tool_use_events() {
        let events = collect(vec![
            b"data: {\"type\":\"tool_use\",\"tool_name\":\"search\"}\n" as &[u8],
        ])
        .await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::ToolUse {
                tool_name: Some("search".to_string())
            }
        );
    }

    #[tokio::test]
    async fn event_split_across_chunks() {
        let whole = collect(vec![
            b"data: {\"type\":\"text\",\"data\":\"Hello world\"}\n" as &[u8],
        ])
        .await;
        let split = collect(vec![
            b"data: {\"type\":\"te" as &[u8],
            b"xt\",\"data\":\"Hel",
            b"lo world\"}\n",
        ])
        .await;
        assert_eq!(whole.len(), 1);
        assert_eq!(split.len(), 1);
        assert_eq!(whole[0].as_ref().unwrap(), split[0].as_ref().unwrap());
    }

    #[tokio::test]
    async fn multibyte_split_across_chunks() {
        // "こんにちは" encoded, cut mid-character.
        let encoded = "data: {\"type\":\"text\",\"data\":\"こんにちは\"}\n".as_bytes();
        let cut = 25;
        let events = collect(vec![&encoded[..cut], &encoded[cut..]]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::TextDelta {
                data: "こんにちは".to_string()
            }
        );
    }

    #[tokio::test]
    async fn multiple_events_in_one_chunk() {
        let events = collect(vec![
            b"data: {\"type\":\"text\",\"data\":\"a\"}\ndata: {\"type\":\"text\",\"data\":\"b\"}\n"
                as &[u8],
        ])
        .await;
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::TextDelta {
                data: "a".to_string()
            }
        );
        assert_eq!(
            events[1].as_ref().unwrap(),
            &StreamEvent::TextDelta {
                data: "b".to_string()
            }
        );
    }

    #[tokio::test]
    async fn done_sentinel_is_not_an_event_and_not_the_end() {
        let events = collect(vec![
            b"data: [DONE]\ndata: {\"type\":\"text\",\"data\":\"after\"}\n" as &[u8],
        ])
        .await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::TextDelta {
                data: "after".to_string()
            }
        );
    }

    #[tokio::test]
    async fn non_data_lines_ignored() {
        let events = collect(vec![
            b": keepalive\nevent: something\ndata: {\"type\":\"text\",\"data\":\"x\"}\n" as &[u8],
        ])
        .await;
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn empty_text_and_unknown_types_dropped() {
        let events = collect(vec![
            b"data: {\"type\":\"text\",\"data\":\"\"}\ndata: {\"type\":\"usage\",\"tokens\":5}\n"
                as &[u8],
        ])
        .await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_fatal() {
        let events = collect(vec![
            b"data: {oops\ndata: {\"type\":\"text\",\"data\":\"never\"}\n" as &[u8],
        ])
        .await;
        // The error is yielded once and nothing follows it.
        assert_eq!(events.len(), 1);
        assert!(events[0].is_err());
    }

    #[tokio::test]
    async fn trailing_line_without_newline() {
        let events = collect(vec![b"data: {\"type\":\"text\",\"data\":\"tail\"}" as &[u8]]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::TextDelta {
                data: "tail".to_string()
            }
        );
    }

    #[tokio::test]
    async fn crlf_line_endings_tolerated() {
        let events = collect(vec![b"data: {\"type\":\"text\",\"data\":\"x\"}\r\n" as &[u8]]).await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::TextDelta {
                data: "x".to_string()
            }
        );
    }
}
