use serde::Deserialize;

use crate::error::Result;

/// A decoded event from the agent's response stream.
///
/// An explicit sum type so the reducer's handling is exhaustively checked.
/// Events are produced transiently by the decoder and consumed by the
/// reducer; they are not retained.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The agent started invoking a tool.
    ToolUse {
        /// Name of the tool, when the runtime reports one.
        tool_name: Option<String>,
    },
    /// A fragment of streamed response text.
    TextDelta {
        /// The text fragment. Never empty.
        data: String,
    },
}

/// Wire form of a single `data:` payload.
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    tool_name: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

impl StreamEvent {
    /// Parses one `data:` payload into an event.
    ///
    /// Returns `Ok(None)` for payloads that carry no event: unknown `type`
    /// discriminators and `text` events with empty or absent data are
    /// silently dropped. Malformed JSON is an error, and fatal to the stream
    /// that produced it.
    pub fn from_payload(payload: &str) -> Result<Option<StreamEvent>> {
        let wire: WireEvent = serde_json::from_str(payload)?;
        match wire.kind.as_deref() {
            Some("tool_use") => Ok(Some(StreamEvent::ToolUse {
                tool_name: wire.tool_name,
            })),
            Some("text") => match wire.data {
                Some(data) if !data.is_empty() => Ok(Some(StreamEvent::TextDelta { data })),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }
}
