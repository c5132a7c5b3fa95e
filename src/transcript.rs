//! The conversation transcript and the reducer that builds it from stream
//! events.
//!
//! The transcript is the ordered, append-only sequence of message records
//! representing the conversation as currently known to the client. Records
//! are mutated in place while a response streams, but never removed and never
//! reordered, so positional indices taken during a reduction step stay valid
//! for the rest of the stream.

use crate::types::{AvatarState, MessageRecord, StreamEvent};

/// An ordered, append-only sequence of message records.
#[derive(Debug, Default)]
pub struct Transcript {
    records: Vec<MessageRecord>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the records in order.
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the transcript holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record and returns its index.
    pub fn push(&mut self, record: MessageRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Discards every record. The only non-append mutation, reserved for an
    /// explicit user-driven reset between submissions.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Index of the record currently open for text accumulation.
    ///
    /// The open record is the most recently appended assistant record. If the
    /// transcript is empty or ends with a user record, a fresh placeholder is
    /// appended so streaming always has somewhere to land.
    fn open_index(&mut self) -> usize {
        match self.records.last() {
            Some(record) if record.role == crate::types::MessageRole::Assistant => {
                self.records.len() - 1
            }
            _ => self.push(MessageRecord::assistant_placeholder()),
        }
    }
}

/// Reducer state between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReducerState {
    /// No tool invocation pending.
    Idle,
    /// A tool record was opened and no text has arrived since.
    AwaitingPostToolText {
        /// Index of the unresolved tool record.
        tool_index: usize,
    },
}

/// Consumes decoded events one at a time and mutates the transcript,
/// implementing the tool-use/text interleaving policy.
///
/// One reducer serves one response stream; construct a fresh one per
/// submission. The reducer is the single writer of the transcript while a
/// stream is in flight, and applies events strictly in arrival order.
#[derive(Debug)]
pub struct StreamReducer {
    /// Text accumulated since the last tool-use event or stream start.
    pending_text: String,
    state: ReducerState,
}

impl Default for StreamReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamReducer {
    /// Creates a reducer in the initial state.
    pub fn new() -> Self {
        Self {
            pending_text: String::new(),
            state: ReducerState::Idle,
        }
    }

    /// Applies one event to the transcript.
    pub fn apply(&mut self, transcript: &mut Transcript, event: StreamEvent) {
        match event {
            StreamEvent::ToolUse { tool_name } => self.apply_tool_use(transcript, tool_name),
            StreamEvent::TextDelta { data } => self.apply_text_delta(transcript, data),
        }
    }

    /// Handles a tool invocation from either state.
    ///
    /// Text streamed so far is finalized into its own record before the tool
    /// indicator appears; with nothing streamed, the open record converts in
    /// place so consecutive tool calls never spawn empty placeholders.
    fn apply_tool_use(&mut self, transcript: &mut Transcript, tool_name: Option<String>) {
        let open = transcript.open_index();
        let tool_index = if self.pending_text.is_empty() {
            let record = &mut transcript.records[open];
            record.is_tool_active = true;
            record.tool_name = tool_name;
            open
        } else {
            transcript.records[open].content = self.pending_text.clone();
            transcript.push(MessageRecord::assistant_tool(tool_name))
        };
        self.pending_text.clear();
        self.state = ReducerState::AwaitingPostToolText { tool_index };
    }

    fn apply_text_delta(&mut self, transcript: &mut Transcript, data: String) {
        match self.state {
            ReducerState::AwaitingPostToolText { tool_index } => {
                // First text after a tool call resolves the tool record and
                // lets the nearest still-thinking prior turn greet.
                let record = &mut transcript.records[tool_index];
                record.tool_completed = true;
                record.is_tool_active = false;
                for i in (0..tool_index).rev() {
                    if transcript.records[i].avatar == AvatarState::Thinking {
                        transcript.records[i].avatar = AvatarState::Greet;
                        break;
                    }
                }
                transcript.push(MessageRecord::assistant_text(data.clone()));
                self.pending_text = data;
                self.state = ReducerState::Idle;
            }
            ReducerState::Idle => {
                self.pending_text.push_str(&data);
                let open = transcript.open_index();
                let record = &mut transcript.records[open];
                record.content = self.pending_text.clone();
                record.is_tool_active = false;
            }
        }
    }

    /// Returns true if the reducer still awaits text after a tool call.
    ///
    /// A stream may legitimately end here; the tool record then stays marked
    /// incomplete in the final transcript.
    pub fn awaiting_post_tool_text(&self) -> bool {
        matches!(self.state, ReducerState::AwaitingPostToolText { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    fn tool_use(name: &str) -> StreamEvent {
        StreamEvent::ToolUse {
            tool_name: Some(name.to_string()),
        }
    }

    fn text(data: &str) -> StreamEvent {
        StreamEvent::TextDelta {
            data: data.to_string(),
        }
    }

    fn fresh() -> (Transcript, StreamReducer) {
        let mut transcript = Transcript::new();
        transcript.push(MessageRecord::user("question"));
        transcript.push(MessageRecord::assistant_placeholder());
        (transcript, StreamReducer::new())
    }

    #[test]
    fn plain_text_accumulates_into_one_record() {
        let (mut transcript, mut reducer) = fresh();
        reducer.apply(&mut transcript, text("Hello"));
        reducer.apply(&mut transcript, text(" world"));

        assert_eq!(transcript.len(), 2);
        let record = &transcript.records()[1];
        assert_eq!(record.content, "Hello world");
        assert!(!record.is_tool_active);
    }

    #[test]
    fn tool_on_empty_placeholder_converts_in_place() {
        let (mut transcript, mut reducer) = fresh();
        reducer.apply(&mut transcript, tool_use("search"));

        assert_eq!(transcript.len(), 2);
        let record = &transcript.records()[1];
        assert!(record.is_tool_active);
        assert!(!record.tool_completed);
        assert_eq!(record.tool_name.as_deref(), Some("search"));

        reducer.apply(&mut transcript, text("Found it"));

        assert_eq!(transcript.len(), 3);
        let tool = &transcript.records()[1];
        assert!(tool.tool_completed);
        assert!(!tool.is_tool_active);
        assert_eq!(transcript.records()[2].content, "Found it");
    }

    #[test]
    fn tool_after_partial_text_splits_records() {
        let (mut transcript, mut reducer) = fresh();
        reducer.apply(&mut transcript, text("partial"));
        reducer.apply(&mut transcript, tool_use("search"));
        reducer.apply(&mut transcript, text("done"));

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.records()[1].content, "partial");
        let tool = &transcript.records()[2];
        assert_eq!(tool.tool_name.as_deref(), Some("search"));
        assert!(tool.tool_completed);
        assert_eq!(transcript.records()[3].content, "done");
    }

    #[test]
    fn consecutive_tools_overwrite_in_place() {
        let (mut transcript, mut reducer) = fresh();
        reducer.apply(&mut transcript, tool_use("a"));
        reducer.apply(&mut transcript, tool_use("b"));

        assert_eq!(transcript.len(), 2);
        let record = &transcript.records()[1];
        assert!(record.is_tool_active);
        assert_eq!(record.tool_name.as_deref(), Some("b"));
    }

    #[test]
    fn nearest_thinking_avatar_flips_to_greet() {
        let mut transcript = Transcript::new();
        let mut further_back = MessageRecord::assistant_text("old turn");
        further_back.avatar = AvatarState::Thinking;
        transcript.push(further_back);
        let mut nearest = MessageRecord::assistant_text("recent turn");
        nearest.avatar = AvatarState::Thinking;
        transcript.push(nearest);
        transcript.push(MessageRecord::user("question"));
        transcript.push(MessageRecord::assistant_placeholder());

        let mut reducer = StreamReducer::new();
        reducer.apply(&mut transcript, tool_use("search"));
        reducer.apply(&mut transcript, text("answer"));

        // Index 3 is the placeholder-turned-tool-record whose own Thinking
        // state must not be considered; the scan starts before it.
        assert_eq!(transcript.records()[1].avatar, AvatarState::Greet);
        assert_eq!(transcript.records()[0].avatar, AvatarState::Thinking);
    }

    #[test]
    fn stream_end_leaves_unresolved_tool_record() {
        let (mut transcript, mut reducer) = fresh();
        reducer.apply(&mut transcript, tool_use("search"));

        assert!(reducer.awaiting_post_tool_text());
        let record = &transcript.records()[1];
        assert!(record.is_tool_active);
        assert!(!record.tool_completed);
    }

    #[test]
    fn text_after_resolved_tool_keeps_accumulating() {
        let (mut transcript, mut reducer) = fresh();
        reducer.apply(&mut transcript, tool_use("search"));
        reducer.apply(&mut transcript, text("Found"));
        reducer.apply(&mut transcript, text(" it"));

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.records()[2].content, "Found it");
    }

    #[test]
    fn roles_and_ids_never_change() {
        let (mut transcript, mut reducer) = fresh();
        let ids: Vec<_> = transcript.records().iter().map(|r| r.id).collect();
        let roles: Vec<_> = transcript.records().iter().map(|r| r.role).collect();

        reducer.apply(&mut transcript, text("partial"));
        reducer.apply(&mut transcript, tool_use("search"));
        reducer.apply(&mut transcript, text("done"));

        for (i, (id, role)) in ids.iter().zip(roles.iter()).enumerate() {
            assert_eq!(transcript.records()[i].id, *id);
            assert_eq!(transcript.records()[i].role, *role);
        }
        assert_eq!(transcript.records()[0].role, MessageRole::User);
    }

    #[test]
    fn open_record_created_when_transcript_ends_with_user() {
        let mut transcript = Transcript::new();
        transcript.push(MessageRecord::user("question"));
        let mut reducer = StreamReducer::new();
        reducer.apply(&mut transcript, text("answer"));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.records()[1].role, MessageRole::Assistant);
        assert_eq!(transcript.records()[1].content, "answer");
    }
}
