use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque, unique identifier for a message record.
///
/// Assigned once at record creation and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        MessageId(Uuid::new_v4())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The speaker of a message record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// A message from the human user.
    User,
    /// A message from the agent.
    Assistant,
}

/// A presentation hint attached to assistant records.
///
/// The renderer decides what to do with it; the reducer only guarantees that
/// `Thinking` flips to `Greet` on the nearest earlier assistant turn when a
/// tool invocation completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarState {
    /// No hint.
    #[default]
    None,
    /// The agent is working on a response.
    Thinking,
    /// A prior open turn acknowledging completed tool work.
    Greet,
}

/// A single unit of the transcript.
///
/// Records are created by the session (user messages, assistant placeholders)
/// and by the stream reducer (tool records, post-tool text records). They are
/// mutated in place during streaming but never removed, and `id` and `role`
/// are invariant for the lifetime of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Unique identifier, assigned at creation.
    pub id: MessageId,

    /// Who authored the record.
    pub role: MessageRole,

    /// Accumulated display text. Empty for assistant placeholders; grows
    /// monotonically while the record is open for streaming.
    pub content: String,

    /// True while a tool invocation is in progress and has produced no
    /// output yet.
    pub is_tool_active: bool,

    /// Set the instant the first text after a tool invocation arrives.
    pub tool_completed: bool,

    /// Label of the tool currently or previously associated with this record.
    pub tool_name: Option<String>,

    /// Presentation hint for the avatar.
    #[serde(default)]
    pub avatar: AvatarState,
}

impl MessageRecord {
    /// Creates a user record with the given content.
    pub fn user(content: impl Into<String>) -> Self {
        MessageRecord {
            id: MessageId::generate(),
            role: MessageRole::User,
            content: content.into(),
            is_tool_active: false,
            tool_completed: false,
            tool_name: None,
            avatar: AvatarState::None,
        }
    }

    /// Creates an empty assistant placeholder, open for text accumulation.
    pub fn assistant_placeholder() -> Self {
        MessageRecord {
            id: MessageId::generate(),
            role: MessageRole::Assistant,
            content: String::new(),
            is_tool_active: false,
            tool_completed: false,
            tool_name: None,
            avatar: AvatarState::Thinking,
        }
    }

    /// Creates an assistant record seeded with streamed text.
    pub fn assistant_text(content: impl Into<String>) -> Self {
        MessageRecord {
            id: MessageId::generate(),
            role: MessageRole::Assistant,
            content: content.into(),
            is_tool_active: false,
            tool_completed: false,
            tool_name: None,
            avatar: AvatarState::None,
        }
    }

    /// Creates an assistant record representing an in-progress tool invocation.
    pub fn assistant_tool(tool_name: Option<String>) -> Self {
        MessageRecord {
            id: MessageId::generate(),
            role: MessageRole::Assistant,
            content: String::new(),
            is_tool_active: true,
            tool_completed: false,
            tool_name,
            avatar: AvatarState::Thinking,
        }
    }
}
