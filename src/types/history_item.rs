use serde::{Deserialize, Serialize};

use crate::types::message_record::{MessageRecord, MessageRole};

/// A read-only `{role, content}` projection of a message record.
///
/// History items exist only to be serialized into outbound requests; they are
/// never mutated after derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// The speaker.
    pub role: MessageRole,
    /// Whitespace-trimmed message text.
    pub content: String,
}

impl HistoryItem {
    /// Creates a new `HistoryItem`.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&MessageRecord> for HistoryItem {
    fn from(record: &MessageRecord) -> Self {
        Self {
            role: record.role,
            content: record.content.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization() {
        let item = HistoryItem::new(MessageRole::User, "hello");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn projection_trims_content() {
        let record = MessageRecord::user("  padded  ");
        let item = HistoryItem::from(&record);
        assert_eq!(item.content, "padded");
    }
}
