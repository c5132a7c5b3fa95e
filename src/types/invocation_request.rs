use serde::{Deserialize, Serialize};

use crate::types::history_item::HistoryItem;

/// The body of an outbound invocation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// The newest user prompt, already trimmed.
    pub prompt: String,
    /// The bounded, cleaned history window preceding the prompt.
    pub history: Vec<HistoryItem>,
}

impl InvocationRequest {
    /// Creates a new invocation request.
    pub fn new(prompt: impl Into<String>, history: Vec<HistoryItem>) -> Self {
        Self {
            prompt: prompt.into(),
            history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::message_record::MessageRole;

    #[test]
    fn serialization() {
        let request = InvocationRequest::new(
            "what's next?",
            vec![HistoryItem::new(MessageRole::User, "hello")],
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "prompt": "what's next?",
                "history": [{"role": "user", "content": "hello"}]
            })
        );
    }
}
