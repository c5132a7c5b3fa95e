//! Derives the bounded, cleaned history window sent with each request.

use crate::types::{HistoryItem, MessageRecord};

/// Default maximum number of history items per request.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Builds the conversation history window from a transcript snapshot.
///
/// Tool-status records are not conversational content and are filtered out,
/// content is whitespace-trimmed, and records left empty by trimming are
/// dropped. At most the last `max_items` surviving items are returned, oldest
/// first.
///
/// This is a pure function over its inputs: identical snapshots produce
/// identical windows.
pub fn build_history(records: &[MessageRecord], max_items: usize) -> Vec<HistoryItem> {
    let cleaned: Vec<HistoryItem> = records
        .iter()
        .filter(|record| !record.is_tool_active)
        .map(HistoryItem::from)
        .filter(|item| !item.content.is_empty())
        .collect();

    let start = cleaned.len().saturating_sub(max_items);
    cleaned[start..].to_vec()
}
