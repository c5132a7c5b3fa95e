// Public modules
pub mod history_item;
pub mod invocation_request;
pub mod message_record;
pub mod stream_event;

// Re-exports
pub use history_item::HistoryItem;
pub use invocation_request::InvocationRequest;
pub use message_record::{AvatarState, MessageId, MessageRecord, MessageRole};
pub use stream_event::StreamEvent;
