// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod history;
pub mod observability;
pub mod providers;
pub mod render;
pub mod sse;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::AgentClient;
pub use error::{Error, Result};
pub use history::{DEFAULT_HISTORY_WINDOW, build_history};
pub use providers::{AlwaysGranted, ConsentGate, EnvToken, StaticToken, TokenProvider};
pub use render::{PlainTextRenderer, Renderer};
pub use sse::process_sse;
pub use transcript::{StreamReducer, Transcript};
pub use types::*;
