//! Chat application module for interactive conversations with a remote agent.
//!
//! This module provides a streaming REPL chat interface built on top of the
//! agentchat client library. It supports:
//!
//! - Streaming responses with real-time token display
//! - Tool invocation banners interleaved with text
//! - Slash commands for session control
//! - Configurable endpoint, credential source, and history window
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Transcript ownership and streaming submission
//! - [`commands`]: Slash command parsing

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatArgsError, ChatConfig};
pub use session::{ChatSession, SubmitOutcome};
