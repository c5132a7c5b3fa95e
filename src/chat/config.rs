//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::fmt;
use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::history::DEFAULT_HISTORY_WINDOW;

/// Default environment variable holding the bearer token.
const DEFAULT_TOKEN_VAR: &str = "AGENTCHAT_TOKEN";

/// Environment variable consulted when no endpoint argument is given.
const ENDPOINT_VAR: &str = "AGENTCHAT_ENDPOINT";

/// Command-line arguments for the agentchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Agent runtime endpoint.
    #[arrrg(optional, "Agent runtime endpoint URL", "URL")]
    pub endpoint: Option<String>,

    /// Environment variable holding the bearer token.
    #[arrrg(optional, "Token environment variable (default: AGENTCHAT_TOKEN)", "VAR")]
    pub token_var: Option<String>,

    /// Maximum history items per request.
    #[arrrg(optional, "History items per request (default: 20)", "N")]
    pub history_window: Option<usize>,

    /// Consent marker file location.
    #[arrrg(optional, "Consent marker file path", "PATH")]
    pub consent_path: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Skip the interactive consent prompt.
    #[arrrg(flag, "Assume consent without prompting")]
    pub agree: bool,
}

/// Errors resolving [`ChatArgs`] into a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatArgsError {
    /// No endpoint was given on the command line or in the environment.
    MissingEndpoint,
}

impl fmt::Display for ChatArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatArgsError::MissingEndpoint => {
                write!(
                    f,
                    "no agent endpoint: pass --endpoint or set {ENDPOINT_VAR}"
                )
            }
        }
    }
}

impl std::error::Error for ChatArgsError {}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The agent runtime endpoint URL.
    pub endpoint: String,

    /// Environment variable the token provider reads.
    pub token_var: String,

    /// Maximum history items per request.
    pub history_window: usize,

    /// Where the consent marker file lives, if consent is file-gated.
    pub consent_path: Option<PathBuf>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether consent was granted up front via `--agree`.
    pub assume_consent: bool,
}

impl ChatConfig {
    /// Resolves arguments into a configuration, falling back to the
    /// environment for the endpoint.
    pub fn resolve(args: ChatArgs) -> Result<Self, ChatArgsError> {
        let endpoint = args
            .endpoint
            .or_else(|| std::env::var(ENDPOINT_VAR).ok())
            .filter(|e| !e.is_empty())
            .ok_or(ChatArgsError::MissingEndpoint)?;
        Ok(ChatConfig {
            endpoint,
            token_var: args
                .token_var
                .unwrap_or_else(|| DEFAULT_TOKEN_VAR.to_string()),
            history_window: args.history_window.unwrap_or(DEFAULT_HISTORY_WINDOW),
            consent_path: args.consent_path.map(PathBuf::from),
            use_color: !args.no_color,
            assume_consent: args.agree,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_with_endpoint() {
        let args = ChatArgs {
            endpoint: Some("https://runtime.example.com/agents/a".to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::resolve(args).unwrap();
        assert_eq!(config.endpoint, "https://runtime.example.com/agents/a");
        assert_eq!(config.token_var, "AGENTCHAT_TOKEN");
        assert_eq!(config.history_window, 20);
        assert!(config.use_color);
        assert!(!config.assume_consent);
    }

    #[test]
    fn overrides_respected() {
        let args = ChatArgs {
            endpoint: Some("https://runtime.example.com".to_string()),
            token_var: Some("MY_TOKEN".to_string()),
            history_window: Some(5),
            no_color: true,
            agree: true,
            ..ChatArgs::default()
        };
        let config = ChatConfig::resolve(args).unwrap();
        assert_eq!(config.token_var, "MY_TOKEN");
        assert_eq!(config.history_window, 5);
        assert!(!config.use_color);
        assert!(config.assume_consent);
    }
}
