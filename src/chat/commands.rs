//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending prompts
//! to the agent.

/// A parsed chat command.
///
/// These commands control the chat session and are never sent to the agent.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the transcript.
    Clear,

    /// Print the transcript accumulated so far.
    History,

    /// Set the history window size for subsequent requests.
    HistoryWindow(usize),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular prompt.
///
/// # Examples
///
/// ```
/// # use agentchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/history").is_some());
/// assert!(parse_command("Hello!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "history" => ChatCommand::History,
        "window" => match argument {
            Some(arg) => match arg.parse::<usize>() {
                Ok(value) if value > 0 => ChatCommand::HistoryWindow(value),
                _ => ChatCommand::Invalid("/window expects a positive integer".to_string()),
            },
            None => ChatCommand::Invalid("/window requires a value".to_string()),
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns the help text listing available commands.
pub fn help_text() -> &'static str {
    "Available commands:
/help           Show this help message
/clear          Clear the transcript
/history        Print the transcript accumulated so far
/window <n>     Set the history window size
/quit           Exit the application"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_text_is_not_a_command() {
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
    }

    #[test]
    fn window_command() {
        assert_eq!(parse_command("/window 10"), Some(ChatCommand::HistoryWindow(10)));
        assert!(matches!(
            parse_command("/window"),
            Some(ChatCommand::Invalid(_))
        ));
        assert!(matches!(
            parse_command("/window 0"),
            Some(ChatCommand::Invalid(_))
        ));
        assert!(matches!(
            parse_command("/window many"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert!(matches!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(parse_command("/QUIT"), Some(ChatCommand::Quit));
    }
}
