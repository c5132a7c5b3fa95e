//! Interactive chat application for conversing with a remote agent runtime.
//!
//! This binary provides a streaming REPL interface over the agentchat client
//! library.
//!
//! # Usage
//!
//! ```bash
//! # Point at a runtime and chat
//! agentchat --endpoint https://runtime.example.com/agents/my-agent
//!
//! # Endpoint and token from the environment
//! export AGENTCHAT_ENDPOINT=https://runtime.example.com/agents/my-agent
//! export AGENTCHAT_TOKEN=eyJ...
//! agentchat
//!
//! # Disable colors (useful for piping output)
//! agentchat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear the transcript
//! - `/history` - Print the transcript accumulated so far
//! - `/window <n>` - Set the history window size
//! - `/quit` - Exit the application

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use agentchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, SubmitOutcome,
    help_text, parse_command,
};
use agentchat::{AgentClient, AlwaysGranted, AvatarState, ConsentGate, EnvToken, MessageRole};

/// Consent gate backed by a marker file's existence.
struct MarkerConsent {
    path: PathBuf,
}

impl ConsentGate for MarkerConsent {
    fn is_granted(&self) -> bool {
        self.path.exists()
    }
}

/// Default marker location: `$HOME/.agentchat_consent`, or the current
/// directory when HOME is unset.
fn default_consent_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".agentchat_consent")
}

/// Prompts for consent once and persists the answer as a marker file.
///
/// Returns false when the user declines.
fn obtain_consent(rl: &mut DefaultEditor, path: &Path) -> bool {
    if path.exists() {
        return true;
    }
    println!(
        "This client sends your prompts and recent conversation history to the\n\
         configured agent endpoint."
    );
    match rl.readline("Continue? [y/N] ") {
        Ok(answer) if answer.trim().eq_ignore_ascii_case("y") => {
            if let Err(err) = std::fs::write(path, "agreed\n") {
                eprintln!("warning: could not persist consent marker: {err}");
            }
            true
        }
        _ => false,
    }
}

fn print_transcript(session: &ChatSession) {
    for record in session.transcript().records() {
        let speaker = match record.role {
            MessageRole::User => "You",
            MessageRole::Assistant => "Agent",
        };
        if record.tool_name.is_some() {
            let status = if record.tool_completed {
                "done"
            } else if record.is_tool_active {
                "running"
            } else {
                "pending"
            };
            println!(
                "{speaker}: [tool: {} ({status})]",
                record.tool_name.as_deref().unwrap_or("?")
            );
        } else if !record.content.is_empty() {
            let marker = match record.avatar {
                AvatarState::Thinking => " *",
                _ => "",
            };
            println!("{speaker}{marker}: {}", record.content);
        }
    }
}

/// Main entry point for the agentchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("agentchat [OPTIONS]");
    let config = ChatConfig::resolve(args)?;
    let use_color = config.use_color;

    let mut rl = DefaultEditor::new()?;

    let consent: Arc<dyn ConsentGate> = if config.assume_consent {
        Arc::new(AlwaysGranted)
    } else {
        let path = config
            .consent_path
            .clone()
            .unwrap_or_else(default_consent_path);
        if !obtain_consent(&mut rl, &path) {
            println!("Consent declined; nothing will be sent. Goodbye.");
            return Ok(());
        }
        Arc::new(MarkerConsent { path })
    };

    let client = AgentClient::new(config.endpoint.clone())?;
    let tokens = Arc::new(EnvToken::new(config.token_var.clone()));
    let mut session =
        ChatSession::new(client, tokens, consent).with_history_window(config.history_window);
    let mut renderer = PlainTextRenderer::with_color(use_color);

    // Flag for interrupt handling during streaming
    let interrupted = Arc::new(AtomicBool::new(false));
    session.set_interrupt(interrupted.clone());

    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Agent chat ({})", config.endpoint);
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Transcript cleared.");
                        }
                        ChatCommand::History => {
                            print_transcript(&session);
                        }
                        ChatCommand::HistoryWindow(value) => {
                            session = session.with_history_window(value);
                            renderer.print_info(&format!("History window set to {value}"));
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                print!("Agent: ");
                let _ = std::io::Write::flush(&mut std::io::stdout());
                match session.submit(line, &mut renderer).await {
                    Ok(SubmitOutcome::Completed) => {}
                    Ok(SubmitOutcome::Rejected) => {
                        renderer.print_info("Nothing sent (empty prompt or consent withheld).");
                    }
                    Err(err) => {
                        renderer.print_error(&format!("Error: {err}"));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error reading input: {err}");
                break;
            }
        }
    }

    Ok(())
}
