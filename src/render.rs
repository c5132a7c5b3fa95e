//! Output rendering for streamed chat responses.
//!
//! The core only mutates the transcript; anything visual goes through the
//! [`Renderer`] trait so embedders can swap in their own display layer.

use std::io::{self, Write};

/// ANSI escape code for dim text (used for tool banners).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for cyan text (used for tool names).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering streaming chat output.
///
/// Methods mirror what the reducer does to the transcript: text lands
/// incrementally, tool invocations start and later resolve, and the session
/// reports errors and informational notices.
pub trait Renderer: Send {
    /// Called when a response stream begins.
    fn start_response(&mut self) {}

    /// Called when a response stream finishes, successfully or not.
    fn finish_response(&mut self) {}

    /// Print a chunk of streamed response text.
    fn print_text(&mut self, text: &str);

    /// Called when the agent starts invoking a tool.
    fn tool_started(&mut self, tool_name: Option<&str>);

    /// Called when a tool invocation resolves (first text arrived after it).
    fn tool_completed(&mut self, tool_name: Option<&str>);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// A renderer that prints to stdout with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: io::Stdout,
    use_color: bool,
    /// True while mid-line streamed text needs a newline before banners.
    mid_line: bool,
}

impl PlainTextRenderer {
    /// Creates a renderer with ANSI styling enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a renderer with ANSI styling on or off.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            mid_line: false,
        }
    }

    fn break_line(&mut self) {
        if self.mid_line {
            let _ = writeln!(self.stdout);
            self.mid_line = false;
        }
    }

    fn styled(&self, code: &str, text: &str) -> String {
        if self.use_color {
            format!("{code}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn finish_response(&mut self) {
        self.break_line();
        let _ = writeln!(self.stdout);
        let _ = self.stdout.flush();
    }

    fn print_text(&mut self, text: &str) {
        let _ = write!(self.stdout, "{text}");
        let _ = self.stdout.flush();
        self.mid_line = !text.ends_with('\n');
    }

    fn tool_started(&mut self, tool_name: Option<&str>) {
        self.break_line();
        let name = tool_name.unwrap_or("tool");
        let banner = format!(
            "{} {}...",
            self.styled(ANSI_DIM, "using"),
            self.styled(ANSI_CYAN, name)
        );
        let _ = writeln!(self.stdout, "{banner}");
        let _ = self.stdout.flush();
    }

    fn tool_completed(&mut self, tool_name: Option<&str>) {
        self.break_line();
        let name = tool_name.unwrap_or("tool");
        let banner = format!(
            "{} {}",
            self.styled(ANSI_CYAN, name),
            self.styled(ANSI_DIM, "done")
        );
        let _ = writeln!(self.stdout, "{banner}");
        let _ = self.stdout.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.break_line();
        let message = self.styled(ANSI_RED, error);
        let _ = writeln!(self.stdout, "{message}");
        let _ = self.stdout.flush();
    }

    fn print_info(&mut self, info: &str) {
        self.break_line();
        let message = self.styled(ANSI_DIM, info);
        let _ = writeln!(self.stdout, "{message}");
        let _ = self.stdout.flush();
    }
}

/// A renderer that records calls, for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingRenderer {
    pub(crate) texts: Vec<String>,
    pub(crate) tools_started: Vec<Option<String>>,
    pub(crate) tools_completed: Vec<Option<String>>,
    pub(crate) errors: Vec<String>,
}

#[cfg(test)]
impl Renderer for RecordingRenderer {
    fn print_text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }

    fn tool_started(&mut self, tool_name: Option<&str>) {
        self.tools_started.push(tool_name.map(String::from));
    }

    fn tool_completed(&mut self, tool_name: Option<&str>) {
        self.tools_completed.push(tool_name.map(String::from));
    }

    fn print_error(&mut self, error: &str) {
        self.errors.push(error.to_string());
    }

    fn print_info(&mut self, _info: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_renderer_captures_calls() {
        let mut renderer = RecordingRenderer::default();
        renderer.print_text("hello");
        renderer.tool_started(Some("search"));
        renderer.tool_completed(Some("search"));
        renderer.print_error("boom");
        assert_eq!(renderer.texts, vec!["hello"]);
        assert_eq!(renderer.tools_started, vec![Some("search".to_string())]);
        assert_eq!(renderer.tools_completed, vec![Some("search".to_string())]);
        assert_eq!(renderer.errors, vec!["boom"]);
    }

    #[test]
    fn styling_only_applies_with_color() {
        let colored = PlainTextRenderer::with_color(true);
        assert_eq!(
            colored.styled(ANSI_DIM, "x"),
            format!("{ANSI_DIM}x{ANSI_RESET}")
        );
        let plain = PlainTextRenderer::with_color(false);
        assert_eq!(plain.styled(ANSI_DIM, "x"), "x");
    }
}
