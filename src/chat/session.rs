//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript
//! and drives one streaming submission at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;

use crate::client::AgentClient;
use crate::error::{Error, Result};
use crate::history::{DEFAULT_HISTORY_WINDOW, build_history};
use crate::observability::{SESSION_REJECTIONS, SESSION_STREAM_FAILURES, SESSION_SUBMISSIONS};
use crate::providers::{ConsentGate, TokenProvider};
use crate::render::Renderer;
use crate::transcript::{StreamReducer, Transcript};
use crate::types::{InvocationRequest, MessageRecord, StreamEvent};

/// What happened to a `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The response stream was driven to its end.
    Completed,
    /// A precondition failed (empty prompt, consent withheld, or a
    /// submission already in flight). No state changed; not an error.
    Rejected,
}

/// A chat session that manages the transcript and drives streaming
/// submissions against the agent runtime.
///
/// The session is the single writer of its transcript: at most one
/// submission is in flight at a time, and events are applied to the
/// transcript strictly in arrival order.
pub struct ChatSession {
    client: AgentClient,
    tokens: Arc<dyn TokenProvider>,
    consent: Arc<dyn ConsentGate>,
    transcript: Transcript,
    history_window: usize,
    in_flight: bool,
    interrupt: Option<Arc<AtomicBool>>,
}

impl ChatSession {
    /// Creates a new session over the given client and collaborators.
    pub fn new(
        client: AgentClient,
        tokens: Arc<dyn TokenProvider>,
        consent: Arc<dyn ConsentGate>,
    ) -> Self {
        Self {
            client,
            tokens,
            consent,
            transcript: Transcript::new(),
            history_window: DEFAULT_HISTORY_WINDOW,
            in_flight: false,
            interrupt: None,
        }
    }

    /// Sets the maximum number of history items sent per request.
    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }

    /// Installs a flag that, once set, aborts the in-flight stream at the
    /// next event boundary. Dropping the stream closes the transport.
    pub fn set_interrupt(&mut self, interrupt: Arc<AtomicBool>) {
        self.interrupt = Some(interrupt);
    }

    /// Returns the transcript for rendering.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns true while a submission is in flight.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Clears the transcript. Rejected while a submission is in flight.
    pub fn clear(&mut self) {
        if !self.in_flight {
            self.transcript.clear();
        }
    }

    /// Submits a user prompt and streams the response into the transcript.
    ///
    /// Preconditions: the prompt must be non-empty after trimming, no
    /// submission may be in flight, and the consent gate must be granted.
    /// An unmet precondition makes the call a no-op returning
    /// [`SubmitOutcome::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns an error if no credential is available, the request fails, or
    /// the stream decodes a malformed payload. The transcript keeps whatever
    /// records were applied before the failure.
    pub async fn submit(
        &mut self,
        prompt: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<SubmitOutcome> {
        let prompt = prompt.trim();
        if prompt.is_empty() || self.in_flight || !self.consent.is_granted() {
            SESSION_REJECTIONS.click();
            return Ok(SubmitOutcome::Rejected);
        }

        let Some(token) = self.tokens.access_token().await else {
            return Err(Error::authentication(
                "credential provider returned no token",
            ));
        };

        SESSION_SUBMISSIONS.click();
        self.transcript.push(MessageRecord::user(prompt));
        let history = build_history(self.transcript.records(), self.history_window);
        self.transcript.push(MessageRecord::assistant_placeholder());
        let request = InvocationRequest::new(prompt, history);

        self.in_flight = true;
        let result = self.run_stream(&token, &request, renderer).await;
        self.in_flight = false;
        renderer.finish_response();

        match result {
            Ok(()) => Ok(SubmitOutcome::Completed),
            Err(err) => {
                SESSION_STREAM_FAILURES.click();
                Err(err)
            }
        }
    }

    async fn run_stream(
        &mut self,
        token: &str,
        request: &InvocationRequest,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let stream = self.client.invoke(token, request).await?;
        futures::pin_mut!(stream);

        let mut reducer = StreamReducer::new();
        renderer.start_response();

        while let Some(item) = stream.next().await {
            if let Some(interrupt) = &self.interrupt
                && interrupt.load(Ordering::Relaxed)
            {
                break;
            }
            let event = item?;
            self.render_event(&reducer, &event, renderer);
            reducer.apply(&mut self.transcript, event);
        }
        Ok(())
    }

    /// Mirrors the reducer's upcoming mutation to the renderer. Display
    /// only; all event semantics live in the reducer.
    fn render_event(&self, reducer: &StreamReducer, event: &StreamEvent, renderer: &mut dyn Renderer) {
        match event {
            StreamEvent::ToolUse { tool_name } => {
                renderer.tool_started(tool_name.as_deref());
            }
            StreamEvent::TextDelta { data } => {
                if reducer.awaiting_post_tool_text() {
                    // The unresolved tool record is always the last record
                    // while awaiting post-tool text.
                    let tool_name = self
                        .transcript
                        .records()
                        .last()
                        .and_then(|record| record.tool_name.as_deref());
                    renderer.tool_completed(tool_name);
                }
                renderer.print_text(data);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{AlwaysGranted, StaticToken};
    use crate::render::RecordingRenderer;

    struct DeniedConsent;

    impl ConsentGate for DeniedConsent {
        fn is_granted(&self) -> bool {
            false
        }
    }

    struct NoToken;

    #[async_trait::async_trait]
    impl TokenProvider for NoToken {
        async fn access_token(&self) -> Option<String> {
            None
        }
    }

    fn session_with(consent: Arc<dyn ConsentGate>, tokens: Arc<dyn TokenProvider>) -> ChatSession {
        let client = AgentClient::new("http://127.0.0.1:9/agent").unwrap();
        ChatSession::new(client, tokens, consent)
    }

    #[tokio::test]
    async fn empty_prompt_rejected() {
        let mut session = session_with(Arc::new(AlwaysGranted), Arc::new(StaticToken::new("t")));
        let mut renderer = RecordingRenderer::default();
        let outcome = session.submit("   ", &mut renderer).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn consent_withheld_rejected() {
        let mut session = session_with(Arc::new(DeniedConsent), Arc::new(StaticToken::new("t")));
        let mut renderer = RecordingRenderer::default();
        let outcome = session.submit("hello", &mut renderer).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn missing_token_is_fatal_before_any_network_call() {
        let mut session = session_with(Arc::new(AlwaysGranted), Arc::new(NoToken));
        let mut renderer = RecordingRenderer::default();
        let err = session.submit("hello", &mut renderer).await.unwrap_err();
        assert!(err.is_authentication());
        // The submission never got far enough to append records.
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_clears_in_flight_and_keeps_records() {
        // Port 9 (discard) refuses connections; the request itself fails.
        let mut session = session_with(Arc::new(AlwaysGranted), Arc::new(StaticToken::new("t")));
        let mut renderer = RecordingRenderer::default();
        let err = session.submit("hello", &mut renderer).await.unwrap_err();
        assert!(err.is_transport() || matches!(err, Error::HttpClient { .. }));
        assert!(!session.is_in_flight());
        // User record and placeholder were appended before the request.
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn clear_resets_transcript() {
        let mut session = session_with(Arc::new(AlwaysGranted), Arc::new(StaticToken::new("t")));
        let mut renderer = RecordingRenderer::default();
        let _ = session.submit("hello", &mut renderer).await;
        assert!(!session.transcript().is_empty());
        session.clear();
        assert!(session.transcript().is_empty());
    }
}
