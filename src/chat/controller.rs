//! The chat widget's view state.
//!
//! `ChatWidget` mediates between user input and the session: it keeps the
//! ordered message history, applies streamed fragments to the in-progress
//! reply, and tracks the loading/error/availability states. No error leaves
//! [`ChatWidget::submit`]; failures degrade to a fixed in-conversation
//! message or to keeping whatever partial text already streamed in.

use futures::StreamExt;

use crate::chat::session::{ChatSession, ReplyStreamer, SessionConfig};
use crate::client::GenerativeLanguage;
use crate::error::Result;
use crate::observability;
use crate::render::Renderer;
use crate::types::Role;

/// The greeting seeded as the first model message of every conversation.
pub const GREETING: &str =
    "Hi! I'm the portfolio assistant. Ask me anything about the projects, \
     experience, or tech stack you see here.";

/// The fixed reply shown when a send fails before any text arrives.
pub const APOLOGY: &str = "Sorry, I encountered an error connecting to the assistant service.";

/// One message in the conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// The message text. For a streaming reply this grows as fragments
    /// arrive.
    pub text: String,
    /// True only while this message is actively receiving fragments.
    pub is_streaming: bool,
}

impl ChatMessage {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            is_streaming: false,
        }
    }

    fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            is_streaming: false,
        }
    }

    fn placeholder() -> Self {
        Self {
            role: Role::Model,
            text: String::new(),
            is_streaming: true,
        }
    }
}

/// The chat widget: message history plus interaction state.
///
/// History is append-only except for the most recently appended model
/// message, which is replaced (never mutated in place) with a value derived
/// from the old one until its stream completes. At most one message is
/// streaming at any time.
pub struct ChatWidget<S: ReplyStreamer = GenerativeLanguage> {
    session: Option<ChatSession<S>>,
    messages: Vec<ChatMessage>,
    pending_input: String,
    is_sending: bool,
    is_open: bool,
    configuration_error: Option<String>,
}

impl ChatWidget<GenerativeLanguage> {
    /// Mounts the widget against a client creation result.
    ///
    /// A configuration failure (missing credential) yields the permanently
    /// disabled widget: no session is ever created and the feature renders
    /// nothing. The rest of the application is unaffected.
    pub fn mount(client: Result<GenerativeLanguage>, config: SessionConfig) -> Self {
        match client {
            Ok(client) => Self::with_session(ChatSession::new(client, config)),
            Err(err) => Self::disabled(err.to_string()),
        }
    }
}

impl<S: ReplyStreamer> ChatWidget<S> {
    /// Creates an enabled widget around an existing session.
    pub fn with_session(session: ChatSession<S>) -> Self {
        Self {
            session: Some(session),
            messages: vec![ChatMessage::model(GREETING)],
            pending_input: String::new(),
            is_sending: false,
            is_open: false,
            configuration_error: None,
        }
    }

    /// Creates the permanently disabled widget.
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            session: None,
            messages: Vec::new(),
            pending_input: String::new(),
            is_sending: false,
            is_open: false,
            configuration_error: Some(reason.into()),
        }
    }

    /// True when a session exists and the widget is interactive.
    pub fn enabled(&self) -> bool {
        self.session.is_some()
    }

    /// The configuration failure that disabled the widget, if any.
    pub fn configuration_error(&self) -> Option<&str> {
        self.configuration_error.as_deref()
    }

    /// The conversation so far, oldest message first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while a send is in flight.
    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// True when the widget is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Opens or closes the widget. Purely presentational; a disabled widget
    /// has no surface to open.
    pub fn toggle(&mut self) {
        if self.enabled() {
            self.is_open = !self.is_open;
        }
    }

    /// Replaces the pending input text.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.pending_input = input.into();
    }

    /// The pending input text.
    pub fn input(&self) -> &str {
        &self.pending_input
    }

    /// Submits the pending input, clearing it.
    pub async fn submit_pending(&mut self, renderer: &mut dyn Renderer) {
        let text = std::mem::take(&mut self.pending_input);
        self.submit(&text, renderer).await;
    }

    /// Submits a message and streams the reply into the conversation.
    ///
    /// A trimmed-empty message, a missing session, or a send already in
    /// flight make this a silent no-op. Otherwise the message history grows
    /// by exactly two entries: the user message and the reply (or the fixed
    /// apology when the send fails before any text arrives).
    pub async fn submit(&mut self, text: &str, renderer: &mut dyn Renderer) {
        let text = text.trim();
        if text.is_empty() || self.is_sending {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        observability::CHAT_SUBMITS.click();
        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::placeholder());
        self.is_sending = true;

        let mut total = String::new();
        let mut failed = false;
        match session.send(text).await {
            Ok(mut stream) => {
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(fragment) => {
                            if fragment.is_empty() {
                                continue;
                            }
                            total.push_str(&fragment);
                            // The placeholder carries the total so far; it is
                            // replaced wholesale, never extended in place.
                            let rendered = total.clone();
                            self.replace_last(|last| ChatMessage {
                                text: rendered,
                                ..last.clone()
                            });
                            renderer.print_text(&fragment);
                        }
                        Err(_) => {
                            failed = true;
                            break;
                        }
                    }
                }
            }
            Err(_) => failed = true,
        }

        if failed {
            observability::CHAT_FAILED_REPLIES.click();
        }
        let final_text = if failed && total.is_empty() {
            renderer.print_text(APOLOGY);
            APOLOGY.to_string()
        } else {
            total
        };
        self.replace_last(|last| ChatMessage {
            text: final_text,
            is_streaming: false,
            role: last.role,
        });
        self.is_sending = false;
        renderer.finish_response();
    }

    /// Resets the conversation to the seeded greeting.
    pub fn clear(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.clear();
            self.messages = vec![ChatMessage::model(GREETING)];
        }
    }

    /// The underlying session, when the widget is enabled.
    pub fn session(&self) -> Option<&ChatSession<S>> {
        self.session.as_ref()
    }

    fn replace_last(&mut self, derive: impl FnOnce(&ChatMessage) -> ChatMessage) {
        if let Some(last) = self.messages.last() {
            let updated = derive(last);
            let end = self.messages.len() - 1;
            self.messages[end] = updated;
        }
    }
}
