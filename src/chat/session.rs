//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns one long-lived
//! conversation with the generative-language service. Its single operation
//! is [`ChatSession::send`]: submit a user message, get back a lazy stream
//! of reply fragments.
//!
//! The REST service is stateless per call, so conversational context lives
//! in the session handle: committed turns are replayed on every request.
//! Callers never replay history themselves.

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context as TaskContext, Poll};

use async_trait::async_trait;
use futures::Stream;

use crate::client::GenerativeLanguage;
use crate::error::{Error, Result};
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, KnownModel, Model,
};

/// Default sampling temperature for portfolio conversations.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default ceiling on tokens per reply.
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// A boxed stream of raw response chunks from the service.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>;

/// The service seam the session talks through.
///
/// The real client implements this; tests substitute a scripted producer so
/// the streaming contract can be exercised without the network.
#[async_trait]
pub trait ReplyStreamer: Send + Sync {
    /// Submit a request and stream back response chunks.
    async fn stream_reply(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<ChunkStream>;
}

#[async_trait]
impl ReplyStreamer for GenerativeLanguage {
    async fn stream_reply(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<ChunkStream> {
        self.stream_generate(model, request).await
    }
}

#[async_trait]
impl<S: ReplyStreamer> ReplyStreamer for Arc<S> {
    async fn stream_reply(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<ChunkStream> {
        self.as_ref().stream_reply(model, request).await
    }
}

/// Configuration for a chat session.
///
/// Everything here is fixed at session creation; nothing mutates these
/// parameters afterwards.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The model to use for generating replies.
    pub model: Model,

    /// Persona and context block sent with every request.
    pub system_instruction: String,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Ceiling on tokens per reply.
    pub max_output_tokens: Option<u32>,
}

impl SessionConfig {
    /// Creates a session config with the given system instruction and the
    /// default model and sampling parameters.
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            model: Model::Known(KnownModel::Gemini25Flash),
            system_instruction: system_instruction.into(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_output_tokens: Some(DEFAULT_MAX_OUTPUT_TOKENS),
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the output token ceiling.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    fn generation_config(&self) -> GenerationConfig {
        let mut config = GenerationConfig::new();
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(max_output_tokens) = self.max_output_tokens {
            config = config.with_max_output_tokens(max_output_tokens);
        }
        config
    }
}

/// A chat session that retains conversation state across sends.
///
/// The session is exclusively owned by its widget; overlapping sends are
/// prevented by the widget's in-flight guard, not by locking here.
pub struct ChatSession<S: ReplyStreamer = GenerativeLanguage> {
    service: S,
    config: SessionConfig,
    history: Arc<Mutex<Vec<Content>>>,
}

impl<S: ReplyStreamer> ChatSession<S> {
    /// Creates a new chat session against the given service.
    pub fn new(service: S, config: SessionConfig) -> Self {
        Self {
            service,
            config,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sends a user message and returns the streamed reply.
    ///
    /// The user turn is committed to history before the request goes out;
    /// the reply is committed when the returned stream is fully drained. If
    /// the request or the stream fails, history rolls back to its pre-send
    /// length so the failed exchange is never replayed, though fragments
    /// already yielded stay delivered to the caller.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a trimmed-empty message, or the
    /// service error if the request itself is rejected.
    pub async fn send(&mut self, message: &str) -> Result<ReplyStream> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::validation(
                "message is empty",
                Some("message".to_string()),
            ));
        }

        let (contents, rollback_len) = {
            let mut history = lock_history(&self.history);
            let rollback_len = history.len();
            history.push(Content::user(message));
            (history.clone(), rollback_len)
        };

        let request = GenerateContentRequest::new(contents)
            .with_system_instruction(self.config.system_instruction.clone())
            .with_generation_config(self.config.generation_config());

        let chunks = match self.service.stream_reply(&self.config.model, &request).await {
            Ok(chunks) => chunks,
            Err(err) => {
                lock_history(&self.history).truncate(rollback_len);
                return Err(err);
            }
        };

        Ok(ReplyStream {
            inner: chunks,
            history: Arc::clone(&self.history),
            accumulated: String::new(),
            rollback_len,
            done: false,
        })
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        lock_history(&self.history).clear();
    }

    /// Returns the number of committed turns in the conversation.
    pub fn message_count(&self) -> usize {
        lock_history(&self.history).len()
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.config.model
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

/// A finite, non-restartable stream of reply fragments.
///
/// Wraps the raw chunk stream, yielding each chunk's text (possibly empty;
/// consumers skip empties rather than appending them) while accumulating
/// the reply. When the inner stream is drained the accumulated text is
/// committed to session history; the first error fuses the stream after
/// rolling history back.
pub struct ReplyStream {
    inner: ChunkStream,
    history: Arc<Mutex<Vec<Content>>>,
    accumulated: String,
    rollback_len: usize,
    done: bool,
}

impl std::fmt::Debug for ReplyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyStream")
            .field("accumulated", &self.accumulated)
            .field("rollback_len", &self.rollback_len)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl Stream for ReplyStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }
        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                let fragment = chunk.text();
                if !fragment.is_empty() {
                    self.accumulated.push_str(&fragment);
                }
                Poll::Ready(Some(Ok(fragment)))
            }
            Poll::Ready(Some(Err(err))) => {
                self.done = true;
                lock_history(&self.history).truncate(self.rollback_len);
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                self.done = true;
                if !self.accumulated.is_empty() {
                    let reply = std::mem::take(&mut self.accumulated);
                    lock_history(&self.history).push(Content::model(reply));
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Locks the history, recovering from a poisoned mutex rather than
/// propagating the panic of whichever task poisoned it.
fn lock_history(history: &Mutex<Vec<Content>>) -> MutexGuard<'_, Vec<Content>> {
    history.lock().unwrap_or_else(|err| err.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testutil::ScriptedStreamer;
    use crate::types::Role;
    use futures::StreamExt;

    fn session_with(service: Arc<ScriptedStreamer>) -> ChatSession<Arc<ScriptedStreamer>> {
        ChatSession::new(service, SessionConfig::new("Be helpful."))
    }

    #[tokio::test]
    async fn fragments_arrive_in_order() {
        let service = Arc::new(ScriptedStreamer::new(vec![vec![
            ScriptedStreamer::chunk("Hel"),
            ScriptedStreamer::empty_chunk(),
            ScriptedStreamer::chunk("lo"),
        ]]));
        let mut session = session_with(Arc::clone(&service));

        let mut stream = session.send("Hi").await.unwrap();
        let mut fragments = Vec::new();
        while let Some(item) = stream.next().await {
            fragments.push(item.unwrap());
        }

        // Empty fragments are forwarded; skipping them is the consumer's job.
        assert_eq!(fragments, vec!["Hel".to_string(), String::new(), "lo".to_string()]);
    }

    #[tokio::test]
    async fn drained_reply_is_committed_to_history() {
        let service = Arc::new(ScriptedStreamer::new(vec![
            vec![
                ScriptedStreamer::chunk("Hel"),
                ScriptedStreamer::chunk("lo"),
            ],
            vec![ScriptedStreamer::chunk("Again")],
        ]));
        let mut session = session_with(Arc::clone(&service));

        let mut stream = session.send("Hi").await.unwrap();
        while stream.next().await.is_some() {}
        assert_eq!(session.message_count(), 2);

        let mut stream = session.send("And?").await.unwrap();
        while stream.next().await.is_some() {}

        let requests = service.requests();
        assert_eq!(requests.len(), 2);
        let second = &requests[1];
        assert_eq!(second.contents.len(), 3);
        assert_eq!(second.contents[0].role, Some(Role::User));
        assert_eq!(second.contents[1].role, Some(Role::Model));
        assert_eq!(second.contents[1].joined_text(), "Hello");
        assert_eq!(second.contents[2].role, Some(Role::User));
    }

    #[tokio::test]
    async fn stream_failure_rolls_history_back() {
        let service = Arc::new(ScriptedStreamer::new(vec![
            vec![
                ScriptedStreamer::chunk("Par"),
                ScriptedStreamer::chunk("tial"),
                ScriptedStreamer::failure(),
            ],
            vec![ScriptedStreamer::chunk("Fresh")],
        ]));
        let mut session = session_with(Arc::clone(&service));

        let mut stream = session.send("Hi").await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), "Par");
        assert_eq!(stream.next().await.unwrap().unwrap(), "tial");
        assert!(stream.next().await.unwrap().is_err());

        // Fused after the error.
        assert!(stream.next().await.is_none());

        // The failed exchange is not replayed on the next send.
        assert_eq!(session.message_count(), 0);
        let mut stream = session.send("Retry").await.unwrap();
        while stream.next().await.is_some() {}
        assert_eq!(service.requests()[1].contents.len(), 1);
    }

    #[tokio::test]
    async fn request_failure_rolls_history_back() {
        let service = Arc::new(ScriptedStreamer::new(Vec::new()));
        let mut session = session_with(service);

        assert!(session.send("Hi").await.is_err());
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn empty_reply_commits_no_model_turn() {
        let service = Arc::new(ScriptedStreamer::new(vec![
            vec![ScriptedStreamer::empty_chunk()],
            vec![ScriptedStreamer::chunk("ok")],
        ]));
        let mut session = session_with(Arc::clone(&service));

        let mut stream = session.send("Hi").await.unwrap();
        while stream.next().await.is_some() {}
        assert_eq!(session.message_count(), 1);

        let mut stream = session.send("Still there?").await.unwrap();
        while stream.next().await.is_some() {}
        let second = &service.requests()[1];
        assert!(second.contents.iter().all(|c| c.role == Some(Role::User)));
        assert_eq!(second.contents.len(), 2);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let service = Arc::new(ScriptedStreamer::new(Vec::new()));
        let mut session = session_with(service);

        let err = session.send("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn request_carries_fixed_parameters() {
        let service = Arc::new(ScriptedStreamer::new(vec![vec![ScriptedStreamer::chunk(
            "ok",
        )]]));
        let config = SessionConfig::new("You are a portfolio assistant.")
            .with_temperature(Some(0.4))
            .with_max_output_tokens(Some(256));
        let mut session = ChatSession::new(Arc::clone(&service), config);

        let mut stream = session.send("Hi").await.unwrap();
        while stream.next().await.is_some() {}

        let request = &service.requests()[0];
        let instruction = request.system_instruction.as_ref().unwrap();
        assert_eq!(instruction.joined_text(), "You are a portfolio assistant.");
        let generation = request.generation_config.as_ref().unwrap();
        assert_eq!(generation.temperature, Some(0.4));
        assert_eq!(generation.max_output_tokens, Some(256));
    }

    #[test]
    fn clear_session() {
        let service = Arc::new(ScriptedStreamer::new(Vec::new()));
        let mut session = session_with(service);

        lock_history(&session.history).push(Content::user("test"));
        assert_eq!(session.message_count(), 1);

        session.clear();
        assert_eq!(session.message_count(), 0);
    }
}
