//! The conversational assistant embedded in the portfolio.
//!
//! This module implements the chat feature end to end:
//!
//! - Streaming replies applied to the conversation fragment by fragment
//! - A fail-closed disabled state when no credential is configured
//! - Slash commands for the portfolio views and session control
//! - Configurable model and generation parameters
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: the session manager owning service interaction and history
//! - [`controller`]: the widget state machine consuming reply streams
//! - [`commands`]: slash command parsing and handling

mod commands;
mod config;
mod controller;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use controller::{APOLOGY, ChatMessage, ChatWidget, GREETING};
pub use session::{ChatSession, ChunkStream, ReplyStream, ReplyStreamer, SessionConfig};

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::stream;

    use crate::chat::session::{ChunkStream, ReplyStreamer};
    use crate::error::{Error, Result};
    use crate::types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Model};

    /// A scripted stand-in for the real service.
    ///
    /// Each `stream_reply` call records the request it was given and plays
    /// back the next queued script; calls beyond the queue fail like a
    /// rejected request.
    pub(crate) struct ScriptedStreamer {
        scripts: Mutex<Vec<Vec<Result<GenerateContentResponse>>>>,
        requests: Mutex<Vec<GenerateContentRequest>>,
    }

    impl ScriptedStreamer {
        pub(crate) fn new(scripts: Vec<Vec<Result<GenerateContentResponse>>>) -> Self {
            Self {
                scripts: Mutex::new(scripts),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// The requests seen so far, in order.
        pub(crate) fn requests(&self) -> Vec<GenerateContentRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// A chunk carrying the given text fragment.
        pub(crate) fn chunk(text: &str) -> Result<GenerateContentResponse> {
            Ok(GenerateContentResponse {
                candidates: Some(vec![Candidate {
                    content: Some(Content::model(text)),
                    ..Candidate::default()
                }]),
                ..GenerateContentResponse::default()
            })
        }

        /// A chunk with no text at all.
        pub(crate) fn empty_chunk() -> Result<GenerateContentResponse> {
            Ok(GenerateContentResponse::default())
        }

        /// A mid-stream failure.
        pub(crate) fn failure() -> Result<GenerateContentResponse> {
            Err(Error::service_unavailable("scripted failure", None))
        }
    }

    #[async_trait]
    impl ReplyStreamer for ScriptedStreamer {
        async fn stream_reply(
            &self,
            _model: &Model,
            request: &GenerateContentRequest,
        ) -> Result<ChunkStream> {
            self.requests.lock().unwrap().push(request.clone());
            let mut scripts = self.scripts.lock().unwrap();
            if scripts.is_empty() {
                return Err(Error::service_unavailable("no script queued", None));
            }
            Ok(Box::pin(stream::iter(scripts.remove(0))))
        }
    }
}
