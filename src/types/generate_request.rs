use serde::{Deserialize, Serialize};

use crate::types::{Content, GenerationConfig};

/// The request body for `generateContent` and `streamGenerateContent`.
///
/// The service is stateless per call: the full conversation to date travels
/// in `contents` on every request, oldest turn first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation turns, oldest first, ending with the new user turn.
    pub contents: Vec<Content>,

    /// Persona and context for the model, fixed for the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    /// Sampling parameters, fixed for the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Creates a request carrying the given conversation turns.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::system(instruction));
        self
    }

    /// Sets the generation config.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}
