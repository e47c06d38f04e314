use serde::{Deserialize, Serialize};

use crate::types::Content;

/// One response chunk from the service.
///
/// A non-streaming call returns exactly one of these; a streaming call
/// yields a sequence of them, each carrying an incremental slice of the
/// reply. A chunk's text may be absent or empty; consumers skip such
/// fragments rather than appending them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate replies. In practice the service returns at most one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,

    /// Token accounting for the request, present on the final chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// The concrete model version that served the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// The text fragment this chunk carries: the joined part texts of the
    /// first candidate, or an empty string when the chunk has none.
    pub fn text(&self) -> String {
        self.candidates
            .as_deref()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.content.as_ref())
            .map(Content::joined_text)
            .unwrap_or_default()
    }

    /// The finish reason of the first candidate, if reported.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .as_deref()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }
}

/// A candidate reply within a response chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content slice for this chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped, reported on the final chunk
    /// (e.g. `STOP`, `MAX_TOKENS`, `SAFETY`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    /// Candidate index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Token counts for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt, including history and system instruction.
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens generated across all candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Total tokens billed for the request.
    #[serde(default)]
    pub total_token_count: u64,
}
