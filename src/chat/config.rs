//! Configuration types for the portfolio terminal.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling the application.

use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::chat::session::SessionConfig;
use crate::types::{KnownModel, Model};

/// Default maximum tokens per reply.
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Command-line arguments for the folio-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for the assistant.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// Maximum tokens per reply.
    #[arrrg(optional, "Max tokens per reply (default: 500)", "TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Portfolio content file overriding the built-in bundle.
    #[arrrg(optional, "Portfolio content YAML file", "FILE")]
    pub content: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for the application.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating replies.
    pub model: Model,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Maximum tokens per reply.
    pub max_output_tokens: Option<u32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Portfolio content file, when the built-in bundle is overridden.
    pub content_path: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-flash
    /// - Temperature: 0.7
    /// - Max output tokens: 500
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::Gemini25Flash),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_output_tokens: Some(DEFAULT_MAX_OUTPUT_TOKENS),
            use_color: true,
            content_path: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens per reply.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the content file path.
    pub fn with_content_path(mut self, path: Option<PathBuf>) -> Self {
        self.content_path = path;
        self
    }

    /// Builds the session configuration carrying the given system
    /// instruction. The session's parameters are fixed from this config at
    /// creation time.
    pub fn session_config(&self, system_instruction: impl Into<String>) -> SessionConfig {
        SessionConfig::new(system_instruction)
            .with_model(self.model.clone())
            .with_temperature(self.temperature)
            .with_max_output_tokens(self.max_output_tokens)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = match args.model {
            Some(name) => name.parse::<Model>().unwrap_or(Model::Custom(name)),
            None => Model::Known(KnownModel::Gemini25Flash),
        };

        ChatConfig {
            model,
            max_output_tokens: args
                .max_output_tokens
                .or(Some(DEFAULT_MAX_OUTPUT_TOKENS)),
            use_color: !args.no_color,
            content_path: args.content.map(PathBuf::from),
            ..ChatConfig::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_output_tokens, Some(500));
        assert!(config.use_color);
        assert!(config.content_path.is_none());
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.max_output_tokens, Some(500));
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            max_output_tokens: Some(1024),
            content: Some("content.yaml".to_string()),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.max_output_tokens, Some(1024));
        assert!(!config.use_color);
        assert_eq!(config.content_path, Some(PathBuf::from("content.yaml")));
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gemini25Pro))
            .with_temperature(Some(0.4))
            .with_max_output_tokens(Some(256))
            .without_color()
            .with_content_path(Some(PathBuf::from("alt.yaml")));

        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.max_output_tokens, Some(256));
        assert!(!config.use_color);
        assert_eq!(config.content_path, Some(PathBuf::from("alt.yaml")));
    }

    #[test]
    fn session_config_carries_parameters() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gemini25Pro))
            .with_temperature(Some(0.4));
        let session = config.session_config("Be helpful.");

        assert_eq!(session.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(session.system_instruction, "Be helpful.");
        assert_eq!(session.temperature, Some(0.4));
        assert_eq!(session.max_output_tokens, Some(500));
    }
}
