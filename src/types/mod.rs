// Public modules
pub mod content;
pub mod generate_request;
pub mod generate_response;
pub mod generation_config;
pub mod model;

// Re-exports
pub use content::{Content, Part, Role};
pub use generate_request::GenerateContentRequest;
pub use generate_response::{Candidate, GenerateContentResponse, UsageMetadata};
pub use generation_config::GenerationConfig;
pub use model::{KnownModel, Model};
