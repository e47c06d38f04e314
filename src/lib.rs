// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod observability;
pub mod portfolio;
pub mod render;
pub mod sse;
pub mod types;

// Re-exports
pub use client::GenerativeLanguage;
pub use error::{Error, Result};
pub use types::*;
