//! Text-generation backends that turn a topic into slide titles and
//! slide bodies.
//!
//! Each request blocks until the remote service answers. Errors are
//! returned as-is; nothing is retried.

pub mod config;
pub mod gemini;
pub mod generator;
pub mod openai;
pub mod prompts;

pub use config::LlmConfig;
pub use gemini::GeminiClient;
pub use generator::{ContentGenerator, TextGenerator};
pub use openai::OpenAiClient;
