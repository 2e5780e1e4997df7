use std::fmt;

use atlas_core::Result;

pub mod ollama;
pub mod scripted;

pub use ollama::{OllamaBackend, OllamaConfig};
pub use scripted::ScriptedBackend;

/// A text-generation endpoint. One call per generation attempt; the
/// implementation accumulates whatever streaming the wire protocol does
/// and hands back the complete response text.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}
