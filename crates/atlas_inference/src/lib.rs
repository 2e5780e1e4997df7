pub mod backends;
pub mod coerce;
pub mod generator;
pub mod prompt;
pub mod repair;
pub mod response;

pub use backends::ollama::{OllamaBackend, OllamaConfig};
pub use backends::scripted::ScriptedBackend;
pub use backends::GenerationBackend;
pub use generator::ArticleGenerator;

pub mod prelude {
    pub use super::backends::GenerationBackend;
    pub use super::generator::ArticleGenerator;
    pub use atlas_core::{Article, Error, Result};
}
