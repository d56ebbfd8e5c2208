//! Language model adapters.

mod ollama;

pub use ollama::OllamaLlm;
