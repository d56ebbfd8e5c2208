//! Language model backed by an Ollama server.

use crate::config::Settings;
use crate::errors::{CapabilityError, QaflowError};
use crate::ports::{GenerationRequest, LanguageModel};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

/// Calls `POST {base_url}/api/generate` without streaming and returns the
/// `response` field.
#[derive(Debug, Clone)]
pub struct OllamaLlm {
    client: Client,
    base_url: String,
}

impl OllamaLlm {
    /// Creates a client for the given server with the given request timeout.
    ///
    /// Fails with [`QaflowError::Config`] if `settings` do not validate.
    pub fn new(base_url: impl Into<String>, settings: &Settings) -> Result<Self, QaflowError> {
        settings.validate()?;
        let client = Client::builder().timeout(settings.request_timeout()?).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the configured base URL and timeout.
    pub fn from_settings(settings: &Settings) -> Result<Self, QaflowError> {
        Self::new(settings.ollama_base_url.clone(), settings)
    }

    /// The generate endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl LanguageModel for OllamaLlm {
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, CapabilityError> {
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
        };
        debug!(model = %request.model, url = %self.endpoint(), "Sending generate request");

        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CapabilityError::new(format!("Ollama API error {status}: {detail}")));
        }

        let parsed: GenerateResponse = response.json().await?;
        if !parsed.done {
            debug!(model = %request.model, "Ollama reported an unfinished generation");
        }
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let llm = OllamaLlm::new("http://localhost:11434/", &Settings::default()).unwrap();
        assert_eq!(llm.endpoint(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings::default().with_ollama_base_url("http://ollama:11434");
        let llm = OllamaLlm::from_settings(&settings).unwrap();
        assert_eq!(llm.endpoint(), "http://ollama:11434/api/generate");
    }

    #[test]
    fn test_bad_timeouts_are_rejected_without_panicking() {
        let huge = Settings::default().with_request_timeout(1e300);
        assert!(matches!(OllamaLlm::from_settings(&huge), Err(QaflowError::Config(_))));

        let negative = Settings::default().with_request_timeout(-1.0);
        assert!(matches!(OllamaLlm::from_settings(&negative), Err(QaflowError::Config(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateBody {
            model: "llama3",
            prompt: "hi",
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"model": "llama3", "prompt": "hi", "stream": false}));
    }

    #[test]
    fn test_response_parsing() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"model":"llama3","response":"Paris.","done":true}"#).unwrap();
        assert_eq!(parsed.response, "Paris.");
        assert!(parsed.done);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_capability_error() {
        let settings = Settings::default().with_request_timeout(2.0);
        let llm = OllamaLlm::new("http://127.0.0.1:9", &settings).unwrap();

        let result = llm.invoke(&GenerationRequest::new("llama3", "hi")).await;

        assert!(result.is_err());
    }
}
