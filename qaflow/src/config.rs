//! Configuration for qaflow.
//!
//! Settings come from defaults, optionally overlaid by a JSON document and by
//! environment variables:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `OLLAMA_MODEL` | [`Settings::ollama_model`] |
//! | `OLLAMA_BASE_URL` | [`Settings::ollama_base_url`] |
//! | `QAFLOW_REQUEST_TIMEOUT` | [`Settings::request_timeout_seconds`] |
//! | `QAFLOW_LOG` | [`LoggingConfig::filter`] |
//! | `QAFLOW_LOG_JSON` | [`LoggingConfig::json`] |

use crate::errors::QaflowError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Model identifier passed to the language model on every generation call.
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
    /// Base URL of the Ollama server.
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,
    /// HTTP timeout for language model calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: f64,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_ollama_model() -> String {
    "llama3".to_string()
}

fn default_ollama_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_request_timeout() -> f64 {
    120.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_model: default_ollama_model(),
            ollama_base_url: default_ollama_base_url(),
            request_timeout_seconds: default_request_timeout(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    /// Creates settings with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads defaults overlaid by the process environment.
    pub fn from_env() -> Result<Self, QaflowError> {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Parses settings from a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, QaflowError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, QaflowError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Overlays values found through `lookup` onto these settings.
    pub fn overlay_env<F>(mut self, lookup: F) -> Result<Self, QaflowError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.ollama_model = model.trim().to_string();
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            self.ollama_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("QAFLOW_REQUEST_TIMEOUT") {
            self.request_timeout_seconds = raw.trim().parse().map_err(|_| {
                QaflowError::Config(format!("QAFLOW_REQUEST_TIMEOUT is not a number: {raw}"))
            })?;
        }
        if let Some(filter) = lookup("QAFLOW_LOG") {
            self.logging.filter = filter;
        }
        if let Some(raw) = lookup("QAFLOW_LOG_JSON") {
            self.logging.json = parse_bool(&raw).ok_or_else(|| {
                QaflowError::Config(format!("QAFLOW_LOG_JSON is not a boolean: {raw}"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks the settings are usable.
    pub fn validate(&self) -> Result<(), QaflowError> {
        if self.ollama_model.trim().is_empty() {
            return Err(QaflowError::Config("OLLAMA_MODEL must not be empty".to_string()));
        }
        if self.ollama_base_url.trim().is_empty() {
            return Err(QaflowError::Config("OLLAMA_BASE_URL must not be empty".to_string()));
        }
        if self.request_timeout_seconds <= 0.0 {
            return Err(QaflowError::Config(format!(
                "request timeout must be positive, got {}",
                self.request_timeout_seconds
            )));
        }
        self.request_timeout().map(|_| ())
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_ollama_model(mut self, model: impl Into<String>) -> Self {
        self.ollama_model = model.into();
        self
    }

    /// Sets the Ollama base URL.
    #[must_use]
    pub fn with_ollama_base_url(mut self, url: impl Into<String>) -> Self {
        self.ollama_base_url = url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, seconds: f64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    /// Gets the request timeout as a Duration.
    ///
    /// Fails for negative, non-finite or unrepresentably large values.
    pub fn request_timeout(&self) -> Result<Duration, QaflowError> {
        Duration::try_from_secs_f64(self.request_timeout_seconds).map_err(|e| {
            QaflowError::Config(format!(
                "invalid request timeout {}: {e}",
                self.request_timeout_seconds
            ))
        })
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. `info` or `qaflow=debug`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ollama_model, "llama3");
        assert_eq!(settings.ollama_base_url, "http://127.0.0.1:11434");
        assert_eq!(settings.request_timeout().unwrap(), Duration::from_secs(120));
        assert_eq!(settings.logging, LoggingConfig::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_overlay_env() {
        let settings = Settings::default()
            .overlay_env(lookup(&[
                ("OLLAMA_MODEL", " mistral "),
                ("OLLAMA_BASE_URL", "http://ollama:11434/"),
                ("QAFLOW_REQUEST_TIMEOUT", "5.5"),
                ("QAFLOW_LOG", "qaflow=debug"),
                ("QAFLOW_LOG_JSON", "true"),
            ]))
            .unwrap();

        assert_eq!(settings.ollama_model, "mistral");
        assert_eq!(settings.ollama_base_url, "http://ollama:11434");
        assert_eq!(settings.request_timeout_seconds, 5.5);
        assert_eq!(settings.logging.filter, "qaflow=debug");
        assert!(settings.logging.json);
    }

    #[test]
    fn test_overlay_env_rejects_bad_values() {
        let err = Settings::default()
            .overlay_env(lookup(&[("QAFLOW_REQUEST_TIMEOUT", "soon")]))
            .unwrap_err();
        assert!(matches!(err, QaflowError::Config(_)));

        let err = Settings::default()
            .overlay_env(lookup(&[("QAFLOW_LOG_JSON", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("QAFLOW_LOG_JSON"));

        let err = Settings::default()
            .overlay_env(lookup(&[("OLLAMA_MODEL", "  ")]))
            .unwrap_err();
        assert!(err.to_string().contains("OLLAMA_MODEL"));
    }

    #[test]
    fn test_from_json_str_fills_defaults() {
        let settings = Settings::from_json_str(r#"{"ollama_model": "phi3"}"#).unwrap();
        assert_eq!(settings.ollama_model, "phi3");
        assert_eq!(settings.ollama_base_url, default_ollama_base_url());
        assert!(!settings.logging.json);
    }

    #[test]
    fn test_from_json_str_validates() {
        let err = Settings::from_json_str(r#"{"request_timeout_seconds": 0}"#).unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_unrepresentable_timeouts_are_config_errors() {
        let err = Settings::default()
            .overlay_env(lookup(&[("QAFLOW_REQUEST_TIMEOUT", "1e300")]))
            .unwrap_err();
        assert!(matches!(err, QaflowError::Config(_)));

        let err = Settings::default()
            .overlay_env(lookup(&[("QAFLOW_REQUEST_TIMEOUT", "inf")]))
            .unwrap_err();
        assert!(matches!(err, QaflowError::Config(_)));

        let negative = Settings::default().with_request_timeout(-1.0);
        assert!(matches!(negative.request_timeout(), Err(QaflowError::Config(_))));
        assert!(negative.validate().is_err());

        let nan = Settings::default().with_request_timeout(f64::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ollama_model": "gemma", "logging": {{"json": true}}}}"#).unwrap();

        let settings = Settings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.ollama_model, "gemma");
        assert!(settings.logging.json);
        assert_eq!(settings.logging.filter, "info");
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Settings::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, QaflowError::Io(_)));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("sure"), None);
    }
}
