//! Backend selection and credentials, read from the environment.

use crate::gemini::GeminiClient;
use crate::generator::TextGenerator;
use crate::openai::OpenAiClient;
use deck_core::{Error, Result, Variant};
use std::time::Duration;

/// Environment variable holding the Gemini API key.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Default Gemini endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default OpenAI endpoint.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// How long one generation request may take before it fails.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything needed to build a client for one backend.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub variant: Variant,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Read the configuration of `variant` from the process environment.
    pub fn from_env(variant: Variant) -> Result<Self> {
        Self::from_lookup(variant, |key| std::env::var(key).ok())
    }

    /// Read the configuration of `variant` through `lookup`.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(variant: Variant, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (key_var, model_var, url_var, default_model, default_url) = match variant {
            Variant::Gemini => (
                GOOGLE_API_KEY,
                "GEMINI_MODEL",
                "GEMINI_BASE_URL",
                DEFAULT_GEMINI_MODEL,
                DEFAULT_GEMINI_BASE_URL,
            ),
            Variant::OpenAi => (
                OPENAI_API_KEY,
                "OPENAI_MODEL",
                "OPENAI_BASE_URL",
                DEFAULT_OPENAI_MODEL,
                DEFAULT_OPENAI_BASE_URL,
            ),
        };

        let api_key = get(key_var).ok_or_else(|| Error::MissingCredential(key_var.to_string()))?;

        Ok(Self {
            variant,
            api_key,
            model: get(model_var).unwrap_or_else(|| default_model.to_string()),
            base_url: get(url_var).unwrap_or_else(|| default_url.to_string()),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the blocking client for this backend.
    pub fn build_client(&self) -> Result<Box<dyn TextGenerator>> {
        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::HttpError(format!("Failed to build HTTP client: {}", e)))?;

        let client: Box<dyn TextGenerator> = match self.variant {
            Variant::Gemini => Box::new(GeminiClient::new(
                http,
                &self.base_url,
                &self.api_key,
                &self.model,
            )),
            Variant::OpenAi => Box::new(OpenAiClient::new(
                http,
                &self.base_url,
                &self.api_key,
                &self.model,
            )),
        };

        log::debug!("Using {} backend with model {}", self.variant, self.model);
        Ok(client)
    }
}
