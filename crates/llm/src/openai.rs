//! OpenAI chat-completions backend.

use crate::generator::TextGenerator;
use crate::prompts::{SYSTEM_ROLE, TEMPERATURE};
use deck_core::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Blocking client for the OpenAI chat-completions API.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client for `model` served at `base_url`.
    pub fn new(http: reqwest::blocking::Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

impl TextGenerator for OpenAiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        log::debug!("POST {} (model {})", self.endpoint, self.model);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body(&self.model, prompt))
            .send()
            .map_err(|e| Error::HttpError(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response
            .json()
            .map_err(|e| Error::HttpError(format!("Invalid OpenAI response: {}", e)))?;

        extract_text(body).ok_or_else(|| Error::EmptyResponse(self.name().to_string()))
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}

fn request_body<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            Message {
                role: "system",
                content: SYSTEM_ROLE,
            },
            Message {
                role: "user",
                content: prompt,
            },
        ],
        temperature: TEMPERATURE,
    }
}

/// Text of the first choice, if any.
fn extract_text(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()?
        .message
        .content
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let value = serde_json::to_value(request_body("gpt-3.5-turbo", "Hello")).unwrap();

        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], SYSTEM_ROLE);
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "Hello");
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_extract_text() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Slide one\nSlide two"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();

        assert_eq!(
            extract_text(response).as_deref(),
            Some("Slide one\nSlide two")
        );
    }

    #[test]
    fn test_extract_text_empty() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(extract_text(response), None);

        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response), None);
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let client = OpenAiClient::new(
            reqwest::blocking::Client::new(),
            "http://localhost:9999/",
            "k",
            "m",
        );
        assert_eq!(client.endpoint, "http://localhost:9999/v1/chat/completions");
    }
}
