//! OpenAI-compatible chat completion client (works against Ollama's `/v1`).

use std::time::Duration;

use serde_json::{json, Value};

use super::{AgentError, ChatMessage, CompletionBackend};
use crate::data::AgentConfig;

pub struct OpenAiBackend {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(from_reqwest)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl CompletionBackend for OpenAiBackend {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AgentError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response.json().map_err(from_reqwest)?;
        extract_content(&json)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

fn from_reqwest(err: reqwest::Error) -> AgentError {
    if err.is_timeout() {
        AgentError::Timeout
    } else {
        AgentError::Transport(err.to_string())
    }
}

/// Pull `choices[0].message.content` out of a completion response.
pub fn extract_content(json: &Value) -> Result<String, AgentError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.trim().to_string())
        .ok_or(AgentError::MissingContent)
}
