//! OpenAI-compatible chat completions over `reqwest`.

use async_trait::async_trait;
use configs::AiConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{AiError, AiProvider, ChatRole, PromptRequest};

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(cfg: &AiConfig) -> Option<Self> {
        let key = cfg.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(Self::new(key, cfg.base_url.clone(), cfg.model.clone()))
    }

    pub fn model(&self) -> &str { &self.model }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn complete(&self, request: PromptRequest) -> Result<String, AiError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system.as_deref() {
            messages.push(WireMessage { role: "system", content: system });
        }
        messages.extend(request.messages.iter().map(|m| WireMessage {
            role: match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            },
            content: &m.content,
        }));
        let body = ChatRequest { model: &self.model, messages };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "AI provider request failed");
                AiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, error = %error_text, "AI provider API error");
            return Err(AiError::Api(format!("{status}: {error_text}")));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| AiError::Parse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::Parse("response had no message content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_means_no_provider() {
        let mut cfg = AiConfig::default();
        cfg.api_key = Some("  ".into());
        assert!(OpenAiProvider::from_config(&cfg).is_none());

        cfg.api_key = Some("sk-test".into());
        cfg.base_url = "https://llm.example.com/v1/".into();
        let provider = OpenAiProvider::from_config(&cfg).expect("configured");
        assert_eq!(provider.base_url, "https://llm.example.com/v1");
        assert_eq!(provider.model(), cfg.model);
    }
}
