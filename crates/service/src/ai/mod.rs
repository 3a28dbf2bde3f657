//! AI-assisted flows: homepage layout suggestions and the site chat.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

pub use openai::OpenAiProvider;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider is not configured")]
    NotConfigured,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(alias = "model")]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self { Self { role: ChatRole::User, content: content.into() } }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// What gets sent to a provider: an optional system prompt and the turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn complete(&self, request: PromptRequest) -> Result<String, AiError>;
}

/// Stand-in used when no API key is configured.
pub struct DisabledProvider;

#[async_trait]
impl AiProvider for DisabledProvider {
    async fn complete(&self, _request: PromptRequest) -> Result<String, AiError> { Err(AiError::NotConfigured) }
}

const LAYOUT_SYSTEM: &str = "You are a web designer for an AI consultancy. Given the content sections a \
homepage should feature, propose an ordering and a short layout rationale. Answer in plain prose.";

const CHAT_SYSTEM: &str = "You are the assistant on an AI consultancy's website. Answer questions about \
its services, projects and events briefly and politely. Suggest the contact form for project enquiries.";

/// Suggest a homepage layout for the selected content sections.
#[instrument(skip(provider))]
pub async fn suggest_layout(provider: &dyn AiProvider, labels: &[String]) -> Result<String, AiError> {
    let mut picked: Vec<&str> = Vec::new();
    for label in labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if !picked.contains(&label) {
            picked.push(label);
        }
    }
    if picked.is_empty() {
        return Err(AiError::InvalidRequest("select at least one content type".into()));
    }
    let prompt = format!("Sections to feature: {}.", picked.join(", "));
    provider
        .complete(PromptRequest { system: Some(LAYOUT_SYSTEM.into()), messages: vec![ChatMessage::user(prompt)] })
        .await
}

/// Conversation history as the provider accepts it: it must open with a
/// user turn, so any leading assistant turns are dropped.
pub fn prepare_history(history: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let first_user = history.iter().position(|m| m.role == ChatRole::User).unwrap_or(history.len());
    if first_user > 0 {
        debug!(dropped = first_user, "dropping leading assistant turns");
    }
    history.into_iter().skip(first_user).collect()
}

pub async fn chat_reply(
    provider: &dyn AiProvider,
    history: Vec<ChatMessage>,
    message: &str,
) -> Result<String, AiError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(AiError::InvalidRequest("message is empty".into()));
    }
    let mut messages = prepare_history(history);
    messages.push(ChatMessage::user(message));
    provider.complete(PromptRequest { system: Some(CHAT_SYSTEM.into()), messages }).await
}
