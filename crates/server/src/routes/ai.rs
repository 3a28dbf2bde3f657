use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use service::ai::{self, AiError, ChatMessage};

use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SuggestInput {
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatInput {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AiOutput {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

fn respond(result: Result<String, AiError>) -> (StatusCode, Json<AiOutput>) {
    match result {
        Ok(reply) => (StatusCode::OK, Json(AiOutput { success: true, message: "ok".into(), reply: Some(reply) })),
        Err(e) => {
            let (status, message) = match &e {
                AiError::NotConfigured => {
                    info!("AI request while no provider is configured");
                    (StatusCode::SERVICE_UNAVAILABLE, "The AI assistant is not configured.".to_string())
                }
                AiError::InvalidRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
                AiError::Network(_) | AiError::Api(_) | AiError::Parse(_) => {
                    error!(error = %e, "AI provider call failed");
                    (StatusCode::BAD_GATEWAY, "The AI assistant is unavailable. Please try again.".to_string())
                }
            };
            (status, Json(AiOutput { success: false, message, reply: None }))
        }
    }
}

#[utoipa::path(post, path = "/api/ai/suggest", tag = "ai", request_body = SuggestInput, responses((status = 200, description = "Layout suggestion", body = AiOutput), (status = 400, description = "No labels"), (status = 503, description = "Not configured")))]
pub async fn suggest(State(state): State<ServerState>, Json(input): Json<SuggestInput>) -> (StatusCode, Json<AiOutput>) {
    respond(ai::suggest_layout(state.ai.as_ref(), &input.labels).await)
}

#[utoipa::path(post, path = "/api/ai/chat", tag = "ai", responses((status = 200, description = "Assistant reply", body = AiOutput), (status = 400, description = "Empty message"), (status = 503, description = "Not configured")))]
pub async fn chat(State(state): State<ServerState>, Json(input): Json<ChatInput>) -> (StatusCode, Json<AiOutput>) {
    respond(ai::chat_reply(state.ai.as_ref(), input.history, &input.message).await)
}
