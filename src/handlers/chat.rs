use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::SessionContext;
use crate::services::conversation;
use crate::services::status::{get_status_view, StatusView};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<SessionContext>,
}

#[derive(Deserialize, Default)]
pub struct ContextRequest {
    #[serde(default)]
    pub context: Option<SessionContext>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub context: SessionContext,
    pub status: StatusView,
}

impl ChatResponse {
    fn new(reply: String, context: SessionContext) -> Self {
        let status = get_status_view(&context);
        Self {
            reply,
            context,
            status,
        }
    }
}

// GET /api/greeting
pub async fn greeting() -> Json<ChatResponse> {
    Json(ChatResponse::new(
        conversation::get_greeting().to_string(),
        SessionContext::new(),
    ))
}

// POST /api/chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let ctx = payload.context.unwrap_or_default();
    let (reply, ctx) = conversation::process_message(&state, &payload.message, ctx).await;
    Json(ChatResponse::new(reply, ctx))
}

// POST /api/reset
pub async fn reset(payload: Option<Json<ContextRequest>>) -> Json<ChatResponse> {
    let previous = payload
        .and_then(|Json(req)| req.context)
        .unwrap_or_default();
    let ctx = conversation::reset_session(previous);
    Json(ChatResponse::new(
        conversation::get_greeting().to_string(),
        ctx,
    ))
}

// POST /api/status
pub async fn status(Json(payload): Json<ContextRequest>) -> Json<StatusView> {
    let ctx = payload.context.unwrap_or_default();
    Json(get_status_view(&ctx))
}
