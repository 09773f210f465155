use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::debug;

use colombia_types::api::{Ack, MessagesResponse, SendMessageRequest};

use crate::AppState;
use crate::error::{ApiError, parse_body};
use crate::middleware::BearerToken;

pub async fn get_messages(
    State(state): State<AppState>,
    Extension(_token): Extension<BearerToken>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let messages = state.backend.list_messages()?;
    Ok(Json(MessagesResponse {
        messages,
        error: None,
    }))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<Ack>, ApiError> {
    let req = parse_body(payload)?;

    if req.message.trim().is_empty() {
        return Err(ApiError::validation("Mensagem não pode estar vazia"));
    }

    let message_id = state.backend.persist_message(&token, &req.message)?;
    debug!("Message {} accepted ({} chars)", message_id, req.message.chars().count());

    Ok(Json(Ack {
        success: true,
        message: "Mensagem enviada com sucesso".to_string(),
    }))
}
