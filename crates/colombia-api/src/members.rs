use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use colombia_types::api::{Ack, GetMemberRequest, JoinTeamRequest, MemberResponse};

use crate::AppState;
use crate::error::{ApiError, parse_body};
use crate::middleware::BearerToken;

/// Look up the member record for `userId`. A missing record is a successful
/// `{"member": null}`, not an error.
pub async fn get_member(
    State(state): State<AppState>,
    Extension(_token): Extension<BearerToken>,
    payload: Result<Json<GetMemberRequest>, JsonRejection>,
) -> Result<Json<MemberResponse>, ApiError> {
    let req = parse_body(payload)?;
    let member = state.backend.find_member(&req.user_id)?;
    Ok(Json(MemberResponse { member }))
}

pub async fn join_team(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    payload: Result<Json<JoinTeamRequest>, JsonRejection>,
) -> Result<Json<Ack>, ApiError> {
    let req = parse_body(payload)?;

    if req.nickname.is_empty() {
        return Err(ApiError::validation("Nickname é obrigatório"));
    }

    let request_id = state.backend.persist_member(&token, &req.nickname)?;

    info!("Join request {} from '{}'", request_id, req.nickname);
    Ok(Json(Ack {
        success: true,
        message: "Solicitação enviada com sucesso".to_string(),
    }))
}
