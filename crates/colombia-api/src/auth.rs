use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use colombia_types::api::{AuthResponse, LoginRequest, SignupRequest, VerifyResponse};

use crate::AppState;
use crate::error::{ApiError, parse_body};
use crate::middleware::BearerToken;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = parse_body(payload)?;

    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("Email e senha são obrigatórios"));
    }

    let user = state.backend.verify_credentials(&req.email, &req.password)?;
    let token = state.backend.issue_token(&user)?;

    info!("Login for {} as {}", user.email, user.id);
    Ok(Json(AuthResponse { token, user }))
}

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let req = parse_body(payload)?;

    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("Todos os campos são obrigatórios"));
    }

    let user = state.backend.register(&req.name, &req.email, &req.password)?;
    let token = state.backend.issue_token(&user)?;

    info!("Signup for {} as {}", user.email, user.id);
    Ok(Json(AuthResponse { token, user }))
}

pub async fn verify(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let user = state
        .backend
        .verify_token(&token)?
        .ok_or(ApiError::InvalidToken)?;

    Ok(Json(VerifyResponse { user }))
}
