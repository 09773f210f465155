pub mod auth;
pub mod backend;
pub mod error;
pub mod members;
pub mod messages;
pub mod middleware;

use std::sync::Arc;

use axum::{
    Json, Router,
    middleware::from_fn,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::backend::TeamBackend;
use crate::middleware::require_bearer;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub backend: Arc<dyn TeamBackend>,
}

impl AppStateInner {
    pub fn new(backend: Arc<dyn TeamBackend>) -> AppState {
        Arc::new(Self { backend })
    }
}

/// All `/api` routes. Everything except login, signup and `/health` sits
/// behind the bearer-token middleware.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signup", post(auth::signup))
        .route("/health", get(health))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/get-member", post(members::get_member))
        .route("/api/join-team", post(members::join_team))
        .route("/api/get-messages", post(messages::get_messages))
        .route("/api/send-message", post(messages::send_message))
        .layer(from_fn(require_bearer))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
