use axum::{
    extract::Request,
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Raw token taken from the `Authorization` header. Presence is all the
/// middleware checks; routes that care about validity ask the backend.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Second whitespace-separated word of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(' ').nth(1))
        .filter(|token| !token.is_empty())
}

/// Reject requests without a bearer token, otherwise stash it for handlers.
pub async fn require_bearer(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or(ApiError::MissingToken)?
        .to_string();

    req.extensions_mut().insert(BearerToken(token));
    Ok(next.run(req).await)
}
