use serde::{Deserialize, Serialize};

use crate::models::{Member, Message, User};

// -- Auth --

// Absent fields deserialize as empty strings so the handlers answer with a
// validation error instead of a body rejection.

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by both login and signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user: User,
}

// -- Members --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GetMemberRequest {
    #[serde(rename = "userId", default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub member: Option<Member>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JoinTeamRequest {
    #[serde(default)]
    pub nickname: String,
}

// -- Messages --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Set instead of `messages` when the listing failed upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
}

// -- Shared --

/// `{success, message}` acknowledgement for write routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
