use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use colombia_types::api::{
    Ack, AuthResponse, ErrorBody, GetMemberRequest, JoinTeamRequest, LoginRequest,
    MemberResponse, MessagesResponse, SendMessageRequest, SignupRequest, VerifyResponse,
};
use colombia_types::models::{Member, Message, User};

use crate::error::ClientError;

/// Thin typed wrapper over the `/api` routes. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.http.post(self.url("/api/auth/login")).json(&body))
            .await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let body = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(self.http.post(self.url("/api/auth/signup")).json(&body))
            .await
    }

    pub async fn verify(&self, token: &str) -> Result<User, ClientError> {
        let resp: VerifyResponse = self
            .send(self.http.get(self.url("/api/auth/verify")).bearer_auth(token))
            .await?;
        Ok(resp.user)
    }

    pub async fn get_member(&self, token: &str, user_id: &str) -> Result<Option<Member>, ClientError> {
        let body = GetMemberRequest {
            user_id: user_id.to_string(),
        };
        let resp: MemberResponse = self
            .send(
                self.http
                    .post(self.url("/api/get-member"))
                    .bearer_auth(token)
                    .json(&body),
            )
            .await?;
        Ok(resp.member)
    }

    pub async fn join_team(&self, token: &str, nickname: &str) -> Result<Ack, ClientError> {
        let body = JoinTeamRequest {
            nickname: nickname.to_string(),
        };
        self.send(
            self.http
                .post(self.url("/api/join-team"))
                .bearer_auth(token)
                .json(&body),
        )
        .await
    }

    pub async fn get_messages(&self, token: &str) -> Result<Vec<Message>, ClientError> {
        let resp: MessagesResponse = self
            .send(self.http.post(self.url("/api/get-messages")).bearer_auth(token))
            .await?;
        match resp.error {
            Some(message) => Err(ClientError::Server {
                status: 200,
                message,
            }),
            None => Ok(resp.messages),
        }
    }

    pub async fn send_message(&self, token: &str, message: &str) -> Result<Ack, ClientError> {
        let body = SendMessageRequest {
            message: message.to_string(),
        };
        self.send(
            self.http
                .post(self.url("/api/send-message"))
                .bearer_auth(token)
                .json(&body),
        )
        .await
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
