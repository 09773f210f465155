use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

use colombia_api::backend::{MockBackend, TeamBackend};
use colombia_api::{AppStateInner, router};
use colombia_types::models::{Member, Message, User};

async fn spawn_app(backend: Arc<dyn TeamBackend>) -> SocketAddr {
    let app = router(AppStateInner::new(backend));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn spawn_mock() -> SocketAddr {
    spawn_app(Arc::new(MockBackend::new())).await
}

async fn post_json(addr: SocketAddr, path: &str, token: Option<&str>, body: Value) -> (u16, Value) {
    let mut req = reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .json(&body);
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    let resp = req.send().await.expect("send request");
    let status = resp.status().as_u16();
    (status, resp.json().await.expect("json body"))
}

async fn get_verify(addr: SocketAddr, auth: Option<&str>) -> (u16, Value) {
    let mut req = reqwest::Client::new().get(format!("http://{addr}/api/auth/verify"));
    if let Some(auth) = auth {
        req = req.header("Authorization", auth);
    }
    let resp = req.send().await.expect("send request");
    let status = resp.status().as_u16();
    (status, resp.json().await.expect("json body"))
}

#[tokio::test]
async fn login_echoes_email_and_issues_mock_token() {
    let addr = spawn_mock().await;

    let (status, body) = post_json(
        addr,
        "/api/auth/login",
        None,
        json!({ "email": "a@b.com", "password": "x" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["user"]["email"], "a@b.com");
    assert!(body["token"].as_str().unwrap().starts_with("mock_token_"));
    assert!(body["user"]["id"].as_str().unwrap().starts_with("user_"));
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let addr = spawn_mock().await;

    for body in [
        json!({ "email": "a@b.com" }),
        json!({ "password": "x" }),
        json!({ "email": "", "password": "x" }),
        json!({}),
    ] {
        let (status, resp) = post_json(addr, "/api/auth/login", None, body).await;
        assert_eq!(status, 400);
        assert_eq!(resp["error"], "Email e senha são obrigatórios");
    }
}

#[tokio::test]
async fn signup_echoes_name_and_email() {
    let addr = spawn_mock().await;

    let (status, body) = post_json(
        addr,
        "/api/auth/signup",
        None,
        json!({ "name": "Pablo", "email": "pablo@colombia.com", "password": "secret" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["user"]["name"], "Pablo");
    assert_eq!(body["user"]["email"], "pablo@colombia.com");
    assert!(body["token"].as_str().unwrap().starts_with("mock_token_"));
}

#[tokio::test]
async fn signup_requires_all_three_fields() {
    let addr = spawn_mock().await;

    let (status, body) = post_json(
        addr,
        "/api/auth/signup",
        None,
        json!({ "email": "pablo@colombia.com", "password": "secret" }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Todos os campos são obrigatórios");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let addr = spawn_mock().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/auth/login"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("send request");

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.expect("json body");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn verify_distinguishes_missing_foreign_and_mock_tokens() {
    let addr = spawn_mock().await;

    let (status, body) = get_verify(addr, None).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Token de acesso requerido");

    let (status, body) = get_verify(addr, Some("Bearer eyJhbGciOi.fake")).await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "Token inválido");

    for token in ["mock_token_1", "mock_token_1700000000000"] {
        let (status, body) = get_verify(addr, Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, 200);
        assert_eq!(body["user"]["id"], "user_123");
        assert_eq!(body["user"]["email"], "teste@colombia.com");
    }
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let addr = spawn_mock().await;

    for path in ["/api/get-member", "/api/get-messages", "/api/send-message", "/api/join-team"] {
        let (status, body) = post_json(addr, path, None, json!({})).await;
        assert_eq!(status, 401, "{path}");
        assert_eq!(body["error"], "Token de acesso requerido");
    }
}

#[tokio::test]
async fn get_member_returns_approved_admin() {
    let addr = spawn_mock().await;

    let (status, body) = post_json(
        addr,
        "/api/get-member",
        Some("mock_token_1"),
        json!({ "userId": "user_123" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["member"]["role"], "admin");
    assert_eq!(body["member"]["is_approved"], true);
    assert_eq!(body["member"]["nickname"], "TesteColombia");
}

#[tokio::test]
async fn get_messages_lists_canned_chat() {
    let addr = spawn_mock().await;

    let (status, body) = post_json(addr, "/api/get-messages", Some("mock_token_1"), json!({})).await;

    assert_eq!(status, 200);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["author_role"], "admin");
}

#[tokio::test]
async fn send_message_rejects_whitespace_only() {
    let addr = spawn_mock().await;

    for text in ["", "   ", "\n\t "] {
        let (status, body) = post_json(
            addr,
            "/api/send-message",
            Some("mock_token_1"),
            json!({ "message": text }),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "Mensagem não pode estar vazia");
    }

    let (status, body) = post_json(
        addr,
        "/api/send-message",
        Some("mock_token_1"),
        json!({ "message": "  bora  " }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn join_team_requires_nickname() {
    let addr = spawn_mock().await;

    let (status, body) = post_json(addr, "/api/join-team", Some("mock_token_1"), json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Nickname é obrigatório");

    let (status, body) = post_json(
        addr,
        "/api/join-team",
        Some("mock_token_1"),
        json!({ "nickname": "Pablito" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Solicitação enviada com sucesso");
}

struct BrokenBackend;

impl TeamBackend for BrokenBackend {
    fn verify_credentials(&self, _: &str, _: &str) -> Result<User> {
        Err(anyhow!("credential store offline"))
    }
    fn register(&self, _: &str, _: &str, _: &str) -> Result<User> {
        Err(anyhow!("credential store offline"))
    }
    fn issue_token(&self, _: &User) -> Result<String> {
        Err(anyhow!("signer offline"))
    }
    fn verify_token(&self, _: &str) -> Result<Option<User>> {
        Err(anyhow!("signer offline"))
    }
    fn find_member(&self, _: &str) -> Result<Option<Member>> {
        Err(anyhow!("member store offline"))
    }
    fn persist_member(&self, _: &str, _: &str) -> Result<String> {
        Err(anyhow!("member store offline"))
    }
    fn list_messages(&self) -> Result<Vec<Message>> {
        Err(anyhow!("chat store offline"))
    }
    fn persist_message(&self, _: &str, _: &str) -> Result<String> {
        Err(anyhow!("chat store offline"))
    }
}

#[tokio::test]
async fn backend_failures_become_generic_500s() {
    let addr = spawn_app(Arc::new(BrokenBackend)).await;

    let (status, body) = post_json(
        addr,
        "/api/auth/login",
        None,
        json!({ "email": "a@b.com", "password": "x" }),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Erro interno do servidor");

    let (status, body) = post_json(addr, "/api/get-messages", Some("mock_token_1"), json!({})).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Erro interno do servidor");
}
