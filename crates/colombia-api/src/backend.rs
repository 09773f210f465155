//! The seam between the HTTP layer and whatever actually owns users, members
//! and chat history. The only implementation today is [`MockBackend`], which
//! accepts any credentials and serves canned data.

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::debug;

use colombia_types::TOKEN_PREFIX;
use colombia_types::models::{Member, Message, Role, User};

pub trait TeamBackend: Send + Sync {
    /// Check an email/password pair and return the matching user.
    fn verify_credentials(&self, email: &str, password: &str) -> Result<User>;

    fn register(&self, name: &str, email: &str, password: &str) -> Result<User>;

    fn issue_token(&self, user: &User) -> Result<String>;

    /// `None` means the token is well-formed but not recognised.
    fn verify_token(&self, token: &str) -> Result<Option<User>>;

    fn find_member(&self, user_id: &str) -> Result<Option<Member>>;

    /// Record a join request for the bearer of `token` and return its id.
    fn persist_member(&self, token: &str, nickname: &str) -> Result<String>;

    fn list_messages(&self) -> Result<Vec<Message>>;

    /// Append a chat message and return its id.
    fn persist_message(&self, token: &str, message: &str) -> Result<String>;
}

const MOCK_USER_NAME: &str = "Usuário Teste";
const MOCK_USER_EMAIL: &str = "teste@colombia.com";

/// Stateless stand-in backend: every call fabricates its answer.
#[derive(Debug, Default, Clone)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }

    fn fabricated_user(name: &str, email: &str) -> User {
        User {
            id: format!("user_{}", Utc::now().timestamp_millis()),
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

fn team_founding() -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single()
}

impl TeamBackend for MockBackend {
    fn verify_credentials(&self, email: &str, _password: &str) -> Result<User> {
        Ok(Self::fabricated_user(MOCK_USER_NAME, email))
    }

    fn register(&self, name: &str, email: &str, _password: &str) -> Result<User> {
        Ok(Self::fabricated_user(name, email))
    }

    fn issue_token(&self, _user: &User) -> Result<String> {
        Ok(format!("{}{}", TOKEN_PREFIX, Utc::now().timestamp_millis()))
    }

    fn verify_token(&self, token: &str) -> Result<Option<User>> {
        if !token.starts_with(TOKEN_PREFIX) {
            return Ok(None);
        }

        Ok(Some(User {
            id: "user_123".to_string(),
            name: MOCK_USER_NAME.to_string(),
            email: MOCK_USER_EMAIL.to_string(),
        }))
    }

    fn find_member(&self, user_id: &str) -> Result<Option<Member>> {
        debug!("Member lookup for {}", user_id);

        Ok(Some(Member {
            id: "member_123".to_string(),
            nickname: "TesteColombia".to_string(),
            is_approved: true,
            role: Role::Admin,
            user_name: Some(MOCK_USER_NAME.to_string()),
            user_email: Some(MOCK_USER_EMAIL.to_string()),
            joined_at: team_founding(),
            approved_at: team_founding(),
            approved_by_name: Some("Admin Sistema".to_string()),
        }))
    }

    /// Hands out a fresh id; nothing is stored.
    fn persist_member(&self, _token: &str, _nickname: &str) -> Result<String> {
        Ok(uuid::Uuid::new_v4().to_string())
    }

    fn list_messages(&self) -> Result<Vec<Message>> {
        let now = Utc::now();
        let canned = [
            ("1", "Bem-vindos ao chat da Colombia! 🎮", "AdminColombia", Role::Admin, 60),
            ("2", "Operação hoje às 21h, todos confirmem presença!", "LiderOperacoes", Role::Member, 30),
            ("3", "Confirmado! Vamos dominar a cidade 🔥", "SoldadoColombia", Role::Member, 15),
        ];

        Ok(canned
            .into_iter()
            .map(|(id, text, author, role, minutes_ago)| Message {
                id: id.to_string(),
                message: text.to_string(),
                author_nickname: author.to_string(),
                author_role: role,
                created_at: now - Duration::minutes(minutes_ago),
            })
            .collect())
    }

    /// Hands out a fresh id; the message is dropped.
    fn persist_message(&self, _token: &str, _message: &str) -> Result<String> {
        Ok(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_pass_verification() {
        let backend = MockBackend::new();
        let user = backend.verify_credentials("a@b.com", "x").unwrap();
        let token = backend.issue_token(&user).unwrap();

        assert!(token.starts_with(TOKEN_PREFIX));
        assert!(backend.verify_token(&token).unwrap().is_some());
    }

    #[test]
    fn foreign_tokens_are_not_recognised() {
        let backend = MockBackend::new();
        assert!(backend.verify_token("abc.def.ghi").unwrap().is_none());
        assert!(backend.verify_token("mock_token").unwrap().is_none());
    }

    #[test]
    fn canned_messages_are_oldest_first() {
        let messages = MockBackend::new().list_messages().unwrap();
        assert_eq!(messages.len(), 3);
        assert!(messages.windows(2).all(|w| w[0].created_at < w[1].created_at));
        assert_eq!(messages[0].author_role, Role::Admin);
    }

    #[test]
    fn writes_hand_out_distinct_ids() {
        let backend = MockBackend::new();
        let first = backend.persist_message("mock_token_1", "oi").unwrap();
        let second = backend.persist_message("mock_token_1", "oi").unwrap();
        assert_ne!(first, second);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
        assert!(!backend.persist_member("mock_token_1", "Pablito").unwrap().is_empty());
    }
}
