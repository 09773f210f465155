use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use colombia_types::models::User;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::slot::SessionSlot;

pub const LOGIN_FAILED: &str = "Email ou senha incorretos";
pub const SIGNUP_FAILED: &str = "Erro ao criar conta. Tente novamente.";

/// Token and user always travel together; there is no way to hold one
/// without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// `Unknown → Verifying → {Authenticated, Unauthenticated}`. A store with no
/// stored token skips straight from `Unknown` to `Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unknown,
    Verifying,
    Authenticated,
    Unauthenticated,
}

pub struct SessionStore<S> {
    api: ApiClient,
    slot: S,
    session: Option<Session>,
    phase: AuthPhase,
}

impl<S: SessionSlot> SessionStore<S> {
    pub fn new(api: ApiClient, slot: S) -> Self {
        Self {
            api,
            slot,
            session: None,
            phase: AuthPhase::Unknown,
        }
    }

    /// Restore from the durable slot and confirm the stored token with the
    /// server. Anything short of a confirmed token leaves the store
    /// unauthenticated with an empty slot.
    pub async fn init(&mut self) {
        let stored = match self.slot.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Ignoring unreadable session slot: {}", e);
                None
            }
        };

        let Some(stored) = stored else {
            self.phase = AuthPhase::Unauthenticated;
            return;
        };

        self.phase = AuthPhase::Verifying;
        match self.api.verify(&stored.token).await {
            Ok(user) => {
                info!("Restored session for {}", user.email);
                self.establish(Session {
                    token: stored.token,
                    user,
                });
            }
            Err(e) => {
                warn!("Stored token rejected: {}", e);
                self.drop_session();
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::validation("Email e senha são obrigatórios"));
        }

        let resp = self.api.login(email, password).await?;
        self.establish(Session {
            token: resp.token,
            user: resp.user,
        });
        Ok(())
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<(), ClientError> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ClientError::validation("Todos os campos são obrigatórios"));
        }

        let resp = self.api.signup(name, email, password).await?;
        self.establish(Session {
            token: resp.token,
            user: resp.user,
        });
        Ok(())
    }

    /// Local only; the mock server keeps no session to invalidate.
    pub fn logout(&mut self) {
        if let Some(session) = &self.session {
            info!("Logging out {}", session.user.email);
        }
        self.drop_session();
    }

    fn establish(&mut self, session: Session) {
        if let Err(e) = self.slot.store(&session) {
            warn!("Session not persisted: {}", e);
        }
        self.session = Some(session);
        self.phase = AuthPhase::Authenticated;
    }

    fn drop_session(&mut self) {
        if let Err(e) = self.slot.clear() {
            warn!("Session slot not cleared: {}", e);
        }
        self.session = None;
        self.phase = AuthPhase::Unauthenticated;
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// True once the initial verification has resolved either way.
    pub fn is_ready(&self) -> bool {
        matches!(
            self.phase,
            AuthPhase::Authenticated | AuthPhase::Unauthenticated
        )
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated && self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
