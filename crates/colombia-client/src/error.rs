use crate::dashboard::Tab;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The server answered with an `{error}` body, usually alongside a
    /// non-success status.
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("member has not been approved")]
    NotApproved,

    #[error("tab '{0}' is not available")]
    TabUnavailable(Tab),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Text to show the user: the server's own message when there is one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) | Self::Server { message: msg, .. } => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_text_wins_over_fallback() {
        let err = ClientError::Server {
            status: 400,
            message: "Nickname é obrigatório".into(),
        };
        assert_eq!(err.user_message("Erro"), "Nickname é obrigatório");
    }

    #[test]
    fn non_server_errors_use_fallback() {
        assert_eq!(ClientError::NotAuthenticated.user_message("Erro"), "Erro");
    }
}
