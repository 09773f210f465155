use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use colombia_types::models::Message;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::session::SessionStore;
use crate::slot::SessionSlot;

pub const POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const MAX_MESSAGE_CHARS: usize = 1000;

pub const LOAD_FAILED: &str = "Erro ao carregar mensagens";
pub const SEND_FAILED: &str = "Erro ao enviar mensagem";

/// Where the chat view reads and writes messages.
pub trait MessageFeed: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Message>, ClientError>> + Send;
    fn post(&self, text: &str) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// The `/api` chat routes, authenticated with one session's token.
#[derive(Debug, Clone)]
pub struct ApiFeed {
    api: ApiClient,
    token: String,
}

impl ApiFeed {
    pub fn new(api: ApiClient, token: impl Into<String>) -> Self {
        Self {
            api,
            token: token.into(),
        }
    }

    pub fn from_store<S: SessionSlot>(store: &SessionStore<S>) -> Result<Self, ClientError> {
        let token = store.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(Self::new(store.api().clone(), token))
    }
}

impl MessageFeed for ApiFeed {
    async fn fetch(&self) -> Result<Vec<Message>, ClientError> {
        self.api.get_messages(&self.token).await
    }

    async fn post(&self, text: &str) -> Result<(), ClientError> {
        self.api.send_message(&self.token, text).await.map(|_| ())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub messages: Vec<Message>,
    /// True until the first fetch completes.
    pub loading: bool,
    pub error: Option<String>,
}

/// Reject drafts the server would refuse, or that exceed the input limit.
pub fn validate_draft(draft: &str) -> Result<&str, ClientError> {
    if draft.trim().is_empty() {
        return Err(ClientError::validation("Mensagem não pode estar vazia"));
    }
    if draft.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ClientError::validation(format!(
            "Mensagem muito longa (máximo {} caracteres)",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(draft)
}

/// One chat line: local time, author, admin badge, text.
pub fn format_message(msg: &Message) -> String {
    let time = msg.created_at.with_timezone(&Local).format("%H:%M:%S");
    let badge = if msg.author_role.is_admin() { " [ADMIN]" } else { "" };
    format!("[{}] {}{}: {}", time, msg.author_nickname, badge, msg.message)
}

/// A mounted chat view. Polls the feed immediately and then every
/// `interval` until unmounted or dropped. Each poll replaces the whole list.
pub struct ChatView<F: MessageFeed> {
    feed: Arc<F>,
    state: Arc<watch::Sender<ChatState>>,
    cancel: CancellationToken,
}

impl<F: MessageFeed> ChatView<F> {
    pub fn mount(feed: F, interval: Duration) -> Self {
        let feed = Arc::new(feed);
        let (tx, _) = watch::channel(ChatState {
            loading: true,
            ..ChatState::default()
        });
        let state = Arc::new(tx);
        let cancel = CancellationToken::new();

        tokio::spawn(poll_loop(feed.clone(), state.clone(), interval, cancel.clone()));

        Self { feed, state, cancel }
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    /// Post `draft` and re-fetch the full list. Nothing is appended
    /// locally; the message shows up only if the server returns it.
    pub async fn send(&self, draft: &str) -> Result<(), ClientError> {
        let text = validate_draft(draft)?;

        self.state.send_modify(|s| s.error = None);
        match self.feed.post(text).await {
            Ok(()) => {
                refresh(self.feed.as_ref(), &self.state).await;
                Ok(())
            }
            Err(e) => {
                self.state
                    .send_modify(|s| s.error = Some(e.user_message(SEND_FAILED)));
                Err(e)
            }
        }
    }

    /// Stop polling. Requests already in flight may still land.
    pub fn unmount(self) {
        self.cancel.cancel();
    }
}

impl<F: MessageFeed> Drop for ChatView<F> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<F: MessageFeed>(
    feed: Arc<F>,
    state: Arc<watch::Sender<ChatState>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                // Each poll runs on its own so a hung request never delays
                // the next tick.
                let feed = feed.clone();
                let state = state.clone();
                tokio::spawn(async move { refresh(feed.as_ref(), &state).await });
            }
        }
    }

    debug!("Chat polling stopped");
}

async fn refresh<F: MessageFeed>(feed: &F, state: &watch::Sender<ChatState>) {
    let result = feed.fetch().await;
    state.send_modify(|s| {
        match result {
            Ok(messages) => s.messages = messages,
            Err(e) => s.error = Some(e.user_message(LOAD_FAILED)),
        }
        s.loading = false;
    });
}
