use std::time::Duration;

use tracing::{info, warn};

use colombia_types::models::Member;

use crate::error::ClientError;
use crate::session::SessionStore;
use crate::slot::SessionSlot;

/// Pause between a successful join request and the membership re-check.
pub const JOIN_RECHECK_DELAY: Duration = Duration::from_secs(2);

pub const JOIN_FAILED: &str = "Erro ao enviar solicitação. Tente novamente.";

/// Outcome of the one member fetch made per signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberLookup {
    Found(Member),
    Missing,
    /// The fetch itself failed. Treated exactly like `Missing`.
    Failed(String),
}

/// Which top-level screen the user should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    Loading,
    Welcome,
    JoinTeam,
    PendingApproval(Member),
    Dashboard(Member),
}

/// Pick the screen for the current auth state and member lookup.
///
/// Precedence once authenticated: no member (or a failed lookup) → join
/// flow, unapproved → pending, approved → dashboard. Role plays no part
/// here, so an unapproved admin still waits.
pub fn resolve(ready: bool, authenticated: bool, lookup: Option<&MemberLookup>) -> GateView {
    if !ready {
        return GateView::Loading;
    }
    if !authenticated {
        return GateView::Welcome;
    }

    match lookup {
        None => GateView::Loading,
        Some(MemberLookup::Missing | MemberLookup::Failed(_)) => GateView::JoinTeam,
        Some(MemberLookup::Found(member)) if member.is_approved => {
            GateView::Dashboard(member.clone())
        }
        Some(MemberLookup::Found(member)) => GateView::PendingApproval(member.clone()),
    }
}

pub struct MembershipGate {
    /// The lookup and the id of the user it was fetched for.
    lookup: Option<(String, MemberLookup)>,
    recheck_delay: Duration,
}

impl Default for MembershipGate {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipGate {
    pub fn new() -> Self {
        Self {
            lookup: None,
            recheck_delay: JOIN_RECHECK_DELAY,
        }
    }

    pub fn with_recheck_delay(mut self, delay: Duration) -> Self {
        self.recheck_delay = delay;
        self
    }

    pub fn lookup(&self) -> Option<&MemberLookup> {
        self.lookup.as_ref().map(|(_, lookup)| lookup)
    }

    /// The cached lookup, if it belongs to the user signed in to `store`.
    fn current<S: SessionSlot>(&self, store: &SessionStore<S>) -> Option<&MemberLookup> {
        let user = store.user()?;
        match &self.lookup {
            Some((user_id, lookup)) if *user_id == user.id => Some(lookup),
            _ => None,
        }
    }

    pub fn view<S: SessionSlot>(&self, store: &SessionStore<S>) -> GateView {
        resolve(store.is_ready(), store.is_authenticated(), self.current(store))
    }

    /// Fetch the member record once per signed-in user. Later calls are
    /// no-ops until [`invalidate`](Self::invalidate) or a different user
    /// signs in.
    pub async fn check<S: SessionSlot>(&mut self, store: &SessionStore<S>) -> GateView {
        if !store.is_authenticated() {
            self.lookup = None;
        } else if self.current(store).is_none() {
            if let Some(user) = store.user() {
                self.lookup = Some((user.id.clone(), fetch(store).await));
            }
        }
        self.view(store)
    }

    /// Forget the current lookup, e.g. after logout.
    pub fn invalidate(&mut self) {
        self.lookup = None;
    }

    /// Submit a join request, wait the re-check delay, then fetch the
    /// member record again.
    pub async fn join_team<S: SessionSlot>(
        &mut self,
        store: &SessionStore<S>,
        nickname: &str,
    ) -> Result<GateView, ClientError> {
        if nickname.is_empty() {
            return Err(ClientError::validation("Nickname é obrigatório"));
        }
        let token = store.token().ok_or(ClientError::NotAuthenticated)?;

        let ack = store.api().join_team(token, nickname).await?;
        info!("Join request sent: {}", ack.message);

        tokio::time::sleep(self.recheck_delay).await;
        self.invalidate();
        Ok(self.check(store).await)
    }
}

async fn fetch<S: SessionSlot>(store: &SessionStore<S>) -> MemberLookup {
    let (Some(token), Some(user)) = (store.token(), store.user()) else {
        return MemberLookup::Missing;
    };

    match store.api().get_member(token, &user.id).await {
        Ok(Some(member)) => MemberLookup::Found(member),
        Ok(None) => MemberLookup::Missing,
        Err(e) => {
            warn!("Membership check failed, showing join flow: {}", e);
            MemberLookup::Failed(e.to_string())
        }
    }
}
