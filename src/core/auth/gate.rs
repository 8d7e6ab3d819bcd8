use time::OffsetDateTime;

use super::{hub::SessionEvent, session::Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Initial session lookup has not come back yet.
    Loading,
    Unauthenticated,
    Authenticated(Session),
}

/// Decides which of the three top-level views to render.
#[derive(Debug, Clone)]
pub struct SessionGate {
    state: GateState,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Loading,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            GateState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, GateState::Loading)
    }

    /// Result of the one-shot initial lookup. Ignored once a change
    /// notification has already resolved the gate.
    pub fn resolve(&mut self, session: Option<Session>) {
        if !self.is_loading() {
            tracing::debug!("initial session arrived after gate resolved; ignoring");
            return;
        }
        self.state = match session {
            Some(session) => GateState::Authenticated(session),
            None => GateState::Unauthenticated,
        };
    }

    /// Apply a change notification. Returns whether the rendered view changed.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        let was_authenticated = self.session().is_some();
        let was_loading = self.is_loading();
        match event {
            SessionEvent::SignedIn(session) => {
                self.state = GateState::Authenticated(session);
            }
            SessionEvent::Refreshed(session) => match self.state {
                GateState::Authenticated(_) | GateState::Loading => {
                    self.state = GateState::Authenticated(session);
                }
                GateState::Unauthenticated => {
                    tracing::debug!("refresh while signed out; ignoring");
                }
            },
            SessionEvent::SignedOut | SessionEvent::Expired => {
                self.state = GateState::Unauthenticated;
            }
        }
        was_loading || was_authenticated != self.session().is_some()
    }

    /// Drop an expired session. Returns true when the gate signed the user out.
    pub fn check_expiry(&mut self, now: OffsetDateTime) -> bool {
        match &self.state {
            GateState::Authenticated(session) if session.is_expired_at(now) => {
                tracing::info!(user = %session.user.email, "session expired");
                self.apply(SessionEvent::Expired)
            }
            _ => false,
        }
    }
}
