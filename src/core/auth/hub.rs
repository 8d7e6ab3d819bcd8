use futures::Stream;
use tokio::sync::watch;

use super::session::Session;

/// Change notification published by an auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    Refreshed(Session),
    SignedOut,
    Expired,
}

impl SessionEvent {
    /// Session left in place after this event.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionEvent::SignedIn(session) | SessionEvent::Refreshed(session) => Some(session),
            SessionEvent::SignedOut | SessionEvent::Expired => None,
        }
    }
}

#[derive(Debug, Default)]
struct HubState {
    session: Option<Session>,
    last_event: Option<SessionEvent>,
}

/// Holds the current session of one backend and fans out change
/// notifications. Owned by the backend, never global.
#[derive(Debug)]
pub struct SessionHub {
    tx: watch::Sender<HubState>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionHub {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(HubState {
            session: initial,
            last_event: None,
        });
        Self { tx }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().session.clone()
    }

    /// Replace the session without notifying anyone. Used when a persisted
    /// session is loaded at startup.
    pub fn restore(&self, session: Option<Session>) {
        self.tx.send_modify(|state| state.session = session);
    }

    pub fn publish(&self, event: SessionEvent) {
        tracing::debug!(?event, "session change");
        self.tx.send_modify(|state| {
            state.session = event.session().cloned();
            state.last_event = Some(event);
        });
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Live subscription to a [`SessionHub`]. Dropping it unsubscribes.
///
/// Only the most recent event is kept; a slow subscriber sees the latest
/// change, which always carries the resulting session.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<HubState>,
}

impl SessionSubscription {
    /// Wait for the next change. `None` once the hub is gone.
    pub async fn changed(&mut self) -> Option<SessionEvent> {
        loop {
            self.rx.changed().await.ok()?;
            if let Some(event) = self.rx.borrow_and_update().last_event.clone() {
                return Some(event);
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = SessionEvent> + Send + 'static {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription
                .changed()
                .await
                .map(|event| (event, subscription))
        })
    }
}
