mod gate;
mod hub;
mod session;

use std::future::Future;

pub use gate::{GateState, SessionGate};
pub use hub::{SessionEvent, SessionHub, SessionSubscription};
pub use session::{Credentials, Session, User};

use crate::core::error::Result;

/// The authentication collaborator.
pub trait AuthClient {
    /// One-shot lookup of the current session. Expired sessions are not returned.
    fn current_session(&self) -> impl Future<Output = anyhow::Result<Option<Session>>> + Send;
    fn subscribe(&self) -> SessionSubscription;
    fn sign_in_with_credentials(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Session>> + Send;
    fn sign_out(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Validate the login form and, only if it is complete, ask the backend.
pub async fn sign_in<A: AuthClient + Sync>(
    auth: &A,
    email: &str,
    password: &str,
) -> Result<Session> {
    let credentials = Credentials::validate(email, password)?;
    tracing::info!(email = credentials.email(), "signing in");
    auth.sign_in_with_credentials(&credentials).await
}

/// Initial lookup for the gate. A failed lookup counts as "no session".
pub async fn initial_session<A: AuthClient + Sync>(auth: &A) -> Option<Session> {
    match auth.current_session().await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!("session lookup failed: {err:#}");
            None
        }
    }
}
