use std::future::Future;

use crate::core::auth::Session;

/// Device-local persistence of the last signed-in session.
pub trait SessionStore {
    fn load_session(&self) -> impl Future<Output = anyhow::Result<Option<Session>>> + Send;
    fn save_session(&self, session: &Session) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn clear_session(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}
