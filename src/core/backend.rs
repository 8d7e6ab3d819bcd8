use uuid::Uuid;

use crate::{
    config::{BackendKind, KioskConfig},
    core::{
        auth::{AuthClient, Credentials, Session, SessionSubscription},
        db::{LocalDb, Site, SiteRepository},
        error::Result,
        remote::HostedClient,
    },
};

/// The backend chosen at startup. Screens talk to this instead of a concrete
/// client.
#[derive(Debug, Clone)]
pub enum Backend {
    Hosted(HostedClient),
    Local(LocalDb),
}

impl Backend {
    /// Open the local database and, for the hosted backend, wrap it in a
    /// client for the configured service.
    pub async fn from_config(config: &KioskConfig) -> anyhow::Result<Self> {
        let db_path = config.database_path();
        match config.backend {
            BackendKind::Hosted => {
                let (url, anon_key) = config.hosted_endpoint()?;
                let store = LocalDb::open(&db_path).await?;
                Ok(Backend::Hosted(
                    HostedClient::connect(url, anon_key, store).await?,
                ))
            }
            BackendKind::Local => {
                tracing::info!(path = %db_path.display(), "using local database");
                Ok(Backend::Local(LocalDb::open(&db_path).await?))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Hosted(_) => BackendKind::Hosted,
            Backend::Local(_) => BackendKind::Local,
        }
    }

    pub fn local_db(&self) -> &LocalDb {
        match self {
            Backend::Hosted(client) => client.store(),
            Backend::Local(db) => db,
        }
    }

    pub async fn close(&self) -> anyhow::Result<()> {
        self.local_db().close().await
    }
}

impl AuthClient for Backend {
    async fn current_session(&self) -> anyhow::Result<Option<Session>> {
        match self {
            Backend::Hosted(client) => client.current_session().await,
            Backend::Local(db) => db.current_session().await,
        }
    }

    fn subscribe(&self) -> SessionSubscription {
        match self {
            Backend::Hosted(client) => client.subscribe(),
            Backend::Local(db) => db.subscribe(),
        }
    }

    async fn sign_in_with_credentials(&self, credentials: &Credentials) -> Result<Session> {
        match self {
            Backend::Hosted(client) => client.sign_in_with_credentials(credentials).await,
            Backend::Local(db) => db.sign_in_with_credentials(credentials).await,
        }
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        match self {
            Backend::Hosted(client) => client.sign_out().await,
            Backend::Local(db) => db.sign_out().await,
        }
    }
}

impl SiteRepository for Backend {
    async fn profile_role(&self, user_id: Uuid) -> anyhow::Result<Option<String>> {
        match self {
            Backend::Hosted(client) => client.profile_role(user_id).await,
            Backend::Local(db) => db.profile_role(user_id).await,
        }
    }

    async fn active_sites(&self) -> anyhow::Result<Vec<Site>> {
        match self {
            Backend::Hosted(client) => client.active_sites().await,
            Backend::Local(db) => db.active_sites().await,
        }
    }

    async fn assigned_sites(&self, user_id: Uuid) -> anyhow::Result<Vec<Option<Site>>> {
        match self {
            Backend::Hosted(client) => client.assigned_sites(user_id).await,
            Backend::Local(db) => db.assigned_sites(user_id).await,
        }
    }
}
