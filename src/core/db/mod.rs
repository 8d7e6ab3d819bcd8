mod account;
mod model;
mod seed;
mod session;
mod site;
mod state;

use std::{path::Path, sync::Arc};

use sqlx::SqliteConnection;
use state::DbState;
use time::OffsetDateTime;
use uuid::Uuid;

pub use account::{AccountRepository, NewAccount};
pub use seed::{ImportSummary, SeedAccount, SeedAssignment, SeedData, SeedProfile};
pub use session::SessionStore;
pub use site::{ARCHIVED_STATUS, Role, Site, SiteRepository};

use crate::core::{
    auth::{AuthClient, Credentials, Session, SessionEvent, SessionHub, SessionSubscription, User},
    error::{KioskError, Result},
};
use model::{AccountRow, AssignmentRow, SessionRow, SiteRow};

const LOCAL_SESSION_TTL: time::Duration = time::Duration::hours(1);
const INVALID_CREDENTIALS: &str = "Invalid login credentials";

/// On-device SQLite store. Serves as the offline backend (sites, profiles,
/// accounts) and as session persistence for either backend.
#[derive(Debug, Clone)]
pub struct LocalDb {
    state: Arc<DbState>,
    hub: Arc<SessionHub>,
}

impl LocalDb {
    pub async fn open<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        let db = Self {
            state: Arc::new(DbState::open(db_file).await?),
            hub: Arc::new(SessionHub::default()),
        };
        let persisted = db.load_session().await?;
        db.hub.restore(persisted);
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        self.state.path()
    }

    /// Explicitly flush and close the database.
    /// This is required when dropping in an async context (e.g., tests with #[tokio::test]).
    pub async fn close(&self) -> anyhow::Result<()> {
        self.state.close().await
    }

    /// Upsert everything in `seed` in a single transaction.
    pub async fn import(&self, seed: &SeedData) -> anyhow::Result<ImportSummary> {
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin_transaction().await?;

        for profile in &seed.profiles {
            sqlx::query(
                r#"INSERT INTO profiles (id, role) VALUES ($1, $2)
                ON CONFLICT (id) DO UPDATE SET role = excluded.role"#,
            )
            .bind(profile.id.to_string())
            .bind(&profile.role)
            .execute(&mut *tx)
            .await?;
        }
        for site in &seed.sites {
            sqlx::query(
                r#"INSERT INTO job_sites (id, site_name, job_number, address, status)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO UPDATE SET
                    site_name = excluded.site_name,
                    job_number = excluded.job_number,
                    address = excluded.address,
                    status = excluded.status"#,
            )
            .bind(site.id.to_string())
            .bind(&site.name)
            .bind(&site.job_number)
            .bind(&site.address)
            .bind(&site.status)
            .execute(&mut *tx)
            .await?;
        }
        for assignment in &seed.assignments {
            sqlx::query(
                r#"INSERT INTO user_job_sites (user_id, job_site_id, archived) VALUES ($1, $2, $3)
                ON CONFLICT (user_id, job_site_id) DO UPDATE SET archived = excluded.archived"#,
            )
            .bind(assignment.user_id.to_string())
            .bind(assignment.job_site_id.to_string())
            .bind(assignment.archived)
            .execute(&mut *tx)
            .await?;
        }
        for account in &seed.accounts {
            insert_account(
                &mut tx,
                &NewAccount {
                    user_id: account.id,
                    email: account.email.clone(),
                    password: account.password.clone(),
                },
            )
            .await?;
        }
        tx.commit().await?;

        let summary = ImportSummary {
            profiles: seed.profiles.len(),
            sites: seed.sites.len(),
            assignments: seed.assignments.len(),
            accounts: seed.accounts.len(),
        };
        tracing::info!(?summary, "seed data imported");
        Ok(summary)
    }
}

async fn insert_account(conn: &mut SqliteConnection, account: &NewAccount) -> anyhow::Result<User> {
    let user_id = account.user_id.unwrap_or_else(Uuid::new_v4);
    let email = account.email.trim().to_string();
    let salt = account::new_salt();
    let hash = account::hash_password(&salt, &account.password)
        .to_hex()
        .to_string();
    sqlx::query(
        r#"INSERT INTO accounts (user_id, email, password_salt, password_hash) VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE SET
            email = excluded.email,
            password_salt = excluded.password_salt,
            password_hash = excluded.password_hash"#,
    )
    .bind(user_id.to_string())
    .bind(&email)
    .bind(&salt)
    .bind(&hash)
    .execute(conn)
    .await?;
    Ok(User { id: user_id, email })
}

impl SiteRepository for LocalDb {
    async fn profile_role(&self, user_id: Uuid) -> anyhow::Result<Option<String>> {
        let mut conn = self.state.conn().await?;
        let role = sqlx::query_scalar::<_, String>(r#"SELECT role FROM profiles WHERE id = $1"#)
            .bind(user_id.to_string())
            .fetch_optional(&mut **conn)
            .await?;
        Ok(role)
    }

    async fn active_sites(&self) -> anyhow::Result<Vec<Site>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, SiteRow>(
            r#"SELECT id, site_name, job_number, address, status FROM job_sites
            WHERE status IS NOT $1
            ORDER BY site_name COLLATE NOCASE ASC"#,
        )
        .bind(ARCHIVED_STATUS)
        .fetch_all(&mut **conn)
        .await?
        .into_iter()
        .map(Site::try_from)
        .collect()
    }

    async fn assigned_sites(&self, user_id: Uuid) -> anyhow::Result<Vec<Option<Site>>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, AssignmentRow>(
            r#"SELECT s.id, s.site_name, s.job_number, s.address, s.status
            FROM user_job_sites u
            LEFT JOIN job_sites s ON s.id = u.job_site_id
            WHERE u.user_id = $1 AND u.archived = 0"#,
        )
        .bind(user_id.to_string())
        .fetch_all(&mut **conn)
        .await?
        .into_iter()
        .map(AssignmentRow::into_site)
        .collect()
    }
}

impl SessionStore for LocalDb {
    async fn load_session(&self) -> anyhow::Result<Option<Session>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, SessionRow>(
            r#"SELECT access_token, refresh_token, expires_at, user_id, email
            FROM stored_session WHERE slot = 1"#,
        )
        .fetch_optional(&mut **conn)
        .await?
        .map(Session::try_from)
        .transpose()
    }

    async fn save_session(&self, session: &Session) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        let expires_at = session
            .expires_at
            .format(&time::format_description::well_known::Rfc3339)?;
        sqlx::query(
            r#"INSERT INTO stored_session (slot, access_token, refresh_token, expires_at, user_id, email)
            VALUES (1, $1, $2, $3, $4, $5)
            ON CONFLICT (slot) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                expires_at = excluded.expires_at,
                user_id = excluded.user_id,
                email = excluded.email"#,
        )
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(expires_at)
        .bind(session.user.id.to_string())
        .bind(&session.user.email)
        .execute(&mut **conn)
        .await?;
        Ok(())
    }

    async fn clear_session(&self) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        sqlx::query(r#"DELETE FROM stored_session"#)
            .execute(&mut **conn)
            .await?;
        Ok(())
    }
}

impl AccountRepository for LocalDb {
    async fn add_account(&self, account: &NewAccount) -> anyhow::Result<User> {
        let mut conn = self.state.conn().await?;
        insert_account(&mut conn, account).await
    }

    async fn verify_credentials(&self, credentials: &Credentials) -> anyhow::Result<Option<User>> {
        let mut conn = self.state.conn().await?;
        let Some(row) = sqlx::query_as::<_, AccountRow>(
            r#"SELECT user_id, email, password_salt, password_hash FROM accounts WHERE email = $1"#,
        )
        .bind(credentials.email())
        .fetch_optional(&mut **conn)
        .await?
        else {
            return Ok(None);
        };
        if !account::password_matches(&row.password_salt, &row.password_hash, credentials.password())
        {
            return Ok(None);
        }
        Ok(Some(User {
            id: Uuid::parse_str(&row.user_id)?,
            email: row.email,
        }))
    }
}

impl AuthClient for LocalDb {
    async fn current_session(&self) -> anyhow::Result<Option<Session>> {
        match self.hub.current() {
            Some(session) if session.is_expired() => {
                self.clear_session().await?;
                self.hub.publish(SessionEvent::Expired);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn subscribe(&self) -> SessionSubscription {
        self.hub.subscribe()
    }

    async fn sign_in_with_credentials(&self, credentials: &Credentials) -> Result<Session> {
        let user = self
            .verify_credentials(credentials)
            .await
            .map_err(KioskError::DataFetch)?
            .ok_or_else(|| KioskError::auth_failure(INVALID_CREDENTIALS))?;
        let session = Session {
            access_token: Uuid::new_v4().simple().to_string(),
            refresh_token: Uuid::new_v4().simple().to_string(),
            expires_at: OffsetDateTime::now_utc() + LOCAL_SESSION_TTL,
            user,
        };
        self.save_session(&session)
            .await
            .map_err(KioskError::DataFetch)?;
        self.hub.publish(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        self.clear_session().await?;
        self.hub.publish(SessionEvent::SignedOut);
        Ok(())
    }
}
