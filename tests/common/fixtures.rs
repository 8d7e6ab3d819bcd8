use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use jobsite_kiosk::core::{
    auth::{AuthClient, Credentials, Session, SessionEvent, SessionHub, SessionSubscription, User},
    db::{LocalDb, Site, SiteRepository},
    error::{KioskError, Result},
    plans::{Folder, Plan},
};
use time::{Duration, OffsetDateTime, macros::date};
use uuid::Uuid;

/// Creates a LocalDb in a temporary directory.
/// Returns both the database and the temp directory (which must be kept alive).
pub async fn create_test_db() -> (LocalDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("kiosk.db");
    let db = LocalDb::open(&path)
        .await
        .expect("Failed to create test database");
    (db, dir)
}

pub fn make_site(name: &str, job_number: Option<&str>, status: Option<&str>) -> Site {
    Site {
        id: Uuid::new_v4(),
        name: name.to_string(),
        job_number: job_number.map(str::to_string),
        address: None,
        status: status.map(str::to_string),
    }
}

pub fn make_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
    }
}

/// A session for `user` that expires `ttl` from now (negative for expired).
pub fn make_session(user: &User, ttl: Duration) -> Session {
    Session {
        access_token: format!("access-{}", user.id.simple()),
        refresh_token: format!("refresh-{}", user.id.simple()),
        expires_at: OffsetDateTime::now_utc() + ttl,
        user: user.clone(),
    }
}

pub fn make_plan(sheet_number: &str, title: &str, folder_id: Option<&str>) -> Plan {
    Plan {
        id: format!("plan-{sheet_number}"),
        sheet_number: sheet_number.to_string(),
        title: title.to_string(),
        folder_id: folder_id.map(str::to_string),
        version: "v1".to_string(),
        version_date: date!(2026 - 01 - 15),
        thumbnail_url: None,
        file_url: format!("/plans/{sheet_number}.pdf"),
        tags: Vec::new(),
    }
}

pub fn make_folder(id: &str, name: &str, plan_count: usize) -> Folder {
    Folder {
        id: id.to_string(),
        name: name.to_string(),
        plan_count,
    }
}

/// In-memory site repository. Counts calls and can be told to fail.
#[derive(Debug, Default)]
pub struct FakeRepo {
    pub role: Option<String>,
    pub active: Vec<Site>,
    pub assigned: Vec<Option<Site>>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeRepo {
    pub fn admin(active: Vec<Site>) -> Self {
        Self {
            role: Some("admin".to_string()),
            active,
            ..Self::default()
        }
    }

    pub fn member(role: &str, assigned: Vec<Option<Site>>) -> Self {
        Self {
            role: Some(role.to_string()),
            assigned,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

impl SiteRepository for FakeRepo {
    async fn profile_role(&self, _user_id: Uuid) -> anyhow::Result<Option<String>> {
        self.check()?;
        Ok(self.role.clone())
    }

    async fn active_sites(&self) -> anyhow::Result<Vec<Site>> {
        self.check()?;
        Ok(self.active.clone())
    }

    async fn assigned_sites(&self, _user_id: Uuid) -> anyhow::Result<Vec<Option<Site>>> {
        self.check()?;
        Ok(self.assigned.clone())
    }
}

/// Auth client that accepts one email/password pair and counts sign-in calls.
#[derive(Debug)]
pub struct FakeAuth {
    pub email: String,
    pub password: String,
    pub hub: Arc<SessionHub>,
    pub sign_in_calls: AtomicUsize,
}

impl FakeAuth {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            hub: Arc::new(SessionHub::default()),
            sign_in_calls: AtomicUsize::new(0),
        }
    }

    pub fn sign_in_count(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }
}

impl AuthClient for FakeAuth {
    async fn current_session(&self) -> anyhow::Result<Option<Session>> {
        Ok(self.hub.current())
    }

    fn subscribe(&self) -> SessionSubscription {
        self.hub.subscribe()
    }

    async fn sign_in_with_credentials(&self, credentials: &Credentials) -> Result<Session> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if credentials.email() != self.email || credentials.password() != self.password {
            return Err(KioskError::auth_failure("Invalid login credentials"));
        }
        let session = make_session(&make_user(&self.email), Duration::hours(1));
        self.hub.publish(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> anyhow::Result<()> {
        self.hub.publish(SessionEvent::SignedOut);
        Ok(())
    }
}
