mod wire;

use std::sync::Arc;

use anyhow::Context;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::{
    auth::{AuthClient, Credentials, Session, SessionEvent, SessionHub, SessionSubscription},
    db::{ARCHIVED_STATUS, LocalDb, SessionStore, Site, SiteRepository},
    error::{KioskError, Result},
};
use wire::{AssignmentRow, AuthErrorBody, PasswordGrant, ProfileRow, RefreshGrant, TokenResponse};

const SITE_COLUMNS: &str = "id,site_name,job_number,address,status";

fn is_credential_rejection(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
    )
}

/// Client for the hosted auth service and its table API. Sessions are
/// persisted in the local database so a restart keeps the user signed in.
#[derive(Debug, Clone)]
pub struct HostedClient {
    http: Client,
    base_url: String,
    anon_key: String,
    store: LocalDb,
    hub: Arc<SessionHub>,
}

impl HostedClient {
    pub async fn connect(url: &str, anon_key: &str, store: LocalDb) -> anyhow::Result<Self> {
        let persisted = store.load_session().await?;
        let client = Self {
            http: Client::new(),
            base_url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            store,
            hub: Arc::new(SessionHub::new(persisted)),
        };
        tracing::debug!(url = %client.base_url, "hosted backend configured");
        Ok(client)
    }

    /// Database holding the persisted session.
    pub fn store(&self) -> &LocalDb {
        &self.store
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn token_request(&self, request: RequestBuilder) -> Result<Session> {
        let response = request
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| KioskError::DataFetch(e.into()))?;
        let status = response.status();
        if is_credential_rejection(status) {
            let body = response
                .bytes()
                .await
                .map_err(|e| KioskError::DataFetch(e.into()))?;
            // Only a recognised auth error body means the credentials were refused.
            let message = serde_json::from_slice::<AuthErrorBody>(&body)
                .ok()
                .and_then(AuthErrorBody::into_message);
            return match message {
                Some(message) => Err(KioskError::auth_failure(message)),
                None => Err(KioskError::DataFetch(anyhow::anyhow!(
                    "Auth service answered {status} without an error body"
                ))),
            };
        }
        let token = response
            .error_for_status()
            .map_err(|e| KioskError::DataFetch(e.into()))?
            .json::<TokenResponse>()
            .await
            .map_err(|e| KioskError::DataFetch(e.into()))?;
        token
            .into_session(OffsetDateTime::now_utc())
            .map_err(KioskError::DataFetch)
    }

    /// Exchange the refresh token for a new session.
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant {
                refresh_token: &session.refresh_token,
            });
        self.token_request(request).await
    }

    fn access_token(&self) -> anyhow::Result<String> {
        self.hub
            .current()
            .map(|session| session.access_token)
            .context("Not signed in")
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> anyhow::Result<Vec<T>> {
        let token = self.access_token()?;
        let rows = self
            .http
            .get(self.table_url(table))
            .query(params)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", table))?
            .error_for_status()
            .with_context(|| format!("Query on {} was rejected", table))?
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("Unexpected response from {}", table))?;
        Ok(rows)
    }

    async fn drop_session(&self, event: SessionEvent) -> anyhow::Result<()> {
        self.store.clear_session().await?;
        self.hub.publish(event);
        Ok(())
    }
}

impl AuthClient for HostedClient {
    async fn current_session(&self) -> anyhow::Result<Option<Session>> {
        let Some(session) = self.hub.current() else {
            return Ok(None);
        };
        if !session.is_expired() {
            return Ok(Some(session));
        }
        match self.refresh(&session).await {
            Ok(refreshed) => {
                self.store.save_session(&refreshed).await?;
                self.hub.publish(SessionEvent::Refreshed(refreshed.clone()));
                Ok(Some(refreshed))
            }
            Err(err) => {
                tracing::info!("session refresh failed: {err}");
                self.drop_session(SessionEvent::Expired).await?;
                Ok(None)
            }
        }
    }

    fn subscribe(&self) -> SessionSubscription {
        self.hub.subscribe()
    }

    async fn sign_in_with_credentials(&self, credentials: &Credentials) -> Result<Session> {
        let request = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant {
                email: credentials.email(),
                password: credentials.password(),
            });
        let session = self.token_request(request).await?;
        self.store
            .save_session(&session)
            .await
            .map_err(KioskError::DataFetch)?;
        self.hub.publish(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    /// Remote logout is best effort; the local session is always dropped.
    async fn sign_out(&self) -> anyhow::Result<()> {
        if let Ok(token) = self.access_token() {
            let result = self
                .http
                .post(self.auth_url("logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(token)
                .send()
                .await
                .and_then(|response| response.error_for_status());
            match result {
                Ok(_) => {}
                Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => {}
                Err(err) => tracing::warn!("remote logout failed: {err}"),
            }
        }
        self.drop_session(SessionEvent::SignedOut).await
    }
}

impl SiteRepository for HostedClient {
    async fn profile_role(&self, user_id: Uuid) -> anyhow::Result<Option<String>> {
        let rows: Vec<ProfileRow> = self
            .select(
                "profiles",
                &[
                    ("select", "role".to_string()),
                    ("id", format!("eq.{}", user_id)),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().and_then(|row| row.role))
    }

    async fn active_sites(&self) -> anyhow::Result<Vec<Site>> {
        self.select(
            "job_sites",
            &[
                ("select", SITE_COLUMNS.to_string()),
                ("or", format!("(status.is.null,status.neq.{})", ARCHIVED_STATUS)),
                ("order", "site_name".to_string()),
            ],
        )
        .await
    }

    async fn assigned_sites(&self, user_id: Uuid) -> anyhow::Result<Vec<Option<Site>>> {
        let rows: Vec<AssignmentRow> = self
            .select(
                "user_job_sites",
                &[
                    ("select", format!("job_sites({})", SITE_COLUMNS)),
                    ("user_id", format!("eq.{}", user_id)),
                    ("archived", "eq.false".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(|row| row.job_sites).collect())
    }
}
