//! JSON bodies exchanged with the hosted auth and table endpoints.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::core::{
    auth::{Session, User},
    db::Site,
};

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(1);

#[derive(Serialize)]
pub(super) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(super) struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: WireUser,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl TokenResponse {
    /// `expires_at` (unix seconds) wins over `expires_in`.
    pub fn into_session(self, now: OffsetDateTime) -> anyhow::Result<Session> {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(timestamp), _) => OffsetDateTime::from_unix_timestamp(timestamp)?,
            (None, Some(seconds)) => now + Duration::seconds(seconds),
            (None, None) => now + DEFAULT_TOKEN_LIFETIME,
        };
        Ok(Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: User {
                id: self.user.id,
                email: self.user.email.unwrap_or_default(),
            },
        })
    }
}

/// Error body of the auth endpoints. Different server versions fill
/// different fields.
#[derive(Debug, Default, Deserialize)]
pub(super) struct AuthErrorBody {
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AuthErrorBody {
    /// First non-blank field, or `None` if the body carried none of them.
    pub fn into_message(self) -> Option<String> {
        [self.error_description, self.msg, self.message, self.error]
            .into_iter()
            .flatten()
            .find(|message| !message.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileRow {
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AssignmentRow {
    #[serde(default)]
    pub job_sites: Option<Site>,
}
