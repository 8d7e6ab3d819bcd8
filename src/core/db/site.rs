use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ARCHIVED_STATUS: &str = "archived";

/// A physical jobsite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    #[serde(alias = "site_name")]
    pub name: String,
    #[serde(default)]
    pub job_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Site {
    /// A site without a status is active.
    pub fn is_archived(&self) -> bool {
        self.status.as_deref() == Some(ARCHIVED_STATUS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member(String),
}

impl Role {
    /// Users without a profile, or with a blank role, are admins.
    pub fn from_profile(role: Option<&str>) -> Self {
        match role.map(str::trim) {
            None | Some("") | Some("admin") => Role::Admin,
            Some(other) => Role::Member(other.to_string()),
        }
    }

    /// Privileged users see every active site instead of their assignments.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Member(role) => role,
        }
    }
}

/// The read-only data-store collaborator behind the site list.
pub trait SiteRepository {
    /// Role column of the user's profile, if a profile exists.
    fn profile_role(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;
    /// Every site whose status is not archived, ordered by name.
    fn active_sites(&self) -> impl Future<Output = anyhow::Result<Vec<Site>>> + Send;
    /// Sites joined through the user's non-archived assignment rows, in no
    /// particular order. `None` marks an assignment whose site is not visible.
    fn assigned_sites(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = anyhow::Result<Vec<Option<Site>>>> + Send;
}
