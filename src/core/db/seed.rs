use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use uuid::Uuid;

use crate::core::db::site::Site;

/// Contents of a JSON file loaded with `jobsite-kiosk import`.
///
/// ```json
/// {
///   "profiles": [{ "id": "…", "role": "foreman" }],
///   "sites": [{ "id": "…", "site_name": "Harbor View", "job_number": "J-101" }],
///   "assignments": [{ "user_id": "…", "job_site_id": "…" }],
///   "accounts": [{ "id": "…", "email": "a@b.c", "password": "…" }]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub profiles: Vec<SeedProfile>,
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub assignments: Vec<SeedAssignment>,
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProfile {
    pub id: Uuid,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAssignment {
    pub user_id: Uuid,
    pub job_site_id: Uuid,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Clone, Deserialize)]
pub struct SeedAccount {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub profiles: usize,
    pub sites: usize,
    pub assignments: usize,
    pub accounts: usize,
}

impl SeedData {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid seed file {:?}", path))
    }
}
