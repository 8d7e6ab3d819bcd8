use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::{
    auth::{Session, User},
    db::site::Site,
};

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SiteRow {
    pub id: String,
    pub site_name: String,
    pub job_number: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<SiteRow> for Site {
    type Error = anyhow::Error;

    fn try_from(row: SiteRow) -> Result<Self, Self::Error> {
        Ok(Site {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| anyhow::anyhow!("Invalid site id {:?}: {}", row.id, e))?,
            name: row.site_name,
            job_number: row.job_number,
            address: row.address,
            status: row.status,
        })
    }
}

/// One `user_job_sites` row left-joined to its site. The site columns are
/// all NULL when the joined site is missing.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct AssignmentRow {
    pub id: Option<String>,
    pub site_name: Option<String>,
    pub job_number: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
}

impl AssignmentRow {
    pub fn into_site(self) -> anyhow::Result<Option<Site>> {
        match (self.id, self.site_name) {
            (Some(id), Some(site_name)) => Site::try_from(SiteRow {
                id,
                site_name,
                job_number: self.job_number,
                address: self.address,
                status: self.status,
            })
            .map(Some),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SessionRow {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: String,
    pub user_id: String,
    pub email: String,
}

impl TryFrom<SessionRow> for Session {
    type Error = anyhow::Error;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let expires_at = OffsetDateTime::parse(
            &row.expires_at,
            &time::format_description::well_known::Rfc3339,
        )?;
        Ok(Session {
            access_token: row.access_token,
            refresh_token: row.refresh_token,
            expires_at,
            user: User {
                id: Uuid::parse_str(&row.user_id)?,
                email: row.email,
            },
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct AccountRow {
    pub user_id: String,
    pub email: String,
    pub password_salt: String,
    pub password_hash: String,
}
