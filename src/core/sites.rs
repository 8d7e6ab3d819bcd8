//! Role-scoped site list with search and pull-to-refresh.

use crate::core::{
    auth::User,
    db::{Role, Site, SiteRepository},
    error::{KioskError, Result},
    search::{self, Searchable, contains_ignore_case},
};

impl Searchable for Site {
    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.name, needle)
            || self
                .job_number
                .as_deref()
                .is_some_and(|job_number| contains_ignore_case(job_number, needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteListing {
    pub role: Role,
    pub sites: Vec<Site>,
}

/// Case-insensitive by name; ties keep a stable, case-sensitive order.
pub fn sort_by_name(sites: &mut [Site]) {
    sites.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Fetch the sites `user` may see.
///
/// Admins get every active site in store order. Everyone else gets the sites
/// assigned to them, without archived ones, sorted by name.
pub async fn load_sites<R: SiteRepository + Sync>(repo: &R, user: &User) -> Result<SiteListing> {
    let role = repo
        .profile_role(user.id)
        .await
        .map_err(KioskError::DataFetch)?;
    let role = Role::from_profile(role.as_deref());

    let sites = if role.is_privileged() {
        repo.active_sites().await.map_err(KioskError::DataFetch)?
    } else {
        let mut sites: Vec<Site> = repo
            .assigned_sites(user.id)
            .await
            .map_err(KioskError::DataFetch)?
            .into_iter()
            .flatten()
            .filter(|site| !site.is_archived())
            .collect();
        sort_by_name(&mut sites);
        sites
    };
    tracing::info!(role = role.as_str(), count = sites.len(), "sites loaded");
    Ok(SiteListing { role, sites })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    Refresh,
}

/// Identifies one fetch. Only the most recently issued ticket may update the
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    kind: LoadKind,
}

impl LoadTicket {
    pub fn kind(&self) -> LoadKind {
        self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryStatus {
    /// Nothing has come back yet.
    Pending,
    Ready,
    /// The last fetch failed. Whatever was loaded before is kept.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SiteDirectory {
    sites: Vec<Site>,
    role: Option<Role>,
    status: DirectoryStatus,
    query: String,
    search_visible: bool,
    /// Latest outstanding ticket of each kind.
    pending_load: Option<u64>,
    pending_refresh: Option<u64>,
    generation: u64,
}

impl Default for SiteDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteDirectory {
    pub fn new() -> Self {
        Self {
            sites: Vec::new(),
            role: None,
            status: DirectoryStatus::Pending,
            query: String::new(),
            search_visible: false,
            pending_load: None,
            pending_refresh: None,
            generation: 0,
        }
    }

    fn issue(&mut self, kind: LoadKind) -> LoadTicket {
        self.generation += 1;
        *self.pending_mut(kind) = Some(self.generation);
        LoadTicket {
            generation: self.generation,
            kind,
        }
    }

    fn pending_mut(&mut self, kind: LoadKind) -> &mut Option<u64> {
        match kind {
            LoadKind::Initial => &mut self.pending_load,
            LoadKind::Refresh => &mut self.pending_refresh,
        }
    }

    /// Start the on-mount fetch (or a manual retry).
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issue(LoadKind::Initial)
    }

    /// Start a pull-to-refresh fetch. Tracked apart from the initial load.
    pub fn begin_refresh(&mut self) -> LoadTicket {
        self.issue(LoadKind::Refresh)
    }

    /// Apply a finished fetch. Returns false when a newer fetch superseded it
    /// and the result was dropped.
    pub fn finish<E: std::fmt::Display>(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<SiteListing, E>,
    ) -> bool {
        // An older ticket of the same kind leaves the newer one in flight.
        let pending = self.pending_mut(ticket.kind);
        if *pending == Some(ticket.generation) {
            *pending = None;
        }
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "dropping superseded site fetch"
            );
            return false;
        }
        match result {
            Ok(listing) => {
                self.role = Some(listing.role);
                self.sites = listing.sites;
                self.status = DirectoryStatus::Ready;
            }
            Err(err) => {
                tracing::warn!("site fetch failed: {err}");
                self.status = DirectoryStatus::Failed(err.to_string());
            }
        }
        true
    }

    pub async fn load<R: SiteRepository + Sync>(&mut self, repo: &R, user: &User) -> bool {
        let ticket = self.begin_load();
        let result = load_sites(repo, user).await;
        self.finish(ticket, result)
    }

    pub async fn refresh<R: SiteRepository + Sync>(&mut self, repo: &R, user: &User) -> bool {
        let ticket = self.begin_refresh();
        let result = load_sites(repo, user).await;
        self.finish(ticket, result)
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    pub fn status(&self) -> &DirectoryStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn is_refreshing(&self) -> bool {
        self.pending_refresh.is_some()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn search_visible(&self) -> bool {
        self.search_visible
    }

    /// Hiding the search field also clears it.
    pub fn toggle_search(&mut self) {
        if self.search_visible {
            self.query.clear();
        }
        self.search_visible = !self.search_visible;
    }

    /// Derived on every call from the full list and the current query.
    pub fn filtered(&self) -> Vec<&Site> {
        search::filter(&self.sites, &self.query)
    }

    /// Text for an empty list, or `None` when there is something to show.
    ///
    /// A failed fetch only explains the emptiness when nothing was ever
    /// loaded; a kept list filtered down to nothing is a plain zero match.
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.filtered().is_empty() {
            return None;
        }
        let failed = matches!(self.status, DirectoryStatus::Failed(_));
        if failed && self.sites.is_empty() {
            Some("Couldn't load sites")
        } else if !self.query.is_empty() {
            Some("No matching sites")
        } else {
            Some("No sites assigned")
        }
    }
}
