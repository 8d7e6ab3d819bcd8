use std::collections::HashMap;

use super::{Catalog, Folder, Plan};
use crate::core::search;

/// Collapse key of the group holding plans without a folder.
pub const UNFILED_KEY: &str = "unfiled";
pub const UNFILED_LABEL: &str = "Unfiled plans";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// Collapse-all button state owned by the top bar.
///
/// `presses` only ever grows, so pressing twice with the same resulting
/// flag is still seen as a new broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollapseToggle {
    pub all_collapsed: bool,
    pub presses: u64,
}

impl CollapseToggle {
    pub fn press(&mut self) {
        self.all_collapsed = !self.all_collapsed;
        self.presses += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanGroup<'a> {
    pub key: String,
    pub label: String,
    pub plans: Vec<&'a Plan>,
}

impl PlanGroup<'_> {
    pub fn count(&self) -> usize {
        self.plans.len()
    }
}

/// Partition already-filtered plans. Unfiled plans come first, then one group
/// per folder in catalog order. Groups without plans are left out.
pub fn group_by_folder<'a>(plans: &[&'a Plan], folders: &[Folder]) -> Vec<PlanGroup<'a>> {
    let mut groups = Vec::with_capacity(folders.len() + 1);

    let unfiled: Vec<&Plan> = plans
        .iter()
        .copied()
        .filter(|plan| plan.folder_id.is_none())
        .collect();
    if !unfiled.is_empty() {
        groups.push(PlanGroup {
            key: UNFILED_KEY.to_string(),
            label: UNFILED_LABEL.to_string(),
            plans: unfiled,
        });
    }

    for folder in folders {
        let members: Vec<&Plan> = plans
            .iter()
            .copied()
            .filter(|plan| plan.folder_id.as_deref() == Some(folder.id.as_str()))
            .collect();
        if !members.is_empty() {
            groups.push(PlanGroup {
                key: folder.id.clone(),
                label: folder.name.clone(),
                plans: members,
            });
        }
    }
    groups
}

#[derive(Debug, Clone)]
pub struct PlanBrowser {
    catalog: Catalog,
    query: String,
    view_mode: ViewMode,
    collapsed: HashMap<String, bool>,
    seen_presses: u64,
}

impl PlanBrowser {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            query: String::new(),
            view_mode: ViewMode::default(),
            collapsed: HashMap::new(),
            seen_presses: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    pub fn filtered(&self) -> Vec<&Plan> {
        search::filter(&self.catalog.plans, &self.query)
    }

    pub fn groups(&self) -> Vec<PlanGroup<'_>> {
        group_by_folder(&self.filtered(), &self.catalog.folders)
    }

    /// Groups start expanded.
    pub fn is_collapsed(&self, key: &str) -> bool {
        self.collapsed.get(key).copied().unwrap_or(false)
    }

    pub fn toggle_folder(&mut self, key: &str) {
        let flag = self.collapsed.entry(key.to_string()).or_insert(false);
        *flag = !*flag;
    }

    /// Set every known group, including unfiled, to `flag`.
    pub fn collapse_all(&mut self, flag: bool) {
        let keys: Vec<String> = self
            .catalog
            .group_keys()
            .into_iter()
            .map(str::to_string)
            .collect();
        for key in keys {
            self.collapsed.insert(key, flag);
        }
    }

    /// Apply the top bar's collapse-all state if it was pressed since the
    /// last sync. Returns whether anything was applied.
    pub fn sync_collapse(&mut self, toggle: &CollapseToggle) -> bool {
        if toggle.presses == self.seen_presses {
            return false;
        }
        self.seen_presses = toggle.presses;
        tracing::debug!(collapsed = toggle.all_collapsed, "collapse all");
        self.collapse_all(toggle.all_collapsed);
        true
    }
}
