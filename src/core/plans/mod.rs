mod browser;
mod catalog;
mod layout;

use std::collections::HashSet;

use time::Date;

pub use browser::{
    CollapseToggle, PlanBrowser, PlanGroup, UNFILED_KEY, UNFILED_LABEL, ViewMode, group_by_folder,
};
pub use catalog::bundled;
pub use layout::{GRID_COLUMNS, GridCell, ListRow, list_rows, pack_grid};

use crate::core::search::{Searchable, contains_ignore_case};

/// A construction drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: String,
    pub sheet_number: String,
    pub title: String,
    /// `None` means unfiled.
    pub folder_id: Option<String>,
    pub version: String,
    pub version_date: Date,
    pub thumbnail_url: Option<String>,
    pub file_url: String,
    pub tags: Vec<String>,
}

impl Searchable for Plan {
    fn matches(&self, needle: &str) -> bool {
        contains_ignore_case(&self.sheet_number, needle) || contains_ignore_case(&self.title, needle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub plan_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub folders: Vec<Folder>,
    pub plans: Vec<Plan>,
}

impl Catalog {
    /// Every plan must be unfiled or point at a folder that exists, and
    /// folder ids must be unique and distinct from the unfiled key.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut folder_ids = HashSet::new();
        for folder in &self.folders {
            if folder.id == UNFILED_KEY {
                anyhow::bail!("Folder id {:?} is reserved", folder.id);
            }
            if !folder_ids.insert(folder.id.as_str()) {
                anyhow::bail!("Duplicate folder id {:?}", folder.id);
            }
        }
        for plan in &self.plans {
            if let Some(folder_id) = &plan.folder_id {
                if !folder_ids.contains(folder_id.as_str()) {
                    anyhow::bail!(
                        "Plan {} refers to unknown folder {:?}",
                        plan.sheet_number,
                        folder_id
                    );
                }
            }
        }
        Ok(())
    }

    /// Collapse keys of every group that can ever be shown, unfiled first.
    pub fn group_keys(&self) -> Vec<&str> {
        std::iter::once(UNFILED_KEY)
            .chain(self.folders.iter().map(|folder| folder.id.as_str()))
            .collect()
    }
}
