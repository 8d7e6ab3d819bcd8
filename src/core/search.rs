//! Free-text filtering shared by the site list and the plan browser.

/// Something a search box can match against.
pub trait Searchable {
    /// `needle` is already lowercased.
    fn matches(&self, needle: &str) -> bool;
}

/// Lowercased needle, or `None` when the query is blank and nothing should
/// be filtered out.
pub fn needle(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Items matching `query`, in their original order. Never mutates `items`.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    match needle(query) {
        None => items.iter().collect(),
        Some(needle) => items.iter().filter(|item| item.matches(&needle)).collect(),
    }
}
