use crate::core::db::Site;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SiteList,
    /// Carries the selected site by value.
    SiteDetail(Site),
}

pub trait Navigator {
    fn push(&mut self, route: Route);
    /// Returns false when already at the root.
    fn pop(&mut self) -> bool;
}

/// Route stack rooted at the site list. The root is never popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStack {
    routes: Vec<Route>,
}

impl Default for NavStack {
    fn default() -> Self {
        Self::new()
    }
}

impl NavStack {
    pub fn new() -> Self {
        Self {
            routes: vec![Route::SiteList],
        }
    }

    pub fn current(&self) -> &Route {
        // Never empty: the root is pushed in `new` and `pop` keeps it.
        &self.routes[self.routes.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.routes.len()
    }

    /// Back to the site list, e.g. after signing out.
    pub fn reset(&mut self) {
        self.routes.truncate(1);
    }
}

impl Navigator for NavStack {
    fn push(&mut self, route: Route) {
        tracing::debug!(depth = self.routes.len() + 1, "push route");
        self.routes.push(route);
    }

    fn pop(&mut self) -> bool {
        if self.routes.len() <= 1 {
            return false;
        }
        self.routes.pop();
        true
    }
}
