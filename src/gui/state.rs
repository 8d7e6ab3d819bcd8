use std::sync::Arc;

use crate::{
    config::KioskConfig,
    core::{auth::SessionGate, backend::Backend, geometry::GridGeometry, nav::NavStack},
};

/// State shared by every screen.
#[derive(Debug)]
pub struct AppState {
    pub config: KioskConfig,
    /// `None` until the database (and hosted client) finished opening.
    pub backend: Option<Arc<Backend>>,
    pub gate: SessionGate,
    pub nav: NavStack,
    pub window_width: f32,
}

impl AppState {
    pub fn new(config: KioskConfig, window_width: f32) -> Self {
        Self {
            config,
            backend: None,
            gate: SessionGate::new(),
            nav: NavStack::new(),
            window_width,
        }
    }

    pub fn backend(&self) -> Option<Arc<Backend>> {
        self.backend.clone()
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::for_width(self.window_width)
    }

    pub fn drawer_width(&self) -> f32 {
        self.config.drawer_width(self.window_width)
    }
}
