use crate::core::plans::GRID_COLUMNS;

pub const GRID_PADDING: f32 = 16.0;
pub const GRID_GAP: f32 = 10.0;
pub const THUMBNAIL_RATIO: f32 = 0.7;

/// Plan card sizing for a given window width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub available_width: f32,
    pub card_width: f32,
    pub thumbnail_height: f32,
}

impl GridGeometry {
    pub fn for_width(available_width: f32) -> Self {
        let columns = GRID_COLUMNS as f32;
        let card_width = ((available_width - 2.0 * GRID_PADDING - GRID_GAP) / columns).max(0.0);
        Self {
            available_width,
            card_width,
            thumbnail_height: card_width * THUMBNAIL_RATIO,
        }
    }
}
