pub const GRID_COLUMNS: usize = 2;

#[derive(Debug, PartialEq, Eq)]
pub enum GridCell<'a, T> {
    Item(&'a T),
    /// Keeps the last card of an odd row at card width.
    Placeholder,
}

impl<T> Clone for GridCell<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GridCell<'_, T> {}

/// Row-major packing, left to right. A short last row is padded with
/// placeholders up to `columns` cells.
pub fn pack_grid<'a, T>(items: &[&'a T], columns: usize) -> Vec<Vec<GridCell<'a, T>>> {
    let columns = columns.max(1);
    items
        .chunks(columns)
        .map(|chunk| {
            let mut row: Vec<GridCell<'a, T>> =
                chunk.iter().map(|item| GridCell::Item(*item)).collect();
            row.resize(columns, GridCell::Placeholder);
            row
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
pub struct ListRow<'a, T> {
    pub item: &'a T,
    /// Every row but the last is followed by a divider.
    pub divider: bool,
}

pub fn list_rows<'a, T>(items: &[&'a T]) -> Vec<ListRow<'a, T>> {
    let last = items.len().saturating_sub(1);
    items
        .iter()
        .enumerate()
        .map(|(index, item)| ListRow {
            item: *item,
            divider: index < last,
        })
        .collect()
}
