use log::debug;

use super::datatype::Value;
use super::index::{RowId, RowIndex, SortFailure};
use super::row::Row;

/// Row storage of a table: an append-only arena of fixed-length rows plus the
/// row ID mapping into it.
///
/// Every row always has exactly `width` cells. Rows are never removed, so a
/// position handed out once stays valid for the lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    index: RowIndex,
    width: usize,
}

impl RowStore {
    pub fn new() -> RowStore {
        RowStore::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn add_column(&mut self) {
        //! Grow every row by one empty cell.

        self.width += 1;
        for row in self.rows.iter_mut() {
            row.0.push(None);
        }
    }

    pub(crate) fn expand_to(&mut self, index: usize, update_ids: bool) {
        //! Make sure `index` is a valid row position, appending empty rows as
        //! needed. With `update_ids`, every appended row also gets its own
        //! position as an integer row ID.

        let current = self.rows.len();
        if index < current {
            return;
        }

        for position in current..=index {
            if update_ids {
                self.index.insert(RowId::from(position), position);
            }
            self.rows.push(Row::empty(self.width));
        }
        debug!("row store grown from {} to {} rows", current, self.rows.len());
    }

    pub(crate) fn put(&mut self, row: usize, column: usize, value: Option<Value>) {
        self.expand_to(row, false);
        if let Some(cell) = self.rows[row].0.get_mut(column) {
            *cell = value;
        }
    }

    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.index.get(id)
    }

    pub fn contains_id(&self, id: &RowId) -> bool {
        self.index.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RowId> {
        self.index.keys()
    }

    pub fn id_count(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn map_id(&mut self, id: RowId, index: usize) {
        self.expand_to(index, false);
        self.index.insert(id, index);
    }

    pub(crate) fn unmap_id(&mut self, id: &RowId) -> Option<usize> {
        self.index.remove(id)
    }

    pub(crate) fn position_or_append(&mut self, id: RowId) -> usize {
        //! Position of `id`, registering it on a fresh row if unseen.

        match self.index.get(&id) {
            Some(position) => position,
            None => {
                let position = self.rows.len();
                self.map_id(id, position);
                position
            }
        }
    }

    pub(crate) fn sorted_positions(&self) -> Result<Vec<usize>, SortFailure> {
        self.index.sorted_positions(self.rows.len())
    }

    pub(crate) fn append(&mut self, other: RowStore) {
        //! Move every row of `other` after ours, re-mapping its row IDs by our
        //! prior row count.

        let offset = self.rows.len();
        self.rows.extend(other.rows);
        for (id, index) in other.index.shift_by(offset) {
            self.index.insert(id, index);
        }
    }

    pub fn find(&self, values: &[Value]) -> Option<usize> {
        //! Position of the first row whose leading cells equal `values`.

        if values.is_empty() || values.len() > self.width {
            return None;
        }
        self.rows.iter().position(|row| row.starts_with(values))
    }
}
