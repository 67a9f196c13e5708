use std::collections::HashMap;
use std::fmt::Display;

use log::{debug, warn};
use serde::Serialize;

use super::column::{Column, NULL_TEXT, is_valid_name};
use super::datatype::{DataType, Value};
use super::index::{RowId, SortFailure};
use super::row::Row;
use super::store::RowStore;
use crate::config::{Coercion, EngineConfig};
use crate::error::{ReportError, Result};

/// A typed, columnar report table.
///
/// Cells are addressed either positionally (row index, column index) or by
/// a caller-chosen [`RowId`] and a column name. Rows are created on demand by
/// both kinds of writes and are never removed.
///
/// When `sort_by_row_id` is set, rows are serialized in row ID order, which
/// requires every row to be reachable by exactly one ID of a single kind.
/// Otherwise rows keep the order in which they were created.
///
/// # Issues
/// - The table is single-writer. Shards built on separate threads should each
/// own a table and be folded together with [`Table::concat`] by one thread.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    description: String,
    sort_by_row_id: bool,
    coercion: Coercion,
    columns: Vec<Column>,
    column_index: HashMap<String, usize>,
    store: RowStore,
}

/// Serializable snapshot of a table, rows in their serialization order.
#[derive(Debug, Serialize)]
pub struct TableExport<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub columns: Vec<ColumnExport<'a>>,
    pub rows: Vec<Vec<Option<&'a Value>>>,
}

#[derive(Debug, Serialize)]
pub struct ColumnExport<'a> {
    pub name: &'a str,
    pub format: &'a str,
    pub datatype: DataType,
}

impl Table {
    pub fn new(name: &str, description: &str) -> Result<Table> {
        //! Create an empty table whose rows are serialized in row ID order.

        Table::with_config(name, description, &EngineConfig::default())
    }

    pub fn new_unsorted(name: &str, description: &str) -> Result<Table> {
        //! Create an empty table whose rows are serialized in creation order.

        let config = EngineConfig {
            sort_by_row_id: false,
            ..EngineConfig::default()
        };
        Table::with_config(name, description, &config)
    }

    pub fn with_config(name: &str, description: &str, config: &EngineConfig) -> Result<Table> {
        if !is_valid_name(name) {
            return Err(ReportError::InvalidName(name.to_string()));
        }

        if description.contains(['\r', '\n']) {
            return Err(ReportError::InvalidDescription(description.to_string()));
        }

        Ok(Table {
            name: name.to_string(),
            description: description.to_string(),
            sort_by_row_id: config.sort_by_row_id,
            coercion: config.coercion,
            columns: Vec::new(),
            column_index: HashMap::new(),
            store: RowStore::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sort_by_row_id(&self) -> bool {
        self.sort_by_row_id
    }

    pub fn coercion(&self) -> Coercion {
        self.coercion
    }

    pub fn num_rows(&self) -> usize {
        self.store.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index.get(name).map(|&index| &self.columns[index])
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }

    pub fn add_column(&mut self, name: &str, format: &str) -> Result<()> {
        //! Append a column whose declared type follows from `format`.
        //!
        //! Fails on an invalid or already used column name.

        if self.column_index.contains_key(name) {
            return Err(ReportError::DuplicateColumn {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }

        let column = Column::new(name, format)?;
        debug!(
            "table {}: added column {} with format '{}' ({})",
            self.name,
            name,
            format,
            column.datatype()
        );

        self.column_index.insert(name.to_string(), self.columns.len());
        self.columns.push(column);
        self.store.add_column();
        Ok(())
    }

    pub fn add_untyped_column(&mut self, name: &str) -> Result<()> {
        self.add_column(name, "")
    }

    pub fn add_row_id(&mut self, id: impl Into<RowId>, populate_first_column: bool) -> Result<()> {
        //! Map `id` to a new row appended at the end of the table.

        let index = self.store.len();
        self.add_row_id_mapping(id, index, populate_first_column)
    }

    pub fn add_row_id_mapping(
        &mut self,
        id: impl Into<RowId>,
        index: usize,
        populate_first_column: bool,
    ) -> Result<()> {
        //! Map `id` to the row at `index`, growing the table to include it.
        //!
        //! With `populate_first_column`, the ID is also written into column 0
        //! of that row.

        let id = id.into();
        self.store.map_id(id.clone(), index);

        if populate_first_column {
            self.set_at(index, 0, Value::from(id))?;
        }
        Ok(())
    }

    pub fn remove_row_id_mapping(&mut self, id: impl Into<RowId>) -> Option<usize> {
        //! Forget the mapping of `id`. The row itself stays in the table.

        self.store.unmap_id(&id.into())
    }

    pub fn contains_row_id(&self, id: impl Into<RowId>) -> bool {
        self.store.contains_id(&id.into())
    }

    pub fn row_ids(&self) -> impl Iterator<Item = &RowId> {
        self.store.ids()
    }

    pub fn row_index(&self, id: impl Into<RowId>) -> Option<usize> {
        self.store.position(&id.into())
    }

    pub fn set(&mut self, id: impl Into<RowId>, column: &str, value: impl Into<Value>) -> Result<()> {
        //! Write `value` into the row mapped by `id`, registering the ID on a
        //! new row if it is unseen.

        let column = self.require_column(column)?;
        let row = self.store.position_or_append(id.into());
        self.put(row, column, Some(value.into()))
    }

    pub fn set_null(&mut self, id: impl Into<RowId>, column: &str) -> Result<()> {
        let column = self.require_column(column)?;
        let row = self.store.position_or_append(id.into());
        self.put(row, column, None)
    }

    pub fn set_at(&mut self, row: usize, column: usize, value: impl Into<Value>) -> Result<()> {
        //! Write `value` at a position, growing the table (and the identity
        //! row ID mapping) to include `row`.

        self.verify_column(row, column)?;
        self.store.expand_to(row, true);
        self.put(row, column, Some(value.into()))
    }

    pub fn set_null_at(&mut self, row: usize, column: usize) -> Result<()> {
        self.verify_column(row, column)?;
        self.store.expand_to(row, true);
        self.put(row, column, None)
    }

    pub fn increment(&mut self, id: impl Into<RowId>, column: &str) -> Result<i64> {
        //! Add one to an integer cell, starting from 0 when the cell was
        //! never written.
        //!
        //! Returns the new value.

        let column = self.require_column(column)?;
        let id = id.into();

        let previous = match self.store.position(&id) {
            Some(row) => match self.get_at(row, column)? {
                None => 0,
                Some(Value::Integer(value)) => *value,
                Some(other) => return Err(ReportError::NotAnInteger(other.to_string())),
            },
            None => 0,
        };

        let next = previous.checked_add(1).ok_or_else(|| ReportError::IntegerOverflow {
            table: self.name.clone(),
            column: self.columns[column].name().to_string(),
        })?;
        let row = self.store.position_or_append(id);
        self.put(row, column, Some(Value::Integer(next)))?;
        Ok(next)
    }

    pub fn get(&self, id: impl Into<RowId>, column: &str) -> Result<Option<&Value>> {
        let id = id.into();
        let row = self
            .store
            .position(&id)
            .ok_or_else(|| ReportError::UnknownRowId {
                table: self.name.clone(),
                row_id: id.to_string(),
            })?;
        let column = self.require_column(column)?;
        self.get_at(row, column)
    }

    pub fn get_at(&self, row: usize, column: usize) -> Result<Option<&Value>> {
        //! The cell at a position; `None` if it was never written.

        if column >= self.columns.len() {
            return Err(self.out_of_bounds(row, column));
        }
        self.store
            .row(row)
            .map(|cells| cells.get(column))
            .ok_or_else(|| self.out_of_bounds(row, column))
    }

    pub fn find_row_by_data(&self, values: &[Value]) -> Option<usize> {
        //! Index of the first row whose leading cells equal `values`, in order.
        //!
        //! Returns `None` when nothing matches, when `values` is empty, or
        //! when it is longer than the number of columns.

        self.store.find(values)
    }

    pub fn is_same_format(&self, other: &Table) -> bool {
        //! Whether the two tables can be gathered together: same name,
        //! description, and column formats and names in the same order.
        //! Neither data nor row IDs are compared.

        self.name == other.name
            && self.description == other.description
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(other.columns.iter())
                .all(|(mine, theirs)| mine.is_same_format(theirs))
    }

    pub fn concat(&mut self, other: Table) -> Result<()> {
        //! Append every row of `other` to this table.
        //!
        //! Row IDs of `other` are re-inserted shifted by this table's row
        //! count. Colliding IDs simply overwrite earlier mappings.

        if !self.is_same_format(&other) {
            return Err(ReportError::FormatMismatch {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }

        for (mine, theirs) in self.columns.iter_mut().zip(other.columns.iter()) {
            mine.widen_to(theirs.width());
        }

        let before = self.store.len();
        self.store.append(other.store);
        debug!(
            "table {}: concatenated {} rows onto {}",
            self.name,
            self.store.len() - before,
            before
        );
        Ok(())
    }

    pub fn equals(&self, other: &Table) -> bool {
        //! Whether both tables have the same format and the same cells, in
        //! their serialization order.
        //!
        //! Cells are compared by their plain text, so an integer `5` equals
        //! the string `"5"`.

        if !self.is_same_format(other) || self.num_rows() != other.num_rows() {
            return false;
        }

        self.ordered_rows()
            .into_iter()
            .zip(other.ordered_rows())
            .all(|(mine, theirs)| (0..self.columns.len()).all(|c| mine.text(c) == theirs.text(c)))
    }

    pub fn ordered_rows(&self) -> Vec<&Row> {
        //! Rows in serialization order. A sorted table whose row IDs cannot
        //! be ordered falls back to creation order.

        let rows = self.store.rows();
        if self.sort_by_row_id {
            if let Ok(positions) = self.store.sorted_positions() {
                return positions.into_iter().map(|index| &rows[index]).collect();
            }
        }
        rows.iter().collect()
    }

    pub(crate) fn write_order(&self) -> Result<Vec<usize>> {
        //! Row positions in serialization order, failing on row ID mappings
        //! that cannot be sorted.

        if !self.sort_by_row_id {
            return Ok((0..self.store.len()).collect());
        }

        self.store
            .sorted_positions()
            .map_err(|failure| match failure {
                SortFailure::NotBijective { ids } => ReportError::NotBijective {
                    table: self.name.clone(),
                    ids,
                    rows: self.store.len(),
                },
                SortFailure::MixedKinds => ReportError::MixedRowIds(self.name.clone()),
            })
    }

    pub(crate) fn expand_with_identity(&mut self, row: usize) {
        self.store.expand_to(row, true);
    }

    pub fn export(&self) -> TableExport<'_> {
        let columns: Vec<ColumnExport<'_>> = self
            .columns
            .iter()
            .map(|column| ColumnExport {
                name: column.name(),
                format: column.format(),
                datatype: column.datatype(),
            })
            .collect();

        let rows: Vec<Vec<Option<&Value>>> = self
            .ordered_rows()
            .into_iter()
            .map(|row| (0..self.columns.len()).map(|c| row.get(c)).collect())
            .collect();

        TableExport {
            name: &self.name,
            description: &self.description,
            columns,
            rows,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    fn put(&mut self, row: usize, column: usize, value: Option<Value>) -> Result<()> {
        //! Coerce, type-check and store a value, then widen the column.

        let value = match value {
            None => Value::String(NULL_TEXT.to_string()),
            Some(value) => {
                let value = self.coerce(value, self.columns[column].datatype())?;
                let declared = self.columns[column].datatype();
                let actual = value.classify();
                if declared != DataType::Unknown && declared != actual {
                    return Err(ReportError::TypeMismatch {
                        value: actual,
                        column: declared,
                    });
                }
                value
            }
        };

        let rendered = self.columns[column].render(Some(&value));
        self.columns[column].record_width(&rendered);
        self.store.put(row, column, Some(value));
        Ok(())
    }

    fn coerce(&self, value: Value, declared: DataType) -> Result<Value> {
        let text = match value {
            Value::String(text) if !matches!(declared, DataType::String | DataType::Unknown) => {
                text
            }
            value => return Ok(value),
        };

        match self.coercion {
            Coercion::Strict => declared.parse_strict(&text),
            Coercion::Lenient => match declared.try_parse(&text) {
                Some(parsed) => Ok(parsed),
                None => {
                    warn!(
                        "table {}: could not convert '{}' to {}, keeping the text",
                        self.name, text, declared
                    );
                    Ok(Value::String(text))
                }
            },
        }
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ReportError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    fn verify_column(&self, row: usize, column: usize) -> Result<()> {
        if column >= self.columns.len() {
            Err(self.out_of_bounds(row, column))
        } else {
            Ok(())
        }
    }

    fn out_of_bounds(&self, row: usize, column: usize) -> ReportError {
        ReportError::OutOfBounds {
            table: self.name.clone(),
            row,
            column,
        }
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Table) -> bool {
        self.equals(other)
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header: Vec<String> = self.columns.iter().map(|column| column.to_string()).collect();
        let rows: Vec<String> = self
            .ordered_rows()
            .iter()
            .map(|row| format!("{}", row))
            .collect();

        writeln!(f, "{}\n{}", header.join(" | "), rows.join("\n"))
    }
}
