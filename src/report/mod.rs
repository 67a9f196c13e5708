//! A typed, columnar report table engine needs the following components
//! - DataType (closed set of value categories, with text coercion rules)
//! - Column (name, print-style format, declared type, display width)
//! - RowStore (append-only rows plus a row ID to position mapping)
//! - Table (composition of the above, with merge and comparison)
//! - Codec (versioned fixed-width text format for tables and reports)
//!

//  All modules of this lib
mod codec;
mod collection;
mod column;
mod datatype;
mod index;
mod printf;
mod row;
mod store;
mod table;
mod version;

//  External API
pub use codec::{read_table, split_fixed_width, word_starts, write_table, TABLE_HEADER_PREFIX};
pub use collection::{Report, ReportExport};
pub use column::{Column, NULL_TEXT};
pub use datatype::{DataType, Value};
pub use index::RowId;
pub use printf::FormatSpec;
pub use row::Row;
pub use store::RowStore;
pub use table::{ColumnExport, Table, TableExport};
pub use version::ReportVersion;
