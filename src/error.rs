//! Error types for the report table engine.

use std::fmt::Display;

use thiserror::Error;

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// The stage of a table or report read that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPhase {
    ReportHeader,
    Header,
    ColumnNames,
    DataLine,
    TrailingLine,
}

impl Display for ReadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = match self {
            ReadPhase::ReportHeader => "the report header",
            ReadPhase::Header => "the header of this table",
            ReadPhase::ColumnNames => "the column names of this table",
            ReadPhase::DataLine => "a data line of this table",
            ReadPhase::TrailingLine => "the last empty line of this table",
        };
        write!(f, "{}", phase)
    }
}

/// Everything that can go wrong while building, merging, reading or writing
/// report tables. None of these are retried; the failing operation aborts.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("invalid name '{0}': only letters, digits, '_', '-' and '.' are allowed")]
    InvalidName(String),

    #[error("invalid description '{0}': descriptions must not contain line breaks")]
    InvalidDescription(String),

    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("duplicate table '{0}' in report")]
    DuplicateTable(String),

    #[error("cell ({row}, {column}) does not exist in table '{table}'")]
    OutOfBounds {
        table: String,
        row: usize,
        column: usize,
    },

    #[error("column '{column}' does not exist in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("row id '{row_id}' does not exist in table '{table}'")]
    UnknownRowId { table: String, row_id: String },

    #[error("table '{0}' does not exist in report")]
    UnknownTable(String),

    #[error("tried to add a value of type {value} to a column of type {column}")]
    TypeMismatch {
        value: crate::report::DataType,
        column: crate::report::DataType,
    },

    #[error("attempted to increment a cell that is not an integer: {0}")]
    NotAnInteger(String),

    #[error("incrementing column '{column}' of table '{table}' overflows an integer")]
    IntegerOverflow { table: String, column: String },

    #[error("could not convert '{text}' to {target}")]
    Coercion {
        text: String,
        target: crate::report::DataType,
    },

    #[error("unsupported report version '{0}': only {latest} is supported", latest = crate::report::ReportVersion::LATEST)]
    UnsupportedVersion(String),

    #[error("could not read {phase}: {message}")]
    Read { phase: ReadPhase, message: String },

    #[error("malformed {phase}: {message}")]
    Malformed { phase: ReadPhase, message: String },

    #[error("there isn't a 1-to-1 mapping from row id to index in table '{table}' ({ids} ids for {rows} rows)")]
    NotBijective {
        table: String,
        ids: usize,
        rows: usize,
    },

    #[error("unable to sort the rows of table '{0}': the row ids are of different types")]
    MixedRowIds(String),

    #[error("tables '{left}' and '{right}' have different formats")]
    FormatMismatch { left: String, right: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn read(phase: ReadPhase, error: impl Display) -> ReportError {
        ReportError::Read {
            phase,
            message: error.to_string(),
        }
    }

    pub(crate) fn malformed(phase: ReadPhase, message: impl Into<String>) -> ReportError {
        ReportError::Malformed {
            phase,
            message: message.into(),
        }
    }
}
