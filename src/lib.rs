pub mod cli;
pub mod config;
pub mod error;
pub mod report;

pub use config::{Coercion, EngineConfig};
pub use error::{ReadPhase, ReportError, Result};
pub use report::{DataType, Report, ReportVersion, RowId, Table, Value};
