use std::fmt::Display;

use super::datatype::{DataType, Value};
use super::printf::FormatSpec;
use crate::error::{ReportError, Result};

/// The text rendered for a cell that holds no value.
pub const NULL_TEXT: &str = "null";

/// A named, typed slot shared by every row of a [`super::Table`].
///
/// The declared type is fixed from the format specifier when the column is
/// created. The display width only ever grows: it is the widest of the column
/// name and every value rendered into the column so far.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    format: FormatSpec,
    datatype: DataType,
    width: usize,
}

impl Column {
    pub fn new(name: &str, format: &str) -> Result<Column> {
        if !is_valid_name(name) {
            return Err(ReportError::InvalidName(name.to_string()));
        }

        let format = FormatSpec::parse(format);
        let datatype = DataType::from_format(&format);

        Ok(Column {
            name: name.to_string(),
            format,
            datatype,
            width: name.chars().count(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> &str {
        self.format.as_str()
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn render(&self, value: Option<&Value>) -> String {
        //! Render a cell for display.
        //!
        //! Decimals in an untyped column always use eight decimal places,
        //! whatever the stored specifier says.

        match value {
            None => NULL_TEXT.to_string(),
            Some(Value::Decimal(decimal)) if self.datatype == DataType::Unknown => {
                format!("{:.8}", decimal)
            }
            Some(value) => self.format.render(value),
        }
    }

    pub(crate) fn record_width(&mut self, rendered: &str) {
        self.width = self.width.max(rendered.chars().count());
    }

    pub(crate) fn widen_to(&mut self, width: usize) {
        self.width = self.width.max(width);
    }

    pub fn is_same_format(&self, other: &Column) -> bool {
        self.format == other.format && self.name == other.name
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.datatype)
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    //! Table and column names are non-empty and made only of ASCII letters,
    //! digits, `_`, `-` and `.`.

    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
