//! Text serialization of a single [`Table`].
//!
//! ```text
//! #:GATKTable:<nCols>:<nRows>:<fmt1>:...:<fmtN>:;
//! #:GATKTable:<name>:<description>
//! <colName1>  <colName2>  ...
//! <row1c1>    <row1c2>    ...
//! <blank line>
//! ```
//!
//! Every column is left-justified to its width and separated from the next
//! by two spaces, so a reader can recover the columns from the offsets at
//! which the words of the column-name line start.

use std::io::{BufRead, Write};

use log::debug;

use super::column::NULL_TEXT;
use super::datatype::DataType;
use super::table::Table;
use super::version::ReportVersion;
use crate::config::{Coercion, EngineConfig};
use crate::error::{ReadPhase, ReportError, Result};

pub const TABLE_HEADER_PREFIX: &str = "#:GATKTable";
pub const SEPARATOR: char = ':';
pub const END_MARKER: &str = ":;";
pub const COLUMN_PADDING: &str = "  ";

// Token positions in the two header lines.
const COLS_FIELD: usize = 2;
const ROWS_FIELD: usize = 3;
const FORMAT_START_FIELD: usize = 4;
const NAME_FIELD: usize = 2;
const DESCRIPTION_FIELD: usize = 3;

impl Table {
    pub fn read<R: BufRead>(reader: &mut R, version: ReportVersion) -> Result<Table> {
        //! Read one table written in `version`'s format, coercing leniently.

        read_table(reader, version, Coercion::Lenient)
    }

    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        write_table(self, out)
    }
}

pub fn read_table<R: BufRead>(
    reader: &mut R,
    version: ReportVersion,
    coercion: Coercion,
) -> Result<Table> {
    //! Read one table from `reader`.
    //!
    //! The table is created unsorted and its row IDs are the row positions.

    match version {
        ReportVersion::V1_1 => read_v1_1(reader, coercion),
    }
}

fn read_v1_1<R: BufRead>(reader: &mut R, coercion: Coercion) -> Result<Table> {
    let table_data = require_line(reader, ReadPhase::Header)?;
    let table_name_data = require_line(reader, ReadPhase::Header)?;

    let data_fields: Vec<&str> = table_data.split(SEPARATOR).collect();
    if !table_data.starts_with(TABLE_HEADER_PREFIX) || data_fields.len() <= ROWS_FIELD {
        return Err(ReportError::malformed(
            ReadPhase::Header,
            format!("not a table header: '{}'", table_data),
        ));
    }

    let n_columns = parse_count(data_fields[COLS_FIELD])?;
    let n_rows = parse_count(data_fields[ROWS_FIELD])?;
    let formats = FORMAT_START_FIELD
        .checked_add(n_columns)
        .and_then(|end| data_fields.get(FORMAT_START_FIELD..end))
        .ok_or_else(|| {
            ReportError::malformed(
                ReadPhase::Header,
                format!("expected {} column formats in '{}'", n_columns, table_data),
            )
        })?;

    // The description may itself contain the separator.
    let name_fields: Vec<&str> = table_name_data.splitn(DESCRIPTION_FIELD + 1, SEPARATOR).collect();
    if !table_name_data.starts_with(TABLE_HEADER_PREFIX) || name_fields.len() <= NAME_FIELD {
        return Err(ReportError::malformed(
            ReadPhase::Header,
            format!("not a table name header: '{}'", table_name_data),
        ));
    }
    let name = name_fields[NAME_FIELD];
    let description = name_fields.get(DESCRIPTION_FIELD).copied().unwrap_or("");

    let config = EngineConfig {
        coercion,
        sort_by_row_id: false,
    };
    let mut table = Table::with_config(name, description, &config)?;

    let column_line = require_line(reader, ReadPhase::ColumnNames)?;
    let column_starts = word_starts(&column_line);
    let column_names = split_fixed_width(&column_line, &column_starts);
    if n_columns > 0 && column_names.len() != n_columns {
        return Err(ReportError::malformed(
            ReadPhase::ColumnNames,
            format!(
                "expected {} column names, found {} in '{}'",
                n_columns,
                column_names.len(),
                column_line
            ),
        ));
    }

    for (column_name, format) in column_names.iter().zip(formats.iter()) {
        table.add_column(column_name, format)?;
    }

    for row in 0..n_rows {
        let data_line = reader_line(reader, ReadPhase::DataLine)?.ok_or_else(|| {
            ReportError::malformed(
                ReadPhase::DataLine,
                format!("expected {} rows, stream ended after {}", n_rows, row),
            )
        })?;
        let fields = split_fixed_width(&data_line, &column_starts);

        table.expand_with_identity(row);
        for column in 0..n_columns {
            match fields.get(column).map(String::as_str).unwrap_or("") {
                NULL_TEXT => table.set_null_at(row, column)?,
                // Padding swallows a blank character.
                "" if table.columns()[column].datatype() == DataType::Character => {
                    table.set_at(row, column, ' ')?
                }
                field => table.set_at(row, column, field)?,
            }
        }
    }

    if let Some(line) = reader_line(reader, ReadPhase::TrailingLine)? {
        if !line.trim().is_empty() {
            return Err(ReportError::malformed(
                ReadPhase::TrailingLine,
                format!("expected an empty line, found '{}'", line),
            ));
        }
    }

    debug!(
        "read table {} with {} columns and {} rows",
        table.name(),
        table.num_columns(),
        table.num_rows()
    );
    Ok(table)
}

pub fn write_table<W: Write>(table: &Table, out: &mut W) -> Result<()> {
    //! Write `table` in the current format.
    //!
    //! A table sorted by row ID whose mappings are not a bijection onto its
    //! rows, or whose IDs are of mixed kinds, fails before anything is
    //! written.

    let order = table.write_order()?;
    let columns = table.columns();

    let rendered: Vec<Vec<String>> = order
        .iter()
        .map(|&index| {
            let row = &table.rows()[index];
            columns
                .iter()
                .enumerate()
                .map(|(c, column)| column.render(row.get(c)))
                .collect()
        })
        .collect();

    // Cells never written render as `null`, which the tracked widths do not
    // account for.
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(c, column)| {
            rendered
                .iter()
                .map(|cells| cells[c].chars().count())
                .fold(column.width(), usize::max)
        })
        .collect();

    write!(
        out,
        "{}{}{}{}{}",
        TABLE_HEADER_PREFIX,
        SEPARATOR,
        table.num_columns(),
        SEPARATOR,
        table.num_rows()
    )?;
    for column in columns {
        write!(out, "{}{}", SEPARATOR, column.format())?;
    }
    writeln!(out, "{}", END_MARKER)?;

    writeln!(
        out,
        "{}{}{}{}{}",
        TABLE_HEADER_PREFIX,
        SEPARATOR,
        table.name(),
        SEPARATOR,
        table.description()
    )?;

    write_aligned(out, columns.iter().map(|column| column.name()), &widths)?;
    for cells in rendered.iter() {
        write_aligned(out, cells.iter().map(String::as_str), &widths)?;
    }
    writeln!(out)?;

    debug!("wrote table {} with {} rows", table.name(), table.num_rows());
    Ok(())
}

fn write_aligned<'a, W: Write>(
    out: &mut W,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> Result<()> {
    let line: Vec<String> = cells
        .zip(widths.iter())
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    writeln!(out, "{}", line.join(COLUMN_PADDING))?;
    Ok(())
}

fn parse_count(field: &str) -> Result<usize> {
    field.trim().parse().map_err(|_| {
        ReportError::malformed(ReadPhase::Header, format!("invalid count '{}'", field))
    })
}

pub(crate) fn reader_line<R: BufRead>(reader: &mut R, phase: ReadPhase) -> Result<Option<String>> {
    //! Next line without its terminator, or `None` at the end of the stream.

    let mut line = String::new();
    let n_bytes = reader
        .read_line(&mut line)
        .map_err(|error| ReportError::read(phase, error))?;
    if n_bytes == 0 {
        return Ok(None);
    }

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

fn require_line<R: BufRead>(reader: &mut R, phase: ReadPhase) -> Result<String> {
    reader_line(reader, phase)?
        .ok_or_else(|| ReportError::malformed(phase, "unexpected end of stream"))
}

pub fn word_starts(line: &str) -> Vec<usize> {
    //! Character offsets, after the first, at which a word follows
    //! whitespace.

    let chars: Vec<char> = line.chars().collect();
    (1..chars.len())
        .filter(|&i| chars[i - 1].is_whitespace() && !chars[i].is_whitespace())
        .collect()
}

pub fn split_fixed_width(line: &str, starts: &[usize]) -> Vec<String> {
    //! Cut `line` at the given character offsets and trim every piece.
    //!
    //! A line shorter than an offset yields empty pieces.

    let chars: Vec<char> = line.chars().collect();
    let mut bounds = Vec::with_capacity(starts.len() + 2);
    bounds.push(0);
    bounds.extend_from_slice(starts);
    bounds.push(usize::MAX);

    bounds
        .windows(2)
        .map(|window| {
            let from = window[0].min(chars.len());
            let to = window[1].min(chars.len());
            chars[from..to].iter().collect::<String>().trim().to_string()
        })
        .collect()
}
