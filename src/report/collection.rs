use std::io::{BufRead, Write};

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use super::codec::{read_table, reader_line, write_table, SEPARATOR};
use super::table::{Table, TableExport};
use super::version::ReportVersion;
use crate::config::EngineConfig;
use crate::error::{ReadPhase, ReportError, Result};

/// A collection of named [`Table`]s serialized together behind one
/// versioned header line:
///
/// ```text
/// #:GATKReport.v1.1:<nTables>
/// ```
///
/// Tables keep the order in which they were added.
#[derive(Debug, Clone, Default)]
pub struct Report {
    tables: IndexMap<String, Table>,
}

#[derive(Debug, Serialize)]
pub struct ReportExport<'a> {
    pub version: &'static str,
    pub tables: Vec<TableExport<'a>>,
}

impl Report {
    pub fn new() -> Report {
        Report {
            tables: IndexMap::new(),
        }
    }

    pub fn add_table(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(table.name()) {
            return Err(ReportError::DuplicateTable(table.name().to_string()));
        }

        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn read<R: BufRead>(reader: &mut R) -> Result<Report> {
        Report::read_with(reader, &EngineConfig::default())
    }

    pub fn read_with<R: BufRead>(reader: &mut R, config: &EngineConfig) -> Result<Report> {
        //! Read a report and all of its tables.
        //!
        //! The version tag is checked before anything else is read; only the
        //! coercion mode of `config` applies, since read tables keep their
        //! stored row order.

        let header = reader_line(reader, ReadPhase::ReportHeader)?
            .ok_or_else(|| ReportError::malformed(ReadPhase::ReportHeader, "empty stream"))?;
        let version = ReportVersion::from_header(&header)?;

        let n_tables: usize = header
            .rsplit(SEPARATOR)
            .next()
            .and_then(|count| count.trim().parse().ok())
            .ok_or_else(|| {
                ReportError::malformed(
                    ReadPhase::ReportHeader,
                    format!("missing table count in '{}'", header),
                )
            })?;

        let mut report = Report::new();
        for _ in 0..n_tables {
            report.add_table(read_table(reader, version, config.coercion)?)?;
        }

        debug!("read {} report with {} tables", version, report.len());
        Ok(report)
    }

    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{}{}{}",
            ReportVersion::LATEST,
            SEPARATOR,
            self.tables.len()
        )?;

        for table in self.tables.values() {
            write_table(table, out)?;
        }
        Ok(())
    }

    pub fn is_same_format(&self, other: &Report) -> bool {
        //! Whether both reports hold same-format tables under the same names,
        //! in the same order.

        self.tables.len() == other.tables.len()
            && self
                .tables
                .iter()
                .zip(other.tables.iter())
                .all(|((name, mine), (other_name, theirs))| {
                    name == other_name && mine.is_same_format(theirs)
                })
    }

    pub fn concat(&mut self, other: Report) -> Result<()> {
        //! Gather the tables of `other` onto the matching tables of this
        //! report.

        if !self.is_same_format(&other) {
            return Err(ReportError::FormatMismatch {
                left: self.table_names().join(","),
                right: other.table_names().join(","),
            });
        }

        for (name, table) in other.tables {
            let mine = self
                .tables
                .get_mut(&name)
                .ok_or_else(|| ReportError::UnknownTable(name.clone()))?;
            mine.concat(table)?;
        }
        Ok(())
    }

    pub fn equals(&self, other: &Report) -> bool {
        self.tables.len() == other.tables.len()
            && self
                .tables
                .iter()
                .all(|(name, mine)| other.table(name).is_some_and(|theirs| mine.equals(theirs)))
    }

    pub fn export(&self) -> ReportExport<'_> {
        ReportExport {
            version: ReportVersion::LATEST.tag(),
            tables: self.tables.values().map(Table::export).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }
}
