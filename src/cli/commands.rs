//! The commands the `report-table` binary runs.
//!
//! Each command reads whole reports from disk, works on them in memory and
//! hands the outcome back to [`super::run`] for printing.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::report::Report;

/// The outcome of [`check`] for a single table.
pub struct TableCheck {
    pub name: String,
    pub n_rows: usize,
    pub round_trips: bool,
}

pub fn open_report(path: &Path, config: &EngineConfig) -> Result<Report> {
    let mut reader = BufReader::new(File::open(path)?);
    let report = Report::read_with(&mut reader, config)?;
    info!("read {} tables from {}", report.len(), path.display());
    Ok(report)
}

pub fn save_report(report: &Report, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    report.write(&mut writer)?;
    writer.flush()?;
    info!("wrote {} tables to {}", report.len(), path.display());
    Ok(())
}

pub fn show<W: Write>(path: &Path, config: &EngineConfig, out: &mut W) -> Result<Report> {
    //! Write every table of the report at `path` to `out`.

    let report = open_report(path, config)?;
    for table in report.tables() {
        table.write(out)?;
    }
    Ok(report)
}

pub fn gather(output: &Path, shards: &[PathBuf], config: &EngineConfig) -> Result<Report> {
    //! Fold shard reports, in the order given, into one report at `output`.
    //!
    //! All shards must hold the same tables with the same formats.

    let mut gathered: Option<Report> = None;

    for shard in shards {
        let report = open_report(shard, config)?;
        gathered = match gathered.take() {
            Some(mut so_far) => {
                so_far.concat(report)?;
                Some(so_far)
            }
            None => Some(report),
        };
    }

    let gathered = gathered.unwrap_or_default();
    save_report(&gathered, output)?;
    Ok(gathered)
}

pub fn check(path: &Path, config: &EngineConfig) -> Result<Vec<TableCheck>> {
    //! Write the report at `path` to memory, read it back and compare every
    //! table with its original.

    let report = open_report(path, config)?;

    let mut buffer = Vec::new();
    report.write(&mut buffer)?;
    let reread = Report::read_with(&mut buffer.as_slice(), config)?;

    Ok(report
        .tables()
        .map(|table| TableCheck {
            name: table.name().to_string(),
            n_rows: table.num_rows(),
            round_trips: reread
                .table(table.name())
                .is_some_and(|other| table.equals(other)),
        })
        .collect())
}

pub fn export_json(path: &Path, config: &EngineConfig) -> Result<String> {
    open_report(path, config)?.to_json()
}
