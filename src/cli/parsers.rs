//! The place where the command line parser is defined.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{COERCION_VAR, Coercion, EngineConfig};

#[derive(Parser)]
#[command(name = "report-table")]
#[command(about = "Inspect, verify and gather GATKReport table files", long_about = None)]
pub struct CliParser {
    /// What to do with text that does not parse into a typed column:
    /// `lenient` keeps it as text, `strict` fails the read.
    #[arg(long, global = true, env = COERCION_VAR, default_value = "lenient")]
    pub coercion: String,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Print every table of a report.
    Show { path: PathBuf },

    /// Concatenate same-format shard reports into one report.
    Gather {
        /// Where the gathered report is written.
        #[arg(short, long)]
        output: PathBuf,

        #[arg(required = true, num_args = 1..)]
        shards: Vec<PathBuf>,
    },

    /// Verify that a report survives a write and re-read unchanged.
    Check { path: PathBuf },

    /// Print a report as JSON.
    Json { path: PathBuf },
}

impl CliParser {
    pub fn engine_config(&self) -> Result<EngineConfig, String> {
        //! Settings from the environment, with the coercion mode taken from
        //! the command line (which itself falls back to the environment).

        let coercion: Coercion = self.coercion.parse()?;
        Ok(EngineConfig {
            coercion,
            ..EngineConfig::from_env()
        })
    }
}
