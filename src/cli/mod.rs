use std::io::{self, Write};

use crate::{
    cli::{
        messages::{highlight_argument, system_message, warning_message},
        parsers::{CliCommand, CliParser},
    },
    error::Result,
};

mod colors;
mod commands;
mod messages;
pub mod parsers;

pub use commands::{TableCheck, check, export_json, gather, open_report, save_report, show};

pub fn run(cli: CliParser) -> Result<bool> {
    //! Run the parsed command, printing its outcome.
    //!
    //! Returns whether the command succeeded in the sense the user cares
    //! about (for `check`, that every table round-trips).

    let config = match cli.engine_config() {
        Ok(config) => config,
        Err(message) => {
            println!("{}", warning_message("config", message));
            return Ok(false);
        }
    };

    match cli.command {
        CliCommand::Show { path } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let report = show(&path, &config, &mut out)?;
            out.flush()?;

            println!(
                "{}",
                system_message(
                    "show",
                    format!(
                        "{} table(s) in '{}'.",
                        report.len(),
                        highlight_argument(&path.display().to_string())
                    )
                )
            );
        }
        CliCommand::Gather { output, shards } => {
            let report = gather(&output, &shards, &config)?;
            let n_rows: usize = report.tables().map(|table| table.num_rows()).sum();

            println!(
                "{}",
                system_message(
                    "gather",
                    format!(
                        "{} shard(s) gathered into '{}': {} table(s), {} row(s).",
                        shards.len(),
                        highlight_argument(&output.display().to_string()),
                        report.len(),
                        n_rows
                    )
                )
            );
        }
        CliCommand::Check { path } => {
            let checks = check(&path, &config)?;
            let mut all_round_trip = true;

            for TableCheck {
                name,
                n_rows,
                round_trips,
            } in checks
            {
                if round_trips {
                    println!(
                        "{}",
                        system_message(
                            "check",
                            format!("{} ({} rows) round-trips.", highlight_argument(&name), n_rows)
                        )
                    );
                } else {
                    all_round_trip = false;
                    println!(
                        "{}",
                        warning_message(
                            "check",
                            format!("{} ({} rows) changed after a round trip.", name, n_rows)
                        )
                    );
                }
            }

            return Ok(all_round_trip);
        }
        CliCommand::Json { path } => {
            println!("{}", export_json(&path, &config)?);
        }
    }

    Ok(true)
}
