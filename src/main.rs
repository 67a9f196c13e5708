use std::process::ExitCode;

use clap::Parser;
use log::error;

use report_table::cli::{self, parsers::CliParser};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let parser = CliParser::parse();

    match cli::run(parser) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{}", err);
            eprintln!("err: {}", err);
            ExitCode::FAILURE
        }
    }
}
