use std::{io, process::ExitCode};

use clap::Parser;
use log::error;

use riskmeasures::{Args, RunConfig, pipeline};

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let result = RunConfig::from_args(&args)
        .and_then(|cfg| pipeline::run(&cfg, &mut io::stdout().lock()));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
