use std::{io, process::ExitCode};

use clap::Parser;
use log::{error, warn};

use raidtree::{cli::Cli, logging, ExitKind};

fn main() -> ExitCode {
    // Parse args
    let args = Cli::parse();

    // Initialize the loggers
    if let Err(e) = logging::init(args.verbosity, args.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e:?}");
        return ExitCode::from(1);
    }

    let stdout = io::stdout();
    let result = raidtree::run(&args, &mut stdout.lock());
    log::logger().flush();

    match result {
        Ok(ExitKind::Done) => ExitCode::SUCCESS,
        Ok(ExitKind::NoControllers) => {
            warn!("No RAID controllers found");
            ExitCode::from(3)
        }
        Err(e) => {
            error!("raidtree failed: {e:?}");
            ExitCode::from(2)
        }
    }
}
