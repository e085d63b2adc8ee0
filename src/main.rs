/*!
 * Command-line interface for statjson
 */

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use log::debug;

use statjson::config::{Args, Config};
use statjson::logging;
use statjson::record::worker_pool;
use statjson::{JsonWriter, Result, StatRecord, StatRecordBuilder};

fn run(config: &Config) -> Result<Vec<StatRecord>> {
    config.validate()?;

    // Configure thread pool
    let pool = worker_pool(config.num_threads)?;

    let builder = StatRecordBuilder::default();
    let records = pool.install(|| {
        builder.build_all(&config.paths, config.follow_symlinks, config.naming)
    });

    let writer = JsonWriter::new(config);
    writer.write(&records, io::stdout().lock())?;

    Ok(records)
}

fn main() -> ExitCode {
    logging::init().ok();

    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "statjson", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = Config::from_args(args);

    match run(&config) {
        Ok(records) => {
            let failed = records.iter().filter(|r| !r.is_success()).count();
            debug!("{} of {} paths failed", failed, records.len());
            if failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("statjson: {}", e);
            ExitCode::from(2)
        }
    }
}
