use std::path::Path;
use std::process;

use clap::Parser;

use sortery::cli::{self, Cli};
use sortery::logging;
use sortery::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    logging::init(Path::new(logging::LOG_FILE_NAME));

    match cli::run(&cli) {
        Ok(summary) => {
            if cli.dry_run {
                return;
            }
            OutputFormatter::success(&format!(
                "Organization complete: {} moved, {} failed, {} skipped.",
                summary.moved, summary.failed, summary.skipped
            ));
            if summary.failed > 0 {
                OutputFormatter::warning(&format!(
                    "Some files could not be moved. See {} for details.",
                    logging::LOG_FILE_NAME
                ));
            }
        }
        Err(e) => {
            OutputFormatter::error(&e);
            process::exit(1);
        }
    }
}
