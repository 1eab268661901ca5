use sheet_report::{logging, Config, SpreadsheetReporter};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize logging
    if let Err(e) = logging::init_logging() {
        eprintln!("failed to initialize logging: {}", e);
    }

    let reporter = SpreadsheetReporter::new(Config::new());
    let status = reporter.run_and_record();
    println!("{}", status.status_line());

    if status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
