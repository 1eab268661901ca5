use super::excel::{load_active_sheet, ExcelAnalyzer, ExcelProcessor, SheetGrid};
use super::{output, report};
use crate::config::Config;
use crate::error::ExtractionError;
use crate::models::Report;
use anyhow::Context;
use std::backtrace::Backtrace;

pub const SUCCESS_MARKER: &str = "SUCCESS";
pub const FAILURE_MARKER: &str = "ERROR";

/// Outcome of a full run, after the matching artifact has been written.
#[derive(Debug)]
pub enum RunStatus {
    Success(Report),
    Failure { message: String },
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success(_))
    }

    /// The one line printed to stdout.
    pub fn status_line(&self) -> String {
        match self {
            RunStatus::Success(_) => SUCCESS_MARKER.to_string(),
            RunStatus::Failure { message } => format!("{}: {}", FAILURE_MARKER, message),
        }
    }
}

pub struct SpreadsheetReporter {
    config: Config,
}

impl SpreadsheetReporter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads the workbook and renders the report text without touching any output file.
    pub fn extract(&self) -> Result<Report, ExtractionError> {
        let grid = load_active_sheet(&self.config.input_path)?;
        self.build_report(grid)
    }

    fn build_report(&self, grid: SheetGrid) -> Result<Report, ExtractionError> {
        let start = std::time::Instant::now();
        let dataset = ExcelProcessor.build_dataset(grid.rows);
        let profiles = ExcelAnalyzer.profile_columns(&dataset);
        let text = report::render(&dataset, &profiles, &self.config)?;

        tracing::info!("Report for sheet {:?} built in {:?}", grid.name, start.elapsed());
        Ok(Report {
            row_count: dataset.len(),
            blank_rows: dataset.blank_rows,
            text,
        })
    }

    /// Extracts and writes the report file.
    pub fn run(&self) -> Result<Report, ExtractionError> {
        let report = self.extract()?;
        output::write_report(&self.config, &report.text)?;
        Ok(report)
    }

    // Same steps as `run`, each tagged with what it was working on.
    fn run_with_context(&self) -> anyhow::Result<Report> {
        let input = &self.config.input_path;
        let grid = load_active_sheet(input)
            .with_context(|| format!("reading active sheet from {}", input.display()))?;
        let sheet = grid.name.clone();
        let report = self
            .build_report(grid)
            .with_context(|| format!("building report for sheet {:?} of {}", sheet, input.display()))?;
        output::write_report(&self.config, &report.text)
            .with_context(|| format!("writing report to {}", self.config.report_path.display()))?;
        Ok(report)
    }

    /// Runs once and records the failure trace if anything went wrong.
    pub fn run_and_record(&self) -> RunStatus {
        match self.run_with_context() {
            Ok(report) => RunStatus::Success(report),
            Err(err) => {
                let backtrace = Backtrace::force_capture();
                tracing::error!("Extraction failed: {:#}", err);
                let trace = output::format_trace(&err, &backtrace);
                if let Err(write_err) = output::write_trace(&self.config, &trace) {
                    tracing::error!("Failed to write trace: {:#}", anyhow::Error::new(write_err));
                }
                RunStatus::Failure {
                    message: format!("{:#}", err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines() {
        let ok = RunStatus::Success(Report {
            row_count: 0,
            blank_rows: 0,
            text: String::new(),
        });
        assert!(ok.is_success());
        assert_eq!(ok.status_line(), "SUCCESS");

        let failed = RunStatus::Failure {
            message: "failed to read workbook 'x.xlsx': not found".to_string(),
        };
        assert_eq!(
            failed.status_line(),
            "ERROR: failed to read workbook 'x.xlsx': not found"
        );
    }
}
