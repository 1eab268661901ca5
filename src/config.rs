use std::path::PathBuf;

const INPUT_FILE: &str = "Samsung_sales.xlsx";
const REPORT_FILE: &str = "excel_output.txt";
const TRACE_FILE: &str = "excel_error.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub report_path: PathBuf,
    pub trace_path: PathBuf,
    /// Records printed in the "First" section.
    pub head_rows: usize,
    /// Records printed in the "Last" section.
    pub tail_rows: usize,
    /// Distinct values listed per column profile line.
    pub profile_limit: usize,
}

impl Config {
    /// All locations are fixed relative paths; nothing is read from the environment.
    pub fn new() -> Self {
        Config {
            input_path: PathBuf::from(INPUT_FILE),
            report_path: PathBuf::from(REPORT_FILE),
            trace_path: PathBuf::from(TRACE_FILE),
            head_rows: 5,
            tail_rows: 3,
            profile_limit: 50,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
