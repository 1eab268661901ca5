pub mod excel;
pub mod output;
pub mod report;
pub mod reporter;

pub use reporter::{RunStatus, SpreadsheetReporter};
