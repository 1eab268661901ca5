pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::ExtractionError;
pub use services::{RunStatus, SpreadsheetReporter};
