pub mod analyzer;
pub mod processor;
pub mod utils;
pub mod workbook;

pub use analyzer::ExcelAnalyzer;
pub use processor::ExcelProcessor;
pub use workbook::{load_active_sheet, SheetGrid};
