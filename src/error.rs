use std::path::PathBuf;
use thiserror::Error;

/// Every way a report run can fail. All variants are handled the same way at
/// the top level: no retry, no partial report, one trace file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read workbook '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workbook container is not a valid archive")]
    Archive(#[from] zip::result::ZipError),

    #[error("workbook manifest is malformed")]
    Xml(#[from] quick_xml::Error),

    #[error("workbook manifest has a malformed attribute")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("workbook structure could not be read")]
    Workbook(#[from] calamine::XlsxError),

    #[error("active sheet index {index} is out of range ({available} sheets)")]
    MissingSheet { index: usize, available: usize },

    #[error("failed to serialize report value")]
    Serialize(#[from] serde_json::Error),

    #[error("serialized report is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("failed to write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::Io { .. } => "IoError",
            ExtractionError::Archive(_) => "ArchiveError",
            ExtractionError::Xml(_) | ExtractionError::XmlAttribute(_) => "ManifestError",
            ExtractionError::Workbook(_) => "WorkbookError",
            ExtractionError::MissingSheet { .. } => "MissingSheetError",
            ExtractionError::Serialize(_) | ExtractionError::Encoding(_) => "SerializationError",
            ExtractionError::Write { .. } => "WriteError",
        }
    }
}
