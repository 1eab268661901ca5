use super::utils::{active_tab, convert_cell};
use crate::error::ExtractionError;
use crate::models::CellValue;
use calamine::{Data, Range, Reader, Xlsx};
use std::fs::File;
use std::io::{BufReader, Seek};
use std::path::Path;
use zip::ZipArchive;

/// The active sheet as a grid anchored at A1. Rows are rectangular.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

/// Opens the workbook read-only, reads the active sheet and releases the file
/// before returning. The handle is dropped on every exit path.
pub fn load_active_sheet(path: &Path) -> Result<SheetGrid, ExtractionError> {
    let io_error = |source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    };

    tracing::info!("Opening workbook {}", path.display());
    let file = File::open(path).map_err(io_error)?;

    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let index = active_tab(&mut archive)?;
    let mut reader = archive.into_inner();
    reader.rewind().map_err(io_error)?;

    let mut workbook: Xlsx<_> = Xlsx::new(reader).map_err(|e| {
        tracing::error!("Failed to open Excel file: {}", e);
        ExtractionError::Workbook(e)
    })?;

    let sheet_names = workbook.sheet_names();
    let name = sheet_names
        .get(index)
        .cloned()
        .ok_or(ExtractionError::MissingSheet {
            index,
            available: sheet_names.len(),
        })?;
    tracing::info!("Found {} sheets, active sheet is {:?}", sheet_names.len(), name);

    let range = workbook
        .worksheet_range_at(index)
        .ok_or(ExtractionError::MissingSheet {
            index,
            available: sheet_names.len(),
        })??;
    drop(workbook);
    tracing::info!("Workbook released");

    let rows = anchor_grid(&range);
    tracing::info!("Read {} rows from sheet {:?}", rows.len(), name);
    Ok(SheetGrid { name, rows })
}

/// Pads the used range back out to A1 so row 1 is always the header row.
pub fn anchor_grid(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((row_start, col_start)) = range.start() else {
        return Vec::new();
    };
    let col_start = col_start as usize;
    let width = col_start + range.width();

    let mut rows = Vec::with_capacity(row_start as usize + range.height());
    rows.extend((0..row_start).map(|_| vec![CellValue::Null; width]));
    for row in range.rows() {
        let mut cells = Vec::with_capacity(width);
        cells.extend(std::iter::repeat(CellValue::Null).take(col_start));
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_has_no_rows() {
        let range: Range<Data> = Range::empty();
        assert!(anchor_grid(&range).is_empty());
    }

    #[test]
    fn offset_range_is_padded_to_a1() {
        let mut range: Range<Data> = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("Model".to_string()));
        range.set_value((2, 2), Data::Float(4.0));

        let rows = anchor_grid(&range);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 3));
        assert!(rows[0].iter().all(CellValue::is_null));
        assert_eq!(rows[1][0], CellValue::Null);
        assert_eq!(rows[1][1], CellValue::Text("Model".to_string()));
        assert_eq!(rows[2][2], CellValue::Int(4));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_active_sheet(Path::new("definitely/not/here.xlsx")).unwrap_err();
        assert_eq!(err.kind(), "IoError");
    }
}
