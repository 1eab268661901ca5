use crate::models::{CellValue, Dataset, HeaderRow, Record};

pub struct ExcelProcessor;

impl ExcelProcessor {
    /// Row 1 becomes the header; every later row becomes a record keyed by
    /// the labelled headers. Records with no values are dropped.
    pub fn build_dataset(&self, grid: Vec<Vec<CellValue>>) -> Dataset {
        let sheet_rows = grid.len();
        let mut rows = grid.into_iter();
        let header = HeaderRow::new(rows.next().unwrap_or_default());

        let labels: Vec<(usize, String)> = (0..header.len())
            .filter_map(|idx| header.key(idx).map(|key| (idx, key)))
            .collect();
        tracing::info!("Header row has {} columns, {} labelled", header.len(), labels.len());

        let mut records = Vec::with_capacity(sheet_rows.saturating_sub(1));
        let mut blank_rows = 0;
        for (offset, row) in rows.enumerate() {
            let record = self.project_row(&labels, row);
            if record.is_blank() {
                blank_rows += 1;
                tracing::debug!("Skipping blank row {}", offset + 2);
                continue;
            }
            records.push(record);
        }

        tracing::info!("Kept {} records, dropped {} blank rows", records.len(), blank_rows);
        Dataset {
            header,
            records,
            sheet_rows,
            blank_rows,
        }
    }

    // Cells past the header width or under an empty header are dropped;
    // labelled columns missing from the row read as null.
    fn project_row(&self, labels: &[(usize, String)], mut row: Vec<CellValue>) -> Record {
        let mut record = Record::new();
        for (idx, key) in labels {
            let value = row
                .get_mut(*idx)
                .map(|cell| std::mem::replace(cell, CellValue::Null))
                .unwrap_or(CellValue::Null);
            record.insert(key.clone(), value);
        }
        record
    }
}
