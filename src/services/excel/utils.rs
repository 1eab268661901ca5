use crate::error::ExtractionError;
use crate::models::CellValue;
use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use std::io::{BufReader, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

const WORKBOOK_PART: &str = "xl/workbook.xml";

// Largest float that still maps onto an exact integer.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => normalize_float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            let converted = if dt.is_duration() {
                dt.as_duration().map(CellValue::Duration)
            } else if (0.0..1.0).contains(&serial) {
                // Serials below one day carry no date.
                dt.as_datetime().map(|value| CellValue::Time(value.time()))
            } else {
                dt.as_datetime().map(CellValue::DateTime)
            };
            converted.unwrap_or_else(|| normalize_float(serial))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Whole numbers stored as floating point come back as integers.
pub fn normalize_float(value: f64) -> CellValue {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        CellValue::Int(value as i64)
    } else {
        CellValue::Float(value)
    }
}

pub fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    for format in formats.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Index of the sheet selected when the workbook was last saved, read from
/// `<workbookView activeTab="N">`. Falls back to the first sheet.
pub fn active_tab<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<usize, ExtractionError> {
    let part = match archive.by_name(WORKBOOK_PART) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Ok(0),
        Err(error) => return Err(error.into()),
    };

    let mut reader = XmlReader::from_reader(BufReader::new(part));
    let mut buffer = Vec::with_capacity(1024);
    loop {
        match reader.read_event_into(&mut buffer)? {
            Event::Start(node) | Event::Empty(node)
                if node.local_name().as_ref() == b"workbookView" =>
            {
                let tab = node
                    .try_get_attribute("activeTab")?
                    .and_then(|attr| {
                        std::str::from_utf8(&attr.value)
                            .ok()
                            .and_then(|value| value.trim().parse::<usize>().ok())
                    });
                return Ok(tab.unwrap_or(0));
            }
            Event::Eof => return Ok(0),
            _ => {}
        }
        buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive_with(parts: &[(&str, &str)]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        let cursor = writer.finish().unwrap();
        ZipArchive::new(cursor).unwrap()
    }

    #[test]
    fn whole_floats_become_ints() {
        assert_eq!(normalize_float(3.0), CellValue::Int(3));
        assert_eq!(normalize_float(-12.0), CellValue::Int(-12));
        assert_eq!(normalize_float(2.5), CellValue::Float(2.5));
        assert_eq!(normalize_float(1e300), CellValue::Float(1e300));
    }

    #[test]
    fn converts_plain_cells() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Null);
        assert_eq!(
            convert_cell(&Data::String("서울".to_string())),
            CellValue::Text("서울".to_string())
        );
        assert_eq!(convert_cell(&Data::Float(1299.0)), CellValue::Int(1299));
        assert_eq!(convert_cell(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            convert_cell(&Data::Error(calamine::CellErrorType::NA)),
            CellValue::Text("#N/A".to_string())
        );
    }

    #[test]
    fn iso_strings_parse_to_datetimes() {
        let dt = convert_cell(&Data::DateTimeIso("2024-03-05T10:30:00".to_string()));
        assert_eq!(dt.to_string(), "2024-03-05 10:30:00");

        let date_only = convert_cell(&Data::DateTimeIso("2024-03-05".to_string()));
        assert_eq!(date_only.to_string(), "2024-03-05 00:00:00");

        let garbage = convert_cell(&Data::DateTimeIso("sometime".to_string()));
        assert_eq!(garbage, CellValue::Text("sometime".to_string()));
    }

    #[test]
    fn reads_active_tab_from_workbook_view() {
        let mut archive = archive_with(&[(
            "xl/workbook.xml",
            r#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><bookViews><workbookView xWindow="0" activeTab="2"/></bookViews><sheets/></workbook>"#,
        )]);
        assert_eq!(active_tab(&mut archive).unwrap(), 2);
    }

    #[test]
    fn active_tab_defaults_to_first_sheet() {
        let mut without_attr = archive_with(&[(
            "xl/workbook.xml",
            r#"<workbook><bookViews><workbookView xWindow="0"/></bookViews></workbook>"#,
        )]);
        assert_eq!(active_tab(&mut without_attr).unwrap(), 0);

        let mut without_part = archive_with(&[("docProps/app.xml", "<Properties/>")]);
        assert_eq!(active_tab(&mut without_part).unwrap(), 0);
    }
}
