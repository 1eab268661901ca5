use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// One cell value after conversion from the workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Time of day with no date part.
    Time(NaiveTime),
    Duration(Duration),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

fn format_datetime(value: &NaiveDateTime) -> String {
    if value.nanosecond() == 0 {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

fn format_time(value: &NaiveTime) -> String {
    if value.nanosecond() == 0 {
        value.format("%H:%M:%S").to_string()
    } else {
        value.format("%H:%M:%S%.6f").to_string()
    }
}

// Same text serde_json writes for the number; non-finite values have none.
fn format_float(value: f64) -> String {
    serde_json::Number::from_f64(value)
        .map(|n| n.to_string())
        .unwrap_or_else(|| "null".to_string())
}

fn format_duration(value: &Duration) -> String {
    let total = value.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!("{}{}:{:02}:{:02}", sign, total / 3600, (total / 60) % 60, total % 60)
}

/// String form used for column profiles. Dates and durations match their JSON text.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => f.write_str(&format_float(*v)),
            // Lowercase, matching the JSON literal.
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => f.write_str(&format_datetime(dt)),
            CellValue::Time(t) => f.write_str(&format_time(t)),
            CellValue::Duration(d) => f.write_str(&format_duration(d)),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            CellValue::Time(t) => serializer.serialize_str(&format_time(t)),
            CellValue::Duration(d) => serializer.serialize_str(&format_duration(d)),
        }
    }
}

/// Row 1 of the sheet, kept raw so absent entries still show up in the report.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct HeaderRow {
    cells: Vec<CellValue>,
}

impl HeaderRow {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Field name for a column, `None` when the header cell is empty.
    pub fn key(&self, index: usize) -> Option<String> {
        self.cells
            .get(index)
            .filter(|cell| !cell.is_null())
            .map(|cell| cell.to_string())
    }

    /// Labelled field names in column order; duplicates are kept.
    pub fn keys(&self) -> Vec<String> {
        (0..self.cells.len()).filter_map(|idx| self.key(idx)).collect()
    }
}

/// One data row projected onto the header names, in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated key overwrites the value but keeps its first position.
    pub fn insert(&mut self, key: String, value: CellValue) {
        match self.fields.iter_mut().find(|(name, _)| *name == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when no field holds a value, including a record with no fields at all.
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.is_null())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub header: HeaderRow,
    pub records: Vec<Record>,
    /// Rows in the sheet grid, header row included.
    pub sheet_rows: usize,
    pub blank_rows: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    /// Distinct string forms of the non-null values, sorted.
    pub values: Vec<String>,
}

impl ColumnProfile {
    pub fn unique_count(&self) -> usize {
        self.values.len()
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub row_count: usize,
    pub blank_rows: usize,
    pub text: String,
}
