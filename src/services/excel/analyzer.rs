use crate::models::{ColumnProfile, Dataset, Record};
use std::collections::BTreeSet;

pub struct ExcelAnalyzer;

impl ExcelAnalyzer {
    /// One profile per labelled header, in header order.
    pub fn profile_columns(&self, dataset: &Dataset) -> Vec<ColumnProfile> {
        dataset
            .header
            .keys()
            .into_iter()
            .map(|name| self.profile_column(&dataset.records, name))
            .collect()
    }

    fn profile_column(&self, records: &[Record], name: String) -> ColumnProfile {
        let seen: BTreeSet<String> = records
            .iter()
            .filter_map(|record| record.get(&name))
            .filter(|value| !value.is_null())
            .map(|value| value.to_string())
            .collect();

        tracing::debug!("Column {:?} has {} unique values", name, seen.len());
        ColumnProfile {
            name,
            values: seen.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, HeaderRow};

    fn dataset(header: Vec<CellValue>, rows: Vec<Vec<(&str, CellValue)>>) -> Dataset {
        let records = rows
            .into_iter()
            .map(|fields| {
                let mut record = Record::new();
                for (key, value) in fields {
                    record.insert(key.to_string(), value);
                }
                record
            })
            .collect();
        Dataset {
            header: HeaderRow::new(header),
            records,
            ..Dataset::default()
        }
    }

    #[test]
    fn distinct_values_are_sorted() {
        let data = dataset(
            vec![CellValue::Text("C".to_string())],
            ["x", "y", "x", "z"]
                .iter()
                .map(|v| vec![("C", CellValue::Text(v.to_string()))])
                .collect(),
        );
        let profiles = ExcelAnalyzer.profile_columns(&data);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].unique_count(), 3);
        assert_eq!(profiles[0].values, vec!["x", "y", "z"]);
    }

    #[test]
    fn nulls_are_not_counted() {
        let data = dataset(
            vec![CellValue::Text("Qty".to_string()), CellValue::Null],
            vec![
                vec![("Qty", CellValue::Int(10))],
                vec![("Qty", CellValue::Null)],
                vec![("Qty", CellValue::Int(2))],
            ],
        );
        let profiles = ExcelAnalyzer.profile_columns(&data);
        assert_eq!(profiles.len(), 1);
        // string order, not numeric
        assert_eq!(profiles[0].values, vec!["10", "2"]);
    }

    #[test]
    fn headers_without_records_profile_empty() {
        let data = dataset(
            vec![
                CellValue::Text("A".to_string()),
                CellValue::Text("B".to_string()),
            ],
            Vec::new(),
        );
        let profiles = ExcelAnalyzer.profile_columns(&data);
        assert!(profiles.iter().all(|p| p.unique_count() == 0));
    }
}
