//! Report text rendering.
//!
//! JSON fragments are written with `", "` between items and `": "` after keys,
//! leaving non-ASCII text unescaped.

use crate::config::Config;
use crate::error::ExtractionError;
use crate::models::{ColumnProfile, Dataset};
use serde::Serialize;
use serde_json::ser::Formatter;
use smallvec::SmallVec;
use std::io;

pub const ALL_DATA_MARKER: &str = "--- ALL DATA JSON ---";

#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

pub fn to_spaced_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExtractionError> {
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Builds the full report. Sections are joined with `\n`; the first and last
/// sample sections may overlap when the dataset is short.
pub fn render(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    config: &Config,
) -> Result<String, ExtractionError> {
    let records = &dataset.records;
    let mut out: Vec<String> = Vec::with_capacity(records.len().min(8) + profiles.len() + 10);

    out.push(format!("Total rows: {}", records.len()));
    out.push(format!("Headers: {}", to_spaced_json(&dataset.header)?));
    out.push(String::new());

    out.push(format!("--- First {} rows ---", config.head_rows));
    let head: SmallVec<[String; 8]> = records
        .iter()
        .take(config.head_rows)
        .map(to_spaced_json)
        .collect::<Result<_, _>>()?;
    out.extend(head);
    out.push(String::new());

    out.push(format!("--- Last {} rows ---", config.tail_rows));
    let tail_start = records.len().saturating_sub(config.tail_rows);
    let tail: SmallVec<[String; 8]> = records[tail_start..]
        .iter()
        .map(to_spaced_json)
        .collect::<Result<_, _>>()?;
    out.extend(tail);

    for profile in profiles {
        let shown = &profile.values[..profile.values.len().min(config.profile_limit)];
        out.push(format!(
            "\n{} ({} unique): {}",
            profile.name,
            profile.unique_count(),
            to_spaced_json(shown)?
        ));
    }

    out.push(format!("\n\n{}", ALL_DATA_MARKER));
    out.push(to_spaced_json(records)?);

    Ok(out.join("\n"))
}
