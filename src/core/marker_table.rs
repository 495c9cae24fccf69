use crate::core::{MarkerRow, Result};
use crate::utils::error::MapError;
use std::collections::HashSet;
use std::io::Read;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "District",
    "Branch_Name",
    "Sol ID",
    "Block_Name",
    "latitude",
    "longitude",
];

/// Parse an uploaded branch table.
///
/// Only the header set is checked, and header names must match exactly.
/// Cell values are trimmed. Coordinates that are not numbers come through as
/// `None` instead of failing the whole upload.
pub fn parse<R: Read>(reader: R) -> Result<Vec<MarkerRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let present: HashSet<&str> = headers.iter().collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !present.contains(*column))
        .map(|column| column.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(MapError::SchemaError { missing });
    }

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<MarkerRow>() {
        rows.push(record?);
    }

    tracing::debug!("Parsed {} marker rows", rows.len());
    Ok(rows)
}

/// District options for the multi-select, in order of first appearance.
pub fn distinct_districts(rows: &[MarkerRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.district.as_str()))
        .map(|row| row.district.clone())
        .collect()
}
