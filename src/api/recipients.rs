//! # Recipients API Module
//!
//! Reads an uploaded CSV file into rows and extracts the distinct phone
//! numbers of the [`PHONE_NUMBERS_COLUMN`](consts::PHONE_NUMBERS_COLUMN).

use std::{collections::HashSet, io};

use anyhow::Context;

use crate::{
    consts,
    models::recipients::{CsvExtraction, CsvField, UploadedRow},
};

/// Parses `reader` as a CSV file whose first line holds the field names.
///
/// Empty lines are skipped, rows shorter than the header only map the cells
/// they have and cells beyond the header are ignored.
///
/// # Errors
/// Returns an error when the content can't be read as CSV (e.g. invalid
/// UTF-8). Nothing parsed before the failure is returned.
pub fn parse_rows<R: io::Read>(reader: R) -> anyhow::Result<Vec<UploadedRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("csv header line could not be read")?
        .clone();

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("csv data row {} is malformed", line + 1))?;

        rows.push(UploadedRow {
            fields: headers
                .iter()
                .zip(record.iter())
                .map(|(name, value)| CsvField {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        });
    }

    Ok(rows)
}

/// Distinct non empty values of `column`, in first seen order, and how many
/// repeated values were discarded
pub fn unique_column_values(rows: &[UploadedRow], column: &str) -> (Vec<String>, usize) {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut found = 0;

    for value in rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|value| !value.is_empty())
    {
        found += 1;
        if seen.insert(value) {
            unique.push(value.to_string());
        }
    }

    let duplicates = found - unique.len();
    (unique, duplicates)
}

/// Reads an uploaded recipients file.
///
/// # Returns
/// * the parsed rows, in file order
/// * the distinct phone numbers found in the `phone_numbers` column
/// * how many duplicated phone numbers were removed
pub fn extract_recipients<R: io::Read>(reader: R) -> anyhow::Result<CsvExtraction> {
    let rows = parse_rows(reader)?;
    let (recipients, duplicates_removed) =
        unique_column_values(&rows, consts::PHONE_NUMBERS_COLUMN);

    Ok(CsvExtraction {
        rows,
        recipients,
        duplicates_removed,
    })
}
