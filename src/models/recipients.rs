use serde::Serialize;

/// One cell of an uploaded row, keyed by its header name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvField {
    pub name: String,
    pub value: String,
}

/// A CSV data line mapped by the header names, in column order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadedRow {
    pub fields: Vec<CsvField>,
}

impl UploadedRow {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Result of reading an uploaded recipients file
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct CsvExtraction {
    pub rows: Vec<UploadedRow>,
    /// Distinct phone numbers in first seen order
    pub recipients: Vec<String>,
    pub duplicates_removed: usize,
}

impl CsvExtraction {
    /// The confirmation shown to the operator after the upload
    pub fn summary(&self) -> String {
        format!(
            "Parsed {} unique phone numbers ({} duplicates removed).",
            self.recipients.len(),
            self.duplicates_removed
        )
    }
}
