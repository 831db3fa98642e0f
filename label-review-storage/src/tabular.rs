//! Delimited-text importer producing [`NewItem`] records.

use label_review_core::{split_tags, CoreError, NewItem, Result, TAG_DELIMITER};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns the importer understands. Anything else in the header is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Text,
    Category,
    Label,
    Tags,
}

impl Column {
    fn from_header(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "text" => Some(Column::Text),
            "category" => Some(Column::Category),
            "label" => Some(Column::Label),
            "tags" => Some(Column::Tags),
            _ => None,
        }
    }
}

/// Reads a header row followed by data rows.
///
/// The whole input is parsed before anything is returned, so a bad row
/// rejects the batch.
#[derive(Debug, Clone, Copy)]
pub struct TabularImporter {
    delimiter: u8,
    tag_delimiter: char,
}

impl Default for TabularImporter {
    fn default() -> Self {
        Self {
            delimiter: b',',
            tag_delimiter: TAG_DELIMITER,
        }
    }
}

impl TabularImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_tag_delimiter(mut self, tag_delimiter: char) -> Self {
        self.tag_delimiter = tag_delimiter;
        self
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<NewItem>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| malformed(1, &e.to_string()))?
            .clone();
        if headers.is_empty() {
            return Err(CoreError::MalformedInput(
                "missing header row".to_string(),
            ));
        }

        // A repeated column name keeps the last position.
        let columns: HashMap<Column, usize> = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| Column::from_header(name).map(|c| (c, idx)))
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                malformed(line, &e.to_string())
            })?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            if row.len() != headers.len() {
                return Err(malformed(
                    line,
                    &format!("expected {} fields, found {}", headers.len(), row.len()),
                ));
            }

            let field = |column: Column| {
                columns
                    .get(&column)
                    .and_then(|&idx| row.get(idx))
                    .unwrap_or_default()
            };

            records.push(NewItem {
                text: field(Column::Text).to_string(),
                category: field(Column::Category).to_string(),
                label: field(Column::Label).to_string(),
                tags: split_tags(field(Column::Tags), self.tag_delimiter),
            });
        }

        tracing::debug!(records = records.len(), "Parsed tabular input");
        Ok(records)
    }

    pub fn read_path(&self, path: &Path) -> Result<Vec<NewItem>> {
        let file = File::open(path)?;
        self.read(file)
    }
}

fn malformed(line: u64, reason: &str) -> CoreError {
    CoreError::MalformedInput(format!("line {line}: {reason}"))
}
