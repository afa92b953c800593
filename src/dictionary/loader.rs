//! CSV loaders for concept dictionaries and pipeline inputs.
//!
//! Header-driven with configurable column names. Rows missing required
//! values are skipped with a warning rather than failing the whole load;
//! an entirely empty result is an error. Fields follow RFC 4180 quoting
//! (quoted fields may contain commas, doubled quotes, and newlines).

use std::fs;
use std::path::Path;

use tracing::warn;

use super::error::{DictionaryError, DictionaryResult};
use super::{Concept, InputRecord};

/// Column names for the concept dictionary CSV.
#[derive(Debug, Clone)]
pub struct CsvSchema {
    /// Column holding the billing code.
    pub code_column: String,
    /// Column holding the code description.
    pub description_column: String,
}

impl Default for CsvSchema {
    fn default() -> Self {
        Self {
            code_column: "code".to_string(),
            description_column: "description".to_string(),
        }
    }
}

impl CsvSchema {
    /// Required column names, in schema order (used for the audit record).
    pub fn columns(&self) -> Vec<String> {
        vec![self.code_column.clone(), self.description_column.clone()]
    }
}

/// Column names for the input CSV.
#[derive(Debug, Clone)]
pub struct InputCsvSchema {
    /// Column holding the input identifier.
    pub id_column: String,
    /// Column holding the display name.
    pub name_column: String,
    /// Column holding the free text.
    pub text_column: String,
}

impl Default for InputCsvSchema {
    fn default() -> Self {
        Self {
            id_column: "policy_id".to_string(),
            name_column: "policy_name".to_string(),
            text_column: "cleaned_policy_text".to_string(),
        }
    }
}

/// Loads concepts from a CSV file on disk.
pub fn load_concepts_from_csv(
    path: impl AsRef<Path>,
    schema: &CsvSchema,
) -> DictionaryResult<Vec<Concept>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_concepts_from_str(&content, schema)
}

/// Loads concepts from CSV text.
pub fn load_concepts_from_str(content: &str, schema: &CsvSchema) -> DictionaryResult<Vec<Concept>> {
    let (header, rows) = parse_with_header(content)?;

    let indices = require_columns(&header, &[&schema.code_column, &schema.description_column])?;
    let (code_idx, description_idx) = (indices[0], indices[1]);

    let mut concepts = Vec::new();
    for (row_number, row) in rows {
        let code = field(&row, code_idx).trim();
        let description = field(&row, description_idx).trim();

        if code.is_empty() {
            warn!(row = row_number, "missing code, skipping row");
            continue;
        }
        if description.is_empty() {
            warn!(row = row_number, code, "missing description, skipping row");
            continue;
        }

        let metadata = header
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != code_idx && *i != description_idx)
            .map(|(i, name)| (name.clone(), field(&row, i).to_string()))
            .collect();

        concepts.push(Concept {
            code: code.to_string(),
            description: description.to_string(),
            metadata,
        });
    }

    if concepts.is_empty() {
        return Err(DictionaryError::NoValidRows);
    }
    Ok(concepts)
}

/// Loads pipeline inputs from a CSV file on disk.
pub fn load_inputs_from_csv(
    path: impl AsRef<Path>,
    schema: &InputCsvSchema,
) -> DictionaryResult<Vec<InputRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_inputs_from_str(&content, schema)
}

/// Loads pipeline inputs from CSV text.
pub fn load_inputs_from_str(
    content: &str,
    schema: &InputCsvSchema,
) -> DictionaryResult<Vec<InputRecord>> {
    let (header, rows) = parse_with_header(content)?;

    let indices = require_columns(
        &header,
        &[&schema.id_column, &schema.name_column, &schema.text_column],
    )?;
    let (id_idx, name_idx, text_idx) = (indices[0], indices[1], indices[2]);

    let mut inputs = Vec::new();
    for (row_number, row) in rows {
        let id = field(&row, id_idx).trim();
        let name = field(&row, name_idx).trim();
        let text = field(&row, text_idx).trim();

        if id.is_empty() {
            warn!(row = row_number, "missing id, skipping row");
            continue;
        }
        if text.is_empty() {
            warn!(row = row_number, id, "missing text, skipping row");
            continue;
        }

        inputs.push(InputRecord {
            id: id.to_string(),
            name: name.to_string(),
            text: text.to_string(),
        });
    }

    if inputs.is_empty() {
        return Err(DictionaryError::NoValidRows);
    }
    Ok(inputs)
}

/// Splits parsed records into a header row and numbered data rows.
/// Row numbers start at 2 to account for the header line.
fn parse_with_header(content: &str) -> DictionaryResult<(Vec<String>, Vec<(usize, Vec<String>)>)> {
    let mut records = parse_csv(content)?.into_iter();
    let header = records.next().ok_or(DictionaryError::MissingHeader)?;
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(DictionaryError::MissingHeader);
    }
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let rows = records
        .enumerate()
        .map(|(i, row)| (i + 2, row))
        .filter(|(_, row)| !row.iter().all(|f| f.trim().is_empty()))
        .collect();

    Ok((header, rows))
}

/// Resolves each required column name to its header index.
fn require_columns(header: &[String], required: &[&String]) -> DictionaryResult<Vec<usize>> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !header.iter().any(|h| h == **name))
        .map(|name| (*name).clone())
        .collect();

    if !missing.is_empty() {
        return Err(DictionaryError::MissingColumns {
            columns: missing.join(", "),
        });
    }

    Ok(required
        .iter()
        .map(|name| header.iter().position(|h| h == *name).unwrap_or(0))
        .collect())
}

/// Short rows (fewer fields than the header) read as empty in the gap.
fn field(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Minimal RFC 4180 reader. The reference stack carries no CSV crate, so
/// this stays internal: quoted fields, doubled-quote escapes, embedded
/// commas and newlines, and both LF and CRLF record separators.
fn parse_csv(content: &str) -> DictionaryResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quote_open_line = 0usize;
    let mut line = 1usize;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    current.push(c);
                }
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '"' if current.is_empty() => {
                in_quotes = true;
                quote_open_line = line;
            }
            ',' => {
                record.push(std::mem::take(&mut current));
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut record));
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(DictionaryError::UnterminatedQuote {
            line: quote_open_line,
        });
    }

    if !current.is_empty() || !record.is_empty() {
        record.push(current);
        records.push(record);
    }

    Ok(records)
}
