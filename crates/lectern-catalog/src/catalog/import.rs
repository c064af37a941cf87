//! Bulk import file parsing.
//!
//! The upload endpoint takes a headerless `;`-delimited file with the columns
//! `book_title;isbn;num_of_pages;authors`, where `authors` is a
//! comma-separated list of `First Last Origin`. Files are parsed locally
//! first so a malformed row is reported before anything is sent.

use crate::error::CatalogError;
use serde::Serialize;
use std::io::Read;

/// One author entry of an import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportAuthor {
    pub first_name: String,
    pub last_name: String,
    pub origin: String,
}

/// A validated import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRow {
    pub title: String,
    pub isbn: String,
    pub num_pages: u32,
    pub authors: Vec<ImportAuthor>,
}

/// Parse and validate an import file. Row numbers in errors are 1-based.
pub fn parse_import_csv<R: Read>(reader: R) -> Result<Vec<ImportRow>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != 4 {
            return Err(CatalogError::ImportRow {
                row,
                message: format!("expected 4 columns, found {}", record.len()),
            });
        }

        let title = record[0].to_string();
        if title.is_empty() {
            return Err(row_error(row, "title is empty"));
        }

        let isbn = record[1].to_string();
        if isbn.is_empty() || !isbn.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return Err(row_error(row, "isbn must contain only digits"));
        }

        let num_pages: u32 = record[2]
            .parse()
            .map_err(|_| row_error(row, "num_of_pages is not a number"))?;

        let authors = record[3]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|entry| parse_author(row, entry))
            .collect::<Result<Vec<_>, _>>()?;
        if authors.is_empty() {
            return Err(row_error(row, "at least one author is required"));
        }

        rows.push(ImportRow {
            title,
            isbn,
            num_pages,
            authors,
        });
    }

    Ok(rows)
}

fn parse_author(row: usize, entry: &str) -> Result<ImportAuthor, CatalogError> {
    let parts: Vec<&str> = entry.split_whitespace().collect();
    match parts.as_slice() {
        [first, last, origin] => Ok(ImportAuthor {
            first_name: first.to_string(),
            last_name: last.to_string(),
            origin: origin.to_string(),
        }),
        _ => Err(row_error(
            row,
            &format!("author '{}' must be 'First Last Origin'", entry),
        )),
    }
}

fn row_error(row: usize, message: &str) -> CatalogError {
    CatalogError::ImportRow {
        row,
        message: message.to_string(),
    }
}
