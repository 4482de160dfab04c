//! CSV loader for survey exports.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{Result, SurveyError};
use crate::table::{Cell, Column, Table};

/// Reads a headered CSV file into a [`Table`].
///
/// # Errors
///
/// Returns [`SurveyError::SourceUnavailable`] if the file is missing or
/// cannot be opened, and [`SurveyError::SchemaMismatch`] for ragged rows
/// or repeated headers.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<Table> {
    info!("Loading survey data");

    let file = File::open(path).map_err(|e| SurveyError::SourceUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let table = parse_table(file)?;
    info!(
        rows = table.row_count(),
        columns = table.columns().len(),
        "Survey data loaded"
    );
    Ok(table)
}

/// Parses CSV from any reader. The first record is the header row.
pub fn parse_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            return Err(SurveyError::SchemaMismatch(format!(
                "row {} has {} fields, expected {}",
                row + 1,
                record.len(),
                headers.len()
            )));
        }
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push(Cell::parse(field));
        }
    }

    debug!(headers = ?headers, "CSV parsed");

    Table::new(
        headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    )
}
