//! Ordinal label to score mapping.

use tracing::{debug, warn};

use crate::config::RatingScale;
use crate::error::{Result, SurveyError};
use crate::table::{Cell, Table};

/// Replaces every label in `column` with its score on `scale`.
///
/// Labels mapped to the missing marker, and labels the scale does not know,
/// both become [`Cell::Missing`]. Unknown labels are returned as
/// [`SurveyError::UnmappedCategory`] diagnostics; they never fail the run.
/// An absent column is left alone.
///
/// Not idempotent: a numeric cell is looked up by its rendered value, so
/// mapping an already-mapped column turns its scores into missing unless
/// the scale happens to contain those numbers as labels. Call once per
/// column.
pub fn map_column(
    mut table: Table,
    column: &str,
    scale: &RatingScale,
) -> Result<(Table, Vec<SurveyError>)> {
    let Some(source) = table.column(column) else {
        warn!(column, "Column to map not present, skipping");
        return Ok((table, Vec::new()));
    };

    let mut diagnostics = Vec::new();
    let cells: Vec<Cell> = source
        .cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            if cell.is_missing() {
                return Cell::Missing;
            }
            let label = cell.to_field();
            match scale.lookup(&label) {
                Some(Some(score)) => Cell::Number(score),
                Some(None) => Cell::Missing,
                None => {
                    diagnostics.push(SurveyError::UnmappedCategory {
                        column: column.to_string(),
                        row,
                        label,
                    });
                    Cell::Missing
                }
            }
        })
        .collect();

    table.replace_cells(column, cells)?;

    for d in &diagnostics {
        warn!(diagnostic = %d, "Unmapped category treated as missing");
    }
    debug!(column, unmapped = diagnostics.len(), "Column mapped");

    Ok((table, diagnostics))
}
