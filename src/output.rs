//! Presentation boundary: cleaned-table export, report JSON and console
//! summaries.

use std::fs::File;
use std::path::Path;

use csv::WriterBuilder;
use tracing::{debug, info};

use crate::analyzers::types::{AggregateTable, ColumnMean, SurveyReport};
use crate::analyzers::utility::round2;
use crate::error::Result;
use crate::table::Table;

/// Writes the cleaned table as CSV, header row first. Missing cells are
/// empty fields.
pub fn export_table(path: &Path, table: &Table) -> Result<()> {
    debug!(path = %path.display(), rows = table.row_count(), "Exporting cleaned table");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        writer.write_record(table.columns().iter().map(|c| c.cells[row].to_field()))?;
    }
    writer.flush()?;

    info!(path = %path.display(), "Cleaned table exported");
    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &SurveyReport) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    info!(path = %path.display(), "Report written");
    Ok(())
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &SurveyReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Logs one line per aggregate entry, the console counterpart of a chart.
pub fn log_report(report: &SurveyReport) {
    for aggregate in &report.aggregates {
        match aggregate {
            AggregateTable::Overall { name, means } => {
                for m in means {
                    info!(
                        aggregate = %name,
                        column = %m.column,
                        rating = %rating(m),
                        "Average rating"
                    );
                }
            }
            AggregateTable::Grouped {
                name,
                group_by,
                groups,
                comparison,
            } => {
                for g in groups {
                    for m in &g.means {
                        info!(
                            aggregate = %name,
                            group_by = %group_by,
                            group = %g.group,
                            column = %m.column,
                            rating = %rating(m),
                            "Average rating"
                        );
                    }
                }
                if let Some(cmp) = comparison {
                    for d in &cmp.deltas {
                        let change = d
                            .change
                            .map_or("undefined".to_string(), |c| format!("{:+.2}", round2(c)));
                        info!(
                            aggregate = %name,
                            from = %cmp.from,
                            to = %cmp.to,
                            column = %d.column,
                            change = %change,
                            "Rating change"
                        );
                    }
                }
            }
        }
    }

    if let Some(matrix) = &report.correlation {
        info!(columns = matrix.columns.len(), "Correlation matrix ready");
    }
}

fn rating(mean: &ColumnMean) -> String {
    mean.mean
        .map_or("undefined".to_string(), |m| format!("{:.2}/5", round2(m)))
}
