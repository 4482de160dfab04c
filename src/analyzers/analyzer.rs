use chrono::Utc;
use tracing::info;

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::correlation::correlation_matrix;
use crate::analyzers::encode::encode_indicator;
use crate::analyzers::mapping::map_column;
use crate::analyzers::prune::prune;
use crate::analyzers::types::{PipelineOutput, SurveyReport};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::table::Table;

/// Runs prune, map, aggregate, encode and correlate over a loaded table.
///
/// Every stage takes the table by value and hands a new one to the next.
/// Aggregates see the mapped table; correlation sees the encoded one, which
/// is also returned as the cleaned table for export. Any stage error halts
/// the run.
#[tracing::instrument(skip_all, fields(analysis = %config.name, rows = table.row_count()))]
pub fn run(table: Table, config: &AnalysisConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let rows = table.row_count();

    info!(columns = ?config.prune, "Removing non-essential columns");
    let mut table = prune(table, &config.prune);

    info!(
        columns = config.mapped_columns.len(),
        "Replacing categorical values by numerical values"
    );
    let mut diagnostics = Vec::new();
    for column in &config.mapped_columns {
        let (mapped, unmapped) = map_column(table, column, &config.scale)?;
        table = mapped;
        diagnostics.extend(unmapped.into_iter().map(|e| e.to_string()));
    }

    let aggregates: Vec<_> = config
        .aggregates
        .iter()
        .map(|spec| aggregate(&table, spec))
        .collect();
    info!(count = aggregates.len(), "Aggregates computed");

    let table = match &config.encoding {
        Some(spec) => encode_indicator(table, spec)?,
        None => table,
    };

    let correlation = config.correlation.then(|| correlation_matrix(&table));

    Ok(PipelineOutput {
        report: SurveyReport {
            schema_version: 1,
            analysis: config.name.clone(),
            generated_at: Utc::now(),
            rows,
            aggregates,
            correlation,
            diagnostics,
        },
        cleaned: table,
    })
}
