//! Pairwise correlation over the numeric projection of a table.

use tracing::debug;

use crate::analyzers::types::CorrelationMatrix;
use crate::analyzers::utility::pearson;
use crate::table::Table;

/// Pairwise Pearson correlation over every numeric column.
///
/// Each pair uses only the rows where both columns are present. The
/// diagonal is exactly 1 for a column with variance and undefined for a
/// constant or near-empty one.
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let columns = table.numeric_columns();
    let series: Vec<Vec<Option<f64>>> = columns.iter().map(|c| c.numbers()).collect();
    let n = columns.len();

    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            let r = if i == j { r.map(|_| 1.0) } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!(columns = n, "Correlation matrix computed");

    CorrelationMatrix {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}
