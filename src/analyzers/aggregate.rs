//! Column means, optionally grouped by a categorical key.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::analyzers::types::{
    AggregateTable, ColumnDelta, ColumnMean, GroupComparison, GroupMeans,
};
use crate::analyzers::utility::mean;
use crate::config::AggregateSpec;
use crate::table::{GroupKey, Table};

/// Computes the aggregate table described by `spec`.
pub fn aggregate(table: &Table, spec: &AggregateSpec) -> AggregateTable {
    match &spec.group_by {
        None => AggregateTable::Overall {
            name: spec.name.clone(),
            means: column_means(table, &spec.columns),
        },
        Some(key) => {
            let groups = grouped_means(table, &spec.columns, key);
            let comparison = if spec.compare_extremes {
                compare_extremes(&groups, &spec.columns)
            } else {
                None
            };
            AggregateTable::Grouped {
                name: spec.name.clone(),
                group_by: key.clone(),
                groups,
                comparison,
            }
        }
    }
}

/// Mean of each column over its present values, in request order.
///
/// Non-numeric cells count as missing. An absent column gets an undefined
/// mean.
pub fn column_means(table: &Table, columns: &[String]) -> Vec<ColumnMean> {
    let rows: Vec<usize> = (0..table.row_count()).collect();
    columns
        .iter()
        .map(|name| ColumnMean {
            column: name.clone(),
            mean: mean_over_rows(table, name, &rows),
        })
        .collect()
}

/// One [`GroupMeans`] per distinct present value of `key`, ordered by key.
///
/// Rows whose key is missing belong to no group. An absent key column
/// yields no groups.
pub fn grouped_means(table: &Table, columns: &[String], key: &str) -> Vec<GroupMeans> {
    let Some(key_column) = table.column(key) else {
        warn!(column = key, "Group key column not present, no groups produced");
        return Vec::new();
    };

    let mut partitions: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (row, cell) in key_column.cells.iter().enumerate() {
        if let Some(k) = cell.key() {
            partitions.entry(k).or_default().push(row);
        }
    }
    debug!(key, groups = partitions.len(), "Rows partitioned");

    partitions
        .into_iter()
        .map(|(group, rows)| GroupMeans {
            means: columns
                .iter()
                .map(|name| ColumnMean {
                    column: name.clone(),
                    mean: mean_over_rows(table, name, &rows),
                })
                .collect(),
            group,
        })
        .collect()
}

/// Change of each column's mean from the first group to the last.
///
/// Uses the unrounded means. `None` with fewer than two groups.
pub fn compare_extremes(groups: &[GroupMeans], columns: &[String]) -> Option<GroupComparison> {
    if groups.len() < 2 {
        return None;
    }
    let first = groups.first()?;
    let last = groups.last()?;

    let deltas = columns
        .iter()
        .map(|name| ColumnDelta {
            column: name.clone(),
            change: match (first.mean_of(name), last.mean_of(name)) {
                (Some(from), Some(to)) => Some(to - from),
                _ => None,
            },
        })
        .collect();

    Some(GroupComparison {
        from: first.group.clone(),
        to: last.group.clone(),
        deltas,
    })
}

fn mean_over_rows(table: &Table, name: &str, rows: &[usize]) -> Option<f64> {
    let Some(column) = table.column(name) else {
        warn!(column = name, "Column to aggregate not present, mean undefined");
        return None;
    };
    let values: Vec<Option<f64>> = rows.iter().map(|&r| column.cells[r].as_number()).collect();
    mean(&values)
}
