//! Data types produced by the aggregation pipeline.
//!
//! Values are held unrounded. Rounding to two decimals happens once, when a
//! report is serialized for presentation. `None` marks an undefined
//! statistic and serializes as `null`.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::analyzers::utility::round2;
use crate::table::{GroupKey, Table};

/// Mean of one column. `None` when the column had no present values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: String,
    #[serde(serialize_with = "rounded")]
    pub mean: Option<f64>,
}

/// Means of every requested column within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeans {
    pub group: GroupKey,
    pub means: Vec<ColumnMean>,
}

impl GroupMeans {
    pub fn mean_of(&self, column: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.column == column)
            .and_then(|m| m.mean)
    }
}

/// Change of a column's mean between two groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDelta {
    pub column: String,
    #[serde(serialize_with = "rounded")]
    pub change: Option<f64>,
}

/// First-to-last group comparison, e.g. earliest year against latest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub from: GroupKey,
    pub to: GroupKey,
    pub deltas: Vec<ColumnDelta>,
}

/// One named aggregate table handed to presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateTable {
    Overall {
        name: String,
        means: Vec<ColumnMean>,
    },
    Grouped {
        name: String,
        group_by: String,
        groups: Vec<GroupMeans>,
        #[serde(skip_serializing_if = "Option::is_none")]
        comparison: Option<GroupComparison>,
    },
}

impl AggregateTable {
    pub fn name(&self) -> &str {
        match self {
            AggregateTable::Overall { name, .. } | AggregateTable::Grouped { name, .. } => name,
        }
    }
}

/// Square, symmetric pairwise correlation matrix over numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    #[serde(serialize_with = "rounded_matrix")]
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Everything a pipeline run hands to presentation, apart from the cleaned
/// table itself.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub schema_version: u8,
    pub analysis: String,
    pub generated_at: DateTime<Utc>,
    pub rows: usize,
    pub aggregates: Vec<AggregateTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<CorrelationMatrix>,
    pub diagnostics: Vec<String>,
}

impl SurveyReport {
    pub fn aggregate(&self, name: &str) -> Option<&AggregateTable> {
        self.aggregates.iter().find(|a| a.name() == name)
    }
}

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub report: SurveyReport,
    /// Fully transformed table, exported for audit.
    pub cleaned: Table,
}

fn rounded<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    value.map(round2).serialize(serializer)
}

fn rounded_matrix<S: Serializer>(
    values: &[Vec<Option<f64>>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let rounded: Vec<Vec<Option<f64>>> = values
        .iter()
        .map(|row| row.iter().map(|v| v.map(round2)).collect())
        .collect();
    rounded.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mean_rounds_on_serialize_only() {
        let mean = ColumnMean {
            column: "info_received".to_string(),
            mean: Some(11.0 / 3.0),
        };
        assert_eq!(mean.mean, Some(11.0 / 3.0));
        assert_eq!(
            serde_json::to_value(&mean).unwrap(),
            json!({"column": "info_received", "mean": 3.67})
        );
    }

    #[test]
    fn test_undefined_mean_serializes_as_null() {
        let mean = ColumnMean {
            column: "acquired_skills_mod_6".to_string(),
            mean: None,
        };
        assert_eq!(
            serde_json::to_value(&mean).unwrap(),
            json!({"column": "acquired_skills_mod_6", "mean": null})
        );
    }

    #[test]
    fn test_grouped_table_tag() {
        let table = AggregateTable::Grouped {
            name: "by_year".to_string(),
            group_by: "year".to_string(),
            groups: vec![GroupMeans {
                group: GroupKey::Number(2024.0),
                means: vec![],
            }],
            comparison: None,
        };
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["kind"], "grouped");
        assert_eq!(value["groups"][0]["group"], "2024");
        assert!(value.get("comparison").is_none());
    }

    #[test]
    fn test_matrix_lookup() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![Some(1.0), Some(0.5)], vec![Some(0.5), None]],
        };
        assert_eq!(matrix.get("a", "b"), Some(0.5));
        assert_eq!(matrix.get("b", "b"), None);
        assert_eq!(matrix.get("a", "zz"), None);
    }
}
