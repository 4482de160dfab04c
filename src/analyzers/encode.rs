//! One-hot encoding of a yes/no flag into indicator columns.

use tracing::{debug, warn};

use crate::config::EncodingSpec;
use crate::error::Result;
use crate::table::{Cell, Column, Table};

/// Replaces the source flag with two complementary indicator columns.
///
/// The positive indicator is 1 exactly when the cell equals the affirmative
/// marker. Every other cell, missing included, is encoded as negative, so
/// the two indicators sum to 1 on every row. The indicators are appended
/// at the end of the table and the source column is dropped. An absent
/// source column leaves the table unchanged.
pub fn encode_indicator(mut table: Table, spec: &EncodingSpec) -> Result<Table> {
    let Some(source) = table.remove_column(&spec.source) else {
        warn!(column = %spec.source, "Column to encode not present, skipping");
        return Ok(table);
    };

    let positive: Vec<Cell> = source
        .cells
        .iter()
        .map(|cell| {
            let hit = !cell.is_missing() && cell.to_field() == spec.affirmative;
            Cell::Number(if hit { 1.0 } else { 0.0 })
        })
        .collect();
    let negative: Vec<Cell> = positive
        .iter()
        .map(|cell| Cell::Number(1.0 - cell.as_number().unwrap_or(0.0)))
        .collect();

    table.push_column(Column::new(spec.positive_column.clone(), positive))?;
    table.push_column(Column::new(spec.negative_column.clone(), negative))?;

    debug!(
        source = %spec.source,
        positive = %spec.positive_column,
        negative = %spec.negative_column,
        "Indicator columns created"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurveyError;

    #[test]
    fn test_encode_yes_no() {
        let table = flag_table(vec![
            Cell::Text("Yes".into()),
            Cell::Text("No".into()),
            Cell::Text("Yes".into()),
        ]);
        let encoded = encode_indicator(table, &guide_spec()).unwrap();

        assert_eq!(numbers(&encoded, "guide_used"), vec![1.0, 0.0, 1.0]);
        assert_eq!(numbers(&encoded, "guide_not_used"), vec![0.0, 1.0, 0.0]);
        assert!(!encoded.contains("participant_guide_useful"));
    }

    #[test]
    fn test_missing_flag_is_not_affirmative() {
        let table = flag_table(vec![Cell::Missing, Cell::Text("yes".into())]);
        let encoded = encode_indicator(table, &guide_spec()).unwrap();

        assert_eq!(numbers(&encoded, "guide_used"), vec![0.0, 0.0]);
        assert_eq!(numbers(&encoded, "guide_not_used"), vec![1.0, 1.0]);
    }

    #[test]
    fn test_numeric_flag_matches_affirmative() {
        let table = flag_table(vec![Cell::Number(1.0), Cell::Number(0.0), Cell::Missing]);
        let spec = EncodingSpec {
            affirmative: "1".to_string(),
            ..guide_spec()
        };
        let encoded = encode_indicator(table, &spec).unwrap();

        assert_eq!(numbers(&encoded, "guide_used"), vec![1.0, 0.0, 0.0]);
        assert_eq!(numbers(&encoded, "guide_not_used"), vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_indicators_always_sum_to_one() {
        let table = flag_table(vec![
            Cell::Text("Yes".into()),
            Cell::Missing,
            Cell::Number(1.0),
            Cell::Text("No".into()),
            Cell::Text("Maybe".into()),
        ]);
        let encoded = encode_indicator(table, &guide_spec()).unwrap();

        let used = numbers(&encoded, "guide_used");
        let not_used = numbers(&encoded, "guide_not_used");
        for (a, b) in used.iter().zip(&not_used) {
            assert_eq!(a + b, 1.0);
        }
    }

    #[test]
    fn test_indicators_appended_at_end() {
        let table = Table::new(vec![
            Column::new("participant_guide_useful", vec![Cell::Text("Yes".into())]),
            Column::new("info_received", vec![Cell::Number(4.0)]),
        ])
        .unwrap();
        let encoded = encode_indicator(table, &guide_spec()).unwrap();

        assert_eq!(
            encoded.column_names(),
            vec!["info_received", "guide_used", "guide_not_used"]
        );
    }

    #[test]
    fn test_absent_source_is_noop() {
        let table =
            Table::new(vec![Column::new("info_received", vec![Cell::Number(4.0)])]).unwrap();
        let encoded = encode_indicator(table.clone(), &guide_spec()).unwrap();
        assert_eq!(encoded, table);
    }

    #[test]
    fn test_indicator_name_collision_is_schema_mismatch() {
        let table = Table::new(vec![
            Column::new("participant_guide_useful", vec![Cell::Text("Yes".into())]),
            Column::new("guide_used", vec![Cell::Number(1.0)]),
        ])
        .unwrap();
        let result = encode_indicator(table, &guide_spec());
        assert!(matches!(result, Err(SurveyError::SchemaMismatch(_))));
    }

    // Helper functions for tests
    fn guide_spec() -> EncodingSpec {
        EncodingSpec {
            source: "participant_guide_useful".to_string(),
            affirmative: "Yes".to_string(),
            positive_column: "guide_used".to_string(),
            negative_column: "guide_not_used".to_string(),
        }
    }

    fn flag_table(cells: Vec<Cell>) -> Table {
        Table::new(vec![Column::new("participant_guide_useful", cells)]).unwrap()
    }

    fn numbers(table: &Table, name: &str) -> Vec<f64> {
        table
            .column(name)
            .unwrap()
            .cells
            .iter()
            .map(|c| c.as_number().unwrap())
            .collect()
    }
}
