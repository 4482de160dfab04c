//! Analysis configuration.
//!
//! An [`AnalysisConfig`] names every column the pipeline touches: which are
//! dropped, which carry ordinal ratings, how ratings are aggregated, and
//! which flag is one-hot encoded before correlation. Stored as JSON on disk:
//!
//! ```json
//! {
//!   "name": "satisfaction",
//!   "prune": ["year", "language", "region", "comments"],
//!   "scale": { "Agree": 4.0, "I didn't attend this module": null },
//!   "mapped_columns": ["informed_rollout"],
//!   "aggregates": [{ "name": "logistics", "columns": ["informed_rollout"] }]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveyError};

/// Answer given for modules the participant skipped.
pub const DID_NOT_ATTEND: &str = "I didn't attend this module";

pub const MODULE_COLUMNS: [&str; 6] = [
    "acquired_skills_mod_1",
    "acquired_skills_mod_2",
    "acquired_skills_mod_3",
    "acquired_skills_mod_4",
    "acquired_skills_mod_5",
    "acquired_skills_mod_6",
];

pub const LOGISTICS_COLUMNS: [&str; 4] = [
    "informed_rollout",
    "info_received",
    "easy_access_materials",
    "easy_process_enrollment",
];

pub const GUIDE_COLUMN: &str = "participant_guide_useful";
pub const YEAR_COLUMN: &str = "year";

/// Label to score lookup. A `None` score is the explicit missing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingScale(BTreeMap<String, Option<f64>>);

impl RatingScale {
    /// Five-point agreement scale with the did-not-attend sentinel.
    pub fn standard() -> Self {
        Self::from_pairs(&[
            ("Strongly disagree", Some(1.0)),
            ("Disagree", Some(2.0)),
            ("Neutral", Some(3.0)),
            ("Agree", Some(4.0)),
            ("Strongly agree", Some(5.0)),
            (DID_NOT_ATTEND, None),
        ])
    }

    pub fn from_pairs(pairs: &[(&str, Option<f64>)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(label, score)| (label.to_string(), *score))
                .collect(),
        )
    }

    /// Outer `None`: label unknown. Inner `None`: label maps to missing.
    pub fn lookup(&self, label: &str) -> Option<Option<f64>> {
        self.0.get(label).copied()
    }

    /// Every numeric score the scale can produce.
    pub fn scores(&self) -> Vec<f64> {
        self.0.values().filter_map(|v| *v).collect()
    }
}

/// One named aggregate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub name: String,
    pub columns: Vec<String>,
    /// Partition rows by this column before averaging.
    #[serde(default)]
    pub group_by: Option<String>,
    /// Report the change from the first to the last group.
    #[serde(default)]
    pub compare_extremes: bool,
}

impl AggregateSpec {
    pub fn ungrouped(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: owned_names(columns),
            group_by: None,
            compare_extremes: false,
        }
    }

    pub fn grouped(name: &str, columns: &[&str], group_by: &str) -> Self {
        Self {
            group_by: Some(group_by.to_string()),
            ..Self::ungrouped(name, columns)
        }
    }
}

/// Splits a yes/no flag into two complementary indicator columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingSpec {
    pub source: String,
    #[serde(default = "default_affirmative")]
    pub affirmative: String,
    pub positive_column: String,
    pub negative_column: String,
}

fn default_affirmative() -> String {
    "Yes".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub name: String,
    #[serde(default)]
    pub prune: Vec<String>,
    #[serde(default = "RatingScale::standard")]
    pub scale: RatingScale,
    #[serde(default)]
    pub mapped_columns: Vec<String>,
    #[serde(default)]
    pub aggregates: Vec<AggregateSpec>,
    #[serde(default)]
    pub encoding: Option<EncodingSpec>,
    #[serde(default)]
    pub correlation: bool,
}

/// Built-in analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    EndOfYear,
    Satisfaction,
}

impl AnalysisConfig {
    /// Loads a config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SurveyError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| SurveyError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::EndOfYear => Self::end_of_year(),
            Preset::Satisfaction => Self::satisfaction(),
        }
    }

    /// Module ratings, logistics, guide usage, correlation and year trends.
    pub fn end_of_year() -> Self {
        let rated: Vec<&str> = MODULE_COLUMNS
            .iter()
            .chain(LOGISTICS_COLUMNS.iter())
            .copied()
            .collect();

        let mut by_year = AggregateSpec::grouped("by_year", &rated, YEAR_COLUMN);
        by_year.compare_extremes = true;

        Self {
            name: "end-of-year".to_string(),
            prune: owned_names(&["language", "region", "comments"]),
            scale: RatingScale::standard(),
            mapped_columns: owned_names(&rated),
            aggregates: vec![
                AggregateSpec::ungrouped("modules", &MODULE_COLUMNS),
                AggregateSpec::ungrouped("logistics", &LOGISTICS_COLUMNS),
                AggregateSpec::grouped("logistics_by_guide", &LOGISTICS_COLUMNS, GUIDE_COLUMN),
                by_year,
            ],
            encoding: Some(EncodingSpec {
                source: GUIDE_COLUMN.to_string(),
                affirmative: default_affirmative(),
                positive_column: "guide_used".to_string(),
                negative_column: "guide_not_used".to_string(),
            }),
            correlation: true,
        }
    }

    /// Logistics ratings only.
    pub fn satisfaction() -> Self {
        let rated: Vec<&str> = MODULE_COLUMNS
            .iter()
            .chain(LOGISTICS_COLUMNS.iter())
            .copied()
            .collect();

        Self {
            name: "satisfaction".to_string(),
            prune: owned_names(&[YEAR_COLUMN, "language", "region", "comments"]),
            scale: RatingScale::standard(),
            mapped_columns: owned_names(&rated),
            aggregates: vec![AggregateSpec::ungrouped("logistics", &LOGISTICS_COLUMNS)],
            encoding: None,
            correlation: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut mapped = HashSet::new();
        for column in &self.mapped_columns {
            if !mapped.insert(column.as_str()) {
                return Err(SurveyError::Config(format!("column {column} mapped twice")));
            }
        }

        let mut names = HashSet::new();
        for spec in &self.aggregates {
            if !names.insert(spec.name.as_str()) {
                return Err(SurveyError::Config(format!(
                    "aggregate {} defined twice",
                    spec.name
                )));
            }
            if spec.columns.is_empty() {
                return Err(SurveyError::Config(format!(
                    "aggregate {} has no columns",
                    spec.name
                )));
            }
            if spec.compare_extremes && spec.group_by.is_none() {
                return Err(SurveyError::Config(format!(
                    "aggregate {} compares groups but has no group_by",
                    spec.name
                )));
            }
        }

        if let Some(enc) = &self.encoding {
            if enc.positive_column == enc.negative_column {
                return Err(SurveyError::Config(
                    "indicator columns must have distinct names".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_standard_scale_lookup() {
        let scale = RatingScale::standard();
        assert_eq!(scale.lookup("Strongly agree"), Some(Some(5.0)));
        assert_eq!(scale.lookup(DID_NOT_ATTEND), Some(None));
        assert_eq!(scale.lookup("Maybe"), None);
    }

    #[test]
    fn test_standard_scale_scores() {
        let mut scores = RatingScale::standard().scores();
        scores.sort_by(f64::total_cmp);
        assert_eq!(scores, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_presets_are_valid() {
        AnalysisConfig::end_of_year().validate().unwrap();
        AnalysisConfig::satisfaction().validate().unwrap();
    }

    #[test]
    fn test_load_round_trips_preset() {
        let preset = AnalysisConfig::end_of_year();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&preset).unwrap()).unwrap();

        let loaded = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(loaded, preset);
    }

    #[test]
    fn test_load_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "minimal"}}"#).unwrap();

        let loaded = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(loaded.scale, RatingScale::standard());
        assert!(loaded.prune.is_empty());
        assert!(loaded.encoding.is_none());
        assert!(!loaded.correlation);
    }

    #[test]
    fn test_null_score_is_missing_marker() {
        let scale: RatingScale = serde_json::from_str(r#"{"Yes": 1.0, "N/A": null}"#).unwrap();
        assert_eq!(scale.lookup("N/A"), Some(None));
    }

    #[test]
    fn test_encoding_affirmative_defaults_to_yes() {
        let enc: EncodingSpec = serde_json::from_str(
            r#"{"source": "flag", "positive_column": "p", "negative_column": "n"}"#,
        )
        .unwrap();
        assert_eq!(enc.affirmative, "Yes");
    }

    #[test]
    fn test_validate_rejects_duplicate_aggregate() {
        let mut config = AnalysisConfig::satisfaction();
        config.aggregates.push(config.aggregates[0].clone());
        assert!(matches!(config.validate(), Err(SurveyError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_column_mapped_twice() {
        let mut config = AnalysisConfig::satisfaction();
        config.mapped_columns.push("informed_rollout".to_string());
        assert!(matches!(config.validate(), Err(SurveyError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_comparison_without_grouping() {
        let mut config = AnalysisConfig::satisfaction();
        config.aggregates[0].compare_extremes = true;
        assert!(matches!(config.validate(), Err(SurveyError::Config(_))));
    }

    #[test]
    fn test_load_bad_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            AnalysisConfig::load(file.path()),
            Err(SurveyError::Config(_))
        ));
    }
}
