//! In-memory survey table: named columns of cells aligned by row index.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, SurveyError};

/// A single survey answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classifies a raw field the way a spreadsheet reader would: blank is
    /// missing, anything that parses as a float is a number.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Key used to partition rows when grouping. Missing cells have no key.
    pub fn key(&self) -> Option<GroupKey> {
        match self {
            Cell::Missing => None,
            Cell::Number(n) => Some(GroupKey::Number(*n)),
            Cell::Text(s) => Some(GroupKey::Text(s.clone())),
        }
    }

    /// Renders the cell as a CSV field. Missing is the empty string.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// A distinct value of a grouping column.
///
/// Numbers sort numerically and before any text value.
#[derive(Debug, Clone)]
pub enum GroupKey {
    Number(f64),
    Text(String),
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Number(_), GroupKey::Text(_)) => Ordering::Less,
            (GroupKey::Text(_), GroupKey::Number(_)) => Ordering::Greater,
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Number(n) => f.write_str(&format_number(*n)),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// A column is numeric when it holds no text. An all-missing column
    /// counts as numeric.
    pub fn is_numeric(&self) -> bool {
        self.cells.iter().all(|c| !matches!(c, Cell::Text(_)))
    }

    /// Values as floats, `None` for anything non-numeric.
    pub fn numbers(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(Cell::as_number).collect()
    }
}

/// Ordered collection of uniquely named, equally long columns. One row per
/// survey response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut table = Table::default();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Appends a column, enforcing unique names and equal row counts.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.contains(&column.name) {
            return Err(SurveyError::SchemaMismatch(format!(
                "duplicate column {}",
                column.name
            )));
        }
        if !self.columns.is_empty() && column.cells.len() != self.row_count() {
            return Err(SurveyError::SchemaMismatch(format!(
                "column {} has {} rows, expected {}",
                column.name,
                column.cells.len(),
                self.row_count()
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }

    /// Swaps the cells of an existing column, keeping its position.
    pub fn replace_cells(&mut self, name: &str, cells: Vec<Cell>) -> Result<()> {
        let expected = self.row_count();
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| SurveyError::SchemaMismatch(format!("no column {name}")))?;
        if cells.len() != expected {
            return Err(SurveyError::SchemaMismatch(format!(
                "column {name} has {} rows, expected {expected}",
                cells.len()
            )));
        }
        column.cells = cells;
        Ok(())
    }

    /// Projection onto the columns that hold no text.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }
}
