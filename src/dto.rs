use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Exact header strings used for column identity. The unit annotations are
/// part of the name and must match verbatim.
pub const COMPANY_ID: &str = "Company_ID";
pub const COMPANY_NAME: &str = "Company_Name";
pub const INDUSTRY: &str = "Industry";
pub const REGION: &str = "Region";
pub const DISTRICT: &str = "District";
pub const ANNUAL_REVENUE: &str = "Annual_Revenue (M₺)";
pub const MARKETING_SPEND: &str = "Marketing_Spend (K₺)";
pub const LEADS_GENERATED: &str = "Leads_Generated";
pub const CONVERSION_RATE: &str = "Conversion_Rate (%)";
pub const LEAD_SCORE: &str = "Lead_Score";
pub const LEAD_CATEGORY: &str = "Lead_Category";

/// Default similarity threshold on the 0-100 percent scale.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 90.0;

/// A single value in a tabular dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// True for `Null` and for a numeric zero. Text never counts as zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Number(n) => *n == 0.0,
            Cell::Text(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// An ordered, named-column tabular dataset.
///
/// Every pipeline stage consumes a `Frame` and produces a new one; a stage
/// never mutates its input and never retains a reference to it past the call.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Frame { columns, rows }
    }

    /// A frame with the same columns and no rows.
    pub fn empty_like(&self) -> Self {
        Frame {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &[Cell] {
        &self.rows[index]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by its exact header string.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.rows[row][column]
    }

    /// Retains rows whose value in `column` (display form) appears in
    /// `allowed`. An unknown column leaves the frame unchanged, matching the
    /// dashboard behavior of only offering filters for columns that exist.
    pub fn filtered(&self, column: &str, allowed: &[&str]) -> Frame {
        let Some(idx) = self.column_index(column) else {
            return self.clone();
        };
        let rows = self
            .rows
            .iter()
            .filter(|row| allowed.contains(&row[idx].to_string().as_str()))
            .cloned()
            .collect();
        Frame {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// The dataset as an ordered sequence of named-field records, for
    /// consumption by a presentation layer.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| {
                        let value = serde_json::to_value(cell).unwrap_or(Value::Null);
                        (name.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

/// How similar rows are collapsed into duplicate groups.
///
/// In `Greedy` mode each unconsumed row seeds a group of everything similar
/// to it, without retroactive merging, so grouping is not transitive.
/// `Transitive` merges overlapping matches into connected components
/// instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    Greedy,
    Transitive,
}

/// Configuration for the duplicate resolver.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DedupConfig {
    /// Similarity threshold (inclusive) on the 0-100 percent scale.
    pub threshold: f64,
    pub grouping: GroupingMode,
}

impl Default for DedupConfig {
    fn default() -> Self {
        DedupConfig {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            grouping: GroupingMode::Greedy,
        }
    }
}
