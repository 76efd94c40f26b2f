//! Filtering by category and region, and the two-region comparison.

use serde::Serialize;

use crate::dataset::{Dataset, Row};
use crate::error::{InputFormatError, SelectionError};

pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

/// Reads a 1-based option number.
pub fn parse_selection(input: &str) -> Result<usize, InputFormatError> {
    let trimmed = input.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| InputFormatError::NotANumber(trimmed.to_string()))
}

/// Trims and upper-cases a region code.
///
/// The code must be non-empty and alphabetic. Whether it occurs in the
/// dataset is not checked here; an absent region simply filters to nothing.
pub fn normalize_region(input: &str) -> Result<String, SelectionError> {
    let code = input.trim().to_uppercase();
    if code.is_empty() || !code.chars().all(char::is_alphabetic) {
        return Err(SelectionError::InvalidRegion(input.trim().to_string()));
    }
    Ok(code)
}

/// Rows matching one category and one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filtered<'a> {
    pub category: &'a str,
    pub region: String,
    pub rows: Vec<&'a Row>,
}

impl<'a> Filtered<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `limit` rows, for display only.
    pub fn displayed(&self, limit: usize) -> &[&'a Row] {
        &self.rows[..self.rows.len().min(limit)]
    }

    pub fn total_amount(&self) -> f64 {
        self.rows.iter().map(|r| r.amount).sum()
    }
}

pub fn filter_rows<'a>(dataset: &'a Dataset, category: &'a str, region: &str) -> Filtered<'a> {
    let rows = dataset
        .iter()
        .filter(|row| row.category == category && row.region == region)
        .collect();

    Filtered {
        category,
        region: region.to_string(),
        rows,
    }
}

/// One row of the comparison: an amount from each region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPair {
    pub left: f64,
    pub right: f64,
}

/// Outcome of comparing a filtered selection against a second region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Comparison {
    /// The second region has no rows for the category.
    NoData { region: String },
    /// Every pairing of a left row with a right row.
    Pairs {
        category: String,
        left_region: String,
        right_region: String,
        pairs: Vec<ComparisonPair>,
    },
}

impl Comparison {
    pub fn len(&self) -> usize {
        match self {
            Self::NoData { .. } => 0,
            Self::Pairs { pairs, .. } => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Joins two selections on the category label.
///
/// The label is not a unique key, so `m` rows against `n` rows produce the
/// full `m * n` cross product, left rows outermost.
pub fn compare(filtered: &Filtered<'_>, compared: &Filtered<'_>) -> Comparison {
    if compared.is_empty() {
        return Comparison::NoData {
            region: compared.region.clone(),
        };
    }

    let pairs = filtered
        .rows
        .iter()
        .flat_map(move |left| {
            compared
                .rows
                .iter()
                .filter(move |right| right.category == left.category)
                .map(move |right| ComparisonPair {
                    left: left.amount,
                    right: right.amount,
                })
        })
        .collect();

    Comparison::Pairs {
        category: filtered.category.to_string(),
        left_region: filtered.region.clone(),
        right_region: compared.region.clone(),
        pairs,
    }
}
