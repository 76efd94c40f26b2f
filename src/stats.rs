use serde::Serialize;
use std::collections::HashMap;

use crate::dataset::Dataset;

/// Row count and summed transfers for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub rows: usize,
    pub total_amount: f64,
}

/// Counts rows per region.
///
/// Ordered by row count descending; equal counts are ordered by region code
/// ascending so the output does not depend on hashing.
pub fn summarize_regions(dataset: &Dataset) -> Vec<RegionCount> {
    let mut by_region: HashMap<&str, (usize, f64)> = HashMap::new();
    for row in dataset {
        let entry = by_region.entry(row.region.as_str()).or_default();
        entry.0 += 1;
        entry.1 += row.amount;
    }

    let mut counts: Vec<RegionCount> = by_region
        .into_iter()
        .map(|(region, (rows, total_amount))| RegionCount {
            region: region.to_string(),
            rows,
            total_amount,
        })
        .collect();

    counts.sort_by(|a, b| b.rows.cmp(&a.rows).then_with(|| a.region.cmp(&b.region)));
    counts
}
