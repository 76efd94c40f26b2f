//! Console rendering of summaries, category pages and result tables.
//!
//! Supports an aligned plain-text table and pretty-printed JSON.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::catalog::Page;
use crate::compare::{Comparison, Filtered};
use crate::dataset::Row;
use crate::error::ParseError;
use crate::parser::{AMOUNT_COLUMN, CATEGORY_COLUMN, PERIOD_COLUMN, REGION_COLUMN};
use crate::stats::RegionCount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Serialize)]
struct FilteredView<'a> {
    category: &'a str,
    region: &'a str,
    matched: usize,
    total_amount: f64,
    rows: &'a [&'a Row],
}

fn write_json(w: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

/// Reports members that were skipped during projection.
pub fn write_skipped(w: &mut impl Write, skipped: &[ParseError]) -> Result<()> {
    for err in skipped {
        writeln!(w, "Error processing file {}: {}", err.member(), err)?;
    }
    Ok(())
}

/// Row count per region, most frequent first.
pub fn write_region_summary(
    w: &mut impl Write,
    format: OutputFormat,
    summary: &[RegionCount],
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(w, &summary);
    }

    writeln!(w, "{:<4} {:>10} {:>20}", REGION_COLUMN, "ROWS", AMOUNT_COLUMN)?;
    for count in summary {
        writeln!(
            w,
            "{:<4} {:>10} {:>20.2}",
            count.region, count.rows, count.total_amount
        )?;
    }
    let rows: usize = summary.iter().map(|c| c.rows).sum();
    writeln!(w, "{} regions, {} rows", summary.len(), rows)?;
    Ok(())
}

/// One page of category options, numbered over the whole catalog.
pub fn write_page(w: &mut impl Write, format: OutputFormat, page: &Page<'_>) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(w, page);
    }

    for entry in &page.entries {
        writeln!(w, "{}. {}", entry.index, entry.label)?;
    }
    Ok(())
}

/// Header line announcing how many options exist.
pub fn write_catalog_header(w: &mut impl Write, total: usize) -> Result<()> {
    writeln!(
        w,
        "Available options for '{}' ({} in total):",
        CATEGORY_COLUMN, total
    )?;
    Ok(())
}

/// Matching rows, capped at `limit` for display.
pub fn write_filtered(
    w: &mut impl Write,
    format: OutputFormat,
    filtered: &Filtered<'_>,
    limit: usize,
) -> Result<()> {
    let shown = filtered.displayed(limit);

    if format == OutputFormat::Json {
        let view = FilteredView {
            category: filtered.category,
            region: &filtered.region,
            matched: filtered.len(),
            total_amount: filtered.total_amount(),
            rows: shown,
        };
        return write_json(w, &view);
    }

    if filtered.is_empty() {
        writeln!(
            w,
            "No rows for '{}' in {}.",
            filtered.category, filtered.region
        )?;
        return Ok(());
    }

    writeln!(
        w,
        "{:<10} {:<4} {:<40} {:>20}",
        PERIOD_COLUMN, REGION_COLUMN, CATEGORY_COLUMN, AMOUNT_COLUMN
    )?;
    for row in shown {
        writeln!(
            w,
            "{:<10} {:<4} {:<40} {:>20.2}",
            row.period, row.region, row.category, row.amount
        )?;
    }
    writeln!(
        w,
        "Showing {} of {} rows (total {:.2})",
        shown.len(),
        filtered.len(),
        filtered.total_amount()
    )?;
    Ok(())
}

/// Side-by-side amounts, or the no-data notice.
pub fn write_comparison(
    w: &mut impl Write,
    format: OutputFormat,
    comparison: &Comparison,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(w, comparison);
    }

    match comparison {
        Comparison::NoData { region } => {
            writeln!(w, "No data available for {}.", region)?;
        }
        Comparison::Pairs {
            left_region,
            right_region,
            pairs,
            ..
        } => {
            writeln!(w, "Comparison with {}:", right_region)?;
            let left = format!("{}_{}", AMOUNT_COLUMN, left_region);
            let right = format!("{}_{}", AMOUNT_COLUMN, right_region);
            writeln!(w, "{:>24} {:>24}", left, right)?;
            for pair in pairs {
                writeln!(w, "{:>24.2} {:>24.2}", pair.left, pair.right)?;
            }
            writeln!(w, "{} pairs", pairs.len())?;
        }
    }
    Ok(())
}
