//! The interactive exploration session.
//!
//! Loads one period's archive into a [`Dataset`], prints the per-region
//! summary, lets the user page through the categories and then loops over
//! category/region selections with an optional second-region comparison.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::{info, instrument};

use crate::archive::extract_csv_members;
use crate::catalog::{CategoryBrowser, CategoryCatalog};
use crate::compare::{compare, filter_rows, normalize_region, parse_selection};
use crate::config::ExplorerConfig;
use crate::dataset::Dataset;
use crate::fetch::{HttpClient, archive_url, fetch_archive};
use crate::output::{
    write_catalog_header, write_comparison, write_filtered, write_page, write_region_summary,
};
use crate::parser::{Projection, project_members};
use crate::period::PeriodKey;
use crate::prompt::Console;
use crate::stats::summarize_regions;

pub const PERIOD_PROMPT: &str = "Enter the desired year and month [format: AAAAMM]: ";
pub const MORE_OPTIONS_PROMPT: &str = "Do you want to see more options? (yes/no): ";
pub const CATEGORY_PROMPT: &str = "Select the 'NOME AÇÃO' option by number: ";
pub const REGION_PROMPT: &str = "Enter the desired UF (e.g. BA): ";
pub const COMPARE_PROMPT: &str = "Do you want to compare with other UF? (yes/no): ";
pub const COMPARE_REGION_PROMPT: &str = "Enter the UF to compare with (e.g. SP): ";
pub const AGAIN_PROMPT: &str = "Do you want to see results for another selection? (yes/no): ";

/// Downloads, extracts and projects the archive for `period`.
#[instrument(skip_all, fields(%period))]
pub async fn load_period(
    client: &dyn HttpClient,
    config: &ExplorerConfig,
    period: PeriodKey,
) -> Result<Projection> {
    let url = archive_url(&config.base_url, &period.to_string());
    info!(%url, "Downloading archive");

    let body = fetch_archive(client, &url).await?;
    let members = extract_csv_members(&body)?;
    info!(members = members.len(), "Archive extracted");

    Ok(project_members(&members)?)
}

/// Asks for a period until a valid `AAAAMM` key is given.
pub fn ask_period<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<PeriodKey> {
    console.ask_until(PERIOD_PROMPT, PeriodKey::parse)
}

/// Resolves a typed option number against the unpaged catalog.
pub fn select_category<'c>(catalog: &'c CategoryCatalog, answer: &str) -> Result<&'c str> {
    let index = parse_selection(answer)?;
    Ok(catalog.resolve(index)?)
}

/// Runs the whole interactive part over an already loaded dataset.
pub fn explore<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    dataset: &Dataset,
    config: &ExplorerConfig,
) -> Result<()> {
    let summary = summarize_regions(dataset);
    write_region_summary(console.out(), config.format, &summary)?;

    let catalog = CategoryCatalog::from_dataset(dataset);
    if catalog.is_empty() {
        writeln!(console.out(), "No options available.")?;
        return Ok(());
    }

    browse_categories(console, &catalog, config)?;
    select_and_compare(console, dataset, &catalog, config)
}

/// Shows the first page, then further pages while the user asks for them.
pub fn browse_categories<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    catalog: &CategoryCatalog,
    config: &ExplorerConfig,
) -> Result<()> {
    let mut browser = CategoryBrowser::new(catalog, config.page_size);

    write_catalog_header(console.out(), catalog.len())?;
    write_page(console.out(), config.format, &browser.next_page())?;

    while !browser.is_exhausted() {
        if !console.ask_yes_no(MORE_OPTIONS_PROMPT)? {
            break;
        }
        write_page(console.out(), config.format, &browser.next_page())?;
    }
    Ok(())
}

/// Category/region selection loop.
#[instrument(level = "debug", skip_all, fields(categories = catalog.len()))]
pub fn select_and_compare<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    dataset: &Dataset,
    catalog: &CategoryCatalog,
    config: &ExplorerConfig,
) -> Result<()> {
    loop {
        let category = console.ask_until(CATEGORY_PROMPT, |answer| select_category(catalog, answer))?;
        let region = console.ask_until(REGION_PROMPT, normalize_region)?;

        let filtered = filter_rows(dataset, category, &region);
        info!(category, %region, matched = filtered.len(), "Selection filtered");
        write_filtered(console.out(), config.format, &filtered, config.display_limit)?;

        if console.ask_yes_no(COMPARE_PROMPT)? {
            let other = console.ask_until(COMPARE_REGION_PROMPT, normalize_region)?;
            let compared = filter_rows(dataset, category, &other);
            let comparison = compare(&filtered, &compared);
            info!(%other, pairs = comparison.len(), "Comparison built");
            write_comparison(console.out(), config.format, &comparison)?;
        }

        if !console.ask_yes_no(AGAIN_PROMPT)? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use std::io::Cursor;

    fn dataset() -> Dataset {
        vec![
            Row::new("202301", "BA", "Bolsa Família", 100.0),
            Row::new("202301", "SP", "Bolsa Família", 200.0),
            Row::new("202301", "BA", "Bolsa Família", 50.0),
            Row::new("202301", "BA", "Auxílio Gás", 10.0),
            Row::new("202301", "MG", "Merenda Escolar", 30.0),
        ]
        .into()
    }

    fn run(input: &str, config: &ExplorerConfig) -> (Result<()>, String) {
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let result = explore(&mut console, &dataset(), config);
        let out = String::from_utf8(console.into_output()).unwrap();
        (result, out)
    }

    #[test]
    fn test_select_category_errors() {
        let catalog = CategoryCatalog::from_dataset(&dataset());
        assert_eq!(select_category(&catalog, "2").unwrap(), "Auxílio Gás");
        assert!(select_category(&catalog, "x").is_err());
        assert!(select_category(&catalog, "4").is_err());
    }

    #[test]
    fn test_session_compares_two_regions() {
        let config = ExplorerConfig::default();
        let (result, out) = run("1\nba\nyes\nsp\nno\n", &config);

        result.unwrap();
        assert!(out.contains("Available options for 'NOME AÇÃO' (3 in total):"));
        assert!(out.contains("Showing 2 of 2 rows (total 150.00)"));
        assert!(out.contains("Comparison with SP:"));
        assert!(out.contains("2 pairs"));
    }

    #[test]
    fn test_session_reprompts_on_bad_answers() {
        let config = ExplorerConfig::default();
        let (result, out) = run("abc\n9\n1\n\nBA\nsure\nyes\nRJ\nno\n", &config);

        result.unwrap();
        assert!(out.contains("Invalid input 'abc'. Please enter a valid number."));
        assert!(out.contains("Option 9 does not exist, choose between 1 and 3"));
        assert!(out.contains("Invalid UF ''"));
        assert!(out.contains("Invalid input 'sure'. Please enter 'yes' or 'no'."));
        assert!(out.contains("No data available for RJ."));
    }

    #[test]
    fn test_session_pages_and_loops() {
        let config = ExplorerConfig {
            page_size: 1,
            ..Default::default()
        };
        let input = "yes\nno\n3\nmg\nno\nyes\n2\nSP\nno\nno\n";
        let (result, out) = run(input, &config);

        result.unwrap();
        assert!(out.contains("1. Bolsa Família"));
        assert!(out.contains("2. Auxílio Gás"));
        assert!(!out.contains("3. Merenda Escolar"));
        assert!(out.contains("Showing 1 of 1 rows (total 30.00)"));
        assert!(out.contains("No rows for 'Auxílio Gás' in SP."));
    }

    #[test]
    fn test_session_stops_asking_when_catalog_exhausted() {
        let config = ExplorerConfig::default();
        let (result, out) = run("1\nBA\nno\nno\n", &config);

        result.unwrap();
        assert!(!out.contains(MORE_OPTIONS_PROMPT));
    }

    #[test]
    fn test_session_fails_when_input_ends() {
        let config = ExplorerConfig::default();
        let (result, _) = run("1\n", &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_explore_empty_dataset() {
        let config = ExplorerConfig::default();
        let mut console = Console::new(Cursor::new(Vec::new()), Vec::new());
        explore(&mut console, &Dataset::default(), &config).unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert!(out.contains("No options available."));
    }

    #[test]
    fn test_ask_period_reprompts() {
        let mut console = Console::new(Cursor::new(b"2023\n202302\n".to_vec()), Vec::new());
        let period = ask_period(&mut console).unwrap();
        assert_eq!(period.to_string(), "202302");
    }
}
