//! Distinct category labels and their paging.

use serde::Serialize;
use std::collections::HashSet;

use crate::dataset::Dataset;
use crate::error::SelectionError;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Distinct category labels in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCatalog {
    labels: Vec<String>,
}

/// One labelled entry of a page, numbered from 1 over the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry<'a> {
    pub index: usize,
    pub label: &'a str,
}

/// A window of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a> {
    pub entries: Vec<PageEntry<'a>>,
    pub next_offset: usize,
    pub total: usize,
}

impl Page<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CategoryCatalog {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut seen = HashSet::new();
        let labels = dataset
            .iter()
            .filter(|row| seen.insert(row.category.as_str()))
            .map(|row| row.category.clone())
            .collect();
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Maps a 1-based selection onto the unpaged ordering.
    pub fn resolve(&self, index: usize) -> Result<&str, SelectionError> {
        index
            .checked_sub(1)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
            .ok_or(SelectionError::OutOfRange {
                index,
                len: self.labels.len(),
            })
    }

    /// Returns up to `page_size` labels starting at `offset`.
    ///
    /// An offset past the end yields an empty page. `page_size` of zero is
    /// treated as one.
    pub fn page(&self, offset: usize, page_size: usize) -> Page<'_> {
        let start = offset.min(self.labels.len());
        let end = start.saturating_add(page_size.max(1)).min(self.labels.len());
        let entries = self.labels[start..end]
            .iter()
            .enumerate()
            .map(|(i, label)| PageEntry {
                index: start + i + 1,
                label,
            })
            .collect();

        Page {
            entries,
            next_offset: end,
            total: self.labels.len(),
        }
    }
}

/// Cursor over a catalog that hands out consecutive pages.
///
/// Interrupting the browser does not affect selection, which always resolves
/// against the catalog itself.
#[derive(Debug, Clone)]
pub struct CategoryBrowser<'a> {
    catalog: &'a CategoryCatalog,
    page_size: usize,
    offset: usize,
}

impl<'a> CategoryBrowser<'a> {
    pub fn new(catalog: &'a CategoryCatalog, page_size: usize) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
            offset: 0,
        }
    }

    pub fn next_page(&mut self) -> Page<'a> {
        let page = self.catalog.page(self.offset, self.page_size);
        self.offset = page.next_offset;
        page
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.catalog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;

    fn catalog_of(categories: &[&str]) -> CategoryCatalog {
        let dataset: Dataset = categories
            .iter()
            .map(|c| Row::new("202301", "BA", *c, 1.0))
            .collect();
        CategoryCatalog::from_dataset(&dataset)
    }

    #[test]
    fn test_catalog_keeps_first_appearance_order() {
        let catalog = catalog_of(&["B", "A", "B", "C", "A"]);
        assert_eq!(catalog.labels(), &["B", "A", "C"]);
    }

    #[test]
    fn test_resolve_bounds() {
        let catalog = catalog_of(&["B", "A"]);
        assert_eq!(catalog.resolve(1), Ok("B"));
        assert_eq!(catalog.resolve(2), Ok("A"));
        assert_eq!(
            catalog.resolve(0),
            Err(SelectionError::OutOfRange { index: 0, len: 2 })
        );
        assert_eq!(
            catalog.resolve(3),
            Err(SelectionError::OutOfRange { index: 3, len: 2 })
        );
    }

    #[test]
    fn test_page_numbers_are_global() {
        let catalog = catalog_of(&["a", "b", "c", "d", "e"]);
        let page = catalog.page(2, 2);
        let indexes: Vec<_> = page.entries.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![3, 4]);
        assert_eq!(page.entries[0].label, "c");
        assert_eq!(page.next_offset, 4);
        assert!(page.next_offset < page.total);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let catalog = catalog_of(&["a", "b"]);
        let page = catalog.page(10, 20);
        assert!(page.is_empty());
        assert_eq!(page.next_offset, page.total);
    }

    #[test]
    fn test_pages_concatenate_to_catalog_for_any_size() {
        let labels: Vec<String> = (0..23).map(|i| format!("action {i}")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let catalog = catalog_of(&refs);

        for page_size in 1..=25 {
            let mut browser = CategoryBrowser::new(&catalog, page_size);
            let mut seen = Vec::new();
            while !browser.is_exhausted() {
                let page = browser.next_page();
                seen.extend(page.entries.iter().map(|e| e.label.to_string()));
            }
            assert_eq!(seen, labels, "page size {page_size}");
            assert!(browser.next_page().is_empty());
        }
    }

    #[test]
    fn test_interrupted_browsing_keeps_global_selection() {
        let catalog = catalog_of(&["a", "b", "c"]);
        let mut browser = CategoryBrowser::new(&catalog, 2);
        browser.next_page();
        assert!(!browser.is_exhausted());
        assert_eq!(catalog.resolve(3), Ok("c"));
        assert_eq!(catalog.page(0, 2).entries[0].label, "a");
    }

    #[test]
    fn test_zero_page_size_still_advances() {
        let catalog = catalog_of(&["a", "b"]);
        assert_eq!(catalog.page(0, 0).entries.len(), 1);
    }
}
