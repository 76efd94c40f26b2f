//! Extraction of the CSV members from a downloaded zip.

use std::io::{Cursor, Read};

use tracing::{debug, instrument};
use zip::ZipArchive;

use crate::error::DownloadError;

/// Suffix identifying tabular members.
pub const CSV_SUFFIX: &str = ".csv";

/// One CSV file taken out of the archive, still in its raw encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvMember {
    pub name: String,
    pub data: Vec<u8>,
}

impl CsvMember {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Returns every `.csv` entry of the zip in `body`, in archive order.
#[instrument(level = "debug", skip(body), fields(bytes = body.len()))]
pub fn extract_csv_members(body: &[u8]) -> Result<Vec<CsvMember>, DownloadError> {
    let mut archive = ZipArchive::new(Cursor::new(body))?;
    let mut members = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if entry.is_dir() || !name.ends_with(CSV_SUFFIX) {
            debug!(entry = %name, "Skipping non-CSV entry");
            continue;
        }

        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        debug!(member = %name, bytes = data.len(), "CSV member extracted");
        members.push(CsvMember { name, data });
    }

    Ok(members)
}
