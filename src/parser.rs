//! Column projection of the portal's CSV members.
//!
//! Members are `;`-delimited and Latin-1 encoded. Only four columns are kept;
//! every other column is ignored.

use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::{debug, info, instrument, warn};

use crate::archive::CsvMember;
use crate::dataset::{Dataset, Row};
use crate::error::{EmptyDatasetError, ParseError};

pub const DELIMITER: u8 = b';';

pub const PERIOD_COLUMN: &str = "ANO / MÊS";
pub const REGION_COLUMN: &str = "UF";
pub const CATEGORY_COLUMN: &str = "NOME AÇÃO";
pub const AMOUNT_COLUMN: &str = "VALOR TRANSFERIDO";

/// Dataset built from an archive, with the members that had to be skipped.
#[derive(Debug)]
pub struct Projection {
    pub dataset: Dataset,
    pub parsed_members: usize,
    pub skipped: Vec<ParseError>,
}

/// Decodes Latin-1 bytes. Every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parses a transferred amount written either as `1.234,56` or `1234.56`.
///
/// Without a comma, several dots are thousands separators (`1.234.567`).
/// A single dot followed by exactly three digits (`1.234`) could be either
/// and is rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        match raw.matches('.').count() {
            0 => raw.to_string(),
            1 => {
                let (_, fraction) = raw.split_once('.')?;
                if fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                raw.to_string()
            }
            _ => raw.replace('.', ""),
        }
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

struct ColumnIndexes {
    period: usize,
    region: usize,
    category: usize,
    amount: usize,
}

impl ColumnIndexes {
    fn locate(member: &str, headers: &ByteRecord) -> Result<Self, ParseError> {
        let names: Vec<String> = headers.iter().map(decode_latin1).collect();
        let find = |column: &'static str| {
            names
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| ParseError::MissingColumn {
                    member: member.to_string(),
                    column,
                })
        };

        Ok(Self {
            period: find(PERIOD_COLUMN)?,
            region: find(REGION_COLUMN)?,
            category: find(CATEGORY_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
        })
    }

    fn project(&self, record: &ByteRecord) -> Option<Row> {
        let field = |i: usize| {
            record
                .get(i)
                .map(decode_latin1)
                .filter(|value| !value.is_empty())
        };

        Some(Row {
            period: field(self.period)?,
            region: field(self.region)?,
            category: field(self.category)?,
            amount: parse_amount(&field(self.amount)?)?,
        })
    }
}

/// Projects a single member into rows.
///
/// A missing required column or a malformed record fails the whole member.
/// Individual rows with an empty required field or an unreadable amount are
/// dropped with a warning.
#[instrument(level = "debug", skip(member), fields(member = %member.name))]
pub fn parse_member(member: &CsvMember) -> Result<Vec<Row>, ParseError> {
    let csv_err = |error| ParseError::Csv {
        member: member.name.clone(),
        error,
    };

    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .trim(Trim::All)
        .from_reader(member.data.as_slice());

    let headers = rdr.byte_headers().map_err(csv_err)?.clone();
    let columns = ColumnIndexes::locate(&member.name, &headers)?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for result in rdr.byte_records() {
        let record = result.map_err(csv_err)?;
        match columns.project(&record) {
            Some(row) => rows.push(row),
            None => {
                dropped += 1;
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                warn!(member = %member.name, line, "Dropping row with missing or invalid fields");
            }
        }
    }

    debug!(rows = rows.len(), dropped, "Member parsed");
    Ok(rows)
}

/// Projects every member and concatenates the results in member order.
///
/// Members that fail are logged and skipped. If none succeeds the archive
/// yields no dataset at all.
#[instrument(skip(members), fields(members = members.len()))]
pub fn project_members(members: &[CsvMember]) -> Result<Projection, EmptyDatasetError> {
    let mut rows = Vec::new();
    let mut parsed_members = 0usize;
    let mut skipped = Vec::new();

    for member in members {
        match parse_member(member) {
            Ok(member_rows) => {
                parsed_members += 1;
                rows.extend(member_rows);
            }
            Err(e) => {
                warn!(member = %member.name, error = %e, "Skipping member that failed to parse");
                skipped.push(e);
            }
        }
    }

    if parsed_members == 0 {
        return Err(EmptyDatasetError {
            members: members.len(),
            failed: skipped.len(),
        });
    }

    info!(rows = rows.len(), parsed_members, skipped = skipped.len(), "Dataset built");
    Ok(Projection {
        dataset: Dataset::from(rows),
        parsed_members,
        skipped,
    })
}
