//! Year-month period keys (`AAAAMM`).

use chrono::NaiveDate;
use std::fmt;

use crate::error::InputFormatError;

/// Six-digit year-month selecting one month's archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodKey(NaiveDate);

impl PeriodKey {
    /// Accepts exactly six digits forming a real year and month.
    pub fn parse(input: &str) -> Result<Self, InputFormatError> {
        let raw = input.trim();
        let invalid = || InputFormatError::InvalidPeriod(raw.to_string());

        if raw.len() != 6 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = raw[..4].parse().map_err(|_| invalid())?;
        let month: u32 = raw[4..].parse().map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m"))
    }
}
