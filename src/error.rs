//! Error types for the explorer.
//!
//! Fatal errors ([`DownloadError`], [`EmptyDatasetError`]) abort the run and
//! are reported once at the top level. [`ParseError`] is recovered per archive
//! member. [`SelectionError`] and [`InputFormatError`] only make the session
//! repeat the question that produced them.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain the archive or to open it as a zip.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to download the file: {0}")]
    Status(StatusCode),

    #[error("Request failed")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Unreadable archive")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error while reading archive")]
    Io(#[from] std::io::Error),
}

/// Failure to project one CSV member. The member is skipped.
///
/// The message is the reason only; [`ParseError::member`] names the file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("missing column '{column}'")]
    MissingColumn { member: String, column: &'static str },

    #[error("{error}")]
    Csv { member: String, error: csv::Error },
}

impl ParseError {
    /// Name of the archive member that failed.
    pub fn member(&self) -> &str {
        match self {
            Self::MissingColumn { member, .. } | Self::Csv { member, .. } => member,
        }
    }
}

/// No member of the archive could be projected.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("No CSV member could be parsed ({failed} of {members} failed)")]
pub struct EmptyDatasetError {
    pub members: usize,
    pub failed: usize,
}

/// A well-formed answer that does not select anything.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Option {index} does not exist, choose between 1 and {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Invalid UF '{0}'")]
    InvalidRegion(String),
}

/// An answer that could not be read as the expected kind of value.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputFormatError {
    #[error("Invalid input '{0}'. Please enter a valid number.")]
    NotANumber(String),

    #[error("Invalid input '{0}'. Please enter 'yes' or 'no'.")]
    NotYesNo(String),

    #[error("Invalid period '{0}'. Expected format AAAAMM.")]
    InvalidPeriod(String),
}
