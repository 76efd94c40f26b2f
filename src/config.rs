//! Runtime settings for one exploration session.

use anyhow::{Result, ensure};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::compare::DEFAULT_DISPLAY_LIMIT;
use crate::output::OutputFormat;

pub const DEFAULT_BASE_URL: &str =
    "https://portaldatransparencia.gov.br/download-de-dados/transferencias";

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// File name used when `LOG_FILE_PATH` names only a directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "transparencia_explorer.log";

/// Destination of the JSON log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileTarget {
    pub dir: PathBuf,
    pub prefix: String,
}

impl LogFileTarget {
    /// Reads the value of `LOG_FILE_PATH`. Unset or blank disables file logging.
    pub fn from_env_value(value: Option<&str>) -> Option<Self> {
        let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
        let path = Path::new(raw);

        let (dir, prefix) = if raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR) {
            (path, DEFAULT_LOG_FILE_NAME.to_string())
        } else {
            let prefix = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());
            (path.parent().unwrap_or(Path::new("")), prefix)
        };

        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir.to_path_buf()
        };
        Some(Self { dir, prefix })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub page_size: usize,
    pub display_limit: usize,
    pub timeout: Duration,
    pub format: OutputFormat,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            format: OutputFormat::Table,
        }
    }
}

impl ExplorerConfig {
    /// Rejects settings the session cannot work with.
    pub fn validate(self) -> Result<Self> {
        ensure!(
            self.base_url.starts_with("http://") || self.base_url.starts_with("https://"),
            "base URL must be http(s), got '{}'",
            self.base_url
        );
        ensure!(self.page_size >= 1, "page size must be at least 1");
        ensure!(self.display_limit >= 1, "display limit must be at least 1");
        ensure!(!self.timeout.is_zero(), "timeout must be positive");
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExplorerConfig::default().validate().unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.display_limit, 50);
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = ExplorerConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_base() {
        let config = ExplorerConfig {
            base_url: "ftp://example.org".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ftp://example.org"));
    }

    #[test]
    fn test_file_logging_disabled_by_default() {
        assert_eq!(LogFileTarget::from_env_value(None), None);
        assert_eq!(LogFileTarget::from_env_value(Some("  ")), None);
    }

    #[test]
    fn test_log_file_target_splits_path() {
        let target = LogFileTarget::from_env_value(Some("logs/explorer.log")).unwrap();
        assert_eq!(target.dir, PathBuf::from("logs"));
        assert_eq!(target.prefix, "explorer.log");

        let bare = LogFileTarget::from_env_value(Some("explorer.log")).unwrap();
        assert_eq!(bare.dir, PathBuf::from("."));

        let dir_only = LogFileTarget::from_env_value(Some("logs/")).unwrap();
        assert_eq!(dir_only.dir, PathBuf::from("logs/"));
        assert_eq!(dir_only.prefix, DEFAULT_LOG_FILE_NAME);
    }
}
