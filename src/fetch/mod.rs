//! Download of the monthly transfers archive.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use bytes::Bytes;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::DownloadError;

/// Builds `<base>/<period>`, tolerating a trailing slash on `base`.
pub fn archive_url(base: &str, period: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), period)
}

/// Issues a single GET for `url` and returns the body.
///
/// Only `200 OK` counts as success. There is no retry: any other status is
/// returned as [`DownloadError::Status`].
#[tracing::instrument(skip(client))]
pub async fn fetch_archive<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Bytes, DownloadError> {
    let url = reqwest::Url::parse(url).map_err(|e| DownloadError::Url(e.to_string()))?;
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    debug!(%status, "Archive response received");
    if status != StatusCode::OK {
        return Err(DownloadError::Status(status));
    }

    let body = resp.bytes().await?;
    info!(bytes = body.len(), "Archive downloaded");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubClient {
        status: u16,
        body: Vec<u8>,
    }

    #[async_trait]
    impl HttpClient for StubClient {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            let resp = http::Response::builder()
                .status(self.status)
                .body(self.body.clone())
                .unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }

    #[test]
    fn test_archive_url_joins_period() {
        assert_eq!(
            archive_url("https://example.org/transferencias", "202301"),
            "https://example.org/transferencias/202301"
        );
        assert_eq!(
            archive_url("https://example.org/transferencias/", "202301"),
            "https://example.org/transferencias/202301"
        );
    }

    #[tokio::test]
    async fn test_fetch_archive_returns_body_on_ok() {
        let client = StubClient {
            status: 200,
            body: b"PK".to_vec(),
        };
        let body = fetch_archive(&client, "https://example.org/202301")
            .await
            .unwrap();
        assert_eq!(&body[..], b"PK");
    }

    #[tokio::test]
    async fn test_fetch_archive_fails_on_non_ok_status() {
        let client = StubClient {
            status: 404,
            body: Vec::new(),
        };
        let err = fetch_archive(&client, "https://example.org/209913")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Status(s) if s == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_fetch_archive_treats_other_success_codes_as_failure() {
        let client = StubClient {
            status: 204,
            body: Vec::new(),
        };
        let err = fetch_archive(&client, "https://example.org/202301")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Status(s) if s == StatusCode::NO_CONTENT));
    }

    #[tokio::test]
    async fn test_fetch_archive_rejects_bad_url() {
        let client = StubClient {
            status: 200,
            body: Vec::new(),
        };
        let err = fetch_archive(&client, "not a url").await.unwrap_err();
        assert!(matches!(err, DownloadError::Url(_)));
    }
}
