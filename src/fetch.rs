use std::fs::File;

use camino::Utf8Path;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::GrabError;

/// Seam for fetching a remote archive to a local file. The production
/// implementation is HTTP; tests substitute canned archives.
pub trait ArchiveSource: Send + Sync {
    fn download(&self, url: &str, destination: &Utf8Path) -> Result<(), GrabError>;
}

#[derive(Clone)]
pub struct HttpArchiveSource {
    client: Client,
}

impl HttpArchiveSource {
    /// No request timeout: a grab blocks for as long as the transfer takes.
    pub fn new() -> Result<Self, GrabError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("coursegrab/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| GrabError::Http(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| GrabError::Http(err.to_string()))?;
        Ok(Self { client })
    }
}

impl ArchiveSource for HttpArchiveSource {
    fn download(&self, url: &str, destination: &Utf8Path) -> Result<(), GrabError> {
        tracing::debug!(url, %destination, "downloading archive");
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| GrabError::Http(err.to_string()))?;
        if !response.status().is_success() {
            return Err(GrabError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let mut file = File::create(destination.as_std_path())
            .map_err(|err| GrabError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| GrabError::Filesystem(err.to_string()))?;
        Ok(())
    }
}
