//! Artefact download over HTTPS.
//!
//! Provides a trait-based abstraction for fetching release archives so that
//! the install pipeline can be exercised without network access. The
//! production implementation issues one `GET` per archive through a `ureq`
//! agent with a global timeout and a response size cap.

use super::manifest::PlatformTarget;
use log::debug;
use std::time::Duration;

/// Default network timeout for a single archive download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on the size of a downloaded archive (512 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 512 * 1024 * 1024;

/// Trait for fetching the archive a target points at.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::download::{FetchSettings, HttpFetcher};
///
/// let fetcher = HttpFetcher::new(&FetchSettings::default());
/// // Use fetcher.fetch(target) in production.
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactFetcher {
    /// Download the archive at `target.url()` and return its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] on connection failure, timeout, a
    /// non-success status, or an oversized body.
    fn fetch(&self, target: &PlatformTarget) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from artefact downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The request failed before a response was received.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested artefact was not found (HTTP 404).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The server answered with a non-success status other than 404.
    #[error("download failed for {url}: HTTP status {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The returned status code.
        status: u16,
    },

    /// The request did not complete within the configured timeout.
    #[error("download timed out after {seconds}s: {url}")]
    Timeout {
        /// The URL that was requested.
        url: String,
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// The response body exceeded the configured size cap.
    #[error("download of {url} exceeded the {limit}-byte limit")]
    TooLarge {
        /// The URL that was requested.
        url: String,
        /// The cap that was exceeded.
        limit: u64,
    },
}

/// Network limits applied to every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// Global timeout for one request, including the body.
    pub timeout: Duration,
    /// Maximum accepted body size in bytes.
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// HTTP-based fetcher using `ureq`.
pub struct HttpFetcher {
    agent: ureq::Agent,
    settings: FetchSettings,
}

impl HttpFetcher {
    /// Build a fetcher whose agent enforces `settings.timeout`.
    #[must_use]
    pub fn new(settings: &FetchSettings) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .https_only(true)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            settings: *settings,
        }
    }
}

impl ArtefactFetcher for HttpFetcher {
    fn fetch(&self, target: &PlatformTarget) -> Result<Vec<u8>, DownloadError> {
        let url = target.url().as_str();
        debug!("GET {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &self.settings, &e))?;
        let bytes = response
            .into_body()
            .with_config()
            .limit(self.settings.max_bytes)
            .read_to_vec()
            .map_err(|e| map_ureq_error(url, &self.settings, &e))?;
        debug!("received {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, settings: &FetchSettings, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::StatusCode(status) => DownloadError::Status {
            url: url.to_owned(),
            status: *status,
        },
        ureq::Error::Timeout(_) => DownloadError::Timeout {
            url: url.to_owned(),
            seconds: settings.timeout.as_secs(),
        },
        ureq::Error::BodyExceedsLimit(_) => DownloadError::TooLarge {
            url: url.to_owned(),
            limit: settings.max_bytes,
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
