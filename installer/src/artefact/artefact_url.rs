//! HTTPS download URLs and the archive container they name.
//!
//! A release asset URL is parsed once when the manifest loads. Anything that
//! is not an absolute `https` URL ending in a known archive suffix is
//! rejected before a single byte is fetched.

use super::error::{ArtefactError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Archive containers the installer can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar (`.tar.gz`, `.tgz`).
    TarGz,
    /// Zstandard-compressed tar (`.tar.zst`).
    TarZst,
    /// Zip archive (`.zip`).
    Zip,
}

impl ArchiveFormat {
    /// Infer the container from an asset file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_installer::artefact::artefact_url::ArchiveFormat;
    ///
    /// assert_eq!(
    ///     ArchiveFormat::from_file_name("kubectl-ai_linux_amd64.tar.gz"),
    ///     Some(ArchiveFormat::TarGz)
    /// );
    /// assert_eq!(ArchiveFormat::from_file_name("kubectl-ai"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".tar.zst") {
            Some(Self::TarZst)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TarGz => "tar.gz",
            Self::TarZst => "tar.zst",
            Self::Zip => "zip",
        })
    }
}

/// A validated HTTPS release asset URL.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::artefact_url::{ArchiveFormat, ArtefactUrl};
///
/// let url = ArtefactUrl::try_from(
///     "https://github.com/sozercan/kubectl-ai/releases/download/v0.0.11/kubectl-ai_darwin_arm64.tar.gz",
/// )
/// .expect("valid release URL");
/// assert_eq!(url.archive_format(), ArchiveFormat::TarGz);
/// assert_eq!(url.file_name(), "kubectl-ai_darwin_arm64.tar.gz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtefactUrl {
    raw: String,
    file_name: String,
    format: ArchiveFormat,
}

impl ArtefactUrl {
    /// Return the URL as written in the manifest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Return the last path segment of the URL.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Return the archive container named by the URL.
    #[must_use]
    pub const fn archive_format(&self) -> ArchiveFormat {
        self.format
    }
}

impl TryFrom<&str> for ArtefactUrl {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        let parsed = Url::parse(value).map_err(|e| ArtefactError::InvalidUrl {
            value: value.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "https" {
            return Err(ArtefactError::InsecureUrl {
                value: value.to_owned(),
            });
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ArtefactError::InvalidUrl {
                value: value.to_owned(),
                reason: "missing host".to_owned(),
            });
        }
        let file_name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_owned();
        let format = ArchiveFormat::from_file_name(&file_name).ok_or_else(|| {
            ArtefactError::UnsupportedArchiveFormat {
                value: value.to_owned(),
            }
        })?;
        Ok(Self {
            raw: value.to_owned(),
            file_name,
            format,
        })
    }
}

impl TryFrom<String> for ArtefactUrl {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<ArtefactUrl> for String {
    fn from(url: ArtefactUrl) -> Self {
        url.raw
    }
}

impl fmt::Display for ArtefactUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const RELEASE_BASE: &str = "https://github.com/sozercan/kubectl-ai/releases/download/v0.0.12";

    #[rstest]
    #[case::tar_gz("kubectl-ai_linux_amd64.tar.gz", ArchiveFormat::TarGz)]
    #[case::tgz("tool.tgz", ArchiveFormat::TarGz)]
    #[case::tar_zst("tool.tar.zst", ArchiveFormat::TarZst)]
    #[case::zip("tool_windows_amd64.zip", ArchiveFormat::Zip)]
    fn infers_archive_format(#[case] file: &str, #[case] expected: ArchiveFormat) {
        let url = ArtefactUrl::try_from(format!("{RELEASE_BASE}/{file}")).expect("valid URL");
        assert_eq!(url.archive_format(), expected);
        assert_eq!(url.file_name(), file);
    }

    #[test]
    fn rejects_plain_http() {
        let err = ArtefactUrl::try_from("http://example.com/tool.tar.gz")
            .expect_err("http must be rejected");
        assert!(matches!(err, ArtefactError::InsecureUrl { .. }));
    }

    #[rstest]
    #[case::relative("releases/tool.tar.gz")]
    #[case::spaces("https://exa mple.com/tool.tar.gz")]
    #[case::empty("")]
    fn rejects_malformed_urls(#[case] value: &str) {
        let err = ArtefactUrl::try_from(value).expect_err("malformed URL");
        assert!(
            matches!(err, ArtefactError::InvalidUrl { .. }),
            "unexpected error for {value:?}: {err:?}"
        );
    }

    #[test]
    fn rejects_unknown_suffix() {
        let err = ArtefactUrl::try_from(format!("{RELEASE_BASE}/kubectl-ai"))
            .expect_err("bare binary is not an archive");
        assert!(matches!(err, ArtefactError::UnsupportedArchiveFormat { .. }));
    }

    #[test]
    fn query_string_does_not_affect_file_name() {
        let url = ArtefactUrl::try_from(format!("{RELEASE_BASE}/tool.tar.gz?raw=1"))
            .expect("valid URL");
        assert_eq!(url.file_name(), "tool.tar.gz");
    }

    #[test]
    fn serde_round_trips_raw_string() {
        let raw = format!("{RELEASE_BASE}/tool.zip");
        let url = ArtefactUrl::try_from(raw.as_str()).expect("valid URL");
        let json = serde_json::to_string(&url).expect("serialise");
        assert_eq!(json, format!("\"{raw}\""));
    }
}
