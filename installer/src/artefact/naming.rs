//! Package, binary, and version naming rules.
//!
//! Package names double as manifest file names and binary names become a
//! file inside the destination directory, so both are restricted to a
//! path-safe alphabet. Release asset URLs are rendered from a template using
//! the GoReleaser placeholder convention.

use super::error::{ArtefactError, Result};
use super::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters permitted in package and binary names besides ASCII
/// alphanumerics.
const NAME_PUNCTUATION: &[char] = &['.', '_', '-'];

/// A validated package name such as `kubectl-ai`.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::naming::PackageName;
///
/// let name = PackageName::try_from("kubectl-ai").expect("valid name");
/// assert_eq!(name.manifest_file_name(), "kubectl-ai.json");
/// assert!(PackageName::try_from("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the file name of this package's manifest in a manifest
    /// directory.
    #[must_use]
    pub fn manifest_file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl TryFrom<&str> for PackageName {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        check_path_safe(value).map_err(|reason| ArtefactError::InvalidPackageName {
            value: value.to_owned(),
            reason,
        })?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for PackageName {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated name of the executable extracted from a release archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BinaryName(String);

impl BinaryName {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for BinaryName {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        check_path_safe(value).map_err(|reason| ArtefactError::InvalidBinaryName {
            value: value.to_owned(),
            reason,
        })?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for BinaryName {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<&PackageName> for BinaryName {
    fn from(package: &PackageName) -> Self {
        Self(package.0.clone())
    }
}

impl From<BinaryName> for String {
    fn from(name: BinaryName) -> Self {
        name.0
    }
}

impl fmt::Display for BinaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check that a release version is non-empty and free of whitespace.
///
/// # Errors
///
/// Returns [`ArtefactError::InvalidVersion`] otherwise.
pub fn validate_version(value: &str) -> Result<()> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ArtefactError::InvalidVersion {
            value: value.to_owned(),
        });
    }
    Ok(())
}

/// Render a release asset URL template for one platform.
///
/// Supported placeholders are `{package}`, `{version}`, `{os}` (release
/// spelling, so macOS renders as `darwin`), and `{arch}`.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::naming::render_url_template;
/// use release_installer::artefact::platform::{Arch, Os, Platform};
///
/// let url = render_url_template(
///     "https://github.com/sozercan/{package}/releases/download/v{version}/{package}_{os}_{arch}.tar.gz",
///     "kubectl-ai",
///     "0.0.11",
///     Platform::new(Os::Macos, Arch::Arm64),
/// );
/// assert!(url.ends_with("/v0.0.11/kubectl-ai_darwin_arm64.tar.gz"));
/// ```
#[must_use]
pub fn render_url_template(
    template: &str,
    package: &str,
    version: &str,
    platform: Platform,
) -> String {
    template
        .replace("{package}", package)
        .replace("{version}", version)
        .replace("{os}", platform.os().release_name())
        .replace("{arch}", platform.arch().as_str())
}

/// Shared validation for names that end up as single path components.
fn check_path_safe(value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".to_owned());
    }
    if value == "." || value == ".." {
        return Err("must not be a relative path component".to_owned());
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !NAME_PUNCTUATION.contains(c))
    {
        return Err(format!("character '{bad}' is not allowed"));
    }
    Ok(())
}
