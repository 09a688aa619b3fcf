//! Operating system and architecture enumeration.
//!
//! Releases are published for a closed matrix of `{macos, linux}` ×
//! `{arm64, amd64}`. Targets in a manifest are keyed by [`Platform`], which
//! replaces per-platform conditional blocks with a single map lookup.

use super::error::{ArtefactError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Apple macOS (`darwin` in release asset names).
    #[serde(alias = "darwin")]
    Macos,
    /// Linux.
    Linux,
}

impl Os {
    /// Every supported operating system.
    pub const ALL: [Self; 2] = [Self::Macos, Self::Linux];

    /// Return the canonical manifest spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Linux => "linux",
        }
    }

    /// Return the spelling used in release asset file names.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_installer::artefact::platform::Os;
    ///
    /// assert_eq!(Os::Macos.release_name(), "darwin");
    /// ```
    #[must_use]
    pub const fn release_name(self) -> &'static str {
        match self {
            Self::Macos => "darwin",
            Self::Linux => "linux",
        }
    }
}

impl FromStr for Os {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "macos" | "darwin" => Ok(Self::Macos),
            "linux" => Ok(Self::Linux),
            _ => Err(ArtefactError::UnknownOs {
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit ARM.
    #[serde(alias = "aarch64")]
    Arm64,
    /// 64-bit x86.
    #[serde(alias = "x86_64")]
    Amd64,
}

impl Arch {
    /// Every supported architecture.
    pub const ALL: [Self; 2] = [Self::Arm64, Self::Amd64];

    /// Return the canonical manifest spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::Amd64 => "amd64",
        }
    }
}

impl FromStr for Arch {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "amd64" | "x86_64" => Ok(Self::Amd64),
            _ => Err(ArtefactError::UnknownArch {
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `(os, arch)` pair identifying one installable variant of a release.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::platform::{Arch, Os, Platform};
///
/// let platform: Platform = "linux/amd64".parse().expect("valid platform");
/// assert_eq!(platform, Platform::new(Os::Linux, Arch::Amd64));
/// assert_eq!(platform.to_string(), "linux/amd64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Platform {
    os: Os,
    arch: Arch,
}

impl Platform {
    /// Pair an operating system with an architecture.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Return the operating system.
    #[must_use]
    pub const fn os(self) -> Os {
        self.os
    }

    /// Return the architecture.
    #[must_use]
    pub const fn arch(self) -> Arch {
        self.arch
    }

    /// Detect the platform this binary was compiled for.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::UnsupportedHost`] on hosts outside the
    /// supported matrix (for example Windows or 32-bit ARM).
    pub fn host() -> Result<Self> {
        Self::from_host_names(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map standard-library host names (`std::env::consts`) to a platform.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::UnsupportedHost`] when either name falls
    /// outside the supported matrix.
    pub fn from_host_names(os: &str, arch: &str) -> Result<Self> {
        let unsupported = || ArtefactError::UnsupportedHost {
            os: os.to_owned(),
            arch: arch.to_owned(),
        };
        let host_os = match os {
            "macos" => Os::Macos,
            "linux" => Os::Linux,
            _ => return Err(unsupported()),
        };
        let host_arch = match arch {
            "aarch64" => Arch::Arm64,
            "x86_64" => Arch::Amd64,
            _ => return Err(unsupported()),
        };
        Ok(Self::new(host_os, host_arch))
    }

    /// Return every platform in the supported matrix.
    pub fn all() -> impl Iterator<Item = Self> {
        Os::ALL
            .into_iter()
            .flat_map(|os| Arch::ALL.into_iter().map(move |arch| Self::new(os, arch)))
    }

    /// Return the directory name used when installing several platforms side
    /// by side, e.g. `linux-amd64`.
    #[must_use]
    pub fn dir_name(self) -> String {
        format!("{}-{}", self.os, self.arch)
    }
}

impl FromStr for Platform {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        let Some((os, arch)) = value.split_once('/') else {
            return Err(ArtefactError::InvalidPlatform {
                value: value.to_owned(),
            });
        };
        Ok(Self::new(os.trim().parse()?, arch.trim().parse()?))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
