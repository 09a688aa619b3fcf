//! Installer configuration file.
//!
//! An optional `config.toml` in the platform configuration directory (or
//! the file named by `RELEASE_INSTALLER_CONFIG`) supplies defaults for the
//! destination directory, the manifest directory, and network limits.
//! Command-line flags override the file, which overrides built-in defaults.

use crate::artefact::download::{DEFAULT_MAX_BYTES, DEFAULT_TIMEOUT, FetchSettings};
use crate::dirs::BaseDirs;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "RELEASE_INSTALLER_CONFIG";

/// File name looked up inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors arising from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: Utf8PathBuf,
        /// TOML diagnostic.
        #[source]
        source: toml::de::Error,
    },

    /// A platform directory could not be represented as UTF-8.
    #[error("directory is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the rejected path.
        path: String,
    },

    /// No destination directory was configured and none could be derived.
    #[error("could not determine a binary directory; pass --bin-dir")]
    NoBinDir,

    /// No manifest directory was configured and none could be derived.
    #[error("could not determine a manifest directory; pass --manifest or --manifest-dir")]
    NoManifestDir,

    /// A numeric limit is zero.
    #[error("{key} must be greater than zero")]
    ZeroLimit {
        /// The offending key.
        key: &'static str,
    },
}

/// Values read from `config.toml`. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// Directory binaries are installed into.
    pub bin_dir: Option<Utf8PathBuf>,
    /// Directory holding `<package>.json` manifests.
    pub manifest_dir: Option<Utf8PathBuf>,
    /// Network timeout for one download, in seconds.
    pub timeout_secs: Option<u64>,
    /// Maximum accepted archive size, in bytes.
    pub max_download_bytes: Option<u64>,
}

impl InstallerConfig {
    /// Parse configuration from TOML text. `path` is used in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use release_installer::config::InstallerConfig;
    ///
    /// let config = InstallerConfig::parse("timeout_secs = 10\n", Utf8Path::new("config.toml"))
    ///     .expect("valid config");
    /// assert_eq!(config.timeout_secs, Some(10));
    /// ```
    pub fn parse(source: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Read configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        debug!("loaded configuration from {path}");
        Self::parse(&source, path)
    }

    /// Load the configuration named by `RELEASE_INSTALLER_CONFIG`, or
    /// `config.toml` in the platform configuration directory when present.
    ///
    /// An explicitly named file must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen file cannot be read or parsed.
    pub fn load(dirs: &dyn BaseDirs) -> Result<Self, ConfigError> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = utf8(explicit.into())?;
            return Self::load_from(&path);
        }
        let Some(config_dir) = dirs.config_dir() else {
            return Ok(Self::default());
        };
        let path = utf8(config_dir)?.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            debug!("no configuration file at {path}");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigOverrides {
    /// `--bin-dir`.
    pub bin_dir: Option<Utf8PathBuf>,
    /// `--manifest-dir`.
    pub manifest_dir: Option<Utf8PathBuf>,
    /// `--timeout`.
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings for one install.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Destination for installed binaries, if one could be determined.
    pub bin_dir: Option<Utf8PathBuf>,
    /// Directory searched for `<package>.json`, if one could be determined.
    pub manifest_dir: Option<Utf8PathBuf>,
    /// Network limits.
    pub fetch: FetchSettings,
}

impl Settings {
    /// Merge CLI overrides, file values, and platform defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] for a zero timeout or size cap,
    /// and [`ConfigError::NonUtf8Path`] for non-UTF-8 platform directories.
    pub fn resolve(
        overrides: ConfigOverrides,
        file: InstallerConfig,
        dirs: &dyn BaseDirs,
    ) -> Result<Self, ConfigError> {
        let bin_dir = match overrides.bin_dir.or(file.bin_dir) {
            Some(dir) => Some(dir),
            None => dirs.bin_dir().map(utf8).transpose()?,
        };
        let manifest_dir = match overrides.manifest_dir.or(file.manifest_dir) {
            Some(dir) => Some(dir),
            None => dirs
                .data_dir()
                .map(utf8)
                .transpose()?
                .map(|dir| dir.join("manifests")),
        };
        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT.as_secs());
        let max_bytes = file.max_download_bytes.unwrap_or(DEFAULT_MAX_BYTES);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroLimit { key: "timeout_secs" });
        }
        if max_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                key: "max_download_bytes",
            });
        }
        Ok(Self {
            bin_dir,
            manifest_dir,
            fetch: FetchSettings {
                timeout: Duration::from_secs(timeout_secs),
                max_bytes,
            },
        })
    }

    /// Return the destination directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoBinDir`] when none was configured or derived.
    pub fn bin_dir(&self) -> Result<&Utf8Path, ConfigError> {
        self.bin_dir.as_deref().ok_or(ConfigError::NoBinDir)
    }

    /// Return the manifest directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoManifestDir`] when none was configured or
    /// derived.
    pub fn manifest_dir(&self) -> Result<&Utf8Path, ConfigError> {
        self.manifest_dir
            .as_deref()
            .ok_or(ConfigError::NoManifestDir)
    }
}

fn utf8(path: std::path::PathBuf) -> Result<Utf8PathBuf, ConfigError> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| ConfigError::NonUtf8Path {
        path: p.display().to_string(),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
