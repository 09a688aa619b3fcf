//! Directory resolution abstraction for platform-specific paths.
//!
//! The installer needs a default binary directory, a configuration
//! directory, and a data directory for shipped manifests. Wrapping the
//! lookups in a trait lets tests substitute fixed paths.

use std::path::PathBuf;

/// Application name used for per-user configuration and data directories.
pub const APP_NAME: &str = "release-installer";

/// Platform directory lookups used by the installer.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory for user executables, falling back to `~/.local/bin` on
    /// platforms without one.
    fn bin_dir(&self) -> Option<PathBuf>;

    /// Directory holding `config.toml`.
    fn config_dir(&self) -> Option<PathBuf>;

    /// Directory holding application data such as manifests.
    fn data_dir(&self) -> Option<PathBuf>;
}

/// Resolves directories through `directories-next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

fn project_dirs() -> Option<directories_next::ProjectDirs> {
    directories_next::ProjectDirs::from("", "", APP_NAME)
}

impl BaseDirs for SystemBaseDirs {
    fn bin_dir(&self) -> Option<PathBuf> {
        let dirs = directories_next::BaseDirs::new()?;
        Some(dirs.executable_dir().map_or_else(
            || dirs.home_dir().join(".local").join("bin"),
            PathBuf::from,
        ))
    }

    fn config_dir(&self) -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn data_dir(&self) -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }
}
