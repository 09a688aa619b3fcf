//! Placement of an extracted binary into the destination directory.
//!
//! The binary is written to a temporary file beside its final location and
//! renamed into place, so a failed install never leaves a truncated
//! executable behind.

use crate::artefact::artefact_url::ArchiveFormat;
use crate::artefact::extraction::{BinaryExtractor, ExtractedBinary, ExtractionError};
use crate::artefact::naming::BinaryName;
use crate::artefact::verification::VerifiedArtefact;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::Write;
use thiserror::Error;

/// Permission bits applied to installed binaries on Unix.
#[cfg(unix)]
pub const EXECUTABLE_MODE: u32 = 0o755;

/// The outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    /// Absolute or caller-relative path of the installed executable.
    pub installed_path: Utf8PathBuf,
    /// Whether the archive was verified before extraction. Always `true`
    /// for results produced by [`install`].
    pub verified: bool,
}

/// The destination directory or file could not be written.
#[derive(Debug, Error)]
#[error("cannot write {path}: {source}")]
pub struct PermissionError {
    /// The path that could not be created or written.
    pub path: Utf8PathBuf,
    /// Underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

/// Errors arising from the install step.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The binary could not be read out of the archive.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The binary could not be written into place.
    #[error(transparent)]
    Permission(#[from] PermissionError),
}

/// Extract `binary_name` from a verified archive and place it in `dest_dir`.
///
/// # Errors
///
/// Returns [`InstallError::Extraction`] if the archive is malformed or
/// lacks the binary, and [`InstallError::Permission`] if `dest_dir` cannot
/// be created or written.
pub fn install(
    extractor: &dyn BinaryExtractor,
    artefact: &VerifiedArtefact,
    format: ArchiveFormat,
    binary_name: &BinaryName,
    dest_dir: &Utf8Path,
) -> Result<InstallResult, InstallError> {
    let extracted = extractor.extract_binary(artefact, format, binary_name)?;
    debug!(
        "extracted {} ({} bytes) from {format} archive",
        extracted.entry_path.display(),
        extracted.contents.len()
    );
    let installed_path = place_binary(&extracted, dest_dir)?;
    Ok(InstallResult {
        installed_path,
        verified: true,
    })
}

/// Atomically write `binary` into `dest_dir` with executable permissions.
///
/// # Errors
///
/// Returns [`PermissionError`] naming the path that could not be written.
pub fn place_binary(
    binary: &ExtractedBinary,
    dest_dir: &Utf8Path,
) -> Result<Utf8PathBuf, PermissionError> {
    let permission_error = |path: &Utf8Path| {
        let path = path.to_owned();
        move |source| PermissionError { path, source }
    };

    std::fs::create_dir_all(dest_dir).map_err(permission_error(dest_dir))?;
    let final_path = dest_dir.join(binary.name.as_str());

    let mut staged = tempfile::Builder::new()
        .prefix(&format!(".{}.", binary.name))
        .tempfile_in(dest_dir)
        .map_err(permission_error(dest_dir))?;
    staged
        .write_all(&binary.contents)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(permission_error(&final_path))?;
    set_executable(staged.as_file()).map_err(permission_error(&final_path))?;
    staged
        .persist(&final_path)
        .map_err(|e| permission_error(&final_path)(e.error))?;
    Ok(final_path)
}

#[cfg(unix)]
fn set_executable(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn set_executable(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
