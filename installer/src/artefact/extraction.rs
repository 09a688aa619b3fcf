//! Binary extraction from verified release archives.
//!
//! Reads a single named executable out of a `.tar.gz`, `.tar.zst`, or `.zip`
//! archive held in memory. Entries are matched by file name at any depth.
//! Every entry path is checked for traversal before it is considered, so a
//! malicious archive cannot smuggle `../` paths past the installer.

use super::artefact_url::ArchiveFormat;
use super::naming::BinaryName;
use super::verification::VerifiedArtefact;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};

/// Trait for extracting the named binary from a verified archive.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::extraction::ArchiveExtractor;
///
/// let extractor = ArchiveExtractor;
/// // Use extractor.extract_binary(&verified, format, &binary_name) in production.
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait BinaryExtractor {
    /// Return the contents of the entry named `binary_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MissingEntry`] when no entry matches,
    /// [`ExtractionError::AmbiguousEntry`] when several do,
    /// [`ExtractionError::PathTraversal`] for unsafe entry paths, and
    /// [`ExtractionError::Io`] or [`ExtractionError::Zip`] for malformed
    /// archives.
    fn extract_binary(
        &self,
        artefact: &VerifiedArtefact,
        format: ArchiveFormat,
        binary_name: &BinaryName,
    ) -> Result<ExtractedBinary, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The archive could not be decompressed or read.
    #[error("malformed archive: {0}")]
    Io(#[from] std::io::Error),

    /// The zip container could not be read.
    #[error("malformed zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// No regular file entry carries the binary's name.
    #[error("{format} archive has no entry named {binary}")]
    MissingEntry {
        /// The binary that was looked for.
        binary: String,
        /// The container that was searched.
        format: ArchiveFormat,
    },

    /// More than one regular file entry carries the binary's name.
    #[error("archive has more than one entry named {binary}: {first} and {second}")]
    AmbiguousEntry {
        /// The binary that was looked for.
        binary: String,
        /// Path of the first match.
        first: String,
        /// Path of the second match.
        second: String,
    },
}

/// An executable read out of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBinary {
    /// File name to install under.
    pub name: BinaryName,
    /// Path of the entry inside the archive.
    pub entry_path: PathBuf,
    /// File contents.
    pub contents: Vec<u8>,
}

/// Default extractor using the `tar`, `flate2`, `zstd`, and `zip` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl BinaryExtractor for ArchiveExtractor {
    fn extract_binary(
        &self,
        artefact: &VerifiedArtefact,
        format: ArchiveFormat,
        binary_name: &BinaryName,
    ) -> Result<ExtractedBinary, ExtractionError> {
        let reader = Cursor::new(artefact.bytes());
        let found = match format {
            ArchiveFormat::TarGz => find_in_tar(flate2::read::GzDecoder::new(reader), binary_name)?,
            ArchiveFormat::TarZst => find_in_tar(zstd::Decoder::new(reader)?, binary_name)?,
            ArchiveFormat::Zip => find_in_zip(reader, binary_name)?,
        };
        let Some((entry_path, contents)) = found else {
            return Err(ExtractionError::MissingEntry {
                binary: binary_name.to_string(),
                format,
            });
        };
        Ok(ExtractedBinary {
            name: binary_name.clone(),
            entry_path,
            contents,
        })
    }
}

type Match = Option<(PathBuf, Vec<u8>)>;

/// Scan a tar stream for a regular file named `binary_name`.
fn find_in_tar<R: Read>(reader: R, binary_name: &BinaryName) -> Result<Match, ExtractionError> {
    let mut archive = tar::Archive::new(reader);
    let mut found: Match = None;
    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();
        validate_entry_path(&entry_path)?;
        if !entry.header().entry_type().is_file() || !names_binary(&entry_path, binary_name) {
            continue;
        }
        reject_second_match(found.as_ref(), &entry_path, binary_name)?;
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        found = Some((entry_path, contents));
    }
    Ok(found)
}

/// Scan a zip archive for a regular file named `binary_name`.
fn find_in_zip<R: Read + std::io::Seek>(
    reader: R,
    binary_name: &BinaryName,
) -> Result<Match, ExtractionError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut found: Match = None;
    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let entry_path = PathBuf::from(file.name());
        validate_entry_path(&entry_path)?;
        if !file.is_file() || !names_binary(&entry_path, binary_name) {
            continue;
        }
        reject_second_match(found.as_ref(), &entry_path, binary_name)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        found = Some((entry_path, contents));
    }
    Ok(found)
}

fn names_binary(path: &Path, binary_name: &BinaryName) -> bool {
    path.file_name()
        .is_some_and(|name| name == binary_name.as_str())
}

fn reject_second_match(
    found: Option<&(PathBuf, Vec<u8>)>,
    entry_path: &Path,
    binary_name: &BinaryName,
) -> Result<(), ExtractionError> {
    match found {
        Some((first, _)) => Err(ExtractionError::AmbiguousEntry {
            binary: binary_name.to_string(),
            first: first.display().to_string(),
            second: entry_path.display().to_string(),
        }),
        None => Ok(()),
    }
}

/// Validate that an archive entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.is_absolute()
        || path.has_root()
        || path
            .components()
            .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)));
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}
