//! Manifest generation from locally built release archives.
//!
//! Each archive is hashed on its own scoped thread; the threads share no
//! mutable state and their digests are collected in request order before
//! the manifest is validated.

use super::artefact_url::ArtefactUrl;
use super::error::ArtefactError;
use super::manifest::{PlatformTarget, ReleaseIdentity, ReleaseManifest, ReleaseNotes};
use super::naming::render_url_template;
use super::platform::Platform;
use super::sha256_digest::Sha256Digest;
use log::debug;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;
use thiserror::Error;

/// Input parameters for [`generate_manifest`].
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Package name, version, and optional binary name.
    pub identity: ReleaseIdentity,
    /// Description, homepage, and caveats.
    pub notes: ReleaseNotes,
    /// Download URL template with `{package}`, `{version}`, `{os}`, and
    /// `{arch}` placeholders.
    pub url_template: String,
    /// One local archive per platform.
    pub archives: Vec<(Platform, PathBuf)>,
}

/// Errors arising from manifest generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// An archive could not be read for hashing.
    #[error("failed to hash {path}: {source}")]
    Digest {
        /// The archive that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A rendered URL or the assembled manifest failed validation.
    #[error(transparent)]
    Artefact(#[from] ArtefactError),

    /// A hashing thread panicked.
    #[error("digest worker for {platform} panicked")]
    WorkerPanicked {
        /// The platform whose archive was being hashed.
        platform: Platform,
    },
}

/// Compute the SHA-256 digest of a file.
///
/// Reads the file at `path` in chunks and returns the lowercase hex digest.
///
/// # Errors
///
/// Returns [`GenerateError::Digest`] if the file cannot be read.
pub fn compute_sha256(path: &Path) -> Result<Sha256Digest, GenerateError> {
    let digest_error = |source| GenerateError::Digest {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs::File::open(path).map_err(digest_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(digest_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(Sha256Digest::try_from(format!("{:x}", hasher.finalize()))?)
}

/// Build a validated manifest for the archives in `request`.
///
/// # Errors
///
/// Returns [`GenerateError::Artefact`] for duplicate platforms, an empty
/// archive list, an invalid version, or a template rendering to an invalid
/// URL; [`GenerateError::Digest`] when an archive cannot be read.
///
/// # Examples
///
/// ```no_run
/// use release_installer::artefact::generate::{GenerateRequest, generate_manifest};
/// use release_installer::artefact::manifest::{ReleaseIdentity, ReleaseNotes};
/// use release_installer::artefact::naming::PackageName;
///
/// let request = GenerateRequest {
///     identity: ReleaseIdentity {
///         package_name: PackageName::try_from("kubectl-ai").expect("valid name"),
///         version: "0.0.11".to_owned(),
///         binary_name: None,
///     },
///     notes: ReleaseNotes::default(),
///     url_template: "https://github.com/sozercan/kubectl-ai/releases/download/v{version}/kubectl-ai_{os}_{arch}.tar.gz".to_owned(),
///     archives: vec![("linux/amd64".parse().expect("platform"), "dist/linux.tar.gz".into())],
/// };
/// let manifest = generate_manifest(&request).expect("generated");
/// assert_eq!(manifest.version(), "0.0.11");
/// ```
pub fn generate_manifest(request: &GenerateRequest) -> Result<ReleaseManifest, GenerateError> {
    reject_duplicates(&request.archives)?;
    let urls = request
        .archives
        .iter()
        .map(|(platform, _)| render_target_url(request, *platform))
        .collect::<Result<Vec<_>, _>>()?;
    let digests = hash_archives(&request.archives)?;
    let targets = request
        .archives
        .iter()
        .zip(urls)
        .zip(digests)
        .map(|(((platform, _), url), checksum)| PlatformTarget::new(*platform, url, checksum))
        .collect();
    Ok(ReleaseManifest::new(
        request.identity.clone(),
        request.notes.clone(),
        targets,
    )?)
}

fn reject_duplicates(archives: &[(Platform, PathBuf)]) -> Result<(), ArtefactError> {
    let mut seen = BTreeSet::new();
    for (platform, _) in archives {
        if !seen.insert(*platform) {
            return Err(ArtefactError::DuplicateTarget {
                platform: *platform,
            });
        }
    }
    Ok(())
}

fn render_target_url(
    request: &GenerateRequest,
    platform: Platform,
) -> Result<ArtefactUrl, ArtefactError> {
    let rendered = render_url_template(
        &request.url_template,
        request.identity.package_name.as_str(),
        &request.identity.version,
        platform,
    );
    ArtefactUrl::try_from(rendered)
}

/// Hash every archive concurrently, returning digests in input order.
fn hash_archives(archives: &[(Platform, PathBuf)]) -> Result<Vec<Sha256Digest>, GenerateError> {
    thread::scope(|scope| {
        let handles: Vec<_> = archives
            .iter()
            .map(|(platform, path)| {
                let handle = scope.spawn(move || {
                    debug!("hashing {} for {platform}", path.display());
                    compute_sha256(path)
                });
                (*platform, handle)
            })
            .collect();
        handles
            .into_iter()
            .map(|(platform, handle)| {
                handle
                    .join()
                    .map_err(|_| GenerateError::WorkerPanicked { platform })?
            })
            .collect()
    })
}
