//! Install pipeline orchestration.
//!
//! Runs resolve, fetch, verify, and install in that order for one platform,
//! attaching stage context to any failure. Verification yields the only
//! value the install step accepts, so extraction cannot run on bytes that
//! failed or skipped the digest check.

use crate::artefact::download::ArtefactFetcher;
use crate::artefact::extraction::BinaryExtractor;
use crate::artefact::manifest::ReleaseManifest;
use crate::artefact::platform::Platform;
use crate::artefact::verification::verify;
use crate::error::{InstallerError, ReleaseContext, Result};
use crate::install::{InstallResult, install};
use crate::output::write_stderr_line;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::io::Write;
use std::thread;

/// One install of one manifest for one platform.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// The release to install.
    pub manifest: &'a ReleaseManifest,
    /// The platform whose archive is installed.
    pub platform: Platform,
    /// Directory the binary is written into.
    pub dest_dir: &'a Utf8Path,
    /// Suppress progress output.
    pub quiet: bool,
}

/// Resolve, fetch, verify, and install one binary.
///
/// Progress lines go to `stderr` unless `request.quiet` is set.
///
/// # Errors
///
/// Returns [`InstallerError::UnsupportedPlatform`] when the manifest has no
/// target for the platform, [`InstallerError::Network`] when the download
/// fails, [`InstallerError::Integrity`] when the digest does not match, and
/// [`InstallerError::Extraction`] or [`InstallerError::Permission`] when
/// the binary cannot be installed. Nothing is written on any failure
/// before the install step.
pub fn run_install(
    request: &InstallRequest<'_>,
    fetcher: &dyn ArtefactFetcher,
    extractor: &dyn BinaryExtractor,
    stderr: &mut dyn Write,
) -> Result<InstallResult> {
    let manifest = request.manifest;
    let context = ReleaseContext::new(manifest, request.platform);

    debug!("resolve: {context}");
    let target = manifest.resolve(request.platform)?;

    if !request.quiet {
        write_stderr_line(stderr, format!("Downloading {}...", target.url()));
    }
    debug!("fetch: {}", target.url());
    let bytes = fetcher
        .fetch(target)
        .map_err(|source| InstallerError::Network {
            context: context.clone(),
            source,
        })?;

    debug!("verify: {} bytes against {}", bytes.len(), target.checksum());
    let verified =
        verify(bytes, target.checksum()).map_err(|source| InstallerError::Integrity {
            context: context.clone(),
            source,
        })?;
    if !request.quiet {
        write_stderr_line(stderr, format!("Verified sha256 {}", verified.digest()));
    }

    debug!("install: {} into {}", manifest.binary_name(), request.dest_dir);
    let result = install(
        extractor,
        &verified,
        target.archive_format(),
        &manifest.binary_name(),
        request.dest_dir,
    )
    .map_err(|error| InstallerError::from_install(context.clone(), error))?;
    info!("installed {context} to {}", result.installed_path);
    Ok(result)
}

/// Install `manifest` for several platforms concurrently.
///
/// Each platform gets its own pipeline on a scoped thread, writing into
/// `<dest_root>/<os>-<arch>/`. Results are returned in `platforms` order and
/// one failure does not stop the others.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use release_installer::artefact::download::{FetchSettings, HttpFetcher};
/// use release_installer::artefact::extraction::ArchiveExtractor;
/// use release_installer::artefact::manifest_parser::load_manifest;
/// use release_installer::pipeline::install_all;
///
/// let manifest = load_manifest(Utf8Path::new("manifests/kubectl-ai.json")).expect("manifest");
/// let platforms: Vec<_> = manifest.platforms().collect();
/// let fetcher = HttpFetcher::new(&FetchSettings::default());
/// for (platform, result) in install_all(
///     &manifest,
///     &platforms,
///     Utf8Path::new("dist"),
///     &fetcher,
///     &ArchiveExtractor,
/// ) {
///     println!("{platform}: {}", result.is_ok());
/// }
/// ```
pub fn install_all(
    manifest: &ReleaseManifest,
    platforms: &[Platform],
    dest_root: &Utf8Path,
    fetcher: &(dyn ArtefactFetcher + Sync),
    extractor: &(dyn BinaryExtractor + Sync),
) -> Vec<(Platform, Result<InstallResult>)> {
    thread::scope(|scope| {
        let handles: Vec<_> = platforms
            .iter()
            .map(|&platform| {
                let dest_dir = platform_dir(dest_root, platform);
                let handle = scope.spawn(move || {
                    let request = InstallRequest {
                        manifest,
                        platform,
                        dest_dir: &dest_dir,
                        quiet: true,
                    };
                    run_install(&request, fetcher, extractor, &mut std::io::sink())
                });
                (platform, handle)
            })
            .collect();
        handles
            .into_iter()
            .map(|(platform, handle)| match handle.join() {
                Ok(result) => (platform, result),
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    })
}

/// Return the per-platform destination under `dest_root`.
#[must_use]
pub fn platform_dir(dest_root: &Utf8Path, platform: Platform) -> Utf8PathBuf {
    dest_root.join(platform.dir_name())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
