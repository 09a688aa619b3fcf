//! BDD tests for the resolve, fetch, verify, install pipeline.
//!
//! The network is replaced by a stub fetcher that serves an in-memory
//! archive, so each scenario controls the exact bytes that reach
//! verification.

use camino::Utf8PathBuf;
use release_installer::artefact::download::{ArtefactFetcher, DownloadError};
use release_installer::artefact::extraction::ArchiveExtractor;
use release_installer::artefact::manifest::{PlatformTarget, ReleaseManifest};
use release_installer::artefact::manifest_parser::parse_manifest;
use release_installer::artefact::platform::Platform;
use release_installer::error::InstallerError;
use release_installer::install::InstallResult;
use release_installer::pipeline::{InstallRequest, run_install};
use release_installer::test_utils::{TargetSpec, manifest_json, sha256_hex, tar_gz_archive};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const BINARY: &[u8] = b"\x7fELF kubectl-ai 0.0.12";

/// How the stub fetcher answers.
#[derive(Default)]
enum Served {
    /// Serve the archive unchanged.
    #[default]
    Archive,
    /// Serve the archive with its first byte flipped.
    Tampered,
    /// Fail as if the request timed out.
    Timeout,
}

struct StubFetcher {
    archive: Vec<u8>,
    served: Served,
    calls: AtomicUsize,
}

impl ArtefactFetcher for StubFetcher {
    fn fetch(&self, target: &PlatformTarget) -> Result<Vec<u8>, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.served {
            Served::Archive => Ok(self.archive.clone()),
            Served::Tampered => {
                let mut bytes = self.archive.clone();
                if let Some(byte) = bytes.first_mut() {
                    *byte ^= 0xff;
                }
                Ok(bytes)
            }
            Served::Timeout => Err(DownloadError::Timeout {
                url: target.url().to_string(),
                seconds: 30,
            }),
        }
    }
}

#[derive(Default)]
struct InstallWorld {
    archive: Vec<u8>,
    manifest: Option<ReleaseManifest>,
    served: Served,
    _temp: Option<TempDir>,
    dest: Option<Utf8PathBuf>,
    fetch_calls: usize,
    result: Option<Result<InstallResult, InstallerError>>,
}

impl InstallWorld {
    fn error(&self) -> &InstallerError {
        match self.result.as_ref().expect("result set") {
            Ok(result) => panic!("expected failure, got {result:?}"),
            Err(err) => err,
        }
    }

    fn dest(&self) -> &Utf8PathBuf {
        self.dest.as_ref().expect("destination set")
    }
}

#[fixture]
fn world() -> InstallWorld {
    let temp = tempfile::tempdir().expect("temp dir");
    let dest = Utf8PathBuf::try_from(temp.path().join("bin")).expect("UTF-8 path");
    InstallWorld {
        _temp: Some(temp),
        dest: Some(dest),
        ..InstallWorld::default()
    }
}

#[given("a kubectl-ai 0.0.12 release archive containing the binary")]
fn given_release_archive(world: &mut InstallWorld) {
    world.archive = tar_gz_archive(&[("LICENSE", b"Apache-2.0"), ("kubectl-ai", BINARY)]);
}

fn publish(archive: &[u8], os: &str, arch: &str) -> ReleaseManifest {
    let json = manifest_json(
        "kubectl-ai",
        "0.0.12",
        &[TargetSpec::kubectl_ai("0.0.12", os, arch, &sha256_hex(archive))],
    );
    parse_manifest(&json).expect("valid manifest")
}

#[given("a manifest publishing the archive for \"{platform}\"")]
fn given_manifest(world: &mut InstallWorld, platform: String) {
    let (os, arch) = platform.split_once('/').expect("os/arch");
    world.manifest = Some(publish(&world.archive, os, arch));
}

#[given("the server returns the archive with one byte flipped")]
fn given_tampered(world: &mut InstallWorld) {
    world.served = Served::Tampered;
}

#[given("the server times out")]
fn given_timeout(world: &mut InstallWorld) {
    world.served = Served::Timeout;
}

#[given("the archive does not contain the binary")]
fn given_archive_without_binary(world: &mut InstallWorld) {
    world.archive = tar_gz_archive(&[("README.md", b"kubectl-ai docs")]);
    world.manifest = Some(publish(&world.archive, "linux", "amd64"));
}

#[when("the release is installed for \"{platform}\"")]
fn when_installed(world: &mut InstallWorld, platform: String) {
    let platform: Platform = platform.parse().expect("platform");
    let manifest = world.manifest.as_ref().expect("manifest set");
    let fetcher = StubFetcher {
        archive: world.archive.clone(),
        served: std::mem::take(&mut world.served),
        calls: AtomicUsize::new(0),
    };
    let request = InstallRequest {
        manifest,
        platform,
        dest_dir: world.dest(),
        quiet: true,
    };
    let result = run_install(&request, &fetcher, &ArchiveExtractor, &mut std::io::sink());
    world.fetch_calls = fetcher.calls.load(Ordering::SeqCst);
    world.result = Some(result);
}

#[then("the install succeeds")]
fn then_succeeds(world: &mut InstallWorld) {
    let result = world.result.as_ref().expect("result set");
    assert!(result.is_ok(), "expected success, got {result:?}");
}

#[then("the binary is installed and executable")]
fn then_binary_installed(world: &mut InstallWorld) {
    let path = world.dest().join("kubectl-ai");
    assert_eq!(std::fs::read(&path).expect("installed binary"), BINARY);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[then("the result is marked verified")]
fn then_verified(world: &mut InstallWorld) {
    let result = world
        .result
        .as_ref()
        .expect("result set")
        .as_ref()
        .expect("install succeeded");
    assert!(result.verified);
    assert_eq!(result.installed_path, world.dest().join("kubectl-ai"));
}

#[then("the install fails in the \"{stage}\" stage")]
fn then_fails_in_stage(world: &mut InstallWorld, stage: String) {
    let err = world.error();
    assert_eq!(err.stage().as_str(), stage, "unexpected error: {err}");
    assert!(err.to_string().starts_with(&format!("{stage} failed")));
}

#[then("the error mentions \"{text}\"")]
fn then_error_mentions(world: &mut InstallWorld, text: String) {
    let message = world.error().to_string();
    assert!(message.contains(&text), "expected '{text}' in: {message}");
}

#[then("no binary is written")]
fn then_no_binary(world: &mut InstallWorld) {
    assert!(!world.dest().join("kubectl-ai").exists());
}

#[then("no download is attempted")]
fn then_no_download(world: &mut InstallWorld) {
    assert_eq!(world.fetch_calls, 0);
}

#[scenario(path = "tests/features/install.feature", name = "Successful install")]
fn scenario_successful_install(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Tampered archive is rejected before extraction"
)]
fn scenario_tampered_archive(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Platform missing from the manifest"
)]
fn scenario_unsupported_platform(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/install.feature",
    name = "Archive without the named binary"
)]
fn scenario_missing_binary(world: InstallWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/install.feature", name = "Download times out")]
fn scenario_download_timeout(world: InstallWorld) {
    let _ = world;
}
