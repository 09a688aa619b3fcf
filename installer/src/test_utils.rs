//! Shared test utilities for the installer crate.
//!
//! Builds release archives in memory and renders manifest JSON so unit and
//! behaviour tests can exercise the full pipeline without network access.

#![expect(
    clippy::expect_used,
    reason = "builders panic with a descriptive message on malformed fixtures"
)]

use crate::artefact::sha256_digest::Sha256Digest;
use std::io::{Cursor, Write};

/// Mode applied to every entry written by the archive builders.
const ENTRY_MODE: u32 = 0o755;

fn tar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder
            .append_data(&mut header, path, *contents)
            .expect("append tar entry");
    }
    builder.into_inner().expect("finish tar")
}

/// Build a gzip-compressed tar archive holding `entries`.
///
/// # Panics
///
/// Panics if an entry path is rejected by the `tar` crate.
pub fn tar_gz_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let tar = tar_bytes(entries);
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&tar).expect("gzip tar");
    encoder.finish().expect("finish gzip")
}

/// Build a zstd-compressed tar archive holding `entries`.
///
/// # Panics
///
/// Panics if an entry path is rejected by the `tar` crate.
pub fn tar_zst_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    zstd::encode_all(Cursor::new(tar_bytes(entries)), 0).expect("zstd tar")
}

/// Build a zip archive holding `entries`.
///
/// # Panics
///
/// Panics if the zip writer fails.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().unix_permissions(ENTRY_MODE);
    for (path, contents) in entries {
        writer.start_file(*path, options).expect("start zip entry");
        writer.write_all(contents).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256Digest::of(bytes).into_inner()
}

/// One target entry for [`manifest_json`].
#[derive(Debug, Clone)]
pub struct TargetSpec {
    /// Operating system spelling, e.g. `linux` or `darwin`.
    pub os: String,
    /// Architecture spelling, e.g. `amd64`.
    pub arch: String,
    /// Download URL.
    pub url: String,
    /// Hex checksum.
    pub checksum: String,
}

impl TargetSpec {
    /// Describe a kubectl-ai GitHub release asset for `version`.
    pub fn kubectl_ai(version: &str, os: &str, arch: &str, checksum: &str) -> Self {
        Self {
            os: os.to_owned(),
            arch: arch.to_owned(),
            url: format!(
                "https://github.com/sozercan/kubectl-ai/releases/download/v{version}/kubectl-ai_{os}_{arch}.tar.gz"
            ),
            checksum: checksum.to_owned(),
        }
    }
}

/// Render a schema-version-1 manifest for `package` at `version`.
///
/// # Panics
///
/// Panics if JSON serialisation fails.
pub fn manifest_json(package: &str, version: &str, targets: &[TargetSpec]) -> String {
    let targets: Vec<serde_json::Value> = targets
        .iter()
        .map(|t| {
            serde_json::json!({
                "os": t.os,
                "arch": t.arch,
                "url": t.url,
                "checksum": t.checksum,
            })
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::json!({
        "schema_version": 1,
        "package_name": package,
        "version": version,
        "digest_algorithm": "sha256",
        "targets": targets,
    }))
    .expect("serialise manifest")
}
