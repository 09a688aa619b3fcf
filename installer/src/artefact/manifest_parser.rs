//! Manifest (de)serialisation.
//!
//! Manifests are JSON documents produced by the release process. Parsing
//! goes through a private document shape and then [`ReleaseManifest::new`],
//! so every newtype check and every structural invariant (duplicate
//! platforms included) runs at load time rather than at resolution time.

use super::artefact_url::ArtefactUrl;
use super::error::ArtefactError;
use super::manifest::{
    CURRENT_SCHEMA_VERSION, DigestAlgorithm, PlatformTarget, ReleaseIdentity, ReleaseManifest,
    ReleaseNotes,
};
use super::naming::{BinaryName, PackageName};
use super::platform::{Arch, Os, Platform};
use super::sha256_digest::Sha256Digest;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors arising from manifest loading.
#[derive(Debug, thiserror::Error)]
pub enum ManifestParseError {
    /// JSON deserialisation or field validation failed.
    #[error("manifest parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Parse a JSON string into a validated [`ReleaseManifest`].
///
/// # Errors
///
/// Returns an error if the JSON is malformed, contains unknown fields, or
/// any value fails validation.
///
/// # Examples
///
/// ```
/// use release_installer::artefact::manifest_parser::parse_manifest;
///
/// let json = r#"{
///   "schema_version": 1,
///   "package_name": "kubectl-ai",
///   "version": "0.0.12",
///   "digest_algorithm": "sha256",
///   "targets": [{
///     "os": "linux",
///     "arch": "amd64",
///     "url": "https://github.com/sozercan/kubectl-ai/releases/download/v0.0.12/kubectl-ai_linux_amd64.tar.gz",
///     "checksum": "6f390023a8fe46a5237a15e934be3189230896dff64bc2a49cf4c8f1df59d690"
///   }]
/// }"#;
/// let manifest = parse_manifest(json).expect("valid manifest");
/// assert_eq!(manifest.version(), "0.0.12");
/// ```
pub fn parse_manifest(json: &str) -> Result<ReleaseManifest, ManifestParseError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a manifest file.
///
/// # Errors
///
/// Returns [`ManifestParseError::Io`] if the file cannot be read, or
/// [`ManifestParseError::Json`] if its contents are invalid.
pub fn load_manifest(path: &Utf8Path) -> Result<ReleaseManifest, ManifestParseError> {
    let json = std::fs::read_to_string(path).map_err(|source| ManifestParseError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_manifest(&json)
}

/// Serialise a manifest to pretty-printed JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn manifest_to_json(manifest: &ReleaseManifest) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}

/// On-disk shape of a manifest.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestDocument {
    schema_version: u32,
    package_name: PackageName,
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    binary_name: Option<BinaryName>,
    digest_algorithm: DigestAlgorithm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    caveats: Option<String>,
    targets: Vec<TargetDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetDocument {
    os: Os,
    arch: Arch,
    url: ArtefactUrl,
    checksum: Sha256Digest,
}

impl TryFrom<ManifestDocument> for ReleaseManifest {
    type Error = ArtefactError;

    fn try_from(document: ManifestDocument) -> Result<Self, Self::Error> {
        if document.schema_version == 0 || document.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(ArtefactError::UnsupportedSchemaVersion {
                value: document.schema_version,
                max: CURRENT_SCHEMA_VERSION,
            });
        }
        let identity = ReleaseIdentity {
            package_name: document.package_name,
            version: document.version,
            binary_name: document.binary_name,
        };
        let notes = ReleaseNotes {
            description: document.description,
            homepage: document.homepage,
            caveats: document.caveats,
        };
        let targets = document
            .targets
            .into_iter()
            .map(|t| PlatformTarget::new(Platform::new(t.os, t.arch), t.url, t.checksum))
            .collect();
        Self::new(identity, notes, targets)
    }
}

impl From<&ReleaseManifest> for ManifestDocument {
    fn from(manifest: &ReleaseManifest) -> Self {
        let identity = manifest.identity();
        let notes = manifest.notes();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            package_name: identity.package_name.clone(),
            version: identity.version.clone(),
            description: notes.description.clone(),
            homepage: notes.homepage.clone(),
            binary_name: identity.binary_name.clone(),
            digest_algorithm: manifest.digest_algorithm(),
            caveats: notes.caveats.clone(),
            targets: manifest
                .targets()
                .map(|target| TargetDocument {
                    os: target.platform().os(),
                    arch: target.platform().arch(),
                    url: target.url().clone(),
                    checksum: target.checksum().clone(),
                })
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for ReleaseManifest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = ManifestDocument::deserialize(deserializer)?;
        Self::try_from(document).map_err(serde::de::Error::custom)
    }
}

impl Serialize for ReleaseManifest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ManifestDocument::from(self).serialize(serializer)
    }
}
