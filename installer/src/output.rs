//! Output formatting for the installer CLI.
//!
//! User-facing progress and summaries go to stderr; `resolve` and `generate`
//! results go to stdout so they can be piped.

use crate::artefact::manifest::{PlatformTarget, ReleaseManifest};
use crate::install::InstallResult;
use camino::Utf8Path;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; a closed stderr must not abort an install.
    }
}

/// Format the message printed after a successful install.
#[must_use]
pub fn success_message(manifest: &ReleaseManifest, result: &InstallResult) -> String {
    format!(
        "Installed {} {} to {}",
        manifest.package_name(),
        manifest.version(),
        result.installed_path
    )
}

/// Format the caveats block, if the manifest has one.
#[must_use]
pub fn caveats_text(manifest: &ReleaseManifest) -> Option<String> {
    let caveats = manifest.notes().caveats.as_deref()?.trim();
    if caveats.is_empty() {
        return None;
    }
    let body = caveats
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!("Caveats:\n{body}"))
}

/// Format a resolved target for `resolve` and dry-run output.
///
/// # Example
///
/// ```
/// use release_installer::artefact::manifest_parser::parse_manifest;
/// use release_installer::artefact::platform::Platform;
/// use release_installer::output::resolved_target_text;
///
/// let manifest = parse_manifest(r#"{
///   "schema_version": 1, "package_name": "kubectl-ai", "version": "0.0.11",
///   "digest_algorithm": "sha256",
///   "targets": [{"os": "linux", "arch": "amd64",
///     "url": "https://github.com/sozercan/kubectl-ai/releases/download/v0.0.11/kubectl-ai_linux_amd64.tar.gz",
///     "checksum": "b991b085a59a47f6ccd0f4a907c8c082c449acadf2553938a7edf36522f6daf4"}]
/// }"#).expect("valid manifest");
/// let platform: Platform = "linux/amd64".parse().expect("platform");
/// let target = manifest.resolve(platform).expect("published");
/// let text = resolved_target_text(&manifest, target);
/// assert!(text.contains("Format: tar.gz"));
/// ```
#[must_use]
pub fn resolved_target_text(manifest: &ReleaseManifest, target: &PlatformTarget) -> String {
    [
        format!("Package: {} {}", manifest.package_name(), manifest.version()),
        format!("Platform: {}", target.platform()),
        format!("URL: {}", target.url()),
        format!("SHA-256: {}", target.checksum()),
        format!("Format: {}", target.archive_format()),
        format!("Binary: {}", manifest.binary_name()),
    ]
    .join("\n")
}

/// Describe what an install would do without touching the network.
#[must_use]
pub fn dry_run_text(
    manifest: &ReleaseManifest,
    target: &PlatformTarget,
    bin_dir: &Utf8Path,
) -> String {
    format!(
        "Dry run - no files will be downloaded or written\n\n{}\nDestination: {}",
        resolved_target_text(manifest, target),
        bin_dir.join(manifest.binary_name().as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::manifest_parser::parse_manifest;
    use crate::artefact::platform::{Arch, Os, Platform};
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};

    const SHA: &str = "b991b085a59a47f6ccd0f4a907c8c082c449acadf2553938a7edf36522f6daf4";

    fn manifest_with_caveats(caveats: Option<&str>) -> ReleaseManifest {
        let mut document = serde_json::json!({
            "schema_version": 1,
            "package_name": "kubectl-ai",
            "version": "0.0.11",
            "digest_algorithm": "sha256",
            "targets": [{
                "os": "linux",
                "arch": "amd64",
                "url": "https://github.com/sozercan/kubectl-ai/releases/download/v0.0.11/kubectl-ai_linux_amd64.tar.gz",
                "checksum": SHA,
            }],
        });
        if let (Some(text), Some(object)) = (caveats, document.as_object_mut()) {
            object.insert("caveats".to_owned(), serde_json::Value::from(text));
        }
        parse_manifest(&document.to_string()).expect("valid manifest")
    }

    #[fixture]
    fn manifest() -> ReleaseManifest {
        manifest_with_caveats(Some("This plugin requires an OpenAI key."))
    }

    #[rstest]
    fn success_message_names_release_and_path(manifest: ReleaseManifest) {
        let result = InstallResult {
            installed_path: Utf8PathBuf::from("/home/test/.local/bin/kubectl-ai"),
            verified: true,
        };
        assert_eq!(
            success_message(&manifest, &result),
            "Installed kubectl-ai 0.0.11 to /home/test/.local/bin/kubectl-ai"
        );
    }

    #[rstest]
    fn caveats_are_indented(manifest: ReleaseManifest) {
        assert_eq!(
            caveats_text(&manifest).as_deref(),
            Some("Caveats:\n  This plugin requires an OpenAI key.")
        );
    }

    #[rstest]
    #[case::absent(None)]
    #[case::blank(Some("   "))]
    fn no_caveats_block_without_text(#[case] caveats: Option<&str>) {
        assert!(caveats_text(&manifest_with_caveats(caveats)).is_none());
    }

    #[rstest]
    fn dry_run_lists_target_and_destination(manifest: ReleaseManifest) {
        let target = manifest
            .resolve(Platform::new(Os::Linux, Arch::Amd64))
            .expect("published");
        let text = dry_run_text(&manifest, target, Utf8Path::new("/opt/bin"));
        assert!(text.starts_with("Dry run"));
        assert!(text.contains(SHA));
        assert!(text.contains("Destination: /opt/bin/kubectl-ai"));
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "hello");
        assert_eq!(buffer, b"hello\n");
    }
}
