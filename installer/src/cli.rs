//! CLI argument definitions for the release installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::artefact::error::ArtefactError;
use crate::artefact::platform::{Arch, Os, Platform};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use std::str::FromStr;

/// Install prebuilt release binaries from a checksummed manifest.
#[derive(Parser, Debug)]
#[command(name = "release-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install prebuilt release binaries from a checksummed manifest.\n\n",
    "A manifest lists one archive per operating system and architecture together ",
    "with its SHA-256 digest. The installer selects the archive for this host, ",
    "downloads it, refuses to continue unless the digest matches, then extracts ",
    "the named binary into the binary directory.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install from the manifest directory:\n",
    "    $ release-installer install kubectl-ai\n\n",
    "  Install from an explicit manifest into a custom directory:\n",
    "    $ release-installer install kubectl-ai --manifest manifests/kubectl-ai.json --bin-dir ~/bin\n\n",
    "  Show which archive would be used on Apple silicon:\n",
    "    $ release-installer resolve kubectl-ai --os macos --arch arm64\n\n",
    "  Build a manifest from local release archives:\n",
    "    $ release-installer generate --package kubectl-ai --version 0.0.11 \\\n",
    "        --url-template 'https://github.com/sozercan/kubectl-ai/releases/download/v{version}/kubectl-ai_{os}_{arch}.tar.gz' \\\n",
    "        --archive linux/amd64=dist/kubectl-ai_linux_amd64.tar.gz",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download, verify, and install a package's binary.
    Install(InstallArgs),

    /// Print the archive a package resolves to without downloading it.
    Resolve(ResolveArgs),

    /// Build a manifest from locally available release archives.
    Generate(GenerateArgs),
}

/// Where to find the manifest for a package.
#[derive(Args, Debug, Clone, Default)]
pub struct ManifestSource {
    /// Read the manifest from this file instead of the manifest directory.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Directory containing `<package>.json` manifests.
    #[arg(long, value_name = "DIR", conflicts_with = "manifest")]
    pub manifest_dir: Option<Utf8PathBuf>,
}

/// Platform overrides; each defaults to the host.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PlatformArgs {
    /// Operating system to install for (macos, linux).
    #[arg(long, value_name = "OS")]
    pub os: Option<Os>,

    /// Architecture to install for (arm64, amd64).
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<Arch>,
}

impl PlatformArgs {
    /// Combine the overrides with `host`, preferring explicit values.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_installer::artefact::platform::{Arch, Os, Platform};
    /// use release_installer::cli::PlatformArgs;
    ///
    /// let args = PlatformArgs { os: Some(Os::Macos), arch: None };
    /// let host = Platform::new(Os::Linux, Arch::Amd64);
    /// assert_eq!(args.apply_to(host), Platform::new(Os::Macos, Arch::Amd64));
    /// ```
    #[must_use]
    pub fn apply_to(self, host: Platform) -> Platform {
        Platform::new(
            self.os.unwrap_or_else(|| host.os()),
            self.arch.unwrap_or_else(|| host.arch()),
        )
    }

    /// Return the platform if both parts were given explicitly.
    #[must_use]
    pub fn explicit(self) -> Option<Platform> {
        Some(Platform::new(self.os?, self.arch?))
    }
}

/// Arguments for the install command.
#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Package to install, e.g. `kubectl-ai`.
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Manifest location.
    #[command(flatten)]
    pub source: ManifestSource,

    /// Platform overrides.
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Directory to install the binary into [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Network timeout in seconds [default: 30].
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Show what would be installed and exit without downloading.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the resolve command.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Package to resolve.
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Manifest location.
    #[command(flatten)]
    pub source: ManifestSource,

    /// Platform overrides.
    #[command(flatten)]
    pub platform: PlatformArgs,
}

/// Arguments for the generate command.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Package name recorded in the manifest.
    #[arg(long, value_name = "NAME")]
    pub package: String,

    /// Release version recorded in the manifest.
    #[arg(long = "version", value_name = "VERSION")]
    pub release_version: String,

    /// Download URL template using {package}, {version}, {os}, and {arch}.
    #[arg(long, value_name = "TEMPLATE")]
    pub url_template: String,

    /// Local archive for one platform, as `<os>/<arch>=<path>` (repeatable).
    #[arg(long = "archive", value_name = "OS/ARCH=PATH", required = true)]
    pub archives: Vec<ArchiveSpec>,

    /// Executable name inside the archives [default: package name].
    #[arg(long, value_name = "NAME")]
    pub binary_name: Option<String>,

    /// One-line package description.
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Project homepage.
    #[arg(long, value_name = "URL")]
    pub homepage: Option<String>,

    /// Notice printed after installation.
    #[arg(long, value_name = "TEXT")]
    pub caveats: Option<String>,

    /// Write the manifest here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,
}

/// One `--archive <os>/<arch>=<path>` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    /// Platform the archive was built for.
    pub platform: Platform,
    /// Local path of the archive.
    pub path: Utf8PathBuf,
}

impl FromStr for ArchiveSpec {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ArtefactError::InvalidArchiveSpec {
            value: value.to_owned(),
        };
        let (platform, path) = value.split_once('=').ok_or_else(invalid)?;
        if path.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            platform: platform.parse()?,
            path: Utf8PathBuf::from(path),
        })
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
