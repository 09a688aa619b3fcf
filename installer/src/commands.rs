//! Subcommand implementations for the installer binary.
//!
//! Each command takes its collaborators explicitly so the binary wires in
//! the HTTP fetcher and system directories while tests substitute stubs.

use crate::artefact::download::{ArtefactFetcher, FetchSettings, HttpFetcher};
use crate::artefact::extraction::BinaryExtractor;
use crate::artefact::generate::{GenerateRequest, generate_manifest};
use crate::artefact::manifest::{ReleaseIdentity, ReleaseManifest, ReleaseNotes};
use crate::artefact::manifest_parser::{load_manifest, manifest_to_json};
use crate::artefact::naming::{BinaryName, PackageName};
use crate::artefact::platform::Platform;
use crate::cli::{
    Cli, Command, GenerateArgs, InstallArgs, ManifestSource, PlatformArgs, ResolveArgs,
};
use crate::config::{ConfigOverrides, InstallerConfig, Settings};
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use crate::install::InstallResult;
use crate::output::{
    caveats_text, dry_run_text, resolved_target_text, success_message, write_stderr_line,
};
use crate::pipeline::{InstallRequest, run_install};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::Write;

/// Builds the fetcher once network settings are known.
pub type FetcherFactory<'a> = &'a dyn Fn(&FetchSettings) -> Box<dyn ArtefactFetcher>;

/// Collaborators shared by every command.
pub struct CommandContext<'a> {
    /// Platform directory lookups.
    pub dirs: &'a dyn BaseDirs,
    /// Archive extractor used by `install`.
    pub extractor: &'a dyn BinaryExtractor,
    /// Builds the fetcher used by `install`.
    pub fetcher: FetcherFactory<'a>,
    /// Destination for command results.
    pub stdout: &'a mut dyn Write,
    /// Destination for progress and notices.
    pub stderr: &'a mut dyn Write,
    /// Suppress progress output.
    pub quiet: bool,
}

/// The production fetcher factory.
#[must_use]
pub fn http_fetcher(settings: &FetchSettings) -> Box<dyn ArtefactFetcher> {
    Box::new(HttpFetcher::new(settings))
}

/// Dispatch the parsed command line.
///
/// # Errors
///
/// Returns the [`InstallerError`] raised by the selected command.
pub fn run(cli: &Cli, context: &mut CommandContext<'_>) -> Result<()> {
    match &cli.command {
        Command::Install(args) => run_install_command(args, context).map(|_| ()),
        Command::Resolve(args) => run_resolve_command(args, context),
        Command::Generate(args) => run_generate_command(args, context),
    }
}

/// Load the manifest for `package` from an explicit file or the manifest
/// directory.
///
/// # Errors
///
/// Returns [`InstallerError::InvalidInput`] for an unsafe package name,
/// [`InstallerError::Config`] when no manifest location is known,
/// [`InstallerError::Manifest`] when the file is unreadable or invalid, and
/// [`InstallerError::ManifestMismatch`] when it describes another package.
pub fn locate_manifest(
    package: &str,
    source: &ManifestSource,
    settings: &Settings,
) -> Result<(Utf8PathBuf, ReleaseManifest)> {
    let package = PackageName::try_from(package)?;
    let path = match &source.manifest {
        Some(path) => path.clone(),
        None => settings.manifest_dir()?.join(package.manifest_file_name()),
    };
    debug!("load: {path}");
    let manifest = load_manifest(&path)?;
    if manifest.package_name() != &package {
        return Err(InstallerError::ManifestMismatch {
            path,
            requested: package.to_string(),
            found: manifest.package_name().to_string(),
        });
    }
    Ok((path, manifest))
}

/// Pick the target platform from explicit flags, falling back to the host.
///
/// # Errors
///
/// Returns [`InstallerError::UnsupportedHost`] when a flag is missing and
/// the host is outside the supported matrix.
pub fn select_platform(args: PlatformArgs) -> Result<Platform> {
    if let Some(platform) = args.explicit() {
        return Ok(platform);
    }
    let host = Platform::host().map_err(InstallerError::UnsupportedHost)?;
    Ok(args.apply_to(host))
}

fn load_settings(dirs: &dyn BaseDirs, overrides: ConfigOverrides) -> Result<Settings> {
    let file = InstallerConfig::load(dirs)?;
    Ok(Settings::resolve(overrides, file, dirs)?)
}

/// Run `install`: resolve, fetch, verify, and install one binary.
///
/// # Errors
///
/// Returns the first failing stage's [`InstallerError`].
pub fn run_install_command(
    args: &InstallArgs,
    context: &mut CommandContext<'_>,
) -> Result<Option<InstallResult>> {
    let settings = load_settings(
        context.dirs,
        ConfigOverrides {
            bin_dir: args.bin_dir.clone(),
            manifest_dir: args.source.manifest_dir.clone(),
            timeout_secs: args.timeout,
        },
    )?;
    let (_, manifest) = locate_manifest(&args.package, &args.source, &settings)?;
    let platform = select_platform(args.platform)?;
    let bin_dir = settings.bin_dir()?;

    if args.dry_run {
        let target = manifest.resolve(platform)?;
        write_stderr_line(context.stdout, dry_run_text(&manifest, target, bin_dir));
        return Ok(None);
    }

    let fetcher = (context.fetcher)(&settings.fetch);
    let request = InstallRequest {
        manifest: &manifest,
        platform,
        dest_dir: bin_dir,
        quiet: context.quiet,
    };
    let result = run_install(&request, fetcher.as_ref(), context.extractor, context.stderr)?;

    if !context.quiet {
        write_stderr_line(context.stderr, success_message(&manifest, &result));
        if let Some(caveats) = caveats_text(&manifest) {
            write_stderr_line(context.stderr, "");
            write_stderr_line(context.stderr, caveats);
        }
    }
    Ok(Some(result))
}

/// Run `resolve`: print the target a package resolves to.
///
/// # Errors
///
/// Returns [`InstallerError`] when the manifest cannot be loaded or has no
/// target for the platform.
pub fn run_resolve_command(args: &ResolveArgs, context: &mut CommandContext<'_>) -> Result<()> {
    let settings = load_settings(
        context.dirs,
        ConfigOverrides {
            manifest_dir: args.source.manifest_dir.clone(),
            ..ConfigOverrides::default()
        },
    )?;
    let (_, manifest) = locate_manifest(&args.package, &args.source, &settings)?;
    let platform = select_platform(args.platform)?;
    let target = manifest.resolve(platform)?;
    write_stderr_line(context.stdout, resolved_target_text(&manifest, target));
    Ok(())
}

/// Run `generate`: hash local archives and emit a manifest.
///
/// # Errors
///
/// Returns [`InstallerError::InvalidInput`] for invalid names,
/// [`InstallerError::Generate`] when hashing or validation fails, and
/// [`InstallerError::Io`] when the output file cannot be written.
pub fn run_generate_command(args: &GenerateArgs, context: &mut CommandContext<'_>) -> Result<()> {
    let request = GenerateRequest {
        identity: ReleaseIdentity {
            package_name: PackageName::try_from(args.package.as_str())?,
            version: args.release_version.clone(),
            binary_name: args
                .binary_name
                .as_deref()
                .map(BinaryName::try_from)
                .transpose()?,
        },
        notes: ReleaseNotes {
            description: args.description.clone(),
            homepage: args.homepage.clone(),
            caveats: args.caveats.clone(),
        },
        url_template: args.url_template.clone(),
        archives: args
            .archives
            .iter()
            .map(|spec| (spec.platform, spec.path.clone().into_std_path_buf()))
            .collect(),
    };
    let manifest = generate_manifest(&request)?;
    let json = manifest_to_json(&manifest)?;
    match &args.output {
        Some(path) => {
            write_manifest_file(path, &json)?;
            if !context.quiet {
                write_stderr_line(
                    context.stderr,
                    format!(
                        "Wrote manifest for {} {} ({} targets) to {path}",
                        manifest.package_name(),
                        manifest.version(),
                        manifest.targets().count()
                    ),
                );
            }
        }
        None => write_stderr_line(context.stdout, json.trim_end()),
    }
    Ok(())
}

fn write_manifest_file(path: &Utf8Path, json: &str) -> Result<()> {
    std::fs::write(path, json).map_err(|source| InstallerError::Io {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
