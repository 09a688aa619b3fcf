//! Tests for installer CLI parsing.

use super::*;
use clap::CommandFactory;
use rstest::rstest;

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn install_parses_defaults() {
    let cli = Cli::parse_from(["release-installer", "install", "kubectl-ai"]);
    let Command::Install(args) = cli.command else {
        panic!("expected Install command");
    };
    assert_eq!(args.package, "kubectl-ai");
    assert!(args.source.manifest.is_none());
    assert!(args.source.manifest_dir.is_none());
    assert!(args.platform.os.is_none());
    assert!(args.platform.arch.is_none());
    assert!(args.bin_dir.is_none());
    assert!(args.timeout.is_none());
    assert!(!args.dry_run);
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
}

#[test]
fn install_parses_every_flag() {
    let cli = Cli::parse_from([
        "release-installer",
        "install",
        "kubectl-ai",
        "--manifest",
        "manifests/kubectl-ai.json",
        "--os",
        "darwin",
        "--arch",
        "aarch64",
        "--bin-dir",
        "/opt/bin",
        "--timeout",
        "5",
        "--dry-run",
        "-q",
    ]);
    let Command::Install(args) = cli.command else {
        panic!("expected Install command");
    };
    assert_eq!(
        args.source.manifest,
        Some(Utf8PathBuf::from("manifests/kubectl-ai.json"))
    );
    assert_eq!(args.platform.explicit(), Some(Platform::new(Os::Macos, Arch::Arm64)));
    assert_eq!(args.bin_dir, Some(Utf8PathBuf::from("/opt/bin")));
    assert_eq!(args.timeout, Some(5));
    assert!(args.dry_run);
    assert!(cli.quiet);
}

#[rstest]
#[case::single("-v", 1)]
#[case::double("-vv", 2)]
#[case::triple("-vvv", 3)]
fn verbosity_counts(#[case] flag: &str, #[case] expected: u8) {
    let cli = Cli::parse_from(["release-installer", "resolve", "kubectl-ai", flag]);
    assert_eq!(cli.verbosity, expected);
}

#[test]
fn quiet_conflicts_with_verbose() {
    let result = Cli::try_parse_from(["release-installer", "install", "kubectl-ai", "-q", "-v"]);
    assert!(result.is_err());
}

#[test]
fn manifest_conflicts_with_manifest_dir() {
    let result = Cli::try_parse_from([
        "release-installer",
        "install",
        "kubectl-ai",
        "--manifest",
        "a.json",
        "--manifest-dir",
        "manifests",
    ]);
    assert!(result.is_err());
}

#[rstest]
#[case::windows("--os", "windows")]
#[case::i386("--arch", "386")]
fn rejects_unknown_platform_names(#[case] flag: &str, #[case] value: &str) {
    let result = Cli::try_parse_from(["release-installer", "resolve", "kubectl-ai", flag, value]);
    assert!(result.is_err());
}

#[test]
fn generate_parses_repeated_archives() {
    let cli = Cli::parse_from([
        "release-installer",
        "generate",
        "--package",
        "kubectl-ai",
        "--version",
        "0.0.11",
        "--url-template",
        "https://github.com/sozercan/kubectl-ai/releases/download/v{version}/kubectl-ai_{os}_{arch}.tar.gz",
        "--archive",
        "linux/amd64=dist/linux.tar.gz",
        "--archive",
        "darwin/arm64=dist/darwin.tar.gz",
        "--caveats",
        "This plugin requires an OpenAI key.",
    ]);
    let Command::Generate(args) = cli.command else {
        panic!("expected Generate command");
    };
    assert_eq!(args.release_version, "0.0.11");
    assert_eq!(
        args.archives,
        vec![
            ArchiveSpec {
                platform: Platform::new(Os::Linux, Arch::Amd64),
                path: Utf8PathBuf::from("dist/linux.tar.gz"),
            },
            ArchiveSpec {
                platform: Platform::new(Os::Macos, Arch::Arm64),
                path: Utf8PathBuf::from("dist/darwin.tar.gz"),
            },
        ]
    );
    assert!(args.output.is_none());
}

#[test]
fn generate_requires_an_archive() {
    let result = Cli::try_parse_from([
        "release-installer",
        "generate",
        "--package",
        "kubectl-ai",
        "--version",
        "0.0.11",
        "--url-template",
        "https://example.com/{os}_{arch}.tar.gz",
    ]);
    assert!(result.is_err());
}

#[rstest]
#[case::missing_equals("linux/amd64")]
#[case::missing_path("linux/amd64=")]
#[case::bad_platform("linux=dist/a.tar.gz")]
fn archive_spec_rejects_malformed_values(#[case] value: &str) {
    assert!(value.parse::<ArchiveSpec>().is_err());
}

#[test]
fn platform_args_fill_gaps_from_host() {
    let host = Platform::new(Os::Linux, Arch::Amd64);
    let args = PlatformArgs {
        os: None,
        arch: Some(Arch::Arm64),
    };
    assert_eq!(args.apply_to(host), Platform::new(Os::Linux, Arch::Arm64));
    assert!(args.explicit().is_none());
}
