//! Tests for configuration loading and precedence.

use super::*;
use crate::dirs::MockBaseDirs;
use rstest::{fixture, rstest};
use std::path::PathBuf;
use tempfile::TempDir;

#[fixture]
fn platform_dirs() -> MockBaseDirs {
    let mut dirs = MockBaseDirs::new();
    dirs.expect_bin_dir()
        .returning(|| Some(PathBuf::from("/home/test/.local/bin")));
    dirs.expect_data_dir()
        .returning(|| Some(PathBuf::from("/home/test/.local/share/release-installer")));
    dirs.expect_config_dir().returning(|| None);
    dirs
}

fn write_config(contents: &str) -> (TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp.path().join(CONFIG_FILE_NAME)).expect("UTF-8 path");
    std::fs::write(&path, contents).expect("write config");
    (temp, path)
}

#[test]
fn parses_every_key() {
    let source = concat!(
        "bin_dir = \"/opt/bin\"\n",
        "manifest_dir = \"/opt/manifests\"\n",
        "timeout_secs = 5\n",
        "max_download_bytes = 1048576\n",
    );
    let config = InstallerConfig::parse(source, Utf8Path::new("config.toml")).expect("valid");
    assert_eq!(config.bin_dir.as_deref(), Some(Utf8Path::new("/opt/bin")));
    assert_eq!(
        config.manifest_dir.as_deref(),
        Some(Utf8Path::new("/opt/manifests"))
    );
    assert_eq!(config.timeout_secs, Some(5));
    assert_eq!(config.max_download_bytes, Some(1_048_576));
}

#[rstest]
#[case::unknown_key("verify = false\n")]
#[case::wrong_type("timeout_secs = \"soon\"\n")]
#[case::not_toml("bin_dir = \n")]
fn rejects_invalid_files(#[case] source: &str) {
    let err = InstallerConfig::parse(source, Utf8Path::new("config.toml")).expect_err("invalid");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[rstest]
fn defaults_apply_without_file_or_flags(platform_dirs: MockBaseDirs) {
    let settings = Settings::resolve(
        ConfigOverrides::default(),
        InstallerConfig::default(),
        &platform_dirs,
    )
    .expect("defaults resolve");
    assert_eq!(
        settings.bin_dir().expect("bin dir"),
        Utf8Path::new("/home/test/.local/bin")
    );
    assert_eq!(
        settings.manifest_dir,
        Some(Utf8PathBuf::from(
            "/home/test/.local/share/release-installer/manifests"
        ))
    );
    assert_eq!(settings.fetch, FetchSettings::default());
}

#[rstest]
fn file_overrides_defaults_and_flags_override_file(platform_dirs: MockBaseDirs) {
    let file = InstallerConfig {
        bin_dir: Some(Utf8PathBuf::from("/from/file/bin")),
        manifest_dir: Some(Utf8PathBuf::from("/from/file/manifests")),
        timeout_secs: Some(60),
        max_download_bytes: Some(1024),
    };
    let overrides = ConfigOverrides {
        bin_dir: Some(Utf8PathBuf::from("/from/flag/bin")),
        manifest_dir: None,
        timeout_secs: Some(5),
    };
    let settings = Settings::resolve(overrides, file, &platform_dirs).expect("resolves");
    assert_eq!(settings.bin_dir, Some(Utf8PathBuf::from("/from/flag/bin")));
    assert_eq!(
        settings.manifest_dir,
        Some(Utf8PathBuf::from("/from/file/manifests"))
    );
    assert_eq!(settings.fetch.timeout, Duration::from_secs(5));
    assert_eq!(settings.fetch.max_bytes, 1024);
}

#[test]
fn missing_directories_are_reported_on_use() {
    let mut dirs = MockBaseDirs::new();
    dirs.expect_bin_dir().returning(|| None);
    dirs.expect_data_dir().returning(|| None);
    let settings = Settings::resolve(ConfigOverrides::default(), InstallerConfig::default(), &dirs)
        .expect("directories are optional until used");
    assert!(matches!(settings.bin_dir(), Err(ConfigError::NoBinDir)));
    assert!(matches!(
        settings.manifest_dir(),
        Err(ConfigError::NoManifestDir)
    ));
}

#[rstest]
fn zero_timeout_is_rejected(platform_dirs: MockBaseDirs) {
    let overrides = ConfigOverrides {
        timeout_secs: Some(0),
        ..ConfigOverrides::default()
    };
    let err = Settings::resolve(overrides, InstallerConfig::default(), &platform_dirs)
        .expect_err("zero timeout");
    assert!(matches!(err, ConfigError::ZeroLimit { key: "timeout_secs" }));
}

#[rstest]
fn load_reads_file_named_by_environment(platform_dirs: MockBaseDirs) {
    let (_temp, path) = write_config("timeout_secs = 7\n");
    let config = temp_env::with_var(CONFIG_ENV_VAR, Some(path.as_str()), || {
        InstallerConfig::load(&platform_dirs)
    })
    .expect("loads");
    assert_eq!(config.timeout_secs, Some(7));
}

#[rstest]
fn load_fails_when_named_file_is_missing(platform_dirs: MockBaseDirs) {
    let result = temp_env::with_var(
        CONFIG_ENV_VAR,
        Some("/nonexistent/release-installer/config.toml"),
        || InstallerConfig::load(&platform_dirs),
    );
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[rstest]
fn load_defaults_when_no_file_exists(platform_dirs: MockBaseDirs) {
    let config = temp_env::with_var_unset(CONFIG_ENV_VAR, || InstallerConfig::load(&platform_dirs))
        .expect("defaults");
    assert_eq!(config, InstallerConfig::default());
}

#[test]
fn load_reads_config_dir_file() {
    let (temp, _path) = write_config("bin_dir = \"/srv/bin\"\n");
    let config_dir = temp.path().to_path_buf();
    let mut dirs = MockBaseDirs::new();
    dirs.expect_config_dir()
        .returning(move || Some(config_dir.clone()));
    let config = temp_env::with_var_unset(CONFIG_ENV_VAR, || InstallerConfig::load(&dirs))
        .expect("loads");
    assert_eq!(config.bin_dir, Some(Utf8PathBuf::from("/srv/bin")));
}
