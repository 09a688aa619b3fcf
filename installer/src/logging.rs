//! Diagnostic logging for the CLI binary.
//!
//! The library logs through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter on stderr which also captures `log`
//! records. `RUST_LOG` wins when set; otherwise the level follows
//! `-v`/`-q`.

use tracing_subscriber::EnvFilter;

/// Return the default filter directive for a verbosity level.
///
/// # Examples
///
/// ```
/// use release_installer::logging::default_directive;
///
/// assert_eq!(default_directive(0, false), "warn");
/// assert_eq!(default_directive(2, false), "debug");
/// assert_eq!(default_directive(3, true), "error");
/// ```
#[must_use]
pub const fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber.
///
/// Calling this twice is harmless: the second installation attempt is
/// ignored.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        // A subscriber is already installed.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default(0, false, "warn")]
    #[case::verbose(1, false, "info")]
    #[case::very_verbose(2, false, "debug")]
    #[case::maximum(5, false, "trace")]
    #[case::quiet_wins(2, true, "error")]
    fn directive_follows_verbosity(#[case] verbosity: u8, #[case] quiet: bool, #[case] expected: &str) {
        assert_eq!(default_directive(verbosity, quiet), expected);
    }

    #[test]
    fn repeated_initialisation_does_not_panic() {
        init_logging(0, true);
        init_logging(1, false);
    }
}
