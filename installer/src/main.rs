//! Release installer CLI entrypoint.
//!
//! This binary resolves a package's release archive for the host, downloads
//! it, refuses to continue unless the SHA-256 digest matches the manifest,
//! and installs the binary into the user's binary directory.

use clap::Parser;
use release_installer::artefact::extraction::ArchiveExtractor;
use release_installer::cli::Cli;
use release_installer::commands::{CommandContext, http_fetcher, run};
use release_installer::dirs::SystemBaseDirs;
use release_installer::error::Result;
use release_installer::logging::init_logging;
use release_installer::output::write_stderr_line;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity, cli.quiet);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let mut context = CommandContext {
        dirs: &SystemBaseDirs,
        extractor: &ArchiveExtractor,
        fetcher: &http_fetcher,
        stdout: &mut stdout,
        stderr: &mut stderr,
        quiet: cli.quiet,
    };
    let run_result = run(&cli, &mut context);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
