//! Release installer library.
//!
//! This crate resolves, downloads, verifies, and installs prebuilt release
//! binaries described by a checksummed JSON manifest. It is used by the
//! `release-installer` CLI binary and can be consumed programmatically for
//! testing or custom installation workflows.
//!
//! # Modules
//!
//! - [`artefact`] - Manifest domain types, loading, fetching, verification,
//!   and extraction
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Subcommand implementations
//! - [`config`] - Configuration file loading and precedence
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Stage-tagged error types
//! - [`install`] - Atomic placement of the extracted binary
//! - [`logging`] - Log subscriber setup for the binary
//! - [`output`] - User-facing message formatting
//! - [`pipeline`] - Resolve, fetch, verify, install orchestration

pub mod artefact;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dirs;
pub mod error;
pub mod install;
pub mod logging;
pub mod output;
pub mod pipeline;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
