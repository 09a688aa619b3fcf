//! Release manifest model, resolution, fetching, and verification.
//!
//! # Sub-modules
//!
//! - [`artefact_url`] — HTTPS archive URL newtype and archive format.
//! - [`download`] — Artefact download trait and HTTP implementation.
//! - [`error`] — Validation errors for manifest values.
//! - [`extraction`] — Binary extraction with path traversal protection.
//! - [`generate`] — Manifest generation from local archives.
//! - [`manifest`] — Manifest types and platform resolution.
//! - [`manifest_parser`] — Manifest JSON (de)serialisation.
//! - [`naming`] — Package, binary, and version names; URL templates.
//! - [`platform`] — Operating system and architecture enumeration.
//! - [`sha256_digest`] — SHA-256 digest newtype (`Sha256Digest`).
//! - [`verification`] — Digest verification and `VerifiedArtefact`.
//!
//! The pipeline in [`crate::pipeline`] strings these together in the order
//! resolve, fetch, verify, install.

pub mod artefact_url;
pub mod download;
pub mod error;
pub mod extraction;
pub mod generate;
pub mod manifest;
pub mod manifest_parser;
pub mod naming;
pub mod platform;
pub mod sha256_digest;
pub mod verification;
