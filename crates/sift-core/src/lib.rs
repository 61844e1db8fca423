//! Core types, configuration, and hashing for sift.
//!
//! This crate provides the foundational data structures used across all sift crates:
//! - [`types`]: Severity levels, findings, syntax errors, and difficulty tiers
//! - [`config`]: Configuration loading from `sift.json`
//! - [`hash`]: Deterministic source fingerprints (base62 of xxhash64)

pub mod config;
pub mod hash;
pub mod types;
