//! Voxfield core crate - shared types, recognition events, errors, and configuration.
//!
//! Everything here is pure data shared across the Voxfield crates: the opaque
//! owner token used for session arbitration, the recognition event union that
//! the registry fans out, the top-level error type, and the TOML-backed
//! configuration.

pub mod config;
pub mod error;
pub mod events;
pub mod types;
