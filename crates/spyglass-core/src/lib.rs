//! Spyglass Core - Foundation crate for the Spyglass OSINT engine.
//!
//! This crate provides shared types, error handling, configuration
//! management, target classification, and the credential boundary that all
//! other Spyglass crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared enums and records (`TargetType`, `Finding`, `ModuleOutcome`)
//! - [`classify`] - Raw input to `TargetType` resolution
//! - [`metadata`] - Per-type structured metadata extraction
//! - [`credentials`] - API credential store boundary
//!
//! # Example
//!
//! ```rust
//! use spyglass_core::{classify, TargetType};
//!
//! assert_eq!(classify("8.8.8.8"), Some(TargetType::Ip));
//! assert_eq!(classify("user@example.com"), Some(TargetType::Email));
//! assert_eq!(classify(""), None);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod classify;
pub mod config;
pub mod credentials;
pub mod error;
pub mod metadata;
pub mod types;

// Re-export commonly used types
pub use classify::{classify, hash_kind, split_wifi_target, HashKind};
pub use config::{AppConfig, ModulesConfig, ScanningConfig};
pub use credentials::{CredentialStore, EnvCredentialStore, MemoryCredentialStore};
pub use error::{ConfigError, ConfigResult, Result, SpyglassError};
pub use metadata::{extract_metadata, TargetMetadata};
pub use types::{
    Finding, ModuleOutcome, OutcomeStatus, RiskTier, TargetType, NONE_FOUND,
};
