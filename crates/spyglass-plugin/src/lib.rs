//! Spyglass Plugin - the lookup module contract and registry.
//!
//! A lookup module is one OSINT capability: it declares a
//! [`ModuleDescriptor`] (identity, supported target types, credential
//! needs) and implements [`LookupModule::execute`]. The
//! [`ModuleRegistry`] holds registered modules and answers the
//! orchestrator's eligibility queries.
//!
//! # Modules
//!
//! - [`descriptor`] - Module metadata and validation
//! - [`module`] - The `LookupModule` trait and per-scan context
//! - [`registry`] - Name-keyed module registry with discovery
//! - [`http`] - Shared rate-limit-aware HTTP helpers
//! - [`error`] - Module error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod descriptor;
pub mod error;
pub mod http;
pub mod module;
pub mod registry;

pub use descriptor::{CredentialRequirement, ModuleDescriptor};
pub use error::{ModuleError, ModuleResult};
pub use module::{LookupModule, ModuleContext};
pub use registry::ModuleRegistry;
