//! CLI subcommand implementations.

pub mod config;
pub mod keys;
pub mod modules;
pub mod scan;

use std::sync::Arc;

use spyglass_plugin::ModuleRegistry;

/// Build the registry with the built-in module set.
pub fn registry() -> Arc<ModuleRegistry> {
    let registry = Arc::new(ModuleRegistry::new());
    registry.discover(spyglass_modules::builtins(), Vec::new());
    registry
}
