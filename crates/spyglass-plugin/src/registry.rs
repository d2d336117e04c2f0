//! In-memory lookup module registry with query support.

use crate::descriptor::CredentialRequirement;
use crate::module::LookupModule;
use spyglass_core::TargetType;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// In-memory cache of lookup modules, keyed by descriptor name.
///
/// Constructed explicitly at startup and shared by `Arc`; there is no
/// global instance. `discover` consumes static registration lists, with
/// later lists overriding earlier ones on name collision so embedder
/// modules beat built-ins.
#[derive(Clone)]
pub struct ModuleRegistry {
    /// Registered modules, indexed by descriptor name
    modules: Arc<RwLock<HashMap<String, Arc<dyn LookupModule>>>>,
    /// Whether discovery has already run
    discovered: Arc<AtomicBool>,
}

impl ModuleRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            modules: Arc::new(RwLock::new(HashMap::new())),
            discovered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Populate the registry from registration lists.
    ///
    /// `builtin` registers first, then `extra`; on a name collision the
    /// later registration silently replaces the earlier one. Modules with
    /// invalid descriptors are skipped with a warning and discovery
    /// continues. Idempotent: repeated calls after the first are no-ops.
    pub fn discover(
        &self,
        builtin: Vec<Arc<dyn LookupModule>>,
        extra: Vec<Arc<dyn LookupModule>>,
    ) {
        if self.discovered.swap(true, Ordering::SeqCst) {
            debug!("module discovery already ran, skipping");
            return;
        }

        for module in builtin.into_iter().chain(extra) {
            self.register(module);
        }

        info!(count = self.count(), "discovered lookup modules");
    }

    /// Register a single module, replacing any existing one of the same name.
    ///
    /// Invalid descriptors are rejected with a warning; registration of
    /// other modules is unaffected.
    pub fn register(&self, module: Arc<dyn LookupModule>) {
        let descriptor = module.descriptor();

        if let Err(e) = descriptor.validate() {
            warn!(module = %descriptor.name, error = %e, "rejected module registration");
            return;
        }

        let name = descriptor.name.clone();

        let mut cache = self.modules.write().expect("acquire write lock on modules");

        if cache.insert(name.clone(), module).is_some() {
            debug!(module = %name, "replaced existing module registration");
        } else {
            debug!(module = %name, "registered module");
        }
    }

    /// Get a module by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn LookupModule>> {
        let cache = self.modules.read().expect("acquire read lock on modules");
        cache.get(name).cloned()
    }

    /// Get all registered modules.
    #[must_use]
    pub fn get_all(&self) -> Vec<Arc<dyn LookupModule>> {
        let cache = self.modules.read().expect("acquire read lock on modules");
        cache.values().cloned().collect()
    }

    /// Query modules by category, case-insensitively.
    #[must_use]
    pub fn get_by_category(&self, category: &str) -> Vec<Arc<dyn LookupModule>> {
        let cache = self.modules.read().expect("acquire read lock on modules");
        cache
            .values()
            .filter(|m| m.descriptor().category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    /// Query modules declaring support (free or key-gated) for a target type.
    #[must_use]
    pub fn get_by_type(&self, target_type: TargetType) -> Vec<Arc<dyn LookupModule>> {
        let cache = self.modules.read().expect("acquire read lock on modules");
        cache
            .values()
            .filter(|m| m.descriptor().supports(target_type))
            .cloned()
            .collect()
    }

    /// All distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let cache = self.modules.read().expect("acquire read lock on modules");
        let mut categories: Vec<String> = cache
            .values()
            .map(|m| m.descriptor().category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Credential requirements grouped by category, de-duplicated by key name.
    #[must_use]
    pub fn credential_requirements(&self) -> HashMap<String, Vec<CredentialRequirement>> {
        let cache = self.modules.read().expect("acquire read lock on modules");
        let mut grouped: HashMap<String, Vec<CredentialRequirement>> = HashMap::new();

        for module in cache.values() {
            let descriptor = module.descriptor();
            let entry = grouped.entry(descriptor.category.clone()).or_default();
            for credential in &descriptor.credentials {
                if !entry.iter().any(|c| c.key_name == credential.key_name) {
                    entry.push(credential.clone());
                }
            }
        }

        grouped.retain(|_, reqs| !reqs.is_empty());
        grouped
    }

    /// Number of registered modules.
    #[must_use]
    pub fn count(&self) -> usize {
        let cache = self.modules.read().expect("acquire read lock on modules");
        cache.len()
    }

    /// Clear all registrations and allow discovery to run again.
    ///
    /// Intended for tests.
    pub fn reset(&self) {
        let mut cache = self.modules.write().expect("acquire write lock on modules");
        cache.clear();
        self.discovered.store(false, Ordering::SeqCst);
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
