//! The lookup module contract.

use crate::descriptor::ModuleDescriptor;
use crate::error::ModuleResult;
use async_trait::async_trait;
use spyglass_core::{CredentialStore, Finding, TargetType};
use std::sync::Arc;

/// Shared per-scan context injected into every module invocation.
///
/// The HTTP client is shared across all modules of a scan so they draw
/// from one connection pool; modules must use it for all network I/O
/// rather than building their own clients.
#[derive(Clone)]
pub struct ModuleContext {
    /// Shared HTTP client (connection pool, timeout, user agent)
    pub http: reqwest::Client,
    /// Read-only credential source
    pub credentials: Arc<dyn CredentialStore>,
}

impl ModuleContext {
    /// Create a context from a client and credential store.
    #[must_use]
    pub fn new(http: reqwest::Client, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { http, credentials }
    }

    /// Look up a credential by service key.
    #[must_use]
    pub fn credential(&self, key_name: &str) -> Option<String> {
        self.credentials.get(key_name)
    }
}

/// One lookup capability (a "module"): a descriptor plus an async
/// execution entry point.
///
/// Implementations must be `Send + Sync` — the orchestrator runs many
/// modules concurrently on a multi-threaded runtime. `execute` must not
/// block the executor; all network I/O goes through `ctx.http`.
#[async_trait]
pub trait LookupModule: Send + Sync {
    /// The module's static metadata.
    fn descriptor(&self) -> &ModuleDescriptor;

    /// Run the lookup against a classified target.
    ///
    /// Returns the module's findings; a module that ran cleanly but found
    /// nothing returns a single finding with the "None found" sentinel
    /// value so the caller can distinguish "clean" from "failed".
    ///
    /// # Errors
    /// Any error is isolated to this module's outcome by the orchestrator.
    async fn execute(
        &self,
        ctx: &ModuleContext,
        target: &str,
        target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>>;
}
