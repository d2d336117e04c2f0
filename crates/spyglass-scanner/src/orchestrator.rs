//! Scan orchestrator.
//!
//! Coordinates one scan: eligibility filtering, concurrent module
//! execution under a global ceiling, per-module time budgets, and result
//! aggregation. Module failures and timeouts are isolated into their own
//! outcomes; nothing a module does can abort its siblings.

use crate::aggregate;
use crate::eligibility::{self, Eligibility};
use crate::error::{Result, ScanError};
use crate::progress::{ProgressEvent, ProgressSink};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use spyglass_core::{
    AppConfig, CredentialStore, Finding, ModuleOutcome, TargetType,
};
use spyglass_plugin::{LookupModule, ModuleContext, ModuleRegistry};
use spyglass_query::{QueryKind, QueryParser};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Completed scan: per-module outcomes plus the aggregated findings.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// The value that was scanned
    pub target: String,
    /// Its resolved type
    pub target_type: TargetType,
    /// One outcome per considered module; skipped outcomes first, the
    /// rest in completion order
    pub outcomes: Vec<ModuleOutcome>,
    /// Flattened findings with sentinel rows removed
    pub findings: Vec<Finding>,
}

/// Orchestrates scans across registered lookup modules.
pub struct ScanOrchestrator {
    /// Module registry answering eligibility queries
    registry: Arc<ModuleRegistry>,
    /// Injected credential source
    credentials: Arc<dyn CredentialStore>,
    /// Shared HTTP client; one pool for all modules of a scan
    http: reqwest::Client,
    /// Global ceiling on concurrently running modules
    semaphore: Arc<Semaphore>,
    /// Minimum per-module time budget in seconds; descriptor budgets
    /// below this are raised to it
    timeout_floor_secs: u64,
    /// Module names excluded by configuration
    disabled: Vec<String>,
}

impl ScanOrchestrator {
    /// Create an orchestrator from configuration.
    ///
    /// # Errors
    /// Returns [`ScanError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(
        registry: Arc<ModuleRegistry>,
        credentials: Arc<dyn CredentialStore>,
        config: &AppConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.scanning.client_timeout_secs))
            .pool_max_idle_per_host(config.scanning.max_per_host)
            .user_agent(config.scanning.user_agent.clone())
            .build()?;

        Ok(Self {
            registry,
            credentials,
            http,
            semaphore: Arc::new(Semaphore::new(config.scanning.max_concurrent_requests)),
            timeout_floor_secs: config.scanning.module_timeout_floor_secs,
            disabled: config.modules.disabled.clone(),
        })
    }

    /// Scan a raw query string.
    ///
    /// Structured queries must parse cleanly; simple targets resolve
    /// through the classifier. An unclassifiable target surfaces as
    /// [`ScanError::AmbiguousTarget`] with one explicit form per type.
    ///
    /// # Errors
    /// Fails only before any module runs; see [`ScanError`].
    pub async fn scan_query(&self, raw: &str, sink: &dyn ProgressSink) -> Result<ScanReport> {
        let parsed = QueryParser::new().parse(raw);

        if parsed.kind == QueryKind::Structured && !parsed.errors.is_empty() {
            return Err(ScanError::InvalidQuery {
                errors: parsed.errors,
            });
        }

        let Some(target_type) = parsed.resolved_type else {
            return Err(ScanError::ambiguous(raw));
        };

        Ok(self.scan(&parsed.primary_target, target_type, sink).await)
    }

    /// Scan an already-classified target.
    ///
    /// Never fails: a scan with zero eligible modules returns a
    /// well-formed report whose outcomes are all skips.
    pub async fn scan(
        &self,
        target: &str,
        target_type: TargetType,
        sink: &dyn ProgressSink,
    ) -> ScanReport {
        sink.emit(&ProgressEvent::DetectDone { target_type });

        let (eligible, mut outcomes) = self.partition_modules(target_type);

        sink.emit(&ProgressEvent::ModulesLoaded {
            count: eligible.len(),
            skipped_count: outcomes.len(),
        });

        info!(
            target_type = %target_type,
            eligible = eligible.len(),
            skipped = outcomes.len(),
            "starting scan"
        );

        let ctx = ModuleContext::new(self.http.clone(), self.credentials.clone());
        let mut running = FuturesUnordered::new();

        for module in eligible {
            let name = module.descriptor().name.clone();
            sink.emit(&ProgressEvent::ModuleStart { name: name.clone() });

            let handle = self.launch(module, ctx.clone(), target.to_string(), target_type);
            running.push(async move {
                match handle.await {
                    Ok(outcome) => outcome,
                    // A panicking module is isolated like any other failure
                    Err(e) => ModuleOutcome::error(name, format!("module task failed: {e}")),
                }
            });
        }

        while let Some(outcome) = running.next().await {
            sink.emit(&ProgressEvent::ModuleDone {
                name: outcome.module_name.clone(),
                status: outcome.status,
            });
            outcomes.push(outcome);
        }

        let findings = aggregate::collect_findings(&outcomes);

        sink.emit(&ProgressEvent::ScanDone {
            findings_count: findings.len(),
        });

        info!(findings = findings.len(), "scan complete");

        ScanReport {
            target: target.to_string(),
            target_type,
            outcomes,
            findings,
        }
    }

    /// Split the registry into runnable modules and skip outcomes.
    fn partition_modules(
        &self,
        target_type: TargetType,
    ) -> (Vec<Arc<dyn LookupModule>>, Vec<ModuleOutcome>) {
        let mut eligible = Vec::new();
        let mut skipped = Vec::new();

        let mut candidates = self.registry.get_by_type(target_type);
        candidates.sort_by(|a, b| a.descriptor().name.cmp(&b.descriptor().name));

        for module in candidates {
            let descriptor = module.descriptor();
            let name = descriptor.name.clone();

            if self.disabled.iter().any(|d| d == &name) {
                debug!(module = %name, "module disabled in configuration");
                skipped.push(ModuleOutcome::skipped(name, "disabled in configuration"));
                continue;
            }

            match eligibility::check(descriptor, target_type, self.credentials.as_ref()) {
                Eligibility::Eligible => eligible.push(module),
                Eligibility::Skip { reason } => {
                    debug!(module = %name, reason = %reason, "module skipped");
                    skipped.push(ModuleOutcome::skipped(name, reason));
                }
            }
        }

        (eligible, skipped)
    }

    /// Spawn one module task under the global ceiling and its time budget.
    fn launch(
        &self,
        module: Arc<dyn LookupModule>,
        ctx: ModuleContext,
        target: String,
        target_type: TargetType,
    ) -> tokio::task::JoinHandle<ModuleOutcome> {
        let name = module.descriptor().name.clone();
        let budget_secs = module
            .descriptor()
            .timeout_secs
            .unwrap_or(self.timeout_floor_secs)
            .max(self.timeout_floor_secs);
        let semaphore = Arc::clone(&self.semaphore);

        tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("scan semaphore never closes");

            let budget = Duration::from_secs(budget_secs);

            match tokio::time::timeout(budget, module.execute(&ctx, &target, target_type)).await {
                Ok(Ok(findings)) => {
                    debug!(module = %name, findings = findings.len(), "module finished");
                    ModuleOutcome::ok(name, findings)
                }
                Ok(Err(e)) => {
                    warn!(module = %name, error = %e, "module failed");
                    ModuleOutcome::error(name, e.to_string())
                }
                Err(_) => {
                    warn!(module = %name, budget_secs, "module timed out");
                    ModuleOutcome::timeout(name, budget_secs)
                }
            }
        })
    }
}
