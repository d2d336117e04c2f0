//! Integration tests for scan orchestration using mock modules.

use async_trait::async_trait;
use spyglass_core::{
    AppConfig, Finding, MemoryCredentialStore, ModuleOutcome, OutcomeStatus, RiskTier, TargetType,
    NONE_FOUND,
};
use spyglass_plugin::{
    CredentialRequirement, LookupModule, ModuleContext, ModuleDescriptor, ModuleError,
    ModuleRegistry, ModuleResult,
};
use spyglass_scanner::{NullProgress, ProgressEvent, ProgressSink, ScanError, ScanOrchestrator};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Behavior {
    Findings(Vec<Finding>),
    Fail(String),
    SleepThenFindings(Duration, Vec<Finding>),
}

struct TestModule {
    descriptor: ModuleDescriptor,
    behavior: Behavior,
}

impl TestModule {
    fn succeeding(name: &str, label: &str, value: &str) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ModuleDescriptor::new(name, name, "test")
                .with_free_types([TargetType::Email]),
            behavior: Behavior::Findings(vec![Finding::new(label, value, name)]),
        })
    }

    fn failing(name: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ModuleDescriptor::new(name, name, "test")
                .with_free_types([TargetType::Email]),
            behavior: Behavior::Fail(message.to_string()),
        })
    }

    fn sleeping(name: &str, sleep: Duration, timeout_secs: Option<u64>) -> Arc<Self> {
        let mut descriptor =
            ModuleDescriptor::new(name, name, "test").with_free_types([TargetType::Email]);
        if let Some(secs) = timeout_secs {
            descriptor = descriptor.with_timeout_secs(secs);
        }
        Arc::new(Self {
            descriptor,
            behavior: Behavior::SleepThenFindings(
                sleep,
                vec![Finding::new("Slow", "done", name)],
            ),
        })
    }

    fn key_gated(name: &str, key: &str) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ModuleDescriptor::new(name, name, "test")
                .with_key_gated_types([TargetType::Email])
                .with_credential(CredentialRequirement::required(key, key, "https://example.com")),
            behavior: Behavior::Findings(vec![Finding::new("Gated", "ran", name)]),
        })
    }

    fn clean(name: &str) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ModuleDescriptor::new(name, name, "test")
                .with_free_types([TargetType::Email]),
            behavior: Behavior::Findings(vec![Finding::new("Lookup", NONE_FOUND, name)]),
        })
    }
}

#[async_trait]
impl LookupModule for TestModule {
    fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        _ctx: &ModuleContext,
        _target: &str,
        _target_type: TargetType,
    ) -> ModuleResult<Vec<Finding>> {
        match &self.behavior {
            Behavior::Findings(findings) => Ok(findings.clone()),
            Behavior::Fail(message) => Err(ModuleError::InvalidResponse(message.clone())),
            Behavior::SleepThenFindings(sleep, findings) => {
                tokio::time::sleep(*sleep).await;
                Ok(findings.clone())
            }
        }
    }
}

struct CollectSink(Mutex<Vec<ProgressEvent>>);

impl CollectSink {
    fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    fn events(&self) -> Vec<ProgressEvent> {
        self.0.lock().expect("acquire events lock").clone()
    }
}

impl ProgressSink for CollectSink {
    fn emit(&self, event: &ProgressEvent) {
        self.0.lock().expect("acquire events lock").push(event.clone());
    }
}

fn orchestrator_with(
    modules: Vec<Arc<dyn LookupModule>>,
    credentials: MemoryCredentialStore,
    config: &AppConfig,
) -> ScanOrchestrator {
    let registry = Arc::new(ModuleRegistry::new());
    registry.discover(modules, vec![]);
    ScanOrchestrator::new(registry, Arc::new(credentials), config).expect("build orchestrator")
}

fn outcome_for<'a>(outcomes: &'a [ModuleOutcome], name: &str) -> &'a ModuleOutcome {
    outcomes
        .iter()
        .find(|o| o.module_name == name)
        .unwrap_or_else(|| panic!("missing outcome for {name}"))
}

#[tokio::test]
async fn failing_module_does_not_affect_siblings() {
    let orchestrator = orchestrator_with(
        vec![
            TestModule::succeeding("good", "Location", "Oslo"),
            TestModule::failing("bad", "boom"),
        ],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let report = orchestrator
        .scan("user@example.com", TargetType::Email, &NullProgress)
        .await;

    assert_eq!(report.outcomes.len(), 2);

    let good = outcome_for(&report.outcomes, "good");
    assert_eq!(good.status, OutcomeStatus::Ok);

    let bad = outcome_for(&report.outcomes, "bad");
    assert_eq!(bad.status, OutcomeStatus::Error);
    assert!(bad.error_detail.as_deref().expect("error detail").contains("boom"));

    // The failure contributed no findings; the success did
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].value, "Oslo");
}

#[tokio::test(start_paused = true)]
async fn slow_module_times_out_with_synthetic_finding() {
    let mut config = AppConfig::default();
    config.scanning.module_timeout_floor_secs = 5;

    let orchestrator = orchestrator_with(
        vec![
            TestModule::sleeping("slow", Duration::from_secs(3600), None),
            TestModule::succeeding("fast", "Location", "Oslo"),
        ],
        MemoryCredentialStore::new(),
        &config,
    );

    let report = orchestrator
        .scan("user@example.com", TargetType::Email, &NullProgress)
        .await;

    let slow = outcome_for(&report.outcomes, "slow");
    assert_eq!(slow.status, OutcomeStatus::Timeout);
    assert_eq!(slow.findings.len(), 1);
    assert_eq!(slow.findings[0].label, "Timeout");
    assert_eq!(slow.findings[0].risk, RiskTier::Medium);

    // The timeout's synthetic finding joins the fast module's real one
    let labels: Vec<&str> = report.findings.iter().map(|f| f.label.as_str()).collect();
    assert!(labels.contains(&"Timeout"));
    assert!(labels.contains(&"Location"));
}

#[tokio::test(start_paused = true)]
async fn descriptor_timeout_below_floor_is_raised() {
    // Floor 25s; module asks for 1s but sleeps 10s. The floor wins, so
    // the module completes.
    let orchestrator = orchestrator_with(
        vec![TestModule::sleeping("eager", Duration::from_secs(10), Some(1))],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let report = orchestrator
        .scan("user@example.com", TargetType::Email, &NullProgress)
        .await;

    assert_eq!(outcome_for(&report.outcomes, "eager").status, OutcomeStatus::Ok);
}

#[tokio::test]
async fn key_gated_module_skipped_without_credential() {
    let orchestrator = orchestrator_with(
        vec![TestModule::key_gated("gated", "svc")],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let report = orchestrator
        .scan("user@example.com", TargetType::Email, &NullProgress)
        .await;

    let gated = outcome_for(&report.outcomes, "gated");
    assert_eq!(gated.status, OutcomeStatus::Skipped);
    assert_eq!(gated.error_detail.as_deref(), Some("set svc API key"));
    assert!(gated.findings.is_empty());
}

#[tokio::test]
async fn key_gated_module_runs_with_credential() {
    let orchestrator = orchestrator_with(
        vec![TestModule::key_gated("gated", "svc")],
        MemoryCredentialStore::new().with_key("svc", "secret"),
        &AppConfig::default(),
    );

    let report = orchestrator
        .scan("user@example.com", TargetType::Email, &NullProgress)
        .await;

    assert_eq!(outcome_for(&report.outcomes, "gated").status, OutcomeStatus::Ok);
    assert_eq!(report.findings.len(), 1);
}

#[tokio::test]
async fn disabled_module_is_skipped() {
    let mut config = AppConfig::default();
    config.modules.disabled = vec!["muted".to_string()];

    let orchestrator = orchestrator_with(
        vec![TestModule::succeeding("muted", "X", "y")],
        MemoryCredentialStore::new(),
        &config,
    );

    let report = orchestrator
        .scan("user@example.com", TargetType::Email, &NullProgress)
        .await;

    let muted = outcome_for(&report.outcomes, "muted");
    assert_eq!(muted.status, OutcomeStatus::Skipped);
    assert_eq!(muted.error_detail.as_deref(), Some("disabled in configuration"));
    assert!(report.findings.is_empty());
}

#[tokio::test]
async fn empty_registry_yields_well_formed_empty_report() {
    let orchestrator = orchestrator_with(
        vec![],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let sink = CollectSink::new();
    let report = orchestrator
        .scan("user@example.com", TargetType::Email, &sink)
        .await;

    assert!(report.outcomes.is_empty());
    assert!(report.findings.is_empty());

    let events = sink.events();
    assert!(matches!(events.first(), Some(ProgressEvent::DetectDone { .. })));
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::ScanDone { findings_count: 0 })
    ));
}

#[tokio::test]
async fn clean_sentinel_findings_are_filtered() {
    let orchestrator = orchestrator_with(
        vec![
            TestModule::clean("clean"),
            TestModule::succeeding("real", "Breaches", "Found in 3 breaches"),
        ],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let report = orchestrator
        .scan("user@example.com", TargetType::Email, &NullProgress)
        .await;

    // The clean module still reports Ok, but contributes no findings
    assert_eq!(outcome_for(&report.outcomes, "clean").status, OutcomeStatus::Ok);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].label, "Breaches");
}

#[tokio::test]
async fn progress_events_follow_scan_lifecycle() {
    let orchestrator = orchestrator_with(
        vec![
            TestModule::succeeding("one", "A", "1"),
            TestModule::key_gated("gated", "svc"),
        ],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let sink = CollectSink::new();
    orchestrator
        .scan("user@example.com", TargetType::Email, &sink)
        .await;

    let events = sink.events();

    assert_eq!(
        events[0],
        ProgressEvent::DetectDone {
            target_type: TargetType::Email
        }
    );
    assert_eq!(
        events[1],
        ProgressEvent::ModulesLoaded {
            count: 1,
            skipped_count: 1
        }
    );
    assert!(events.contains(&ProgressEvent::ModuleStart {
        name: "one".to_string()
    }));
    assert!(events.contains(&ProgressEvent::ModuleDone {
        name: "one".to_string(),
        status: OutcomeStatus::Ok
    }));
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::ScanDone { findings_count: 1 })
    ));
}

#[tokio::test]
async fn scan_query_resolves_structured_queries() {
    let orchestrator = orchestrator_with(
        vec![TestModule::succeeding("good", "Location", "Oslo")],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let report = orchestrator
        .scan_query(r#"email:"user@example.com""#, &NullProgress)
        .await
        .expect("structured query scans");

    assert_eq!(report.target, "user@example.com");
    assert_eq!(report.target_type, TargetType::Email);
    assert_eq!(report.findings.len(), 1);
}

#[tokio::test]
async fn scan_query_surfaces_ambiguity_with_prefix_examples() {
    let orchestrator = orchestrator_with(
        vec![],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let err = orchestrator
        .scan_query("??", &NullProgress)
        .await
        .expect_err("unclassifiable target must error");

    let ScanError::AmbiguousTarget { message } = err else {
        panic!("expected ambiguous target error");
    };
    assert!(message.contains("email:test@test.com"));
    assert!(message.contains("ip:1.1.1.1"));
}

#[tokio::test]
async fn scan_query_rejects_invalid_structured_query() {
    let orchestrator = orchestrator_with(
        vec![],
        MemoryCredentialStore::new(),
        &AppConfig::default(),
    );

    let err = orchestrator
        .scan_query(r#"email:"not-an-email""#, &NullProgress)
        .await
        .expect_err("invalid field value must error");

    assert!(matches!(err, ScanError::InvalidQuery { .. }));
    assert!(err.to_string().contains("Invalid format for email"));
}
