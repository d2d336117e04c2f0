//! `spyglass scan` - run a scan and render the report.

use anyhow::Result;
use spyglass_core::{AppConfig, EnvCredentialStore, OutcomeStatus, RiskTier};
use spyglass_scanner::{NullProgress, ProgressEvent, ProgressSink, ScanOrchestrator, ScanReport};
use std::sync::Arc;

/// Progress renderer writing one line per event to stderr.
struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn emit(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::DetectDone { target_type } => {
                eprintln!("[*] Detected target type: {}", target_type.display_name());
            }
            ProgressEvent::ModulesLoaded {
                count,
                skipped_count,
            } => {
                eprintln!("[*] Running {count} module(s), {skipped_count} skipped");
            }
            ProgressEvent::ModuleStart { name } => {
                eprintln!("[>] {name}");
            }
            ProgressEvent::ModuleDone { name, status } => {
                eprintln!("[<] {name}: {status}");
            }
            ProgressEvent::ScanDone { findings_count } => {
                eprintln!("[*] Scan complete: {findings_count} finding(s)");
            }
        }
    }
}

pub async fn run(query: &str, json: bool, quiet: bool) -> Result<()> {
    let config = AppConfig::load_with_env()?;
    let registry = super::registry();
    let orchestrator =
        ScanOrchestrator::new(registry, Arc::new(EnvCredentialStore), &config)?;

    let report = if quiet {
        orchestrator.scan_query(query, &NullProgress).await?
    } else {
        orchestrator.scan_query(query, &StderrProgress).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_text(&report);
    }

    Ok(())
}

fn risk_marker(risk: RiskTier) -> &'static str {
    match risk {
        RiskTier::Low => " ",
        RiskTier::Medium => "*",
        RiskTier::High => "!",
        RiskTier::Critical => "!!",
    }
}

fn render_text(report: &ScanReport) {
    println!(
        "Target: {} ({})",
        report.target,
        report.target_type.display_name()
    );

    if report.findings.is_empty() {
        println!("\nNo findings.");
    } else {
        // Group findings under the module that produced them
        let mut last_source = "";
        for finding in &report.findings {
            if finding.source != last_source {
                println!("\n[{}]", finding.source);
                last_source = &finding.source;
            }
            println!(
                "  {:>2} {}: {}",
                risk_marker(finding.risk),
                finding.label,
                finding.value
            );
        }
    }

    let problems: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| o.status != OutcomeStatus::Ok)
        .collect();

    if !problems.is_empty() {
        println!();
        for outcome in problems {
            let detail = outcome.error_detail.as_deref().unwrap_or("");
            println!("  {}: {} ({})", outcome.module_name, outcome.status, detail);
        }
    }
}
