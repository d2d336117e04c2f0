//! Scan progress events.
//!
//! Events are advisory: they carry no data a consumer needs for
//! correctness, and the serialized form is versioned only by its `event`
//! tag, so consumers must ignore events they do not recognize.

use serde::{Deserialize, Serialize};
use spyglass_core::{OutcomeStatus, TargetType};

/// One progress notification emitted during a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Target classification finished
    DetectDone {
        /// The resolved type
        target_type: TargetType,
    },
    /// Eligibility filtering finished
    ModulesLoaded {
        /// Modules that will run
        count: usize,
        /// Modules skipped (ineligible or disabled)
        skipped_count: usize,
    },
    /// A module was launched
    ModuleStart {
        /// Module name
        name: String,
    },
    /// A module reached a terminal state
    ModuleDone {
        /// Module name
        name: String,
        /// Terminal status
        status: OutcomeStatus,
    },
    /// The scan finished
    ScanDone {
        /// Findings surviving aggregation
        findings_count: usize,
    },
}

/// Consumer of progress events.
///
/// Implementations must be cheap and non-blocking; the orchestrator
/// emits from its hot path.
pub trait ProgressSink: Send + Sync {
    /// Receive one event.
    fn emit(&self, event: &ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: &ProgressEvent) {
        self(event);
    }
}

/// Sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn emit(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = ProgressEvent::ModuleDone {
            name: "ipinfo".to_string(),
            status: OutcomeStatus::Ok,
        };
        let json = serde_json::to_value(&event).expect("serialize event");
        assert_eq!(json["event"], "module_done");
        assert_eq!(json["name"], "ipinfo");
        assert_eq!(json["status"], "ok");
    }

    #[test]
    fn test_scan_done_roundtrip() {
        let event = ProgressEvent::ScanDone { findings_count: 42 };
        let json = serde_json::to_string(&event).expect("serialize event");
        let back: ProgressEvent = serde_json::from_str(&json).expect("deserialize event");
        assert_eq!(back, event);
    }

    #[test]
    fn test_closure_sink() {
        use std::sync::Mutex;
        let seen: Mutex<Vec<ProgressEvent>> = Mutex::new(Vec::new());

        let sink = |event: &ProgressEvent| {
            seen.lock().expect("acquire events lock").push(event.clone());
        };
        sink.emit(&ProgressEvent::ScanDone { findings_count: 1 });

        assert_eq!(seen.lock().expect("acquire events lock").len(), 1);
    }
}
