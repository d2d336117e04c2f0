//! Spyglass Scanner - concurrent scan orchestration.
//!
//! Runs eligible lookup modules against a classified target under a
//! global concurrency ceiling and per-module time budgets, isolates
//! failures, streams progress events, and aggregates findings.
//!
//! # Modules
//!
//! - [`orchestrator`] - `ScanOrchestrator` and `ScanReport`
//! - [`eligibility`] - Free/key-gated module gating
//! - [`aggregate`] - Findings flattening and sentinel filtering
//! - [`progress`] - Progress events and sinks
//! - [`error`] - Scan boundary errors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregate;
pub mod eligibility;
pub mod error;
pub mod orchestrator;
pub mod progress;

pub use error::{Result, ScanError};
pub use orchestrator::{ScanOrchestrator, ScanReport};
pub use progress::{NullProgress, ProgressEvent, ProgressSink};
