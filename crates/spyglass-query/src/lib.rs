//! Spyglass Query - structured query parsing for the Spyglass engine.
//!
//! Turns raw user input into a [`ParsedQuery`]: either a simple target
//! resolved through the classifier, or a structured `field:"value"`
//! expression with per-field validation.
//!
//! # Example
//!
//! ```rust
//! use spyglass_query::QueryParser;
//! use spyglass_core::TargetType;
//!
//! let parser = QueryParser::new();
//! let parsed = parser.parse(r#"email:"user@example.com""#);
//! assert_eq!(parsed.resolved_type, Some(TargetType::Email));
//! assert_eq!(parsed.primary_target, "user@example.com");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod parser;

pub use parser::{ParsedQuery, QueryKind, QueryParser};
