//! Core analysis for gazette company notices.
//!
//! This crate ties together segmentation, identifier extraction, operation
//! classification and registry resolution into the two requests the front
//! ends expose: a batch report over several gazette issues
//! ([`pipeline::Analyzer::process_batch`]) and a single-issue alert summary
//! ([`pipeline::Analyzer::alerts`]).

pub mod alerts;
pub mod assembler;
pub mod classifier;
pub mod intake;
pub mod pipeline;
pub mod render;

pub use alerts::{Alert, AlertSummary, build_alerts};
pub use assembler::{Report, ReportStats, assemble};
pub use classifier::{PatternRule, RuleSet};
pub use intake::DocumentInput;
pub use pipeline::{
    Analyzer, BatchResult, DocumentIssue, IssueKind, ProgressReporter, SilentProgress,
};
pub use render::{ReportFormat, render, write_report};
