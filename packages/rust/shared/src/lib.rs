//! Shared types, error model, and configuration for the gazette analyzer.
//!
//! This crate is the foundation depended on by all other gazette crates.
//! It provides:
//! - [`GazetteError`], the unified error type
//! - The operation taxonomy ([`OperationKind`], [`Category`])
//! - Domain types ([`EntityRecord`], [`RegistryMatch`], [`Tier`], [`MonitorBatch`])
//! - Configuration ([`AppConfig`], [`AnalyzeConfig`], config loading)

pub mod config;
pub mod error;
pub mod taxonomy;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnalyzeConfig, AppConfig, DEFAULT_EXCERPT_CHARS, DefaultsConfig, RegistryConfig,
    ReportConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    registry_candidates, validate_config,
};
pub use error::{GazetteError, Result};
pub use taxonomy::{Category, HIGH_INTEREST_KINDS, NOISE_KINDS, OperationKind, PRIORITY_ORDER};
pub use types::{
    ClassifiedDraft, DATE_FORMAT, EntityRecord, MatchMethod, MonitorBatch, RecordDraft,
    RegistryMatch, ReportId, Tier,
};
