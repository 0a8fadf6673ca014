//! Snapshot of the largest-companies registry.
//!
//! The registry is a JSON object keyed by registration identifier, each entry
//! carrying the company name, its 1-based rank and its revenue in lei:
//!
//! ```json
//! { "14399840": { "denumire": "OMV PETROM S.A.", "rank": 1, "ca": 53000000000 } }
//! ```
//!
//! Lookups try the identifier first and fall back to a normalized-name index.
//! The snapshot is read once and never mutated.

mod normalize;
mod tier;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gazette_shared::{GazetteError, MatchMethod, RegistryMatch, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

pub use normalize::normalize_name;
pub use tier::classify_tier;

/// One registry row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(alias = "denumire")]
    pub name: String,
    pub rank: u32,
    #[serde(alias = "ca")]
    pub magnitude: u64,
}

/// Read-only registry with identifier and name indexes.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, RegistryEntry>,
    by_name: HashMap<String, String>,
    source: Option<PathBuf>,
    available: bool,
}

impl Registry {
    /// A registry with no entries, flagged unavailable. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from already-parsed entries.
    pub fn from_entries(entries: HashMap<String, RegistryEntry>) -> Self {
        let entries: HashMap<String, RegistryEntry> = entries
            .into_iter()
            .map(|(id, entry)| (normalize_identifier(&id), entry))
            .collect();
        let by_name = build_name_index(&entries);

        Self {
            entries,
            by_name,
            source: None,
            available: true,
        }
    }

    /// Parse a registry from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, RegistryEntry> = serde_json::from_str(json)
            .map_err(|e| GazetteError::Registry(format!("malformed registry: {e}")))?;
        Ok(Self::from_entries(entries))
    }

    /// Load a registry file. A missing or malformed file is an error.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GazetteError::io(path, e))?;
        let mut registry = Self::from_json(&json).map_err(|e| match e {
            GazetteError::Registry(msg) => {
                GazetteError::Registry(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        registry.source = Some(path.to_path_buf());

        info!(
            entries = registry.len(),
            names = registry.by_name.len(),
            "registry loaded"
        );
        Ok(registry)
    }

    /// Open the first candidate path that exists.
    ///
    /// When none exists the registry is unavailable: a warning is logged and an
    /// empty registry is returned so analysis can continue without ranks. A
    /// candidate that exists but fails to parse is still an error.
    pub fn discover(candidates: &[PathBuf]) -> Result<Self> {
        for path in candidates {
            if path.is_file() {
                return Self::open(path);
            }
            debug!(path = %path.display(), "registry candidate not found");
        }

        warn!(
            candidates = candidates.len(),
            "registry unavailable; records will not be ranked"
        );
        Ok(Self::empty())
    }

    /// Whether a registry snapshot was actually loaded.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// File the snapshot came from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identifier: &str) -> Option<&RegistryEntry> {
        self.entries.get(&normalize_identifier(identifier))
    }

    /// Resolve a company against the registry.
    ///
    /// An identifier hit wins outright; otherwise the normalized company name
    /// is looked up. A miss is `None`, never an error.
    pub fn resolve(&self, company: &str, identifier: Option<&str>) -> Option<RegistryMatch> {
        if let Some(id) = identifier {
            let id = normalize_identifier(id);
            if let Some(entry) = self.entries.get(&id) {
                return Some(to_match(id, entry, MatchMethod::Identifier));
            }
        }

        let key = normalize_name(company);
        if key.is_empty() {
            return None;
        }
        let id = self.by_name.get(&key)?;
        let entry = self.entries.get(id)?;
        Some(to_match(id.clone(), entry, MatchMethod::Name))
    }
}

fn to_match(identifier: String, entry: &RegistryEntry, method: MatchMethod) -> RegistryMatch {
    RegistryMatch {
        identifier,
        rank: entry.rank,
        magnitude: entry.magnitude,
        tier: classify_tier(entry.magnitude),
        method,
    }
}

/// Strip whitespace and an `RO` fiscal prefix from an identifier key.
fn normalize_identifier(id: &str) -> String {
    let id = id.trim();
    let id = id
        .strip_prefix("RO")
        .or_else(|| id.strip_prefix("ro"))
        .unwrap_or(id);
    id.trim().to_string()
}

/// Normalized name → identifier. On collision the better (lower) rank wins,
/// then the smaller identifier, so the index does not depend on map order.
fn build_name_index(entries: &HashMap<String, RegistryEntry>) -> HashMap<String, String> {
    let mut index: HashMap<String, String> = HashMap::with_capacity(entries.len());

    for (id, entry) in entries {
        let key = normalize_name(&entry.name);
        if key.is_empty() {
            continue;
        }

        let replace = match index.get(&key).and_then(|held| entries.get_key_value(held)) {
            Some((held_id, held)) => (entry.rank, id) < (held.rank, held_id),
            None => true,
        };
        if replace {
            index.insert(key, id.clone());
        }
    }

    index
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
