//! Core domain types: entity records, registry matches, tiers, batches.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::taxonomy::{Category, OperationKind};

/// Display format for publication dates (`15.01.2026`).
pub const DATE_FORMAT: &str = "%d.%m.%Y";

// ---------------------------------------------------------------------------
// ReportId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for report identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub Uuid);

impl ReportId {
    /// Generate a new time-sortable report identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ReportId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Revenue magnitude bucket, most severe first.
///
/// Ordering follows declaration order, so sorting ascending yields
/// descending severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Above 10 billion lei.
    Giant,
    /// Above 1 billion lei.
    Large,
    /// Above 500 million lei.
    UpperMid,
    /// Above 200 million lei.
    Mid,
    /// Above 100 million lei.
    LowerMid,
    /// Above 50 million lei.
    SmallRanked,
    /// 50 million lei or less. Counted, never listed.
    BelowThreshold,
}

impl Tier {
    /// Tiers that get their own group in the report, in severity order.
    pub const LISTED: [Tier; 6] = [
        Tier::Giant,
        Tier::Large,
        Tier::UpperMid,
        Tier::Mid,
        Tier::LowerMid,
        Tier::SmallRanked,
    ];

    /// Label as printed in reports and alerts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Giant => "GIGANT",
            Self::Large => "MARI",
            Self::UpperMid => "MEDII-MARI",
            Self::Mid => "MEDII",
            Self::LowerMid => "MEDII-MICI",
            Self::SmallRanked => "MICI DIN TOP",
            Self::BelowThreshold => "SUB 50M",
        }
    }

    /// Human-readable revenue range.
    pub fn range_label(self) -> &'static str {
        match self {
            Self::Giant => "> 10 mld lei",
            Self::Large => "1-10 mld lei",
            Self::UpperMid => "500M - 1 mld lei",
            Self::Mid => "200M - 500M lei",
            Self::LowerMid => "100M - 200M lei",
            Self::SmallRanked => "50M - 100M lei",
            Self::BelowThreshold => "< 50M lei",
        }
    }

    /// Whether the tier gets a group in the tiered listing.
    pub fn is_listed(self) -> bool {
        self != Self::BelowThreshold
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RegistryMatch
// ---------------------------------------------------------------------------

/// How a record was tied to a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Identifier,
    Name,
}

/// Resolution result for a matched company. Rank, magnitude and tier always
/// travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryMatch {
    /// Registry key of the matched entry.
    pub identifier: String,
    /// 1 = largest company in the registry.
    pub rank: u32,
    /// Revenue in lei.
    pub magnitude: u64,
    /// Bucket derived from `magnitude`.
    pub tier: Tier,
    /// Which lookup path produced the match.
    pub method: MatchMethod,
}

// ---------------------------------------------------------------------------
// Record drafts
// ---------------------------------------------------------------------------

/// A company mention freshly cut out of a document, before classification.
#[derive(Debug, Clone)]
pub struct RecordDraft {
    seq: usize,
    company: String,
    identifier: Option<String>,
    excerpt: String,
    monitor: u32,
}

impl RecordDraft {
    /// Start a record. `seq` is the 1-based position within its document.
    pub fn new(
        seq: usize,
        company: impl Into<String>,
        identifier: Option<String>,
        excerpt: impl Into<String>,
        monitor: u32,
    ) -> Self {
        Self {
            seq,
            company: company.into(),
            identifier,
            excerpt: excerpt.into(),
            monitor,
        }
    }

    /// Attach the classifier's verdict.
    pub fn classify(self, operation: OperationKind) -> ClassifiedDraft {
        ClassifiedDraft {
            draft: self,
            operation,
        }
    }
}

/// A classified draft waiting for registry resolution.
#[derive(Debug, Clone)]
pub struct ClassifiedDraft {
    draft: RecordDraft,
    operation: OperationKind,
}

impl ClassifiedDraft {
    pub fn company(&self) -> &str {
        &self.draft.company
    }

    pub fn identifier(&self) -> Option<&str> {
        self.draft.identifier.as_deref()
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// Finalize into an immutable record.
    pub fn resolve(self, registry: Option<RegistryMatch>) -> EntityRecord {
        let RecordDraft {
            seq,
            company,
            identifier,
            excerpt,
            monitor,
        } = self.draft;
        let operation = self.operation;

        EntityRecord {
            seq,
            company,
            identifier,
            operation,
            operation_name: operation.display_name(),
            category: operation.category(),
            excerpt,
            monitor,
            registry,
            noise: operation.is_noise(),
            high_interest: operation.is_high_interest(),
        }
    }
}

// ---------------------------------------------------------------------------
// EntityRecord
// ---------------------------------------------------------------------------

/// One company mention, fully classified and resolved. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    seq: usize,
    company: String,
    identifier: Option<String>,
    operation: OperationKind,
    operation_name: &'static str,
    category: Category,
    excerpt: String,
    monitor: u32,
    registry: Option<RegistryMatch>,
    noise: bool,
    high_interest: bool,
}

impl EntityRecord {
    /// 1-based position within the source document.
    pub fn seq(&self) -> usize {
        self.seq
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn operation_name(&self) -> &'static str {
        self.operation_name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Sanitized notice text, truncated.
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    pub fn monitor(&self) -> u32 {
        self.monitor
    }

    pub fn registry(&self) -> Option<&RegistryMatch> {
        self.registry.as_ref()
    }

    pub fn in_registry(&self) -> bool {
        self.registry.is_some()
    }

    pub fn rank(&self) -> Option<u32> {
        self.registry.as_ref().map(|m| m.rank)
    }

    pub fn magnitude(&self) -> Option<u64> {
        self.registry.as_ref().map(|m| m.magnitude)
    }

    pub fn tier(&self) -> Option<Tier> {
        self.registry.as_ref().map(|m| m.tier)
    }

    pub fn is_noise(&self) -> bool {
        self.noise
    }

    pub fn is_high_interest(&self) -> bool {
        self.high_interest
    }
}

// ---------------------------------------------------------------------------
// MonitorBatch
// ---------------------------------------------------------------------------

/// Records and publication dates accumulated over one batch request.
#[derive(Debug, Clone, Default)]
pub struct MonitorBatch {
    monitors: BTreeMap<u32, NaiveDate>,
    records: Vec<EntityRecord>,
}

impl MonitorBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processed document. A repeated monitor number keeps the
    /// latest date and appends the records.
    pub fn add_document(&mut self, monitor: u32, published: NaiveDate, records: Vec<EntityRecord>) {
        self.monitors.insert(monitor, published);
        self.records.extend(records);
    }

    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    /// Monitor number → publication date, ascending by number.
    pub fn monitors(&self) -> &BTreeMap<u32, NaiveDate> {
        &self.monitors
    }

    pub fn contains_monitor(&self, monitor: u32) -> bool {
        self.monitors.contains_key(&monitor)
    }

    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    /// Records that survive noise filtering.
    pub fn relevant_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_noise()).count()
    }
}
