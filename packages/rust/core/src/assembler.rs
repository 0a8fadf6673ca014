//! Report assembler.
//!
//! Takes a finished [`MonitorBatch`] and builds the structured report model:
//! summary statistics, the high-interest subsection, the tiered listing of
//! ranked companies, and the per-monitor listing. Rendering is separate (see
//! [`crate::render`]). Input records are only read.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, instrument};

use gazette_shared::{Category, EntityRecord, MonitorBatch, OperationKind, ReportId, Tier};

/// How many operations the frequency table keeps.
const TOP_OPERATIONS: usize = 15;

/// The assembled report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: ReportId,
    pub generated_at: DateTime<Local>,
    /// Lowest monitor number in the batch.
    pub first_monitor: Option<u32>,
    /// Highest monitor number in the batch.
    pub last_monitor: Option<u32>,
    pub stats: ReportStats,
    /// Ranked, high-interest records, ascending rank.
    pub high_interest: Vec<RankedEntry>,
    /// Ranked, relevant records grouped by tier, most severe first.
    pub tiers: Vec<TierGroup>,
    /// Relevant records grouped by monitor, ascending.
    pub monitors: Vec<MonitorGroup>,
    /// Most frequent relevant operations, descending.
    pub top_operations: Vec<OperationCount>,
}

/// Summary counters. `total == relevant + noise` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub total: usize,
    pub relevant: usize,
    pub registry_matched: usize,
    pub high_interest_matched: usize,
    pub monitors: usize,
    pub noise: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub company: String,
    pub identifier: Option<String>,
    pub operation: &'static str,
    pub category: Category,
    pub monitor: u32,
    pub rank: u32,
    pub magnitude: u64,
    pub tier: Tier,
    pub high_interest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierGroup {
    pub tier: Tier,
    pub range: &'static str,
    pub entries: Vec<RankedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorGroup {
    pub monitor: u32,
    pub published: NaiveDate,
    pub entries: Vec<ListedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedEntry {
    pub seq: usize,
    pub company: String,
    pub operation: &'static str,
    pub ranked: bool,
    pub high_interest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationCount {
    pub operation: &'static str,
    pub count: usize,
}

/// Build the report model for a batch.
#[instrument(skip_all, fields(records = batch.records().len(), monitors = batch.monitor_count()))]
pub fn assemble(batch: &MonitorBatch, generated_at: DateTime<Local>) -> Report {
    let records = batch.records();
    let relevant: Vec<&EntityRecord> = records.iter().filter(|r| !r.is_noise()).collect();

    let high_interest = ranked_entries(relevant.iter().copied().filter(|r| r.is_high_interest()));
    let tiers = tier_groups(&relevant);
    let monitors = monitor_groups(batch, &relevant);

    let stats = ReportStats {
        total: records.len(),
        relevant: relevant.len(),
        registry_matched: relevant.iter().filter(|r| r.in_registry()).count(),
        high_interest_matched: high_interest.len(),
        monitors: batch.monitor_count(),
        noise: records.len() - relevant.len(),
    };

    debug!(?stats, tiers = tiers.len(), "report assembled");

    Report {
        id: ReportId::new(),
        generated_at,
        first_monitor: batch.monitors().keys().next().copied(),
        last_monitor: batch.monitors().keys().next_back().copied(),
        stats,
        high_interest,
        tiers,
        monitors,
        top_operations: operation_counts(&relevant),
    }
}

/// Ranked entries for the matched records, stable-sorted by rank.
fn ranked_entries<'a>(records: impl Iterator<Item = &'a EntityRecord>) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = records.filter_map(ranked_entry).collect();
    entries.sort_by_key(|e| e.rank);
    entries
}

fn ranked_entry(record: &EntityRecord) -> Option<RankedEntry> {
    let m = record.registry()?;
    Some(RankedEntry {
        company: record.company().to_string(),
        identifier: record.identifier().map(str::to_string),
        operation: record.operation_name(),
        category: record.category(),
        monitor: record.monitor(),
        rank: m.rank,
        magnitude: m.magnitude,
        tier: m.tier,
        high_interest: record.is_high_interest(),
    })
}

fn tier_groups(relevant: &[&EntityRecord]) -> Vec<TierGroup> {
    Tier::LISTED
        .iter()
        .filter_map(|&tier| {
            let entries =
                ranked_entries(relevant.iter().copied().filter(|r| r.tier() == Some(tier)));
            (!entries.is_empty()).then(|| TierGroup {
                tier,
                range: tier.range_label(),
                entries,
            })
        })
        .collect()
}

fn monitor_groups(batch: &MonitorBatch, relevant: &[&EntityRecord]) -> Vec<MonitorGroup> {
    let mut grouped: BTreeMap<u32, Vec<ListedEntry>> = BTreeMap::new();
    for record in relevant {
        grouped.entry(record.monitor()).or_default().push(ListedEntry {
            seq: record.seq(),
            company: record.company().to_string(),
            operation: record.operation_name(),
            ranked: record.in_registry(),
            high_interest: record.is_high_interest(),
        });
    }

    grouped
        .into_iter()
        .filter_map(|(monitor, entries)| {
            let published = *batch.monitors().get(&monitor)?;
            Some(MonitorGroup {
                monitor,
                published,
                entries,
            })
        })
        .collect()
}

/// Frequency of each operation among relevant records. Ties keep priority order.
fn operation_counts(relevant: &[&EntityRecord]) -> Vec<OperationCount> {
    let mut counts: HashMap<OperationKind, usize> = HashMap::new();
    for record in relevant {
        *counts.entry(record.operation()).or_default() += 1;
    }

    let mut counts: Vec<(OperationKind, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.priority().cmp(&b.0.priority())));
    counts
        .into_iter()
        .take(TOP_OPERATIONS)
        .map(|(kind, count)| OperationCount {
            operation: kind.display_name(),
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_shared::{MatchMethod, RecordDraft, RegistryMatch};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn record(
        seq: usize,
        monitor: u32,
        company: &str,
        kind: OperationKind,
        rank: Option<(u32, u64, Tier)>,
    ) -> EntityRecord {
        RecordDraft::new(seq, company, None, "", monitor)
            .classify(kind)
            .resolve(rank.map(|(rank, magnitude, tier)| RegistryMatch {
                identifier: format!("{rank}"),
                rank,
                magnitude,
                tier,
                method: MatchMethod::Name,
            }))
    }

    fn batch() -> MonitorBatch {
        let mut batch = MonitorBatch::new();
        batch.add_document(
            131,
            date(16),
            vec![
                record(1, 131, "A SRL", OperationKind::Merger, Some((40, 2_000_000_000, Tier::Large))),
                record(2, 131, "B SRL", OperationKind::ActivityCodeUpdate, Some((2, 20_000_000_000, Tier::Giant))),
                record(3, 131, "C SRL", OperationKind::OfficeRelocation, None),
            ],
        );
        batch.add_document(
            129,
            date(15),
            vec![
                record(1, 129, "D SA", OperationKind::CapitalIncrease, Some((7, 1_500_000_000, Tier::Large))),
                record(2, 129, "E SRL", OperationKind::NameChange, Some((900, 30_000_000, Tier::BelowThreshold))),
                record(3, 129, "F SA", OperationKind::CreditFacility, Some((1, 50_000_000_000, Tier::Giant))),
                record(4, 129, "G SRL", OperationKind::Merger, Some((40, 2_000_000_000, Tier::Large))),
            ],
        );
        batch
    }

    #[test]
    fn stats_reconcile() {
        let report = assemble(&batch(), Local::now());
        let s = report.stats;
        assert_eq!(s.total, 7);
        assert_eq!(s.noise, 1);
        assert_eq!(s.relevant, 6);
        assert_eq!(s.total, s.relevant + s.noise);
        assert_eq!(s.registry_matched, 5);
        assert_eq!(s.high_interest_matched, 4);
        assert_eq!(s.monitors, 2);
    }

    #[test]
    fn monitor_range() {
        let report = assemble(&batch(), Local::now());
        assert_eq!(report.first_monitor, Some(129));
        assert_eq!(report.last_monitor, Some(131));
    }

    #[test]
    fn high_interest_sorted_by_rank_with_stable_ties() {
        let report = assemble(&batch(), Local::now());
        let names: Vec<_> = report.high_interest.iter().map(|e| e.company.as_str()).collect();
        // A and G share rank 40; A was detected first.
        assert_eq!(names, ["F SA", "D SA", "A SRL", "G SRL"]);
    }

    #[test]
    fn tiers_skip_noise_empty_and_below_threshold() {
        let report = assemble(&batch(), Local::now());
        let tiers: Vec<_> = report.tiers.iter().map(|g| g.tier).collect();
        assert_eq!(tiers, [Tier::Giant, Tier::Large]);

        let giant: Vec<_> = report.tiers[0].entries.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(giant, ["F SA"]);
        let large: Vec<_> = report.tiers[1].entries.iter().map(|e| e.rank).collect();
        assert_eq!(large, [7, 40, 40]);
        assert_eq!(report.tiers[1].range, "1-10 mld lei");
    }

    #[test]
    fn monitors_ascending_in_detection_order() {
        let report = assemble(&batch(), Local::now());
        assert_eq!(report.monitors.len(), 2);

        let first = &report.monitors[0];
        assert_eq!(first.monitor, 129);
        assert_eq!(first.published, date(15));
        let seqs: Vec<_> = first.entries.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, [1, 2, 3, 4]);

        let second = &report.monitors[1];
        let names: Vec<_> = second.entries.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(names, ["A SRL", "C SRL"]);
        assert!(second.entries[0].ranked && second.entries[0].high_interest);
        assert!(!second.entries[1].ranked);
    }

    #[test]
    fn operation_frequencies() {
        let report = assemble(&batch(), Local::now());
        assert_eq!(report.top_operations[0].operation, "Fuziune");
        assert_eq!(report.top_operations[0].count, 2);
        assert!(report.top_operations.iter().all(|o| o.operation != "Actualizare CAEN Rev.3"));
    }

    #[test]
    fn assembling_twice_gives_same_content() {
        let batch = batch();
        let now = Local::now();
        let a = assemble(&batch, now);
        let b = assemble(&batch, now);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.tiers, b.tiers);
        assert_eq!(a.monitors, b.monitors);
        assert_ne!(a.id, b.id);
        assert_eq!(batch.records().len(), 7);
    }

    #[test]
    fn empty_batch() {
        let report = assemble(&MonitorBatch::new(), Local::now());
        assert_eq!(report.stats.total, 0);
        assert_eq!(report.first_monitor, None);
        assert!(report.tiers.is_empty());
        assert!(report.monitors.is_empty());
    }
}
