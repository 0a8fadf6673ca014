//! Single-document alert summaries for downstream automation.

use serde::Serialize;

use gazette_shared::{EntityRecord, OperationKind};

use crate::render::group_thousands;

/// Suffix appended to the reason of high-interest alerts.
const HIGH_INTEREST_SUFFIX: &str = " - operațiune de interes major";

/// One alert: a ranked company with a relevant operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub company: String,
    pub identifier: Option<String>,
    pub operation_id: OperationKind,
    pub operation: &'static str,
    pub reason: String,
    pub monitor: u32,
    pub tier: &'static str,
}

/// Everything a caller needs to decide whether a gazette issue matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    pub monitor: u32,
    pub total_records: usize,
    pub total_alerts: usize,
    pub alerts: Vec<Alert>,
    pub registry_matched: usize,
    pub high_interest_matched: usize,
}

/// Build the summary for one document's records.
///
/// Every ranked, non-noise record raises an alert, in detection order.
pub fn build_alerts(monitor: u32, records: &[EntityRecord]) -> AlertSummary {
    let alerts: Vec<Alert> = records
        .iter()
        .filter(|r| !r.is_noise())
        .filter_map(|r| {
            let m = r.registry()?;
            Some(Alert {
                company: r.company().to_string(),
                identifier: r.identifier().map(str::to_string),
                operation_id: r.operation(),
                operation: r.operation_name(),
                reason: alert_reason(m.rank, m.magnitude, r.is_high_interest()),
                monitor,
                tier: m.tier.label(),
            })
        })
        .collect();

    AlertSummary {
        monitor,
        total_records: records.len(),
        total_alerts: alerts.len(),
        alerts,
        registry_matched: records.iter().filter(|r| r.in_registry()).count(),
        high_interest_matched: records
            .iter()
            .filter(|r| r.in_registry() && r.is_high_interest())
            .count(),
    }
}

/// `Companie TOP #<rank> (CA: <magnitude> lei)`, flagged when high-interest.
pub fn alert_reason(rank: u32, magnitude: u64, high_interest: bool) -> String {
    let mut reason = format!("Companie TOP #{rank} (CA: {} lei)", group_thousands(magnitude));
    if high_interest {
        reason.push_str(HIGH_INTEREST_SUFFIX);
    }
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_shared::{MatchMethod, RecordDraft, RegistryMatch, Tier};

    fn record(seq: usize, kind: OperationKind, rank: Option<(u32, u64, Tier)>) -> EntityRecord {
        let draft = RecordDraft::new(seq, format!("FIRMA {seq} SRL"), Some(format!("{seq}000000")), "text", 42)
            .classify(kind);
        draft.resolve(rank.map(|(rank, magnitude, tier)| RegistryMatch {
            identifier: format!("{seq}000000"),
            rank,
            magnitude,
            tier,
            method: MatchMethod::Identifier,
        }))
    }

    #[test]
    fn reason_formats() {
        assert_eq!(
            alert_reason(5, 700_000_000, false),
            "Companie TOP #5 (CA: 700,000,000 lei)"
        );
        assert_eq!(
            alert_reason(1, 53_000_000_000, true),
            "Companie TOP #1 (CA: 53,000,000,000 lei) - operațiune de interes major"
        );
    }

    #[test]
    fn only_ranked_relevant_records_alert() {
        let records = vec![
            record(1, OperationKind::Merger, Some((3, 28_000_000_000, Tier::Giant))),
            record(2, OperationKind::OfficeRelocation, None),
            record(3, OperationKind::ActivityCodeUpdate, Some((9, 900_000_000, Tier::UpperMid))),
            record(4, OperationKind::NameChange, Some((400, 60_000_000, Tier::SmallRanked))),
        ];

        let summary = build_alerts(42, &records);
        assert_eq!(summary.monitor, 42);
        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.total_alerts, 2);
        assert_eq!(summary.registry_matched, 3);
        assert_eq!(summary.high_interest_matched, 1);

        assert_eq!(summary.alerts[0].company, "FIRMA 1 SRL");
        assert!(summary.alerts[0].reason.ends_with("interes major"));
        assert_eq!(summary.alerts[0].tier, "GIGANT");
        assert_eq!(summary.alerts[1].operation, "Schimbare denumire");
        assert_eq!(summary.alerts[1].tier, "MICI DIN TOP");
        assert!(!summary.alerts[1].reason.contains("interes"));
    }

    #[test]
    fn empty_document_has_empty_summary() {
        let summary = build_alerts(7, &[]);
        assert_eq!(summary.total_records, 0);
        assert!(summary.alerts.is_empty());
    }

    #[test]
    fn serializes_with_operation_id() {
        let records = vec![record(1, OperationKind::Merger, Some((3, 28_000_000_000, Tier::Giant)))];
        let json = serde_json::to_value(build_alerts(1, &records)).unwrap();
        assert_eq!(json["alerts"][0]["operation_id"], "fuziune");
        assert_eq!(json["alerts"][0]["identifier"], "1000000");
        assert_eq!(json["total_alerts"], 1);
    }
}
