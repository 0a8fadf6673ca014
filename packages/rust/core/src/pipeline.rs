//! End-to-end analysis: markup → segments → classified, resolved records →
//! batch → report.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, instrument, warn};

use gazette_markup::{extract_identifier, segment, truncate_chars};
use gazette_registry::Registry;
use gazette_shared::{AnalyzeConfig, EntityRecord, GazetteError, MonitorBatch, RecordDraft, Result};

use crate::alerts::{self, AlertSummary};
use crate::assembler::{self, Report};
use crate::classifier::RuleSet;
use crate::intake::{self, DocumentInput};

/// Why a document contributed nothing, or nothing useful, to a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// The file could not be read from disk.
    Unreadable,
    NotMarkup,
    Decode,
    Empty,
    /// The document was valid but held no company notices. Informational.
    NoRecords,
}

/// A per-document problem recorded while the batch carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentIssue {
    pub label: String,
    pub kind: IssueKind,
    pub message: String,
}

impl DocumentIssue {
    fn new(label: &str, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.message)
    }
}

/// Result of a batch-report request.
#[derive(Debug)]
pub struct BatchResult {
    pub report: Report,
    pub issues: Vec<DocumentIssue>,
    pub elapsed: Duration,
}

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each document, whether or not it was usable.
    fn document_done(&self, label: &str, current: usize, total: usize);
    /// Called when the batch completes successfully.
    fn done(&self, result: &BatchResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn document_done(&self, _label: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BatchResult) {}
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Runs segmentation, identifier extraction, classification and resolution
/// against a shared, read-only registry.
#[derive(Debug, Clone)]
pub struct Analyzer<'r> {
    registry: &'r Registry,
    rules: RuleSet,
    config: AnalyzeConfig,
}

impl<'r> Analyzer<'r> {
    pub fn new(registry: &'r Registry, config: AnalyzeConfig) -> Self {
        Self {
            registry,
            rules: RuleSet::default(),
            config,
        }
    }

    /// Replace the default rule set.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Turn one gazette issue into records, in document order.
    ///
    /// Never fails: a document without notices yields an empty vector.
    #[instrument(skip_all, fields(monitor = monitor, len = html.len()))]
    pub fn analyze_document(&self, html: &str, monitor: u32) -> Vec<EntityRecord> {
        let records: Vec<EntityRecord> = segment(html)
            .into_iter()
            .enumerate()
            .map(|(i, seg)| {
                let identifier = extract_identifier(&seg.text);
                let operation = self.rules.classify(&seg.text);
                let excerpt = truncate_chars(&seg.text, self.config.excerpt_chars).to_string();

                let draft = RecordDraft::new(i + 1, seg.company, identifier, excerpt, monitor)
                    .classify(operation);
                let matched = self.registry.resolve(draft.company(), draft.identifier());

                debug!(
                    company = draft.company(),
                    identifier = ?draft.identifier(),
                    operation = %draft.operation(),
                    ranked = matched.is_some(),
                    "record built"
                );
                draft.resolve(matched)
            })
            .collect();

        info!(
            records = records.len(),
            ranked = records.iter().filter(|r| r.in_registry()).count(),
            noise = records.iter().filter(|r| r.is_noise()).count(),
            "document analyzed"
        );

        records
    }

    /// Single-document alert request.
    pub fn alerts(&self, html: &str, monitor: u32) -> AlertSummary {
        let records = self.analyze_document(html, monitor);
        alerts::build_alerts(monitor, &records)
    }

    /// Batch-report request.
    ///
    /// Documents are processed in order; an unusable one is recorded as an
    /// issue and skipped. Fails with [`GazetteError::NothingUsable`] when no
    /// document produced a relevant (non-noise) record.
    #[instrument(skip_all, fields(documents = documents.len()))]
    pub fn process_batch(
        &self,
        documents: &[DocumentInput],
        progress: &dyn ProgressReporter,
    ) -> Result<BatchResult> {
        self.run_batch(documents.iter().map(Ok), progress)
    }

    /// Batch-report request over files on disk.
    ///
    /// A file that cannot be read becomes an [`IssueKind::Unreadable`] issue
    /// and the remaining files are still analyzed. `published` applies to
    /// every file when given.
    #[instrument(skip_all, fields(files = paths.len()))]
    pub fn process_files(
        &self,
        paths: &[PathBuf],
        published: Option<NaiveDate>,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchResult> {
        let loaded: Vec<std::result::Result<DocumentInput, DocumentIssue>> = paths
            .iter()
            .map(|path| -> std::result::Result<DocumentInput, DocumentIssue> {
                let doc = DocumentInput::from_path(path).map_err(|e| {
                    let label = intake::label_for(path);
                    DocumentIssue::new(&label, IssueKind::Unreadable, e.to_string())
                })?;
                Ok(match published {
                    Some(date) => doc.with_published(date),
                    None => doc,
                })
            })
            .collect();

        self.run_batch(loaded.iter().map(|entry| entry.as_ref()), progress)
    }

    fn run_batch<'d>(
        &self,
        entries: impl ExactSizeIterator<
            Item = std::result::Result<&'d DocumentInput, &'d DocumentIssue>,
        >,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchResult> {
        let start = Instant::now();
        let mut batch = MonitorBatch::new();
        let mut issues = Vec::new();
        let total = entries.len();

        info!(documents = total, "starting batch");
        progress.phase("Analyzing documents");

        for (i, entry) in entries.enumerate() {
            let label = match entry {
                Ok(doc) => doc.label.as_str(),
                Err(issue) => issue.label.as_str(),
            };
            match entry.map_err(Clone::clone).and_then(|doc| self.ingest(doc, &batch)) {
                Ok((monitor, published, records)) => {
                    if records.is_empty() {
                        issues.push(DocumentIssue::new(
                            label,
                            IssueKind::NoRecords,
                            format!("monitor {monitor}: no company notices found"),
                        ));
                    }
                    batch.add_document(monitor, published, records);
                }
                Err(issue) => {
                    warn!(label, reason = %issue.message, "document skipped");
                    issues.push(issue);
                }
            }
            progress.document_done(label, i + 1, total);
        }

        if batch.relevant_count() == 0 {
            warn!(issues = issues.len(), "batch has no relevant records");
            return Err(GazetteError::NothingUsable {
                issues: issues.iter().map(ToString::to_string).collect(),
            });
        }

        progress.phase("Assembling report");
        let report = assembler::assemble(&batch, Local::now());

        let result = BatchResult {
            report,
            issues,
            elapsed: start.elapsed(),
        };

        info!(
            monitors = result.report.stats.monitors,
            relevant = result.report.stats.relevant,
            ranked = result.report.stats.registry_matched,
            issues = result.issues.len(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "batch complete"
        );
        progress.done(&result);

        Ok(result)
    }

    /// Validate, decode and analyze one document.
    fn ingest(
        &self,
        doc: &DocumentInput,
        batch: &MonitorBatch,
    ) -> std::result::Result<(u32, NaiveDate, Vec<EntityRecord>), DocumentIssue> {
        if !intake::is_markup_label(&doc.label) {
            return Err(DocumentIssue::new(
                &doc.label,
                IssueKind::NotMarkup,
                "not an HTML file",
            ));
        }

        let content = intake::decode(&doc.bytes)
            .map_err(|e| DocumentIssue::new(&doc.label, IssueKind::Decode, e.to_string()))?;

        if content.trim().is_empty() {
            return Err(DocumentIssue::new(
                &doc.label,
                IssueKind::Empty,
                "empty document",
            ));
        }

        let monitor = doc
            .monitor
            .or_else(|| intake::infer_monitor(&doc.label, &content))
            .unwrap_or_else(|| {
                let next = next_free_monitor(batch);
                warn!(label = %doc.label, monitor = next, "monitor number not found, using next free number");
                next
            });

        let published = doc
            .published
            .or_else(|| intake::infer_date(&content))
            .unwrap_or_else(intake::today);

        Ok((monitor, published, self.analyze_document(&content, monitor)))
    }
}

/// Lowest number above the batch's monitor count not already taken.
fn next_free_monitor(batch: &MonitorBatch) -> u32 {
    let mut next = batch.monitor_count() as u32 + 1;
    while batch.contains_monitor(next) {
        next += 1;
    }
    next
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use gazette_shared::{MatchMethod, OperationKind, Tier};

    fn fixture(rel: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel)
    }

    fn registry() -> Registry {
        Registry::open(&fixture("json/registry.fixture.json")).unwrap()
    }

    fn monitor_129() -> String {
        std::fs::read_to_string(fixture("html/monitor_129.html")).unwrap()
    }

    const ACK_ONLY: &str = "<p><strong>GAMA SRL</strong></p>\
        <p>Oficiul Registrului Comerțului de pe lângă Tribunalul Cluj certifică depunerea.</p>";

    #[test]
    fn fixture_document_records() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let records = analyzer.analyze_document(&monitor_129(), 129);

        let companies: Vec<_> = records.iter().map(|r| r.company()).collect();
        assert_eq!(
            companies,
            [
                "ALFA CONSTRUCT S.R.L.",
                "BETA LOGISTIC SRL",
                "ZETA IMPEX S.R.L.",
                "OMV PETROM S.A.",
                "OMEGA TRADE SRL",
                "DELTA AGRO SRL",
            ]
        );
        let seqs: Vec<_> = records.iter().map(|r| r.seq()).collect();
        assert_eq!(seqs, [1, 2, 3, 4, 5, 6]);
        assert!(records.iter().all(|r| r.monitor() == 129));
    }

    #[test]
    fn debt_conversion_record_is_ranked_upper_mid() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let records = analyzer.analyze_document(&monitor_129(), 129);

        let alfa = &records[0];
        assert_eq!(alfa.identifier(), Some("5888716"));
        assert_eq!(alfa.operation(), OperationKind::CapitalIncreaseDebtConversion);
        assert!(alfa.is_high_interest());
        assert_eq!(alfa.rank(), Some(5));
        assert_eq!(alfa.magnitude(), Some(700_000_000));
        assert_eq!(alfa.tier(), Some(Tier::UpperMid));
        assert_eq!(alfa.registry().unwrap().method, MatchMethod::Identifier);
    }

    #[test]
    fn name_match_without_identifier() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let records = analyzer.analyze_document(&monitor_129(), 129);

        let omv = &records[3];
        assert_eq!(omv.identifier(), None);
        assert_eq!(omv.operation(), OperationKind::CreditFacility);
        assert_eq!(omv.rank(), Some(1));
        assert_eq!(omv.registry().unwrap().method, MatchMethod::Name);
    }

    #[test]
    fn noise_and_unmatched_records() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let records = analyzer.analyze_document(&monitor_129(), 129);

        let zeta = &records[2];
        assert!(zeta.is_noise());
        assert!(!zeta.in_registry());

        let omega = &records[4];
        assert_eq!(omega.operation(), OperationKind::DissolutionLiquidation);
        assert!(!omega.in_registry());
        assert_eq!(omega.rank(), None);
        assert_eq!(omega.tier(), None);
    }

    #[test]
    fn degraded_registry_leaves_records_unranked() {
        let reg = Registry::empty();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let records = analyzer.analyze_document(&monitor_129(), 129);
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| !r.in_registry()));
    }

    #[test]
    fn excerpt_is_truncated_but_classification_sees_full_text() {
        let reg = Registry::empty();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig { excerpt_chars: 10 });
        let html = format!(
            "<strong>KAPPA SRL</strong><p>{} fuziune prin absorbție</p>",
            "x".repeat(50)
        );
        let records = analyzer.analyze_document(&html, 1);
        assert_eq!(records[0].excerpt().chars().count(), 10);
        assert_eq!(records[0].operation(), OperationKind::MergerByAbsorption);
    }

    #[test]
    fn acknowledgment_only_document_yields_nothing() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        assert!(analyzer.analyze_document(ACK_ONLY, 130).is_empty());
    }

    #[test]
    fn batch_reports_per_document_issues() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let docs = vec![
            DocumentInput::new("monitor_129.html", monitor_129()),
            DocumentInput::new("notes.pdf", b"%PDF".to_vec()),
            DocumentInput::new("broken.html", vec![0xff, 0xfe, 0x00]),
            DocumentInput::new("blank.html", "   \n".as_bytes().to_vec()),
            DocumentInput::new("monitor_130.html", ACK_ONLY),
        ];

        let result = analyzer.process_batch(&docs, &SilentProgress).unwrap();
        let kinds: Vec<_> = result.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            [
                IssueKind::NotMarkup,
                IssueKind::Decode,
                IssueKind::Empty,
                IssueKind::NoRecords,
            ]
        );
        assert!(result.issues[0].to_string().starts_with("notes.pdf: "));
        assert_eq!(result.report.stats.monitors, 2);
        assert_eq!(result.report.stats.total, 6);
    }

    #[test]
    fn batch_infers_monitor_and_date() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let docs = vec![DocumentInput::new("mo.html", monitor_129())];

        let result = analyzer.process_batch(&docs, &SilentProgress).unwrap();
        let group = &result.report.monitors[0];
        assert_eq!(group.monitor, 129);
        assert_eq!(group.published, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }

    #[test]
    fn explicit_monitor_and_date_win() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let docs = vec![
            DocumentInput::new("monitor_129.html", monitor_129())
                .with_monitor(7)
                .with_published(date),
        ];

        let result = analyzer.process_batch(&docs, &SilentProgress).unwrap();
        assert_eq!(result.report.monitors[0].monitor, 7);
        assert_eq!(result.report.monitors[0].published, date);
    }

    #[test]
    fn acknowledgment_only_batch_is_nothing_usable() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let docs = vec![DocumentInput::new("monitor_130.html", ACK_ONLY)];

        match analyzer.process_batch(&docs, &SilentProgress) {
            Err(GazetteError::NothingUsable { issues }) => {
                assert_eq!(issues.len(), 1);
                assert!(issues[0].contains("monitor_130.html"));
            }
            other => panic!("expected NothingUsable, got {other:?}"),
        }
    }

    #[test]
    fn all_noise_batch_is_nothing_usable() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let html = "<strong>IOTA SRL</strong><p>Actualizare cod CAEN Rev. 3</p>";
        let docs = vec![DocumentInput::new("monitor_131.html", html)];

        let err = analyzer.process_batch(&docs, &SilentProgress).unwrap_err();
        assert!(matches!(err, GazetteError::NothingUsable { .. }));
    }

    #[test]
    fn empty_batch_is_nothing_usable() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let err = analyzer.process_batch(&[], &SilentProgress).unwrap_err();
        assert!(matches!(err, GazetteError::NothingUsable { ref issues } if issues.is_empty()));
    }

    #[test]
    fn unreadable_file_is_an_issue_and_report_still_written() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let dir = std::env::temp_dir().join(format!("gazette-files-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let paths = vec![fixture("html/monitor_129.html"), dir.join("missing_130.html")];

        let result = analyzer.process_files(&paths, None, &SilentProgress).unwrap();
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::Unreadable);
        assert!(result.issues[0].to_string().starts_with("missing_130.html: "));
        assert_eq!(result.report.stats.monitors, 1);
        assert_eq!(result.report.stats.total, 6);

        let path = crate::render::write_report(&result.report, crate::ReportFormat::Json, &dir).unwrap();
        assert!(path.is_file());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn files_batch_applies_explicit_date() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let paths = vec![fixture("html/monitor_129.html")];

        let result = analyzer.process_files(&paths, Some(date), &SilentProgress).unwrap();
        assert_eq!(result.report.monitors[0].published, date);
    }

    #[test]
    fn only_unreadable_files_is_nothing_usable() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let paths = vec![fixture("html/does_not_exist.html")];

        match analyzer.process_files(&paths, None, &SilentProgress) {
            Err(GazetteError::NothingUsable { issues }) => {
                assert_eq!(issues.len(), 1);
                assert!(issues[0].starts_with("does_not_exist.html: "));
            }
            other => panic!("expected NothingUsable, got {other:?}"),
        }
    }

    #[test]
    fn unnumbered_document_does_not_merge_into_taken_monitor() {
        let reg = Registry::empty();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let docs = vec![
            DocumentInput::new(
                "mo_02.html",
                "<p>01.01.2026</p><strong>KAPPA SRL</strong><p>fuziune</p>",
            ),
            DocumentInput::new(
                "x.html",
                "<p>05.01.2026</p><strong>LAMBDA SRL</strong><p>divizare</p>",
            ),
        ];

        let result = analyzer.process_batch(&docs, &SilentProgress).unwrap();
        let groups: Vec<_> = result
            .report
            .monitors
            .iter()
            .map(|g| (g.monitor, g.published, g.entries.len()))
            .collect();
        assert_eq!(
            groups,
            [
                (2, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 1),
                (3, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), 1),
            ]
        );
    }

    #[test]
    fn next_free_monitor_skips_taken_numbers() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut batch = MonitorBatch::new();
        assert_eq!(next_free_monitor(&batch), 1);
        batch.add_document(2, date, Vec::new());
        batch.add_document(3, date, Vec::new());
        assert_eq!(next_free_monitor(&batch), 4);
        batch.add_document(7, date, Vec::new());
        assert_eq!(next_free_monitor(&batch), 4);
    }

    #[test]
    fn custom_rules_replace_defaults() {
        let reg = Registry::empty();
        let rules = RuleSet::new(vec![crate::classifier::DEFAULT_RULES[11]]);
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default()).with_rules(rules);
        assert_eq!(analyzer.rules().rules().len(), 1);

        let html = "<strong>MU SRL</strong><p>Majorare capital și fuziune</p>";
        let records = analyzer.analyze_document(html, 1);
        assert_eq!(records[0].operation(), OperationKind::Merger);
    }

    struct CountingProgress {
        documents: AtomicUsize,
        done: AtomicUsize,
    }

    impl ProgressReporter for CountingProgress {
        fn phase(&self, _name: &str) {}
        fn document_done(&self, _label: &str, _current: usize, _total: usize) {
            self.documents.fetch_add(1, Ordering::SeqCst);
        }
        fn done(&self, _result: &BatchResult) {
            self.done.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn progress_sees_every_document() {
        let reg = registry();
        let analyzer = Analyzer::new(&reg, AnalyzeConfig::default());
        let progress = CountingProgress {
            documents: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
        };
        let docs = vec![
            DocumentInput::new("monitor_129.html", monitor_129()),
            DocumentInput::new("x.txt", "x"),
        ];

        analyzer.process_batch(&docs, &progress).unwrap();
        assert_eq!(progress.documents.load(Ordering::SeqCst), 2);
        assert_eq!(progress.done.load(Ordering::SeqCst), 1);
    }
}
