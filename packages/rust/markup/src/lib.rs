//! Gazette markup segmentation.
//!
//! Splits a raw gazette issue into one text span per company notice. A notice
//! starts at a `<strong>` anchor holding a company name with a legal-form
//! marker and runs until the next anchor. Spans are converted to plain text by
//! the cleanup passes in [`cleanup`], and registration-office acknowledgments
//! are dropped.

mod cleanup;
pub mod identifier;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

pub use identifier::extract_identifier;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One company notice cut out of a gazette issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Company name as printed in the anchor, whitespace-collapsed.
    pub company: String,
    /// Plain text of the notice body.
    pub text: String,
}

// ---------------------------------------------------------------------------
// Patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches a bold company name carrying a legal-form marker.
static COMPANY_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<strong[^>]*>(?:Societatea\s+)?([^<]+(?:S\.R\.L\.|SRL|S\.A\.|SA|S\.C\.S\.|SCS)[^<]*)</strong>",
    )
    .expect("company anchor regex")
});

/// Phrase opening a registration-office acknowledgment (matched lower-case).
const ACKNOWLEDGMENT_MARKER: &str = "oficiul registrului comer";

/// How many leading characters are inspected for the acknowledgment marker.
const ACKNOWLEDGMENT_WINDOW: usize = 100;

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

/// Split a gazette issue into company notices, in document order.
///
/// A document without anchors yields an empty vector.
#[instrument(skip_all, fields(len = html.len()))]
pub fn segment(html: &str) -> Vec<Segment> {
    let anchors: Vec<_> = COMPANY_ANCHOR_RE.captures_iter(html).collect();
    let mut segments = Vec::with_capacity(anchors.len());
    let mut skipped = 0usize;

    for (i, caps) in anchors.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let start = whole.end();
        let end = anchors
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(html.len(), |m| m.start());

        let text = span_to_text(&html[start..end]);
        if is_registry_acknowledgment(&text) {
            skipped += 1;
            continue;
        }

        segments.push(Segment {
            company: span_to_text(name.as_str()),
            text,
        });
    }

    debug!(
        anchors = anchors.len(),
        segments = segments.len(),
        acknowledgments = skipped,
        "segmentation complete"
    );

    segments
}

/// Convert a markup fragment to collapsed plain text.
pub fn span_to_text(fragment: &str) -> String {
    cleanup::run_pipeline(fragment)
}

/// Whether a notice body is only the registry office confirming a filing.
pub fn is_registry_acknowledgment(text: &str) -> bool {
    let head: String = text.chars().take(ACKNOWLEDGMENT_WINDOW).collect();
    head.to_lowercase().contains(ACKNOWLEDGMENT_MARKER)
}

/// Truncate to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE: &str = r#"
<html><body>
<p><strong>Societatea ALFA   CONSTRUCT S.R.L.</strong></p>
<p>Hotărârea nr. 1 din 10.01.2026. CUI: 14399840.</p>
<p>Majorare capital social cu 3.533.000 lei prin conversie creanță.</p>
<p><strong>BETA&amp;CO S.A.</strong></p>
<p>Schimbarea sediului social din Pitești în Ghimpați.</p>
</body></html>"#;

    #[test]
    fn segments_in_document_order() {
        let segments = segment(ISSUE);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].company, "ALFA CONSTRUCT S.R.L.");
        assert_eq!(segments[1].company, "BETA&CO S.A.");
    }

    #[test]
    fn span_runs_until_next_anchor() {
        let segments = segment(ISSUE);
        assert!(segments[0].text.starts_with("Hotărârea nr. 1"));
        assert!(segments[0].text.contains("conversie creanță"));
        assert!(!segments[0].text.contains("sediului"));
        assert!(segments[1].text.contains("Schimbarea sediului social"));
        assert!(!segments[1].text.contains('<'));
    }

    #[test]
    fn acknowledgment_spans_are_dropped() {
        let html = "<strong>GAMA SRL</strong><p>Oficiul Registrului Comerțului de pe lângă \
                    Tribunalul București confirmă depunerea.</p>";
        assert!(segment(html).is_empty());
    }

    #[test]
    fn acknowledgment_marker_outside_window_is_kept() {
        let filler = "x".repeat(120);
        let html = format!(
            "<strong>DELTA SRL</strong><p>{filler} oficiul registrului comerțului</p>"
        );
        assert_eq!(segment(&html).len(), 1);
    }

    #[test]
    fn no_anchor_is_empty_not_error() {
        assert!(segment("<p>Nimic de raportat</p>").is_empty());
        assert!(segment("").is_empty());
    }

    #[test]
    fn bold_text_without_legal_form_is_not_an_anchor() {
        let html = "<strong>Art. 1</strong> text <strong>OMEGA S.C.S.</strong> dizolvare";
        let segments = segment(html);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].company, "OMEGA S.C.S.");
        assert_eq!(segments[0].text, "dizolvare");
    }

    #[test]
    fn truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("țară", 2), "ța");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
