//! Markup-to-text cleanup pipeline for notice spans.
//!
//! Each pass is a function `&str -> String` applied in sequence. The result is
//! plain text with entities decoded and whitespace collapsed to single spaces.

use scraper::Html;

/// Run the full cleanup pipeline on a markup fragment.
pub(crate) fn run_pipeline(fragment: &str) -> String {
    let mut result = extract_text(fragment);

    result = strip_invisible(&result);
    result = collapse_whitespace(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Tags to whitespace
// ---------------------------------------------------------------------------

/// Parse the fragment and join its text nodes with spaces.
///
/// Every tag boundary becomes whitespace and character entities are decoded.
fn extract_text(fragment: &str) -> String {
    if !fragment.contains('<') && !fragment.contains('&') {
        return fragment.to_string();
    }

    let doc = Html::parse_fragment(fragment);
    doc.root_element().text().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Pass 2: Drop invisible characters
// ---------------------------------------------------------------------------

/// Remove soft hyphens and zero-width characters that break keyword matching.
fn strip_invisible(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{00AD}' | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'))
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 3: Collapse whitespace
// ---------------------------------------------------------------------------

/// Collapse whitespace runs (including non-breaking spaces) and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
