//! Registration identifier (CUI) extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Label patterns, tried in order: full label, abbreviation, dotted abbreviation.
static IDENTIFIER_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)cod unic de înregistrare[:\s]+(?:RO)?([0-9]{6,10})")
            .expect("full label regex"),
        Regex::new(r"(?i)CUI[:\s]+(?:RO)?([0-9]{6,10})").expect("abbreviated label regex"),
        Regex::new(r"(?i)C\.U\.I\.[:\s]+(?:RO)?([0-9]{6,10})").expect("dotted label regex"),
    ]
});

/// Pull the first registration identifier out of a notice span.
///
/// Returns the digits only, without the `RO` prefix.
pub fn extract_identifier(text: &str) -> Option<String> {
    IDENTIFIER_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .map(|caps| caps[1].to_string())
}
