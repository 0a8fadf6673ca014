//! Company name normalization for registry lookups.

/// Legal-form suffixes stripped from names, punctuated and bare.
const LEGAL_FORMS: &[&str] = &["S.R.L.", "SRL", "S.C.S.", "SCS", "S.A.", "SA"];

/// Normalize a company name into a registry index key.
///
/// Upper-cases, collapses whitespace, then strips trailing legal-form
/// suffixes (separated by a space or dash) until none remain. Idempotent.
pub fn normalize_name(name: &str) -> String {
    let mut key = name
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    while let Some(stripped) = strip_legal_form(&key) {
        key = stripped;
    }

    key
}

/// Remove one trailing legal form, with its separator, if present.
fn strip_legal_form(key: &str) -> Option<String> {
    LEGAL_FORMS.iter().find_map(|form| {
        let head = key.strip_suffix(form)?;
        if !head.ends_with([' ', '-']) {
            return None;
        }
        Some(head.trim_end_matches([' ', '-']).to_string())
    })
}
