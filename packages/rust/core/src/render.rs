//! Report rendering: a self-contained HTML page or pretty JSON.

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, instrument};

use gazette_shared::{Category, DATE_FORMAT, GazetteError, Result, Tier};

use crate::assembler::{RankedEntry, Report};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = GazetteError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(GazetteError::validation(format!(
                "unknown report format '{other}': expected 'html' or 'json'"
            ))),
        }
    }
}

/// Render in the requested format.
pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Html => render_html(report),
        ReportFormat::Json => render_json(report),
    }
}

/// Pretty-printed JSON of the report model.
pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| GazetteError::Render(e.to_string()))
}

/// Self-contained HTML page.
pub fn render_html(report: &Report) -> Result<String> {
    let mut out = String::with_capacity(16 * 1024);
    write_page(&mut out, report).map_err(|e| GazetteError::Render(e.to_string()))?;
    Ok(out)
}

/// Default file name for a report, e.g. `raport_mo_iv_129-132_20260115_0930.html`.
pub fn default_file_name(report: &Report, format: ReportFormat) -> String {
    format!(
        "raport_mo_iv_{}-{}_{}.{}",
        report.first_monitor.unwrap_or(0),
        report.last_monitor.unwrap_or(0),
        report.generated_at.format("%Y%m%d_%H%M"),
        format.extension()
    )
}

/// Render and write a report. A directory target gets the default file name.
#[instrument(skip_all, fields(path = %target.display()))]
pub fn write_report(report: &Report, format: ReportFormat, target: &Path) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(default_file_name(report, format))
    } else {
        target.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GazetteError::io(parent, e))?;
    }

    let body = render(report, format)?;
    std::fs::write(&path, body).map_err(|e| GazetteError::io(&path, e))?;

    info!(path = %path.display(), id = %report.id, "report written");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// `53000000000` → `53,000,000,000`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Human-readable revenue: `X.Y mld lei`, `NM lei`, or grouped lei.
pub fn format_magnitude(magnitude: u64) -> String {
    if magnitude >= 1_000_000_000 {
        format!("{:.1} mld lei", magnitude as f64 / 1e9)
    } else if magnitude >= 1_000_000 {
        format!("{:.0}M lei", magnitude as f64 / 1e6)
    } else {
        format!("{} lei", group_thousands(magnitude))
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn tier_css(tier: Tier) -> &'static str {
    match tier {
        Tier::Giant => "gigant",
        Tier::Large => "mari",
        Tier::UpperMid => "medii-mari",
        Tier::Mid => "medii",
        Tier::LowerMid => "medii-mici",
        Tier::SmallRanked | Tier::BelowThreshold => "mici",
    }
}

fn category_css(category: Category) -> &'static str {
    match category {
        Category::CapitalFinance => "capital",
        Category::Structure => "structura",
        Category::OfficeBranches => "sediu",
        Category::Administration => "admin",
        Category::BusinessPurpose => "activitate",
        Category::Other | Category::Unclassified => "",
    }
}

// ---------------------------------------------------------------------------
// HTML page
// ---------------------------------------------------------------------------

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Segoe UI', Tahoma, sans-serif; background: #f8fafc; color: #1e293b; line-height: 1.5; padding: 20px; }
.container { max-width: 900px; margin: 0 auto; background: white; box-shadow: 0 4px 20px rgba(0,0,0,0.1); border-radius: 12px; overflow: hidden; }
.header { background: linear-gradient(135deg, #1e3a5f 0%, #2d5a87 100%); color: white; padding: 30px; }
.header h1 { font-size: 24px; margin-bottom: 8px; }
.header .meta { margin-top: 15px; font-size: 13px; opacity: 0.8; }
.summary { background: #f1f5f9; padding: 20px 30px; display: flex; gap: 25px; flex-wrap: wrap; border-bottom: 1px solid #e2e8f0; }
.summary-item { text-align: center; }
.summary-item .number { font-size: 28px; font-weight: 700; color: #1e3a5f; }
.summary-item .label { font-size: 11px; color: #64748b; text-transform: uppercase; }
.summary-item.highlight .number { color: #dc2626; }
.warning { background: #fef3c7; border-left: 4px solid #f59e0b; padding: 12px 20px; font-size: 13px; color: #92400e; }
.section { padding: 25px 30px; border-bottom: 1px solid #e2e8f0; }
.section-header { display: flex; align-items: center; gap: 10px; margin-bottom: 20px; padding-bottom: 10px; border-bottom: 2px solid #e2e8f0; }
.section-header h2 { font-size: 16px; font-weight: 600; color: #334155; text-transform: uppercase; }
.badge { background: #1e3a5f; color: white; padding: 4px 12px; border-radius: 20px; font-size: 12px; }
.badge.alert { background: #dc2626; }
.tier { margin-bottom: 25px; }
.tier-header { display: flex; align-items: center; gap: 10px; margin-bottom: 12px; }
.tier-dot { width: 14px; height: 14px; border-radius: 3px; }
.tier-title { font-size: 13px; font-weight: 600; color: #475569; text-transform: uppercase; }
.tier-range { font-size: 12px; color: #94a3b8; }
.gigant { --tier: #dc2626; } .mari { --tier: #ea580c; } .medii-mari { --tier: #ca8a04; }
.medii { --tier: #16a34a; } .medii-mici { --tier: #0891b2; } .mici { --tier: #6b7280; }
.tier-dot { background: var(--tier); }
.card { background: #fafafa; border-left: 4px solid var(--tier, #e2e8f0); border-radius: 0 8px 8px 0; padding: 16px 20px; margin-bottom: 10px; }
.card.high-interest { background: #fef2f2; }
.card-header { display: flex; justify-content: space-between; margin-bottom: 8px; }
.card-name { font-size: 15px; font-weight: 600; }
.card-mo { background: #e2e8f0; color: #475569; padding: 2px 8px; border-radius: 4px; font-size: 11px; }
.card-meta { font-size: 12px; color: #64748b; margin-bottom: 8px; }
.card-op { display: inline-block; padding: 4px 10px; border-radius: 4px; font-size: 12px; font-weight: 500; background: #f1f5f9; }
.card-op.capital { background: #dbeafe; color: #1e40af; }
.card-op.structura { background: #fce7f3; color: #9d174d; }
.card-op.sediu { background: #d1fae5; color: #065f46; }
.card-op.admin { background: #fef3c7; color: #92400e; }
.card-op.activitate { background: #e0e7ff; color: #3730a3; }
.card-op.high { background: #dc2626; color: white; }
.note { font-size: 12px; color: #64748b; margin-bottom: 15px; }
details.monitor { margin-bottom: 15px; }
details.monitor summary { background: #f1f5f9; padding: 10px 15px; border-radius: 6px; font-size: 13px; font-weight: 600; color: #475569; cursor: pointer; }
.monitor-count { background: #cbd5e1; padding: 2px 8px; border-radius: 10px; font-size: 11px; margin-left: 8px; }
.monitor-item { padding: 6px 15px; border-bottom: 1px solid #f1f5f9; font-size: 13px; display: flex; justify-content: space-between; gap: 10px; }
.monitor-item .op { color: #64748b; font-size: 12px; white-space: nowrap; }
.monitor-item.top { background: #fef3c7; }
.monitor-item.high { background: #fecaca; }
.footer { background: #f1f5f9; padding: 15px 30px; text-align: center; font-size: 12px; color: #64748b; }
"#;

fn write_page(out: &mut String, report: &Report) -> fmt::Result {
    let first = report.first_monitor.unwrap_or(0);
    let last = report.last_monitor.unwrap_or(0);
    let s = &report.stats;

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"ro\">\n<head>")?;
    writeln!(out, "<meta charset=\"UTF-8\">")?;
    writeln!(
        out,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(out, "<title>Raport MO IV nr. {first}-{last}</title>")?;
    writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"container\">")?;

    writeln!(out, "<div class=\"header\">")?;
    writeln!(out, "<h1>RAPORT MO IV nr. {first}-{last}</h1>")?;
    writeln!(
        out,
        "<div class=\"meta\">📅 Generat: {}</div>\n</div>",
        report.generated_at.format("%d.%m.%Y, %H:%M")
    )?;

    writeln!(out, "<div class=\"summary\">")?;
    write_counter(out, "highlight", s.high_interest_matched, "Interes major")?;
    write_counter(out, "", s.registry_matched, "Companii TOP")?;
    write_counter(out, "", s.relevant, "Acte relevante")?;
    write_counter(out, "", s.monitors, "Monitoare")?;
    write_counter(out, "", s.noise, "Zgomot filtrat")?;
    writeln!(out, "</div>")?;

    writeln!(
        out,
        "<div class=\"warning\">⚠️ <strong>Atenție:</strong> Filtrare &amp; etichetare \
         realizată automat, verificați documentele originale!</div>"
    )?;

    if !report.high_interest.is_empty() {
        write_section_header(
            out,
            "🔴 Operațiuni de interes major",
            "alert",
            &format!("{} acte", report.high_interest.len()),
        )?;
        for entry in &report.high_interest {
            write_card(out, entry, true)?;
        }
        writeln!(out, "</div>")?;
    }

    if !report.tiers.is_empty() {
        let ranked: usize = report.tiers.iter().map(|g| g.entries.len()).sum();
        write_section_header(
            out,
            "Companii din TOP România",
            "",
            &format!("{ranked} companii"),
        )?;
        for group in &report.tiers {
            writeln!(out, "<div class=\"tier {}\">", tier_css(group.tier))?;
            writeln!(
                out,
                "<div class=\"tier-header\"><div class=\"tier-dot\"></div>\
                 <span class=\"tier-title\">{}</span><span class=\"tier-range\">({})</span></div>",
                group.tier.label(),
                group.range
            )?;
            for entry in &group.entries {
                write_card(out, entry, false)?;
            }
            writeln!(out, "</div>")?;
        }
        writeln!(out, "</div>")?;
    }

    write_section_header(
        out,
        "Listă completă companii identificate, per monitor",
        "",
        &format!("{} acte relevante", s.relevant),
    )?;
    writeln!(
        out,
        "<p class=\"note\">Exclus: {} notificări ORC și actualizări CAEN</p>",
        s.noise
    )?;
    for group in &report.monitors {
        writeln!(
            out,
            "<details class=\"monitor\"><summary>MO IV nr. {} din {}\
             <span class=\"monitor-count\">{} acte</span></summary>",
            group.monitor,
            group.published.format(DATE_FORMAT),
            group.entries.len()
        )?;
        for entry in &group.entries {
            let (class, marker) = match (entry.ranked, entry.high_interest) {
                (true, true) => (" high", " 🔴"),
                (false, true) => ("", " 🔴"),
                (true, false) => (" top", " ⭐"),
                (false, false) => ("", ""),
            };
            writeln!(
                out,
                "<div class=\"monitor-item{class}\"><span class=\"name\">{}{marker}</span>\
                 <span class=\"op\">{}</span></div>",
                escape_html(&entry.company),
                escape_html(entry.operation)
            )?;
        }
        writeln!(out, "</details>")?;
    }
    writeln!(out, "</div>")?;

    if !report.top_operations.is_empty() {
        write_section_header(out, "Operațiuni frecvente", "", "")?;
        for op in &report.top_operations {
            writeln!(
                out,
                "<div class=\"monitor-item\"><span class=\"name\">{}</span>\
                 <span class=\"op\">{}</span></div>",
                escape_html(op.operation),
                op.count
            )?;
        }
        writeln!(out, "</div>")?;
    }

    writeln!(
        out,
        "<div class=\"footer\">MO IV Analyzer v{} | raport {}</div>",
        env!("CARGO_PKG_VERSION"),
        report.id
    )?;
    writeln!(out, "</div>\n</body>\n</html>")
}

fn write_counter(out: &mut String, class: &str, value: usize, label: &str) -> fmt::Result {
    writeln!(
        out,
        "<div class=\"summary-item {class}\"><div class=\"number\">{value}</div>\
         <div class=\"label\">{label}</div></div>"
    )
}

fn write_section_header(out: &mut String, title: &str, badge_class: &str, badge: &str) -> fmt::Result {
    writeln!(out, "<div class=\"section\">\n<div class=\"section-header\">")?;
    writeln!(out, "<h2>{title}</h2>")?;
    if !badge.is_empty() {
        writeln!(out, "<span class=\"badge {badge_class}\">{badge}</span>")?;
    }
    writeln!(out, "</div>")
}

fn write_card(out: &mut String, entry: &RankedEntry, high_section: bool) -> fmt::Result {
    let high = if entry.high_interest { " high-interest" } else { "" };
    let op_class = if high_section {
        "high"
    } else {
        category_css(entry.category)
    };

    writeln!(out, "<div class=\"card {}{high}\">", tier_css(entry.tier))?;
    writeln!(
        out,
        "<div class=\"card-header\"><span class=\"card-name\">{}</span>\
         <span class=\"card-mo\">MO {}</span></div>",
        escape_html(&entry.company),
        entry.monitor
    )?;
    write!(
        out,
        "<div class=\"card-meta\">Rank #{} | CA: {}",
        entry.rank,
        format_magnitude(entry.magnitude)
    )?;
    if high_section {
        write!(out, " | {}", entry.tier.label())?;
    }
    writeln!(out, "</div>")?;
    writeln!(
        out,
        "<span class=\"card-op {op_class}\">{}</span>\n</div>",
        escape_html(entry.operation)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
