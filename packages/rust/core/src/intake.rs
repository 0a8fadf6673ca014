//! Document intake: label checks, decoding, and monitor/date inference.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use gazette_shared::{GazetteError, Result};

/// Extensions accepted as gazette markup.
const MARKUP_EXTENSIONS: &[&str] = &["html", "htm"];

static LABEL_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2,4})").expect("label number regex"));

static CONTENT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)nr\.\s*(\d+)\s*din").expect("content number regex"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").expect("date regex"));

/// One gazette issue as handed in by a front end.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// File name or other label, used for issue messages and monitor inference.
    pub label: String,
    pub bytes: Vec<u8>,
    /// Explicit monitor number; inferred when absent.
    pub monitor: Option<u32>,
    /// Explicit publication date; inferred when absent.
    pub published: Option<NaiveDate>,
}

impl DocumentInput {
    pub fn new(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            bytes: bytes.into(),
            monitor: None,
            published: None,
        }
    }

    /// Read a document from disk, labelled with its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| GazetteError::io(path, e))?;
        Ok(Self::new(label_for(path), bytes))
    }

    pub fn with_monitor(mut self, monitor: u32) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn with_published(mut self, published: NaiveDate) -> Self {
        self.published = Some(published);
        self
    }
}

/// Label of a file-backed document: its file name, or the full path when it has none.
pub fn label_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Whether the label names a markup file.
pub fn is_markup_label(label: &str) -> bool {
    Path::new(label)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKUP_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Decode document bytes as UTF-8, dropping a leading byte-order mark.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| GazetteError::decode(format!("invalid UTF-8: {e}")))
}

/// Monitor number from the label's first 2-4 digit run, else from an
/// `nr. <digits> din` phrase in the content.
pub fn infer_monitor(label: &str, content: &str) -> Option<u32> {
    let name = Path::new(label)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(label);

    LABEL_NUMBER_RE
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
        .or_else(|| {
            CONTENT_NUMBER_RE
                .captures(content)
                .and_then(|caps| caps[1].parse().ok())
        })
}

/// First valid `dd.mm.yyyy` date in the content.
pub fn infer_date(content: &str) -> Option<NaiveDate> {
    DATE_RE.captures_iter(content).find_map(|caps| {
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Today's local date, used when a document carries no date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
