//! Version-range extraction, release selection, and the TL;DR report.
//!
//! Everything here is pure; the HTTP fetch lives in the crate root.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use url::Url;

/// Language the report is written in, regardless of the requested one.
pub const REPORT_LANG: &str = "pl";

/// Placeholder emitted when a release body has no bullet lines.
const NO_DETAILS: &str = "(brak szczegółów w opisie release)";

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Matches `0.NN` or `0.NN.M` anywhere in free text.
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0\.(\d{2})(?:\.\d+)?").expect("version regex"));

/// Matches a stable release tag, `rust-v0.NN.0`, exactly.
static STABLE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rust-v0\.(\d{2})\.0$").expect("stable tag regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inclusive range of minor versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: u32,
    pub max: u32,
}

impl VersionRange {
    /// Whether `minor` lies within the range.
    pub fn contains(&self, minor: u32) -> bool {
        (self.min..=self.max).contains(&minor)
    }

    /// A range is well-formed when `min <= max`.
    pub fn is_well_formed(&self) -> bool {
        self.min <= self.max
    }
}

/// One stable release, keyed by its minor version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag: String,
    pub minor: u32,
    /// `YYYY-MM-DD`, when the listing carried a publish timestamp.
    pub published: Option<String>,
    pub body: String,
    pub html_url: String,
}

/// Subset of a GitHub release object we read.
#[derive(Debug, Deserialize)]
struct RawRelease {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Range extraction
// ---------------------------------------------------------------------------

/// Extract `(min, max)` over every `0.NN[.M]` mention in `query`.
pub fn extract_range(query: &str) -> Option<VersionRange> {
    let minors: Vec<u32> = VERSION_RE
        .captures_iter(query)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    let min = *minors.iter().min()?;
    let max = *minors.iter().max()?;
    Some(VersionRange { min, max })
}

// ---------------------------------------------------------------------------
// Release selection
// ---------------------------------------------------------------------------

/// Pick stable releases within `range` out of a raw listing.
///
/// Returns `None` when the listing is not a JSON array. Entries that are not
/// objects, or whose tag is not a stable `rust-v0.NN.0` tag, are skipped.
/// When two entries share a minor, the later one wins.
pub fn select_releases(
    listing: &serde_json::Value,
    range: VersionRange,
    releases_page: &Url,
) -> Option<BTreeMap<u32, Release>> {
    let items = listing.as_array()?;
    let mut releases = BTreeMap::new();

    for item in items {
        let Ok(raw) = RawRelease::deserialize(item) else {
            continue;
        };
        let tag = raw.tag_name.unwrap_or_default();
        let Some(minor) = stable_minor(&tag) else {
            continue;
        };
        if !range.contains(minor) {
            continue;
        }

        let html_url = raw
            .html_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| tag_url(releases_page, &tag));

        releases.insert(
            minor,
            Release {
                minor,
                published: raw.published_at.as_deref().and_then(publish_date),
                body: raw.body.unwrap_or_default().trim().to_string(),
                html_url,
                tag,
            },
        );
    }

    Some(releases)
}

/// Minor number of a stable tag, if `tag` is one.
fn stable_minor(tag: &str) -> Option<u32> {
    STABLE_TAG_RE.captures(tag)?[1].parse().ok()
}

/// Fallback per-release URL under the releases page.
fn tag_url(releases_page: &Url, tag: &str) -> String {
    format!("{}/tag/{tag}", releases_page.as_str().trim_end_matches('/'))
}

/// Date portion of a publish timestamp.
fn publish_date(raw: &str) -> Option<String> {
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive().format("%Y-%m-%d").to_string());
    }
    let date = raw.split('T').next().unwrap_or_default().trim();
    (!date.is_empty()).then(|| date.to_string())
}

/// Minors inside `range` with no selected release, ascending.
pub fn missing_minors(range: VersionRange, releases: &BTreeMap<u32, Release>) -> Vec<u32> {
    (range.min..=range.max)
        .filter(|minor| !releases.contains_key(minor))
        .collect()
}

// ---------------------------------------------------------------------------
// Markdown bullets
// ---------------------------------------------------------------------------

/// Pull up to `limit` bullet items out of a release body.
pub fn summarize_bullets(body: &str, limit: usize) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(['-', '*']))
        .map(|line| line.trim_start_matches(['-', '*']).trim())
        .filter(|item| !item.is_empty())
        .take(limit)
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Render the fixed-language TL;DR for the selected releases.
pub fn render_report(
    range: VersionRange,
    releases: &BTreeMap<u32, Release>,
    lang: &str,
    releases_page: &Url,
    max_bullets: usize,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "TL;DR: Codex CLI 0.{:02}.0 → 0.{:02}.0",
        range.min, range.max
    );
    out.push('\n');

    for release in releases.values() {
        let published = release.published.as_deref().unwrap_or("—");
        let _ = writeln!(out, "0.{:02}.0 ({published}):", release.minor);

        let bullets = summarize_bullets(&release.body, max_bullets);
        if bullets.is_empty() {
            let _ = writeln!(out, "- {NO_DETAILS}");
        }
        for bullet in &bullets {
            let _ = writeln!(out, "- {bullet}");
        }
        let _ = writeln!(out, "  Źródło: {}", release.html_url);
        out.push('\n');
    }

    let missing = missing_minors(range, releases);
    if !missing.is_empty() {
        let list: Vec<String> = missing.iter().map(|m| format!("0.{m:02}.0")).collect();
        let _ = writeln!(
            out,
            "Brak stabilnych wydań w tym zakresie dla: {}",
            list.join(", ")
        );
        out.push('\n');
    }

    out.push_str("Źródła:\n");
    let _ = writeln!(out, "- {}", releases_page);
    for release in releases.values() {
        let _ = writeln!(out, "- {}", release.html_url);
    }

    if lang != REPORT_LANG {
        out.push('\n');
        let _ = writeln!(
            out,
            "(Uwaga: lang={lang}; tryb TL;DR obecnie wypisuje po polsku.)"
        );
    }

    format!("{}\n", out.trim_end())
}
