//! Changelog short-circuit for Codex CLI release questions.
//!
//! A query that names the project and its CLI plus a `0.NN` version range is
//! answered straight from the GitHub releases listing. No LLM is involved and
//! no API key is needed.

mod report;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;
use searchweb_shared::{ChangelogConfig, Result, SearchWebError};
use tracing::{debug, info, instrument};
use url::Url;

pub use report::{
    REPORT_LANG, Release, VersionRange, extract_range, missing_minors, render_report,
    select_releases, summarize_bullets,
};

/// `Accept` header value for the GitHub REST API.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Whether the query is about the configured project's CLI at all.
pub fn matches_project(query: &str, config: &ChangelogConfig) -> bool {
    let q = query.to_lowercase();
    q.contains(&config.project_keyword.to_lowercase()) && q.contains(&config.cli_keyword.to_lowercase())
}

/// Answer a changelog question directly, or return `None` to let the
/// regular search path handle it.
///
/// `None` covers: no project/CLI keywords, no version mention, a malformed
/// range, a listing that is not a JSON array, and a range with no stable
/// release upstream. Transport and HTTP failures are errors.
#[instrument(skip_all, fields(lang = %lang))]
pub async fn changelog_tldr(
    query: &str,
    lang: &str,
    config: &ChangelogConfig,
    timeout_secs: u64,
) -> Result<Option<String>> {
    if !matches_project(query, config) {
        return Ok(None);
    }

    let Some(range) = extract_range(query) else {
        debug!("changelog keywords present but no version mentioned");
        return Ok(None);
    };
    if !range.is_well_formed() {
        return Ok(None);
    }

    info!(min = range.min, max = range.max, "answering from release listing");

    let client = build_client(config, timeout_secs)?;
    let listing = fetch_listing(&client, &config.releases_api).await?;

    let Some(releases) = select_releases(&listing, range, &config.releases_page) else {
        debug!("release listing is not an array");
        return Ok(None);
    };
    if releases.is_empty() {
        debug!("no stable release in range");
        return Ok(None);
    }

    Ok(Some(render_report(
        range,
        &releases,
        lang,
        &config.releases_page,
        config.max_bullets,
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client for the releases endpoint.
fn build_client(config: &ChangelogConfig, timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| SearchWebError::Network(format!("failed to build HTTP client: {e}")))
}

/// GET the release listing and decode it as JSON.
async fn fetch_listing(client: &Client, url: &Url) -> Result<serde_json::Value> {
    let response = client
        .get(url.clone())
        .header(ACCEPT, GITHUB_ACCEPT)
        .send()
        .await
        .map_err(|e| SearchWebError::Network(format!("HTTP request failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SearchWebError::Network(format!("{url}: failed to read body: {e}")))?;

    if !status.is_success() {
        return Err(SearchWebError::HttpStatus {
            service: "GitHub".into(),
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body)
        .map_err(|_| SearchWebError::parse(format!("Non-JSON response:\n{body}")))
}
