//! Application configuration for searchweb.
//!
//! User config lives at `~/.searchweb/searchweb.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SearchWebError};
use crate::types::SearchMode;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "searchweb.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".searchweb";

/// Inclusive bounds for the web plugin result cap.
pub const MAX_RESULTS_RANGE: std::ops::RangeInclusive<u8> = 1..=20;

// ---------------------------------------------------------------------------
// Config structs (matching searchweb.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-run defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// OpenRouter settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Changelog short-circuit settings.
    #[serde(default)]
    pub changelog: ChangelogConfig,

    /// Keyword tables for query classification.
    #[serde(default)]
    pub lexicon: Lexicon,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Language code passed into prompts.
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Web plugin result cap.
    #[serde(default = "default_max_results")]
    pub max_results: u8,

    /// Search mode when `--mode` is not given.
    #[serde(default)]
    pub mode: SearchMode,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            max_results: default_max_results(),
            mode: SearchMode::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_lang() -> String {
    "pl".into()
}
fn default_max_results() -> u8 {
    5
}
fn default_timeout_secs() -> u64 {
    60
}

/// `[openrouter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Default model id.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Chat-completion endpoint.
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: Url,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            default_model: default_model(),
            endpoint: default_chat_endpoint(),
        }
    }
}

impl OpenRouterConfig {
    /// Read the API key from the configured env var. Empty counts as unset.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|val| !val.is_empty())
    }
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_model() -> String {
    "google/gemini-2.5-flash-lite".into()
}
fn default_chat_endpoint() -> Url {
    Url::parse("https://openrouter.ai/api/v1/chat/completions").expect("static chat endpoint")
}

/// `[changelog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogConfig {
    /// Keyword naming the project whose changelog is answered directly.
    #[serde(default = "default_project_keyword")]
    pub project_keyword: String,

    /// Second keyword that must also appear in the query.
    #[serde(default = "default_cli_keyword")]
    pub cli_keyword: String,

    /// Releases listing endpoint (one page of up to 100 entries).
    #[serde(default = "default_releases_api")]
    pub releases_api: Url,

    /// Human-facing releases page, always listed first in the sources.
    #[serde(default = "default_releases_page")]
    pub releases_page: Url,

    /// User-Agent sent to the releases endpoint.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Bullet cap per release.
    #[serde(default = "default_max_bullets")]
    pub max_bullets: usize,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            project_keyword: default_project_keyword(),
            cli_keyword: default_cli_keyword(),
            releases_api: default_releases_api(),
            releases_page: default_releases_page(),
            user_agent: default_user_agent(),
            max_bullets: default_max_bullets(),
        }
    }
}

fn default_project_keyword() -> String {
    "codex".into()
}
fn default_cli_keyword() -> String {
    "cli".into()
}
fn default_releases_api() -> Url {
    Url::parse("https://api.github.com/repos/openai/codex/releases?per_page=100")
        .expect("static releases endpoint")
}
fn default_releases_page() -> Url {
    Url::parse("https://github.com/openai/codex/releases").expect("static releases page")
}
fn default_user_agent() -> String {
    "codex-skill-search-web".into()
}
fn default_max_bullets() -> usize {
    8
}

/// `[lexicon]` section: the keyword tables behind query classification.
///
/// Matching is case-insensitive substring matching against the lowercased
/// query, so entries should be written in lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    /// Substrings that mark a question as complex.
    #[serde(default = "default_complexity_markers")]
    pub complexity_markers: Vec<String>,

    /// Phrases asking for repeated/deepened research.
    #[serde(default = "default_deep_markers")]
    pub deep_markers: Vec<String>,

    /// Phrases asking for a quick single pass.
    #[serde(default = "default_simple_markers")]
    pub simple_markers: Vec<String>,

    /// Queries with at most this many words are always banal.
    #[serde(default = "default_banal_max_words")]
    pub banal_max_words: usize,

    /// Queries with at least this many words are complex.
    #[serde(default = "default_complex_min_words")]
    pub complex_min_words: usize,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            complexity_markers: default_complexity_markers(),
            deep_markers: default_deep_markers(),
            simple_markers: default_simple_markers(),
            banal_max_words: default_banal_max_words(),
            complex_min_words: default_complex_min_words(),
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_complexity_markers() -> Vec<String> {
    to_owned_list(&[
        "porówn",
        "różnic",
        "wady",
        "zalety",
        "dlaczego",
        "jak zrobić",
        "krok po kroku",
        "strategi",
        "plan",
        "analiz",
        "relacj",
        "histori",
        "tło",
        "konsekwenc",
        "wpływ",
        "kontrowers",
        "zależy",
    ])
}
fn default_deep_markers() -> Vec<String> {
    to_owned_list(&[
        "3 razy",
        "trzy razy",
        "iterac",
        "seria wyszuka",
        "zgłębia",
        "głębok",
        "deep",
    ])
}
fn default_simple_markers() -> Vec<String> {
    to_owned_list(&["proste", "szybko", "jedno wyszuk", "jednoraz", "basic"])
}
fn default_banal_max_words() -> usize {
    6
}
fn default_complex_min_words() -> usize {
    12
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that a web plugin result cap is within [`MAX_RESULTS_RANGE`].
pub fn validate_max_results(value: u8) -> Result<u8> {
    if MAX_RESULTS_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(SearchWebError::validation(format!(
            "--max-results must be between {} and {} (got {value})",
            MAX_RESULTS_RANGE.start(),
            MAX_RESULTS_RANGE.end()
        )))
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.searchweb/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SearchWebError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.searchweb/searchweb.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SearchWebError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        SearchWebError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_max_results(config.defaults.max_results)?;

    tracing::debug!(?path, "loaded config file");
    Ok(config)
}
