//! End-to-end search pipeline: changelog short-circuit → mode resolution → search.

use std::time::Instant;

use tracing::{debug, info, instrument};

use searchweb_research::{OpenRouterClient, SearchParams};
use searchweb_shared::{AppConfig, QueryClass, Result, SearchMode, SearchWebError, Strategy};

use crate::classify::QueryClassifier;

/// Printed instead of searching when an `auto` query looks non-trivial.
pub const MODE_MENU: &str = "\
To wygląda na pytanie średnie/trudne. Wybierz tryb wyszukiwania:

a) Proste wyszukanie (1 raz) — odpisz: `proste` albo uruchom z `--mode simple`
b) Seria 3 wyszukań (zgłębianie) + synteza — odpisz: `seria` albo uruchom z `--mode deep`
";

/// One user request, after CLI flags and config defaults are merged.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// The user's question.
    pub query: String,
    /// Requested mode; `auto` is resolved by the pipeline.
    pub mode: SearchMode,
    /// Model, language and result cap.
    pub params: SearchParams,
}

/// What the pipeline produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Answered from the release listing, without an LLM.
    Changelog(String),
    /// The mode menu; the user is expected to re-run with a mode.
    Menu(String),
    /// An LLM answer.
    Answer { strategy: Strategy, text: String },
}

impl Outcome {
    /// Text to print on stdout.
    pub fn text(&self) -> &str {
        match self {
            Self::Changelog(text) | Self::Menu(text) | Self::Answer { text, .. } => text,
        }
    }
}

/// Result of resolving a [`SearchMode`] for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Run(Strategy),
    /// Ambiguous: ask the user to pick a mode.
    AskUser,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes, successfully or not.
    fn done(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self) {}
}

/// Resolve the requested mode into a strategy.
///
/// Explicit modes pass through. `auto` honours explicit depth wording in the
/// query first, then falls back to the classifier: banal queries get a
/// simple search, complex ones get the menu.
pub fn resolve_strategy(mode: SearchMode, query: &str, classifier: &QueryClassifier) -> Resolution {
    if let Ok(strategy) = Strategy::try_from(mode) {
        return Resolution::Run(strategy);
    }

    if let Some(strategy) = classifier.depth_intent(query) {
        debug!(%strategy, "explicit depth intent in query");
        return Resolution::Run(strategy);
    }

    match classifier.classify(query) {
        QueryClass::Complex => Resolution::AskUser,
        QueryClass::Banal => Resolution::Run(Strategy::Simple),
    }
}

/// Run the full search pipeline.
///
/// 1. Changelog short-circuit (no API key needed)
/// 2. API key check
/// 3. Mode resolution (may end with the menu)
/// 4. Simple or deep search
#[instrument(skip_all, fields(mode = %request.mode))]
pub async fn run_search(
    request: &SearchRequest,
    config: &AppConfig,
    api_key: Option<String>,
    progress: &dyn ProgressReporter,
) -> Result<Outcome> {
    let outcome = execute(request, config, api_key, progress).await;
    progress.done();
    outcome
}

async fn execute(
    request: &SearchRequest,
    config: &AppConfig,
    api_key: Option<String>,
    progress: &dyn ProgressReporter,
) -> Result<Outcome> {
    let start = Instant::now();

    // --- Phase 1: Changelog short-circuit ---
    if searchweb_changelog::matches_project(&request.query, &config.changelog) {
        progress.phase("Checking release notes");
    }
    if let Some(report) = searchweb_changelog::changelog_tldr(
        &request.query,
        &request.params.lang,
        &config.changelog,
        config.defaults.timeout_secs,
    )
    .await?
    {
        info!("answered from release listing");
        return Ok(Outcome::Changelog(report));
    }

    // --- Phase 2: Credentials ---
    let api_key = api_key.ok_or_else(|| {
        SearchWebError::config(format!(
            "Missing {} in environment.",
            config.openrouter.api_key_env
        ))
    })?;

    // --- Phase 3: Mode resolution ---
    let classifier = QueryClassifier::new(config.lexicon.clone());
    let strategy = match resolve_strategy(request.mode, &request.query, &classifier) {
        Resolution::Run(strategy) => strategy,
        Resolution::AskUser => {
            info!("query looks complex, asking for a mode");
            return Ok(Outcome::Menu(MODE_MENU.to_string()));
        }
    };

    // --- Phase 4: Search ---
    let client = OpenRouterClient::new(&config.openrouter, api_key, config.defaults.timeout_secs)?;
    let text = match strategy {
        Strategy::Simple => {
            progress.phase("Searching the web");
            searchweb_research::simple_search(&client, &request.params, &request.query).await?
        }
        Strategy::Deep => {
            progress.phase("Researching (3 passes + synthesis)");
            searchweb_research::deep_search(&client, &request.params, &request.query).await?
        }
    };

    info!(
        %strategy,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search complete"
    );
    Ok(Outcome::Answer { strategy, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Config with both endpoints pointed at the mock server.
    fn config_for(server: &MockServer) -> AppConfig {
        let mut config = AppConfig::default();
        config.openrouter.endpoint = Url::parse(&format!("{}/chat", server.uri())).unwrap();
        config.changelog.releases_api = Url::parse(&format!("{}/releases", server.uri())).unwrap();
        config.defaults.timeout_secs = 5;
        config
    }

    fn request(query: &str, mode: SearchMode, lang: &str) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            mode,
            params: SearchParams {
                model: "test/model".into(),
                lang: lang.into(),
                max_results: 5,
            },
        }
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": content } }]
        }))
    }

    #[test]
    fn explicit_modes_pass_through() {
        let c = QueryClassifier::default();
        let complex = "porównaj wady i zalety X i Y";
        assert_eq!(
            resolve_strategy(SearchMode::Simple, complex, &c),
            Resolution::Run(Strategy::Simple)
        );
        assert_eq!(
            resolve_strategy(SearchMode::Deep, "kurs euro", &c),
            Resolution::Run(Strategy::Deep)
        );
    }

    #[test]
    fn auto_mode_resolution() {
        let c = QueryClassifier::default();
        assert_eq!(
            resolve_strategy(SearchMode::Auto, "porównaj wady i zalety X i Y", &c),
            Resolution::AskUser
        );
        assert_eq!(
            resolve_strategy(SearchMode::Auto, "porównaj wady i zalety X i Y szybko", &c),
            Resolution::Run(Strategy::Simple)
        );
        assert_eq!(
            resolve_strategy(SearchMode::Auto, "kurs euro", &c),
            Resolution::Run(Strategy::Simple)
        );
    }

    #[tokio::test]
    async fn complex_auto_query_prints_menu_without_chat_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("should not be called"))
            .expect(0)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let req = request("porównaj wady i zalety X i Y", SearchMode::Auto, "pl");
        let outcome = run_search(&req, &config, Some("sk-test".into()), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Menu(MODE_MENU.to_string()));
        assert!(outcome.text().contains("--mode simple"));
        assert!(outcome.text().contains("--mode deep"));
    }

    #[tokio::test]
    async fn missing_api_key_is_config_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("nope"))
            .expect(0)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let req = request("kurs euro", SearchMode::Simple, "pl");
        let err = run_search(&req, &config, None, &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, SearchWebError::Config { .. }));
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }

    #[tokio::test]
    async fn changelog_short_circuit_needs_no_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "tag_name": "rust-v0.87.0", "published_at": "2026-01-10T09:00:00Z", "body": "- shiny" }
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(completion("nope"))
            .expect(0)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let req = request("codex cli 0.87", SearchMode::Auto, "pl");
        let outcome = run_search(&req, &config, None, &SilentProgress).await.unwrap();

        match outcome {
            Outcome::Changelog(text) => {
                assert!(text.starts_with("TL;DR: Codex CLI 0.87.0 → 0.87.0"));
                assert!(text.contains("0.87.0 (2026-01-10):\n- shiny"));
            }
            other => panic!("expected changelog, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn banal_auto_query_runs_simple_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("- 4,27 zł [1]"))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let req = request("kurs euro", SearchMode::Auto, "pl");
        let outcome = run_search(&req, &config, Some("sk-test".into()), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Answer {
                strategy: Strategy::Simple,
                text: "- 4,27 zł [1]".into()
            }
        );
    }

    #[tokio::test]
    async fn deep_mode_makes_four_chat_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("{\"tldr_bullets\": [\"x\"]}"))
            .expect(4)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let req = request("kurs euro", SearchMode::Deep, "pl");
        let outcome = run_search(&req, &config, Some("sk-test".into()), &SilentProgress)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            Outcome::Answer {
                strategy: Strategy::Deep,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn chat_http_error_aborts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let req = request("kurs euro", SearchMode::Simple, "pl");
        let err = run_search(&req, &config, Some("sk-test".into()), &SilentProgress)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("upstream exploded"));
    }
}
