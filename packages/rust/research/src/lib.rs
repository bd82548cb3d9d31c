//! Web research over OpenRouter's `web` plugin.
//!
//! This crate provides:
//! - [`OpenRouterClient`] — bearer-authenticated chat-completion client
//! - [`simple_search`] — one web-search pass, answered as cited bullets
//! - [`plan_search`] — one web-search pass returning a [`ResearchIteration`]
//! - [`deep_search`] — three research passes merged by a synthesis pass

mod client;
mod iteration;
mod prompts;
mod scan;

use searchweb_shared::Result;
use tracing::{info, instrument};

pub use client::OpenRouterClient;
pub use iteration::{MAX_MERGED_SOURCES, ResearchIteration, Source, merge_sources, numbered_sources};
pub use scan::first_json_object;

/// Per-run search parameters.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// OpenRouter model id.
    pub model: String,
    /// Answer language code.
    pub lang: String,
    /// Web plugin result cap.
    pub max_results: u8,
}

/// Single web-search pass. Returns the model's answer as-is.
#[instrument(skip_all, fields(model = %params.model))]
pub async fn simple_search(
    client: &OpenRouterClient,
    params: &SearchParams,
    query: &str,
) -> Result<String> {
    let prompt = prompts::answer_prompt(query, &params.lang);
    client
        .complete(&params.model, &prompt, Some(params.max_results))
        .await
}

/// Single web-search pass asking for a structured plan.
///
/// Only transport and response-schema problems are errors; a reply without
/// a usable JSON object becomes an empty iteration.
#[instrument(skip_all, fields(query = %query))]
pub async fn plan_search(
    client: &OpenRouterClient,
    params: &SearchParams,
    query: &str,
) -> Result<ResearchIteration> {
    let prompt = prompts::plan_prompt(query, &params.lang);
    let reply = client
        .complete(&params.model, &prompt, Some(params.max_results))
        .await?;

    let iteration = ResearchIteration::from_reply(&reply);
    info!(
        bullets = iteration.tldr_bullets.len(),
        sources = iteration.sources.len(),
        followups = iteration.followup_queries.len(),
        "research pass complete"
    );
    Ok(iteration)
}

/// Three research passes and a synthesis pass: four calls in total.
///
/// Passes 2 and 3 are derived from the first pass's follow-up queries and
/// run concurrently. Their results are combined in pass order, so the
/// output does not depend on which call finishes first. Any failing call
/// aborts the whole search.
#[instrument(skip_all, fields(model = %params.model))]
pub async fn deep_search(
    client: &OpenRouterClient,
    params: &SearchParams,
    query: &str,
) -> Result<String> {
    let first = plan_search(client, params, query).await?;

    let (second_query, third_query) = followup_queries(&first, query);
    info!(%second_query, %third_query, "deepening research");

    let (second, third) = tokio::join!(
        plan_search(client, params, &second_query),
        plan_search(client, params, &third_query),
    );
    let (second, third) = (second?, third?);

    let sources = merge_sources([&first, &second, &third], MAX_MERGED_SOURCES);
    info!(sources = sources.len(), "synthesizing");

    let prompt =
        prompts::synthesis_prompt(query, &params.lang, [&first, &second, &third], &sources);
    let content = client.complete(&params.model, &prompt, None).await?;

    Ok(format!("{}\n", content.trim_end()))
}

/// Queries for passes 2 and 3, falling back to suffixed originals.
fn followup_queries(first: &ResearchIteration, query: &str) -> (String, String) {
    let second = first
        .followup(0)
        .map(String::from)
        .unwrap_or_else(|| format!("{query} {}", prompts::SECOND_QUERY_SUFFIX));
    let third = first
        .followup(1)
        .map(String::from)
        .unwrap_or_else(|| format!("{query} {}", prompts::THIRD_QUERY_SUFFIX));
    (second, third)
}
