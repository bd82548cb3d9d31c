//! Minimal OpenRouter chat-completion client.

use std::time::Duration;

use reqwest::Client;
use searchweb_shared::{OpenRouterConfig, Result, SearchWebError};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

/// User-Agent string for chat requests.
const USER_AGENT: &str = concat!("searchweb/", env!("CARGO_PKG_VERSION"));

/// Service name used in diagnostics.
const SERVICE: &str = "OpenRouter";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `/chat/completions`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plugins: Option<Vec<Plugin>>,
    messages: Vec<Message<'a>>,
}

/// OpenRouter plugin entry. Only the `web` plugin is used.
#[derive(Debug, Serialize)]
struct Plugin {
    id: &'static str,
    max_results: u8,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated handle on the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl OpenRouterClient {
    /// Build a client for the configured endpoint.
    pub fn new(config: &OpenRouterConfig, api_key: String, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SearchWebError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    /// Send a single user message and return the assistant's text.
    ///
    /// `web_results` enables the web search plugin with that result cap.
    #[instrument(skip_all, fields(model = %model, web = web_results.is_some()))]
    pub async fn complete(
        &self,
        model: &str,
        prompt: &str,
        web_results: Option<u8>,
    ) -> Result<String> {
        let body = ChatRequest {
            model,
            plugins: web_results.map(|max_results| {
                vec![Plugin {
                    id: "web",
                    max_results,
                }]
            }),
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchWebError::Network(format!("{SERVICE} request failed: {e}")))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| SearchWebError::Network(format!("{SERVICE} request failed: {e}")))?;

        if !status.is_success() {
            return Err(SearchWebError::HttpStatus {
                service: SERVICE.into(),
                status: status.as_u16(),
                body: raw,
            });
        }

        let data: serde_json::Value = serde_json::from_str(&raw).map_err(|_| {
            SearchWebError::parse(format!("{SERVICE} returned non-JSON response:\n{raw}"))
        })?;

        let content = assistant_content(&data)?;
        debug!(chars = content.len(), "received completion");
        Ok(content)
    }
}

/// Pull `choices[0].message.content` out of a completion response.
fn assistant_content(data: &serde_json::Value) -> Result<String> {
    data.pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
        .map(String::from)
        .ok_or_else(|| SearchWebError::schema(SERVICE, data))
}
