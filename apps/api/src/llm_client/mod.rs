/// LLM Client: the text-generation collaborator behind weekly summaries.
///
/// No other module talks to the Anthropic API. Everything else depends on the
/// `TextGenerator` trait so the generator can be absent or faked.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::entry::Entry;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Model used for weekly digests.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;
const MAX_RETRIES: u32 = 3;
/// Longest excerpt of a single entry included in a prompt.
const ENTRY_EXCERPT_CHARS: usize = 280;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Produces free text from a prompt and a set of journal entries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, entries: &[Entry]) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client with retry on 429/5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
        })
    }

    /// Makes a raw call to the API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str, entries: &[Entry]) -> Result<String, LlmError> {
        let full_prompt = format!("{prompt}\n\nENTRIES:\n{}", render_entries(entries));
        let response = self.call(&full_prompt, prompts::WEEKLY_SUMMARY_SYSTEM).await?;
        let text = response.text().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }
}

/// One line per entry: date, emotion, themes, then the summary or a text excerpt.
/// Entry text is stored escaped; it is decoded here because the prompt is not HTML.
pub fn render_entries(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|e| {
            let body = e.summary.as_deref().unwrap_or(&e.text);
            let body = html_escape::decode_html_entities(body);
            let excerpt: String = body.chars().take(ENTRY_EXCERPT_CHARS).collect();
            let themes: Vec<&str> = e.themes.iter().map(|t| t.as_str()).collect();
            format!(
                "- {} [{}; themes: {}] {}",
                e.created_at.format("%Y-%m-%d"),
                e.emotion.as_str(),
                if themes.is_empty() {
                    "none".to_string()
                } else {
                    themes.join(", ")
                },
                excerpt.replace('\n', " ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::models::entry::{Emotion, Theme};

    fn entry(text: &str, summary: Option<&str>, themes: Vec<Theme>) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            user_id: "u".to_string(),
            text: text.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap(),
            sentiment: 0.4,
            emotion: Emotion::Positive,
            confidence: 0.8,
            themes,
            summary: summary.map(String::from),
            word_count: 3,
            is_reflection: false,
            original_entry_id: None,
        }
    }

    #[test]
    fn test_render_entries_prefers_summary() {
        let rendered = render_entries(&[entry("long body", Some("short gist"), vec![Theme::Work])]);
        assert_eq!(rendered, "- 2024-03-05 [positive; themes: work] short gist");
    }

    #[test]
    fn test_render_entries_decodes_stored_escapes() {
        let rendered = render_entries(&[entry("Tom &amp; Jerry &lt;3", None, vec![])]);
        assert!(rendered.ends_with("[positive; themes: none] Tom & Jerry <3"));
    }

    #[test]
    fn test_render_entries_truncates_long_text() {
        let long = "a".repeat(1000);
        let rendered = render_entries(&[entry(&long, None, vec![])]);
        assert!(rendered.len() < 400);
    }

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response: LlmResponse = serde_json::from_str(
            r#"{"content":[{"type":"tool_use"},{"type":"text","text":"hi"}],
                "usage":{"input_tokens":1,"output_tokens":1}}"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("hi"));
    }
}
