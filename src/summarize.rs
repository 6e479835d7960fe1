//! LLM summaries of a filtered article set.
//!
//! Talks to any OpenAI-compatible chat completions endpoint. The default
//! points at Gemini's compatibility layer.

use crate::article::Article;
use crate::error::{JournalError, Result};
use crate::prompts::summary::{build_summary_prompt, MAX_SUMMARY_ARTICLES};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default model name
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// LLM configuration
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl SummaryConfig {
    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(JournalError::Config("LLM API key is missing".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(JournalError::Config("LLM base URL is missing".to_string()));
        }
        Ok(())
    }
}

/// OpenAI-compatible API response structures
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Summarise up to [`MAX_SUMMARY_ARTICLES`] articles in one request.
pub async fn generate_summary(config: &SummaryConfig, articles: &[&Article]) -> Result<String> {
    config.validate()?;
    if articles.is_empty() {
        return Err(JournalError::Validation("No articles to summarize".to_string()));
    }

    let prompt = build_summary_prompt(articles);
    info!(
        articles = articles.len().min(MAX_SUMMARY_ARTICLES),
        model = %config.model,
        "Requesting summary"
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| JournalError::Config(format!("Failed to build HTTP client: {}", e)))?;

    let request_body = serde_json::json!({
        "model": config.model,
        "messages": [
            {"role": "user", "content": prompt}
        ],
        "temperature": 0.3
    });

    let api_url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
    debug!(url = %api_url, "Sending LLM request");

    let response = client
        .post(&api_url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", config.api_key.trim()))
        .json(&request_body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(JournalError::Api {
            code: status.as_u16() as i32,
            message: format!("LLM API error: {} - {}", status, error_text),
        });
    }

    let api_response: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| JournalError::Parse(format!("Failed to parse LLM response: {}", e)))?;

    api_response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| JournalError::Parse("LLM response contained no text".to_string()))
}
