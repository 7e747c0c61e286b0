//! Single-shot text generation against external LLM providers.
//!
//! OpenAI and Groq share a request format; Anthropic differs. Every call
//! is bounded by a timeout so a slow provider degrades into a fallback
//! instead of stalling the request.

use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::types::LlmProvider;

/// Upper bound on any single generation call.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(12);

/// Generate text from a prompt. Returns the completion or an error
/// string; timeouts are reported as errors, never waited out.
pub async fn generate(
    client: &Client,
    provider: LlmProvider,
    prompt: &str,
    model: &str,
    api_key: &str,
    max_tokens: usize,
    temperature: f64,
) -> Result<String, String> {
    let call = async {
        match provider {
            LlmProvider::OpenAi => {
                generate_openai_compat(
                    client,
                    "https://api.openai.com/v1/chat/completions",
                    prompt,
                    model,
                    api_key,
                    max_tokens,
                    temperature,
                )
                .await
            }
            LlmProvider::Groq => {
                generate_openai_compat(
                    client,
                    "https://api.groq.com/openai/v1/chat/completions",
                    prompt,
                    model,
                    api_key,
                    max_tokens,
                    temperature,
                )
                .await
            }
            LlmProvider::Anthropic => {
                generate_anthropic(client, prompt, model, api_key, max_tokens, temperature).await
            }
        }
    };

    match tokio::time::timeout(GENERATION_TIMEOUT, call).await {
        Ok(result) => result,
        Err(_) => Err(format!(
            "Generation timed out after {}s",
            GENERATION_TIMEOUT.as_secs()
        )),
    }
}

/// OpenAI-compatible chat completions (OpenAI, Groq).
async fn generate_openai_compat(
    client: &Client,
    url: &str,
    prompt: &str,
    model: &str,
    api_key: &str,
    max_tokens: usize,
    temperature: f64,
) -> Result<String, String> {
    debug!("Generating via {} with model {}", url, model);

    let body = json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
        "temperature": temperature,
        "max_tokens": max_tokens,
    });

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("API error {}: {}", status, body));
    }

    let parsed: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Bad response body: {}", e))?;

    parsed["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| "Response missing completion text".to_string())
}

/// Anthropic's Messages API.
async fn generate_anthropic(
    client: &Client,
    prompt: &str,
    model: &str,
    api_key: &str,
    max_tokens: usize,
    temperature: f64,
) -> Result<String, String> {
    debug!("Generating via Anthropic with model {}", model);

    let body = json!({
        "model": model,
        "messages": [{"role": "user", "content": prompt}],
        "temperature": temperature,
        "max_tokens": max_tokens,
    });

    let response = client
        .post("https://api.anthropic.com/v1/messages")
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("API error {}: {}", status, body));
    }

    let parsed: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Bad response body: {}", e))?;

    parsed["content"][0]["text"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| "Response missing completion text".to_string())
}

/// Test an API key by making a minimal request.
pub async fn test_api_key(provider: &str, api_key: &str) -> Result<(), String> {
    let client = Client::new();

    match provider {
        "openai" => {
            let resp = client
                .get("https://api.openai.com/v1/models")
                .header("Authorization", format!("Bearer {}", api_key))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        "anthropic" => {
            let resp = client
                .post("https://api.anthropic.com/v1/messages")
                .header("x-api-key", api_key)
                .header("anthropic-version", "2023-06-01")
                .header("Content-Type", "application/json")
                .json(&json!({
                    "model": "claude-3-5-haiku-20241022",
                    "max_tokens": 1,
                    "messages": [{"role": "user", "content": "Hi"}],
                }))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            // 400 with a valid key means the key works (quota/model issue)
            if resp.status().is_success() || resp.status().as_u16() == 400 {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        "groq" => {
            let resp = client
                .get("https://api.groq.com/openai/v1/models")
                .header("Authorization", format!("Bearer {}", api_key))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(format!("API returned status {}", resp.status()))
            }
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}
