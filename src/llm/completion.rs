use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Run a single-turn completion against the configured provider.
pub async fn complete(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let content = match config.provider.as_str() {
        "ollama" => call_ollama(client, config, prompt).await?,
        "openai" => call_openai(client, config, prompt).await?,
        "anthropic" => call_anthropic(client, config, prompt).await?,
        other => anyhow::bail!("Unknown LLM provider: {other}"),
    };
    Ok(content.trim().to_string())
}

pub fn summary_prompt(content: &str) -> String {
    format!(
        "Summarize the following code. Describe what it does, its main types and \
         functions, and anything notable about how it is structured. Be concise.\n\n\
         ```\n{content}\n```"
    )
}

pub fn analysis_prompt(code: &str) -> String {
    format!(
        "Analyze this code. Point out bugs, risky patterns and possible \
         improvements, referring to specific lines where you can.\n\n\
         ```\n{code}\n```"
    )
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

fn user_message(prompt: &str) -> Vec<Message> {
    vec![Message {
        role: "user".to_string(),
        content: prompt.to_string(),
    }]
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

async fn call_ollama(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url.trim_end_matches('/'));

    let req = OllamaChatRequest {
        model: config.model.clone(),
        messages: user_message(prompt),
        stream: false,
        options: OllamaOptions {
            num_predict: config.max_tokens,
        },
    };

    let resp = client
        .post(&url)
        .json(&req)
        .send()
        .await
        .context("Failed to call Ollama chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama chat API returned {status}: {body}");
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .context("Failed to parse Ollama chat response")?;
    Ok(body.message.content)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

async fn call_openai(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/'));
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiChatRequest {
        model: config.model.clone(),
        messages: user_message(prompt),
        temperature: 0.2,
        max_tokens: config.max_tokens,
    };

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await
        .context("Failed to call OpenAI chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI chat API returned {status}: {body}");
    }

    let body: OpenAiChatResponse = resp
        .json()
        .await
        .context("Failed to parse OpenAI chat response")?;
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("OpenAI chat API returned no content")
}

// ─── Anthropic ───────────────────────────────────────────

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

async fn call_anthropic(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let url = format!("{}/v1/messages", config.base_url.trim_end_matches('/'));
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = AnthropicRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        messages: user_message(prompt),
    };

    let resp = client
        .post(&url)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .json(&req)
        .send()
        .await
        .context("Failed to call Anthropic messages API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Anthropic messages API returned {status}: {body}");
    }

    let body: AnthropicResponse = resp
        .json()
        .await
        .context("Failed to parse Anthropic messages response")?;
    Ok(join_text_blocks(body.content))
}

fn join_text_blocks(blocks: Vec<AnthropicBlock>) -> String {
    blocks
        .into_iter()
        .filter(|b| b.kind == "text")
        .map(|b| b.text)
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_embeds_content() {
        let prompt = summary_prompt("fn main() {}");
        assert!(prompt.contains("fn main() {}"));
        assert!(prompt.starts_with("Summarize"));
    }

    #[test]
    fn test_analysis_prompt_embeds_code() {
        let prompt = analysis_prompt("let x = v[10];");
        assert!(prompt.starts_with("Analyze"));
        assert!(prompt.contains("let x = v[10];"));
    }

    #[test]
    fn test_anthropic_text_blocks_joined() {
        let body: AnthropicResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "Parses "},
                            {"type": "tool_use", "id": "x"},
                            {"type": "text", "text": "config files."}]}"#,
        )
        .unwrap();
        assert_eq!(join_text_blocks(body.content), "Parses config files.");
    }

    #[test]
    fn test_openai_null_content_deserializes() {
        let body: OpenAiChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(body.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_unknown_provider_is_an_error() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..LlmConfig::default()
        };
        let err = complete(&reqwest::Client::new(), &config, "hi").await.unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
    }
}
