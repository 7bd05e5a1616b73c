use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{LlmConfig, LlmProviderKind};

/// One completed exchange with the upstream provider.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> anyhow::Result<Completion>;
}

/// Picks the model for a request: the requested one if this deployment
/// advertises it, otherwise the configured default.
pub fn resolve_model<'a>(requested: Option<&'a str>, config: &'a LlmConfig) -> &'a str {
    requested
        .filter(|m| config.models.iter().any(|known| known == m))
        .unwrap_or(&config.default_model)
}

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: i32,
    completion_tokens: i32,
}

/// HTTP client for OpenAI-style chat completion APIs (OpenAI or Azure OpenAI).
pub struct LlmProvider {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmProvider {
    pub fn new(config: LlmConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("build llm http client")?;
        Ok(Self { http, config })
    }

    fn request(&self, model: &str, prompt: &str) -> reqwest::RequestBuilder {
        let body = CompletionRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        match self.config.provider {
            LlmProviderKind::OpenAi => self
                .http
                .post(format!("{}/chat/completions", self.config.base_url))
                .bearer_auth(&self.config.api_key)
                .json(&body),
            // Azure routes by deployment name, not by the model field.
            LlmProviderKind::AzureOpenAi => self
                .http
                .post(format!(
                    "{}/openai/deployments/{}/chat/completions?api-version={}",
                    self.config.azure_endpoint,
                    self.config.azure_deployment,
                    self.config.azure_api_version
                ))
                .header("api-key", &self.config.azure_api_key)
                .json(&body),
        }
    }
}

#[async_trait]
impl LlmClient for LlmProvider {
    async fn complete(&self, model: &str, prompt: &str) -> anyhow::Result<Completion> {
        let response = self
            .request(model, prompt)
            .send()
            .await
            .context("llm request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "llm provider returned error status");
            anyhow::bail!("provider returned {status}");
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .context("decode llm provider response")?;
        let completion = parse_completion(parsed)?;

        info!(
            model = %model,
            prompt_tokens = completion.prompt_tokens,
            completion_tokens = completion.completion_tokens,
            "llm call successful"
        );
        Ok(completion)
    }
}

fn parse_completion(response: CompletionResponse) -> anyhow::Result<Completion> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .context("provider response has no content")?;
    Ok(Completion {
        text,
        prompt_tokens: response.usage.prompt_tokens,
        completion_tokens: response.usage.completion_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    fn test_config(models: &[&str], default: &str) -> LlmConfig {
        LlmConfig {
            provider: LlmProviderKind::OpenAi,
            api_key: "test".into(),
            base_url: "https://api.openai.com/v1".into(),
            default_model: default.into(),
            models: models.iter().map(|m| m.to_string()).collect(),
            azure_api_key: String::new(),
            azure_endpoint: String::new(),
            azure_deployment: String::new(),
            azure_api_version: String::new(),
        }
    }

    #[test]
    fn resolve_model_uses_recognized_request() {
        let config = test_config(&["gpt-4o", "gpt-4o-mini"], "gpt-4o-mini");
        assert_eq!(resolve_model(Some("gpt-4o"), &config), "gpt-4o");
    }

    #[test]
    fn resolve_model_falls_back_on_unknown() {
        let config = test_config(&["gpt-4o", "gpt-4o-mini"], "gpt-4o-mini");
        assert_eq!(resolve_model(Some("claude-5"), &config), "gpt-4o-mini");
        assert_eq!(resolve_model(None, &config), "gpt-4o-mini");
    }

    #[test]
    fn parses_provider_response() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Hello!"}}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).expect("decode");
        let completion = parse_completion(parsed).expect("content present");
        assert_eq!(completion.text, "Hello!");
        assert_eq!(completion.prompt_tokens, 9);
        assert_eq!(completion.completion_tokens, 3);
    }

    #[test]
    fn rejects_response_without_content() {
        let raw = r#"{
            "choices": [],
            "usage": {"prompt_tokens": 0, "completion_tokens": 0}
        }"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).expect("decode");
        assert!(parse_completion(parsed).is_err());
    }
}
