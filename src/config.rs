use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Which upstream API the chat proxy talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderKind {
    OpenAi,
    AzureOpenAi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub default_model: String,
    /// Models this deployment accepts, in the order they are advertised.
    pub models: Vec<String>,
    pub azure_api_key: String,
    pub azure_endpoint: String,
    pub azure_deployment: String,
    pub azure_api_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub llm: LlmConfig,
}

const DEFAULT_MODELS: &str = "gpt-4o,gpt-4o-mini,gpt-4-turbo,gpt-4,gpt-3.5-turbo";

pub(crate) fn parse_models(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(|m| m.to_string())
        .collect()
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "aiportal".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "aiportal-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let provider = match std::env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "openai".into())
            .to_lowercase()
            .as_str()
        {
            "azure_openai" => LlmProviderKind::AzureOpenAi,
            _ => LlmProviderKind::OpenAi,
        };
        let default_model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        let mut models =
            parse_models(&std::env::var("LLM_MODELS").unwrap_or_else(|_| DEFAULT_MODELS.into()));
        if !models.contains(&default_model) {
            models.push(default_model.clone());
        }
        let llm = LlmConfig {
            provider,
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            default_model,
            models,
            azure_api_key: std::env::var("AZURE_OPENAI_API_KEY").unwrap_or_default(),
            azure_endpoint: std::env::var("AZURE_OPENAI_ENDPOINT").unwrap_or_default(),
            azure_deployment: std::env::var("AZURE_OPENAI_DEPLOYMENT").unwrap_or_default(),
            azure_api_version: std::env::var("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|_| "2024-02-15-preview".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            llm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_models_splits_and_trims() {
        let models = parse_models("gpt-4o, gpt-4o-mini ,,gpt-4");
        assert_eq!(models, vec!["gpt-4o", "gpt-4o-mini", "gpt-4"]);
    }

    #[test]
    fn parse_models_empty_input_gives_empty_list() {
        assert!(parse_models("").is_empty());
    }
}
