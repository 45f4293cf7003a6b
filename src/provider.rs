//! External language-model provider transport.
//!
//! A provider is an opaque capability: send one instruction string, get raw
//! text back or fail. Every failure cause (auth, quota, network, malformed
//! body) surfaces as a [`ProviderError`] and is treated uniformly by the
//! orchestrator. One request per invocation; no internal retry loop. Callers
//! impose their own timeout policy beyond the per-agent socket timeout here.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from the provider subsystem.
#[derive(Debug, Error, Diagnostic)]
pub enum ProviderError {
    #[error("{provider} credential is not configured")]
    #[diagnostic(
        code(taskpilot::provider::missing_credential),
        help("Set the {env_var} environment variable, or use --provider mock.")
    )]
    MissingCredential {
        provider: String,
        env_var: String,
    },

    #[error("{provider} request failed: {message}")]
    #[diagnostic(
        code(taskpilot::provider::request_failed),
        help("Check network connectivity and the provider base URL.")
    )]
    RequestFailed { provider: String, message: String },

    #[error("{provider} returned status {status}")]
    #[diagnostic(
        code(taskpilot::provider::bad_status),
        help(
            "The provider rejected the request. 401 usually means a bad API key, \
             429 means quota exhaustion; anything else is an upstream problem."
        )
    )]
    BadStatus { provider: String, status: u16 },

    #[error("failed to parse {provider} response: {message}")]
    #[diagnostic(
        code(taskpilot::provider::parse_error),
        help("The provider returned an unexpected response envelope.")
    )]
    ParseError { provider: String, message: String },
}

/// Which response path the caller selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Deterministic, network-free.
    Mock,
    /// OpenAI-compatible responses endpoint.
    OpenAi,
    /// Reserved; answers with a placeholder.
    Gemini,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Mock => "mock",
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mock" => Ok(Self::Mock),
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(format!(
                "unknown provider \"{other}\" (expected mock, openai, or gemini)"
            )),
        }
    }
}

/// Capability interface over an external provider.
pub trait ProviderTransport {
    /// Human-readable provider name, used in warnings and placeholders.
    fn name(&self) -> &str;

    /// Send one instruction payload; return the provider's raw text output.
    fn send(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL of the API.
    pub base_url: String,
    /// Model name to request.
    pub model: String,
    /// API key; `None` means unconfigured.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "gpt-4.1-mini".into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl OpenAiConfig {
    /// Default config with the key taken from `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            ..Default::default()
        }
    }
}

/// Client for an OpenAI-compatible `/v1/responses` endpoint.
pub struct OpenAiClient {
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }
}

impl ProviderTransport for OpenAiClient {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn send(&self, prompt: &str) -> Result<String, ProviderError> {
        let Some(ref api_key) = self.config.api_key else {
            return Err(ProviderError::MissingCredential {
                provider: self.name().into(),
                env_var: "OPENAI_API_KEY".into(),
            });
        };

        let url = format!("{}/v1/responses", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();

        let body = serde_json::json!({
            "model": self.config.model,
            "input": prompt,
        });
        let body_str = serde_json::to_string(&body).map_err(|e| ProviderError::RequestFailed {
            provider: self.name().into(),
            message: format!("JSON serialize error: {e}"),
        })?;

        tracing::debug!(model = %self.config.model, "sending provider request");

        let resp = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {api_key}"))
            .send_string(&body_str)
            .map_err(|e: ureq::Error| match e {
                ureq::Error::Status(status, _) => ProviderError::BadStatus {
                    provider: self.name().into(),
                    status,
                },
                other => ProviderError::RequestFailed {
                    provider: self.name().into(),
                    message: other.to_string(),
                },
            })?;

        let resp_str = resp.into_string().map_err(|e| ProviderError::ParseError {
            provider: self.name().into(),
            message: e.to_string(),
        })?;

        let json: serde_json::Value =
            serde_json::from_str(&resp_str).map_err(|e| ProviderError::ParseError {
                provider: self.name().into(),
                message: e.to_string(),
            })?;

        // The responses API puts the text either at the top level or nested
        // inside the first output item.
        let text = json["output_text"]
            .as_str()
            .or_else(|| json["output"][0]["content"][0]["text"].as_str())
            .map(str::to_string);

        text.ok_or_else(|| ProviderError::ParseError {
            provider: self.name().into(),
            message: "no output text in response".into(),
        })
    }
}
