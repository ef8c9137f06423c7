use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub issue_tracker: IssueTrackerConfig,
    #[serde(default)]
    pub release_host: ReleaseHostConfig,
    #[serde(default)]
    pub intent: IntentConfig,
    #[serde(default)]
    pub guardrail: GuardrailConfig,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8507
}

/// Where generated documents are written.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated_pdfs")
}

/// Issue tracker (JIRA REST v2) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssueTrackerConfig {
    /// Tracker root URL, without the `/rest/api/2` suffix.
    #[serde(default = "default_issue_tracker_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for IssueTrackerConfig {
    fn default() -> Self {
        Self {
            base_url: default_issue_tracker_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_issue_tracker_url() -> String {
    "https://issues.apache.org/jira".to_string()
}

/// Release host (GitHub REST) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseHostConfig {
    #[serde(default = "default_release_host_url")]
    pub base_url: String,
    /// Optional bearer token. Can use ${ENV_VAR} syntax.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ReleaseHostConfig {
    fn default() -> Self {
        Self {
            base_url: default_release_host_url(),
            token: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_release_host_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "relnotes-release-notes-agent".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// How the structured intent is pulled out of a free-text request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentMode {
    /// Pattern-based extraction, no LLM needed.
    #[default]
    Heuristic,
    /// Ask the configured LLM for a JSON intent.
    Llm,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IntentConfig {
    #[serde(default)]
    pub mode: IntentMode,
}

/// Safety screening of incoming requests
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GuardrailConfig {
    /// When enabled, requests are screened by the LLM before extraction.
    #[serde(default)]
    pub enabled: bool,
    /// Model override for the guardrail (defaults to `llm.model`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// Groq cloud (OpenAI-compatible).
    Groq,
    /// OpenAI API.
    OpenAi,
    /// Local Ollama instance through its OpenAI-compatible endpoint.
    Ollama,
    /// Any other OpenAI-compatible endpoint (`api_base` required).
    Custom,
}

impl LlmProvider {
    /// Default API base for the provider, if it has one.
    pub fn default_api_base(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Groq => Some("https://api.groq.com/openai/v1"),
            LlmProvider::OpenAi => Some("https://api.openai.com/v1"),
            LlmProvider::Ollama => Some("http://localhost:11434/v1"),
            LlmProvider::Custom => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Groq => "groq",
            LlmProvider::OpenAi => "open_ai",
            LlmProvider::Ollama => "ollama",
            LlmProvider::Custom => "custom",
        }
    }
}

/// LLM client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// API key (can reference env var with ${VAR_NAME}).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API base URL (for proxies or self-hosted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    256
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub issue_tracker: IssueTrackerConfig,
    pub release_host: SanitizedReleaseHostConfig,
    pub intent: IntentConfig,
    pub guardrail: GuardrailConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<SanitizedLlmConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedReleaseHostConfig {
    pub base_url: String,
    pub token_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            storage: config.storage.clone(),
            issue_tracker: config.issue_tracker.clone(),
            release_host: SanitizedReleaseHostConfig {
                base_url: config.release_host.base_url.clone(),
                token_configured: config
                    .release_host
                    .token
                    .as_ref()
                    .is_some_and(|t| !t.is_empty()),
                timeout_secs: config.release_host.timeout_secs,
            },
            intent: config.intent.clone(),
            guardrail: config.guardrail.clone(),
            llm: config.llm.as_ref().map(|l| SanitizedLlmConfig {
                provider: l.provider.as_str().to_string(),
                model: l.model.clone(),
                api_key_configured: l.api_key.as_ref().is_some_and(|k| !k.is_empty()),
                api_base: l.api_base.clone(),
            }),
        }
    }
}
