use super::{
    types::{Config, IntentMode, LlmProvider},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upstream base URLs are http(s) and timeouts are non-zero
/// - LLM-backed features have an `[llm]` section to run against
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    check_url("issue_tracker.base_url", &config.issue_tracker.base_url)?;
    check_url("release_host.base_url", &config.release_host.base_url)?;

    if config.issue_tracker.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "issue_tracker.timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.release_host.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "release_host.timeout_secs cannot be 0".to_string(),
        ));
    }

    let needs_llm = config.intent.mode == IntentMode::Llm || config.guardrail.enabled;
    match &config.llm {
        None if needs_llm => {
            return Err(ConfigError::ValidationError(
                "intent.mode = \"llm\" and guardrail.enabled require an [llm] section".to_string(),
            ));
        }
        Some(llm) => {
            if llm.model.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "llm.model cannot be empty".to_string(),
                ));
            }
            if llm.provider == LlmProvider::Custom && llm.api_base.is_none() {
                return Err(ConfigError::ValidationError(
                    "llm.api_base is required for the custom provider".to_string(),
                ));
            }
            if let Some(base) = &llm.api_base {
                check_url("llm.api_base", base)?;
            }
        }
        None => {}
    }

    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be an http(s) URL, got '{}'",
            field, value
        )))
    }
}
