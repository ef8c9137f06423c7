use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("RELNOTES_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    resolve_secrets(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    let config: Config =
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    resolve_secrets(config)
}

/// Replace `${VAR}` secret references with the variable's value.
fn resolve_secrets(mut config: Config) -> Result<Config, ConfigError> {
    if let Some(token) = config.release_host.token.take() {
        config.release_host.token = Some(expand_env_ref(&token)?);
    }
    if let Some(llm) = config.llm.as_mut() {
        if let Some(key) = llm.api_key.take() {
            llm.api_key = Some(expand_env_ref(&key)?);
        }
    }
    Ok(config)
}

fn expand_env_ref(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    match trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(name) => {
            std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
        }
        None => Ok(value.to_string()),
    }
}
