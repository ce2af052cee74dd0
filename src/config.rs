//! Run configuration.
//!
//! Settings resolve in priority order: CLI flag, environment variable,
//! built-in default. Validation happens once here so the pipeline can take
//! its inputs as given.
use crate::pipeline::DEFAULT_API_BASE_URL;
use anyhow::{anyhow, Result};
use std::time::Duration;

pub const BASE_URL_ENV: &str = "CAPGEN_API_BASE_URL";
pub const TOKEN_ENV: &str = "CAPGEN_ACCESS_TOKEN";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Resolve the config from explicit values, falling back to `env_lookup`.
///
/// `env_lookup` is injected so tests never touch the process environment.
pub fn resolve_config(
    base_url: Option<&str>,
    timeout_secs: Option<u64>,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<PipelineConfig> {
    let base_url = match base_url {
        Some(value) => value.to_string(),
        None => env_lookup(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
    };
    let config = PipelineConfig {
        base_url: normalize_base_url(&base_url)?,
        timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    };
    validate_config(&config)?;
    Ok(config)
}

/// Token from the flag, else the environment. Blank tokens pass through so
/// the pipeline can report them with its own message.
pub fn resolve_token(token: Option<&str>, env_lookup: impl Fn(&str) -> Option<String>) -> String {
    token
        .map(str::to_string)
        .or_else(|| env_lookup(TOKEN_ENV))
        .unwrap_or_default()
}

pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    if config.timeout.is_zero() {
        return Err(anyhow!("timeout must be greater than zero seconds"));
    }
    if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
        return Err(anyhow!(
            "base URL must start with http:// or https:// (got {:?})",
            config.base_url
        ));
    }
    Ok(())
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(anyhow!("base URL must be non-empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let config = resolve_config(None, None, no_env).expect("default config");
        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn flag_beats_env_and_trailing_slash_is_stripped() {
        let env = |key: &str| (key == BASE_URL_ENV).then(|| "https://env.example".to_string());

        let from_env = resolve_config(None, None, env).expect("env config");
        assert_eq!(from_env.base_url, "https://env.example");

        let from_flag =
            resolve_config(Some("http://127.0.0.1:8080/"), Some(5), env).expect("flag config");
        assert_eq!(from_flag.base_url, "http://127.0.0.1:8080");
        assert_eq!(from_flag.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_scheme_blank_url_and_zero_timeout() {
        let err = resolve_config(Some("ftp://host"), None, no_env).expect_err("bad scheme");
        assert!(err.to_string().contains("http:// or https://"));

        let err = resolve_config(Some("  / "), None, no_env).expect_err("blank url");
        assert!(err.to_string().contains("non-empty"));

        let err = resolve_config(None, Some(0), no_env).expect_err("zero timeout");
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn token_prefers_flag_then_env() {
        let env = |key: &str| (key == TOKEN_ENV).then(|| "env-token".to_string());
        assert_eq!(resolve_token(Some("flag-token"), env), "flag-token");
        assert_eq!(resolve_token(None, env), "env-token");
        assert_eq!(resolve_token(None, no_env), "");
    }
}
