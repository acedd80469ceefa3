// src/config.rs

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use url::Url;

use crate::agent::{llm::DEFAULT_OPENAI_BASE_URL, scan_agent::DEFAULT_MAX_TOOL_ROUNDS};
use crate::blockchain::client::DEFAULT_BASE_URL;

// A struct to hold all configuration, loaded once at startup from the environment / .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,

    // LLM provider
    pub openai_api_key: SecretString,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_temperature: f32,
    pub llm_timeout: Duration,
    pub agent_max_tool_rounds: usize,

    // WormholeScan
    pub wormholescan_api_url: String,
    pub upstream_timeout: Duration,
    /// Fetch `/swagger.json` once at startup and log what it describes.
    pub swagger_prefetch: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY")
            .map(SecretString::new)
            .context("OPENAI_API_KEY must be set")?;

        let openai_base_url = var("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        Url::parse(&openai_base_url).context("OPENAI_BASE_URL must be a valid URL")?;

        let wormholescan_api_url = var("WORMHOLESCAN_API_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&wormholescan_api_url).context("WORMHOLESCAN_API_URL must be a valid URL")?;

        let agent_max_tool_rounds: usize = var("AGENT_MAX_TOOL_ROUNDS")
            .unwrap_or_else(|| DEFAULT_MAX_TOOL_ROUNDS.to_string())
            .parse()
            .context("AGENT_MAX_TOOL_ROUNDS must be a valid number")?;
        if agent_max_tool_rounds == 0 {
            bail!("AGENT_MAX_TOOL_ROUNDS must be at least 1");
        }

        Ok(Config {
            // Server settings
            host: var("HOST")
                .unwrap_or_else(|| "127.0.0.1".to_string())
                .parse()
                .context("HOST must be a valid IP address")?,
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            request_timeout: seconds(&var, "REQUEST_TIMEOUT_SECS", 300)?,

            // LLM provider
            openai_api_key,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4".to_string()),
            openai_base_url,
            llm_temperature: var("LLM_TEMPERATURE")
                .unwrap_or_else(|| "0".to_string())
                .parse()
                .context("LLM_TEMPERATURE must be a valid number")?,
            llm_timeout: seconds(&var, "LLM_TIMEOUT_SECS", 60)?,
            agent_max_tool_rounds,

            // WormholeScan
            wormholescan_api_url,
            upstream_timeout: seconds(&var, "UPSTREAM_TIMEOUT_SECS", 10)?,
            swagger_prefetch: var("SWAGGER_PREFETCH")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
        })
    }
}

fn seconds<F>(var: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: u64 = match var(key) {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds", key))?,
        None => default,
    };
    if secs == 0 {
        bail!("{} must be greater than zero", key);
    }
    Ok(Duration::from_secs(secs))
}
