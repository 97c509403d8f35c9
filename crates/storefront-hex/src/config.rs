use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: String,
    /// Overrides every collection delay; `Some(0)` disables the simulation.
    pub latency_ms: Option<u64>,
    pub fixtures_dir: Option<PathBuf>,
    pub seed: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let server_port = lookup("SERVER_PORT").unwrap_or_else(|| "3000".into());
        let latency_ms = lookup("STOREFRONT_LATENCY_MS")
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .context("STOREFRONT_LATENCY_MS must be a number of milliseconds")?;
        let fixtures_dir = lookup("STOREFRONT_FIXTURES_DIR").map(PathBuf::from);
        let seed = match lookup("STOREFRONT_SEED") {
            None => true,
            Some(v) => parse_bool(&v).context("STOREFRONT_SEED must be true or false")?,
        };
        Ok(Self {
            server_port,
            latency_ms,
            fixtures_dir,
            seed,
        })
    }
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => anyhow::bail!("invalid boolean {other}"),
    }
}
