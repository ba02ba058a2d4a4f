use std::{net::IpAddr, path::PathBuf, str::FromStr};

use anyhow::Context;

const DEFAULT_BIND: [u8; 4] = [0, 0, 0, 0];
const DEFAULT_API_PORT: u16 = 7667;
const DEFAULT_INGEST_PORT: u16 = 7887;
const DEFAULT_ASSETS: &str = "assets";

mod vars {
    pub const BIND: &str = "HWMONITOR_BIND";
    pub const API_PORT: &str = "HWMONITOR_API_PORT";
    pub const INGEST_PORT: &str = "HWMONITOR_INGEST_PORT";
    pub const ASSETS: &str = "HWMONITOR_ASSETS";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bind: IpAddr,
    pub api_port: u16,
    pub ingest_port: u16,
    pub assets: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: IpAddr::from(DEFAULT_BIND),
            api_port: DEFAULT_API_PORT,
            ingest_port: DEFAULT_INGEST_PORT,
            assets: PathBuf::from(DEFAULT_ASSETS),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Config::default();
        Ok(Config {
            bind: parse_var(&lookup, vars::BIND)?.unwrap_or(defaults.bind),
            api_port: parse_var(&lookup, vars::API_PORT)?.unwrap_or(defaults.api_port),
            ingest_port: parse_var(&lookup, vars::INGEST_PORT)?.unwrap_or(defaults.ingest_port),
            assets: lookup(vars::ASSETS).map(PathBuf::from).unwrap_or(defaults.assets),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("invalid value {value:?} for {key}"))
        })
        .transpose()
}
