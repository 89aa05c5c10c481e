use anyhow::{anyhow, bail, Result};
use dotenvy::dotenv;
use std::env;

use crate::mixer::SelectionMode;

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8989/login";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_LOG_PATH: &str = "/tmp/moodmix.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub redis_url: String,
    /// Visibility preselected in the form.
    pub public: bool,
    /// Market for recommendations; `None` lets the token decide.
    pub market: Option<String>,
    /// Mode preselected in the form.
    pub mode: SelectionMode,
    pub log_path: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} is missing from .env or environment"))
        };

        Ok(Config {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: lookup("SPOTIFY_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            public: match lookup("MOODMIX_PUBLIC") {
                Some(v) => parse_bool(&v)?,
                None => false,
            },
            market: lookup("MOODMIX_MARKET").map(|m| parse_market(&m)).transpose()?,
            mode: match lookup("MOODMIX_MODE") {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("MOODMIX_MODE must be distance, recommend or shuffle, got {v:?}"))?,
                None => SelectionMode::default(),
            },
            log_path: lookup("MOODMIX_LOG").unwrap_or_else(|| DEFAULT_LOG_PATH.to_string()),
        })
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("MOODMIX_PUBLIC must be true or false, got {other:?}"),
    }
}

fn parse_market(raw: &str) -> Result<String> {
    let market = raw.trim().to_ascii_uppercase();
    if market.len() == 2 && market.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(market)
    } else {
        bail!("MOODMIX_MARKET must be a two-letter country code, got {raw:?}")
    }
}
