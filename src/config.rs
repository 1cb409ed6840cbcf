use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/state.json";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Reads `PORT`, `APP_DATA_PATH` and `API_URL`, after loading `.env` if
    /// one exists. Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            data_path: resolve_data_path(lookup("APP_DATA_PATH")),
            api_url: lookup("API_URL")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.api_url),
        }
    }
}

pub fn resolve_data_path(configured: Option<String>) -> PathBuf {
    match configured {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DATA_PATH),
    }
}
