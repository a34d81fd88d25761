use std::env;
use std::str::FromStr;

pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("STORE_BACKEND must be \"mongo\" or \"memory\", got {0:?}")]
    UnknownBackend(String),
}

/// Where transaction records are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub mongo_uri: String,
    pub db_name: String,
    pub collection_name: String,
    pub seed_url: String,
    pub seed_file: Option<String>,
    pub port: u16,
    pub default_per_page: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup so tests do not
    /// have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            store_backend: var_or("STORE_BACKEND", "mongo").parse()?,
            mongo_uri: var_or("MONGO_URI", "mongodb://localhost:27017"),
            db_name: var_or("DB_NAME", "products"),
            collection_name: var_or("COLLECTION_NAME", "products"),
            seed_url: var_or("SEED_URL", DEFAULT_SEED_URL),
            seed_file: lookup("SEED_FILE").filter(|path| !path.trim().is_empty()),
            port: parse_number("PORT", var_or("PORT", "3000"))?,
            default_per_page: parse_number("DEFAULT_PER_PAGE", var_or("DEFAULT_PER_PAGE", "10"))?,
        })
    }
}

fn parse_number<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{Config, ConfigError, StoreBackend, DEFAULT_SEED_URL};

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn uses_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Mongo);
        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.db_name, "products");
        assert_eq!(config.collection_name, "products");
        assert_eq!(config.seed_url, DEFAULT_SEED_URL);
        assert_eq!(config.seed_file, None);
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_per_page, 10);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("PORT", "8080"),
            ("DEFAULT_PER_PAGE", "25"),
            ("SEED_FILE", "seed.json"),
        ])
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_per_page, 25);
        assert_eq!(config.seed_file.as_deref(), Some("seed.json"));
    }

    #[test]
    fn rejects_bad_port() {
        let error = config_from(&[("PORT", "eighty")]).unwrap_err();

        assert_eq!(
            error,
            ConfigError::InvalidNumber {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn rejects_unknown_backend() {
        let error = config_from(&[("STORE_BACKEND", "postgres")]).unwrap_err();

        assert_eq!(error, ConfigError::UnknownBackend("postgres".to_string()));
    }
}
