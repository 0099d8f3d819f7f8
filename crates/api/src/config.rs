use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use infra::store::MongoOptions;

/// Which document store backs the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    /// In-process store; data is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown STORE_BACKEND '{other}' (expected 'mongo' or 'memory')"),
        }
    }
}

/// What to do with a `DateTime` input string that is not valid RFC-3339.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateTimeParsePolicy {
    /// Reject the operation.
    #[default]
    Strict,
    /// Treat the value as not supplied and log a warning.
    Lenient,
}

impl FromStr for DateTimeParsePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(DateTimeParsePolicy::Strict),
            "lenient" => Ok(DateTimeParsePolicy::Lenient),
            other => bail!(
                "unknown DATETIME_PARSE_POLICY '{other}' (expected 'strict' or 'lenient')"
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub mongo_uri: Option<String>,
    pub database_name: String,
    pub port: u16,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub max_idle_time: Duration,
    pub server_selection_timeout: Duration,
    pub request_timeout: Duration,
    pub max_page_size: i64,
    pub datetime_policy: DateTimeParsePolicy,
    pub allowed_origins: Vec<String>,
    pub introspection: bool,
    pub skip_indexes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Mongo,
            mongo_uri: None,
            database_name: "pulverizacao".to_string(),
            port: 8080,
            max_pool_size: 10,
            min_pool_size: 1,
            max_idle_time: Duration::from_secs(30),
            server_selection_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
            max_page_size: 100,
            datetime_policy: DateTimeParsePolicy::Strict,
            allowed_origins: vec!["*".to_string()],
            introspection: false,
            skip_indexes: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Unset keys take
    /// their defaults; set but unparsable values are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            backend: parse_or(&lookup, "STORE_BACKEND", defaults.backend)?,
            mongo_uri: lookup("MONGO_URI").filter(|uri| !uri.trim().is_empty()),
            database_name: lookup("DATABASE_NAME").unwrap_or(defaults.database_name),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            max_pool_size: parse_or(&lookup, "DATABASE_MAX_POOL_SIZE", defaults.max_pool_size)?,
            min_pool_size: parse_or(&lookup, "DATABASE_MIN_POOL_SIZE", defaults.min_pool_size)?,
            max_idle_time: secs_or(&lookup, "DATABASE_MAX_IDLE_SECS", defaults.max_idle_time)?,
            server_selection_timeout: secs_or(
                &lookup,
                "DATABASE_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout,
            )?,
            request_timeout: secs_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", defaults.max_page_size)?,
            datetime_policy: parse_or(&lookup, "DATETIME_PARSE_POLICY", defaults.datetime_policy)?,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.allowed_origins),
            introspection: flag(&lookup, "GQL_INTROSPECTION"),
            skip_indexes: flag(&lookup, "SKIP_INDEXES"),
        };

        if config.max_page_size < 1 {
            bail!("MAX_PAGE_SIZE must be at least 1");
        }
        if config.min_pool_size > config.max_pool_size {
            bail!("DATABASE_MIN_POOL_SIZE cannot exceed DATABASE_MAX_POOL_SIZE");
        }

        Ok(config)
    }

    /// Driver settings for the Mongo backend. Fails when no URI is configured.
    pub fn mongo_options(&self) -> Result<MongoOptions> {
        let uri = self
            .mongo_uri
            .clone()
            .ok_or_else(|| anyhow!("MONGO_URI must be set when STORE_BACKEND=mongo"))?;

        Ok(MongoOptions {
            uri,
            database: self.database_name.clone(),
            max_pool_size: self.max_pool_size,
            min_pool_size: self.min_pool_size,
            max_idle_time: self.max_idle_time,
            server_selection_timeout: self.server_selection_timeout,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        _ => Ok(default),
    }
}

fn secs_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    parse_or(lookup, key, default.as_secs()).map(Duration::from_secs)
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key)
        .map(|v| v.trim().to_lowercase() == "true")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.backend, StoreBackend::Mongo);
        assert_eq!(config.database_name, "pulverizacao");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.datetime_policy, DateTimeParsePolicy::Strict);
        assert_eq!(config.allowed_origins, vec!["*".to_string()]);
        assert!(!config.introspection);
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = config(&[
            ("STORE_BACKEND", "memory"),
            ("MAX_PAGE_SIZE", " 50 "),
            ("DATETIME_PARSE_POLICY", "Lenient"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, https://campo.example"),
            ("GQL_INTROSPECTION", "true"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.datetime_policy, DateTimeParsePolicy::Lenient);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "https://campo.example"]
        );
        assert!(config.introspection);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("STORE_BACKEND", "postgres")]).is_err());
        assert!(config(&[("MAX_PAGE_SIZE", "0")]).is_err());
    }

    #[test]
    fn mongo_options_require_uri() {
        assert!(config(&[]).unwrap().mongo_options().is_err());

        let options = config(&[("MONGO_URI", "mongodb://localhost:27017")])
            .unwrap()
            .mongo_options()
            .unwrap();
        assert_eq!(options.database, "pulverizacao");
        assert_eq!(options.max_pool_size, 10);
    }
}
