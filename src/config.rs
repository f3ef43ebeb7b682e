use anyhow::{anyhow, Context};
use tracing::warn;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_LINK_PREFIX: &str = "https://meet.telehealth.local/session";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind: String,
    pub pool_max_size: u32,
    pub lock_wait_timeout_secs: u64,
    pub link_prefix: String,
    /// Poll interval of the notification dispatcher, `0` disables it.
    pub notify_poll_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL not found"))?;

        let bind = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let link_prefix = get("VIRTUAL_LINK_PREFIX").unwrap_or_else(|| {
            warn!("VIRTUAL_LINK_PREFIX not set, using default");
            DEFAULT_LINK_PREFIX.to_string()
        });

        Ok(Self {
            database_url,
            bind,
            pool_max_size: parse_or(&get, "POOL_MAX_SIZE", 10)?,
            lock_wait_timeout_secs: parse_or(&get, "LOCK_WAIT_TIMEOUT_SECS", 5)?,
            link_prefix,
            notify_poll_secs: parse_or(&get, "NOTIFY_POLL_SECS", 0)?,
        })
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", key, value)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_url_is_set() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "mysql://localhost/db")]))
            .unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.pool_max_size, 10);
        assert_eq!(config.lock_wait_timeout_secs, 5);
        assert_eq!(config.link_prefix, DEFAULT_LINK_PREFIX);
        assert_eq!(config.notify_poll_secs, 0);
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.to_string(), "DATABASE_URL not found");
    }

    #[test]
    fn numeric_settings_are_validated() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("LOCK_WAIT_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LOCK_WAIT_TIMEOUT_SECS"));

        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("LOCK_WAIT_TIMEOUT_SECS", " 2 "),
            ("POOL_MAX_SIZE", "4"),
        ]))
        .unwrap();
        assert_eq!(config.lock_wait_timeout_secs, 2);
        assert_eq!(config.pool_max_size, 4);
    }
}
