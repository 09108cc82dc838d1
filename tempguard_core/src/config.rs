//! Detector configuration loaded from environment variables

use crate::constants;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Directory holding snapshot files
    pub data_dir: PathBuf,

    /// Period of the recurring refresh
    pub refresh_interval: Duration,

    /// Request timeout for email domain sources
    pub email_fetch_timeout: Duration,

    /// Request timeout for phone number sources
    pub phone_fetch_timeout: Duration,

    /// Candidate domain sets must be larger than this to be promoted
    pub email_min_entries: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(constants::DEFAULT_DATA_DIR),
            refresh_interval: Duration::from_secs(constants::REFRESH_INTERVAL_SECONDS),
            email_fetch_timeout: Duration::from_secs(constants::EMAIL_FETCH_TIMEOUT_SECONDS),
            phone_fetch_timeout: Duration::from_secs(constants::PHONE_FETCH_TIMEOUT_SECONDS),
            email_min_entries: constants::EMAIL_MIN_ENTRIES,
        }
    }
}

impl DetectorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            data_dir: lookup("TEMPGUARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            refresh_interval: secs(&lookup, "TEMPGUARD_REFRESH_INTERVAL_SECS")?
                .unwrap_or(defaults.refresh_interval),
            email_fetch_timeout: secs(&lookup, "TEMPGUARD_EMAIL_FETCH_TIMEOUT_SECS")?
                .unwrap_or(defaults.email_fetch_timeout),
            phone_fetch_timeout: secs(&lookup, "TEMPGUARD_PHONE_FETCH_TIMEOUT_SECS")?
                .unwrap_or(defaults.phone_fetch_timeout),
            email_min_entries: match lookup("TEMPGUARD_EMAIL_MIN_ENTRIES") {
                Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                    name: "TEMPGUARD_EMAIL_MIN_ENTRIES",
                    value,
                })?,
                None => defaults.email_min_entries,
            },
        })
    }

    /// Snapshot path for the email domain detector
    pub fn email_snapshot_path(&self) -> PathBuf {
        self.data_dir.join(constants::EMAIL_SNAPSHOT_FILE)
    }

    /// Snapshot path for the phone number detector
    pub fn phone_snapshot_path(&self) -> PathBuf {
        self.data_dir.join(constants::PHONE_SNAPSHOT_FILE)
    }
}

/// Parse a positive number of seconds
fn secs<F>(lookup: &F, name: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };

    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(Duration::from_secs(n))),
        _ => Err(ConfigError::InvalidNumber { name, value }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.refresh_interval, Duration::from_secs(6 * 60 * 60));
        assert_eq!(config.email_fetch_timeout, Duration::from_secs(15));
        assert_eq!(config.phone_fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.email_min_entries, 1000);
        assert_eq!(
            config.email_snapshot_path(),
            PathBuf::from("data/disposable-email-domains.txt")
        );
        assert_eq!(config.phone_snapshot_path(), PathBuf::from("data/tempphone-store.json"));
    }

    #[test]
    fn test_overrides() {
        let config = DetectorConfig::from_lookup(lookup(&[
            ("TEMPGUARD_DATA_DIR", "/var/lib/tempguard"),
            ("TEMPGUARD_REFRESH_INTERVAL_SECS", "60"),
            ("TEMPGUARD_EMAIL_MIN_ENTRIES", "10"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/tempguard"));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.email_min_entries, 10);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = DetectorConfig::from_lookup(lookup(&[("TEMPGUARD_REFRESH_INTERVAL_SECS", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("TEMPGUARD_REFRESH_INTERVAL_SECS"));

        assert!(DetectorConfig::from_lookup(lookup(&[("TEMPGUARD_EMAIL_MIN_ENTRIES", "lots")])).is_err());
    }
}
