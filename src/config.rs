use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountSource};

pub const DEFAULT_CONFIG_FILE: &str = "totp.json";

const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// Accounts and display settings, read once at startup. Never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_REFRESH_INTERVAL_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    // $TOTP_CONFIG, else totp.json, else TOTP_SECRET / TOTP_NAME / TOTP_ISSUER
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(Path::new(DEFAULT_CONFIG_FILE), |key| env::var(key).ok())
    }

    pub fn load_with<F>(default_path: &Path, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = var("TOTP_CONFIG") {
            return Self::from_file(path);
        }

        if default_path.exists() {
            return Self::from_file(default_path);
        }

        let mut config = Self::default();
        if let Some(secret) = var("TOTP_SECRET") {
            let name = var("TOTP_NAME").unwrap_or_else(|| "default".to_string());
            let mut account = Account::new(name, secret);
            account.issuer = var("TOTP_ISSUER");
            config.accounts.push(account);
        }

        Ok(config)
    }
}

impl AccountSource for Config {
    fn accounts(&self) -> Vec<Account> {
        self.accounts.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("totp-console-{}-{}", std::process::id(), name))
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_accounts_and_defaults_interval() {
        let path = temp_path("accounts.json");
        std::fs::write(
            &path,
            r#"{"accounts":[{"name":"github","issuer":"GitHub","secret":"JBSWY3DPEHPK3PXP"}]}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.refresh_interval_ms, 1_000);
        assert_eq!(
            config.find("github"),
            Some(Account::new("github", "JBSWY3DPEHPK3PXP").with_issuer("GitHub"))
        );
    }

    #[test]
    fn explicit_path_wins() {
        let path = temp_path("explicit.json");
        std::fs::write(&path, r#"{"refresh_interval_ms":250}"#).unwrap();

        let config = Config::load_with(
            Path::new("does-not-exist.json"),
            vars(&[("TOTP_CONFIG", path.to_str().unwrap()), ("TOTP_SECRET", "AAAA")]),
        )
        .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.refresh_interval_ms, 250);
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn falls_back_to_environment() {
        let config = Config::load_with(
            Path::new("does-not-exist.json"),
            vars(&[("TOTP_SECRET", "JBSWY3DPEHPK3PXP"), ("TOTP_ISSUER", "Acme")]),
        )
        .unwrap();

        assert_eq!(
            config.accounts,
            vec![Account::new("default", "JBSWY3DPEHPK3PXP").with_issuer("Acme")]
        );
    }

    #[test]
    fn empty_without_sources() {
        let config = Config::load_with(Path::new("does-not-exist.json"), vars(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let path = temp_path("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load_with(
            Path::new("does-not-exist.json"),
            vars(&[("TOTP_CONFIG", "/nonexistent/totp.json")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
