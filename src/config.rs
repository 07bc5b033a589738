//! Loads `config.yaml` plus the environment into one validated [`Config`].

use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy_primitives::B256;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("X402_FACILITATOR_PRIVATE_KEY is not set")]
    MissingPrivateKey,
    #[error("X402_FACILITATOR_PRIVATE_KEY is not a valid 32-byte hex key: {0}")]
    InvalidPrivateKey(String),
    #[error("server.port {0} is out of range 1..65535")]
    InvalidPort(u32),
    #[error("no config.yaml found via CONFIG_PATH, ./config.yaml, or the repository root")]
    NotFound,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    #[serde(rename = "rpcURL")]
    pub rpc_url: String,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    #[serde(rename = "X402Version")]
    pub x402_version: u64,
    pub scheme: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworksConfig {
    #[serde(rename = "networkInfos")]
    pub network_infos: Vec<NetworkInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YamlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub networks: NetworksConfig,
}

/// The facilitator's signing key, read from the environment rather than the YAML file: it never
/// belongs in a file that might end up checked into version control.
#[derive(Clone, Copy)]
pub struct FacilitatorPrivateKey(pub B256);

impl std::fmt::Debug for FacilitatorPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FacilitatorPrivateKey(..)")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub networks: Vec<NetworkInfo>,
    pub private_key: FacilitatorPrivateKey,
}

impl Config {
    /// Loads `config.yaml` (resolved per [`resolve_config_path`]) and the required environment
    /// variables, then validates the result.
    pub fn load() -> Result<Self, ConfigError> {
        let path = resolve_config_path()?;
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::FileRead {
            path: path.clone(),
            source,
        })?;
        let yaml: YamlConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })?;

        let private_key = load_private_key()?;

        let config = Config {
            server: yaml.server,
            logging: yaml.logging,
            networks: yaml.networks.network_infos,
            private_key,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 || self.server.port > 65535 {
            return Err(ConfigError::InvalidPort(self.server.port));
        }
        Ok(())
    }
}

fn load_private_key() -> Result<FacilitatorPrivateKey, ConfigError> {
    let raw = std::env::var("X402_FACILITATOR_PRIVATE_KEY")
        .map_err(|_| ConfigError::MissingPrivateKey)?;
    let hex_part = raw.strip_prefix("0x").unwrap_or(&raw);
    B256::from_str(&format!("0x{hex_part}"))
        .map(FacilitatorPrivateKey)
        .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))
}

/// `CONFIG_PATH` env var -> `./config.yaml` -> a `config.yaml` next to this crate's `Cargo.toml`.
fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(from_env) = std::env::var("CONFIG_PATH") {
        let path = PathBuf::from(from_env);
        if path.exists() {
            return Ok(path);
        }
    }

    let cwd_path = Path::new("config.yaml");
    if cwd_path.exists() {
        return Ok(cwd_path.to_path_buf());
    }

    let manifest_relative = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.yaml");
    if manifest_relative.exists() {
        return Ok(manifest_relative);
    }

    Err(ConfigError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Guards mutation of process-wide env vars across tests running in parallel.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn validate_rejects_out_of_range_port() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 70000,
            },
            logging: LoggingConfig {
                level: "info".into(),
                format: "json".into(),
            },
            networks: vec![],
            private_key: FacilitatorPrivateKey(B256::ZERO),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPort(70000))
        ));
    }

    #[test]
    fn load_private_key_fails_closed_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("X402_FACILITATOR_PRIVATE_KEY");
        }
        assert!(matches!(
            load_private_key(),
            Err(ConfigError::MissingPrivateKey)
        ));
    }

    #[test]
    fn load_private_key_accepts_0x_prefixed_hex() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var(
                "X402_FACILITATOR_PRIVATE_KEY",
                format!("0x{}", "11".repeat(32)),
            );
        }
        let key = load_private_key().unwrap();
        assert_eq!(key.0, B256::repeat_byte(0x11));
        unsafe {
            std::env::remove_var("X402_FACILITATOR_PRIVATE_KEY");
        }
    }
}
