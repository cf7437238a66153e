use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoostConfig {
    pub listen: ListenConfig,
    pub store: StoreConfig,
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListenConfig {
    /// Interface to bind numeric port targets on
    #[serde(default = "default_listen_host")]
    pub host: String,

    /// Listen target: a TCP port number or a Unix socket path
    #[serde(default = "default_listen_target")]
    pub target: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    /// Address of the external data store
    #[serde(default = "default_store_addr")]
    pub addr: String,

    /// Upper bound on the startup connect attempt, in seconds
    #[serde(default = "default_store_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ShutdownConfig {
    /// Grace period for store disconnect and request drain; exit is
    /// forced once it elapses
    #[serde(default = "default_shutdown_grace")]
    pub grace_secs: u64,
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_target() -> String {
    "5051".to_string()
}

fn default_store_addr() -> String {
    "127.0.0.1:5432".to_string()
}

fn default_store_connect_timeout() -> u64 {
    5
}

fn default_shutdown_grace() -> u64 {
    10
}

impl Default for RoostConfig {
    fn default() -> Self {
        Self {
            listen: ListenConfig {
                host: default_listen_host(),
                target: default_listen_target(),
            },
            store: StoreConfig {
                addr: default_store_addr(),
                connect_timeout_secs: default_store_connect_timeout(),
            },
            shutdown: ShutdownConfig {
                grace_secs: default_shutdown_grace(),
            },
        }
    }
}

impl RoostConfig {
    /// Load configuration from an optional TOML file with environment
    /// variable overrides (ROOST_ prefix, e.g. ROOST_LISTEN_TARGET).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().display().to_string();

        let settings = Config::builder()
            .set_default("listen.host", default_listen_host())?
            .set_default("listen.target", default_listen_target())?
            .set_default("store.addr", default_store_addr())?
            .set_default(
                "store.connect_timeout_secs",
                default_store_connect_timeout() as i64,
            )?
            .set_default("shutdown.grace_secs", default_shutdown_grace() as i64)?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables with ROOST_ prefix
            .add_source(Environment::with_prefix("ROOST").separator("_"))
            .build()?;

        let config: RoostConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen.host.is_empty() {
            return Err(ConfigError::Message(
                "Listen host must not be empty".to_string(),
            ));
        }

        if self.listen.target.is_empty() {
            return Err(ConfigError::Message(
                "Listen target must not be empty".to_string(),
            ));
        }

        if self.store.addr.is_empty() {
            return Err(ConfigError::Message(
                "Store address must not be empty".to_string(),
            ));
        }

        if self.shutdown.grace_secs == 0 {
            return Err(ConfigError::Message(
                "Shutdown grace period must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_listen_contract() {
        let config = RoostConfig::default();
        assert_eq!(config.listen.target, "5051");
        assert_eq!(config.listen.host, "0.0.0.0");
        assert_eq!(config.shutdown.grace_secs, 10);
    }

    #[test]
    fn default_config_validates() {
        assert!(RoostConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_target_fails_validation() {
        let mut config = RoostConfig::default();
        config.listen.target = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_grace_fails_validation() {
        let mut config = RoostConfig::default();
        config.shutdown.grace_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = RoostConfig::load_from_file("/nonexistent/roost.toml")
            .expect("missing file should not be an error");
        assert_eq!(config.listen.target, "5051");
        assert_eq!(config.store.connect_timeout_secs, 5);
    }
}
