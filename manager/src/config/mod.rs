// File: manager/src/config/mod.rs
pub mod manager;
pub mod secrets;

use ambari_client::{BasicAuth, ClientOptions, PollSettings, StatusTokens};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub use manager::ConfigManager;
pub use secrets::UserSecrets;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ambari: AmbariConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    // Populated from individual cluster config files
    #[serde(skip)]
    pub clusters: HashMap<String, ClusterConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbariConfig {
    pub management_ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    /// Usually left out and resolved from secrets.toml
    pub password: Option<String>,
}

fn default_port() -> u16 {
    ambari_client::constants::defaults::PORT
}

fn default_username() -> String {
    ambari_client::constants::defaults::USERNAME.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default)]
    pub initial_delay_seconds: u64,
    pub timeout_seconds: Option<u64>,
    // Status token overrides for service versions with different names
    pub completed_statuses: Option<Vec<String>>,
    pub failed_statuses: Option<Vec<String>>,
    pub in_progress_statuses: Option<Vec<String>>,
}

fn default_interval_seconds() -> u64 {
    ambari_client::constants::polling::POLL_INTERVAL.as_secs()
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            initial_delay_seconds: 0,
            timeout_seconds: None,
            completed_statuses: None,
            failed_statuses: None,
            in_progress_statuses: None,
        }
    }
}

impl PollingConfig {
    pub fn to_poll_settings(&self) -> PollSettings {
        let defaults = StatusTokens::default();
        PollSettings {
            interval: Duration::from_secs(self.interval_seconds),
            initial_delay: Duration::from_secs(self.initial_delay_seconds),
            timeout: self.timeout_seconds.map(Duration::from_secs),
            tokens: StatusTokens {
                completed: self.completed_statuses.clone().unwrap_or(defaults.completed),
                failed: self.failed_statuses.clone().unwrap_or(defaults.failed),
                in_progress: self.in_progress_statuses.clone().unwrap_or(defaults.in_progress),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfigFile {
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    pub fqdn: String,
    pub rack: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
    pub hosts: HashMap<String, HostConfig>,
}

impl Config {
    pub fn client_options(&self) -> ClientOptions {
        let password = self
            .ambari
            .password
            .clone()
            .unwrap_or_else(|| ambari_client::constants::defaults::PASSWORD.to_string());

        ClientOptions {
            port: self.ambari.port,
            auth: BasicAuth::new(self.ambari.username.clone(), password),
            poll: self.polling.to_poll_settings(),
        }
    }
}
