// File: manager/src/config/manager.rs
use super::{ClusterConfig, ClusterConfigFile, Config, UserSecrets};
use anyhow::{anyhow, Result};
use glob::glob;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

const MAIN_CONFIG: &str = "main.toml";
const SECRETS_CONFIG: &str = "secrets.toml";

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/{}", config_dir, MAIN_CONFIG);
        let main_config_content = fs::read_to_string(&main_config_path).await
            .map_err(|e| anyhow!("Failed to read main config {}: {}", main_config_path, e))?;

        let mut config: Config = toml::from_str(&main_config_content)
            .map_err(|e| anyhow!("Failed to parse main config: {}", e))?;

        if config.ambari.management_ip.trim().is_empty() {
            return Err(anyhow!("ambari.management_ip must not be empty"));
        }
        if config.polling.interval_seconds == 0 {
            return Err(anyhow!("polling.interval_seconds must be greater than zero"));
        }

        let secrets = UserSecrets::load(&Path::new(config_dir).join(SECRETS_CONFIG))?;
        config.ambari.password =
            secrets.resolve(&config.ambari.username, config.ambari.password.as_deref());

        // Every other *.toml describes one cluster, named after the file
        let pattern = format!("{}/*.toml", config_dir);
        let mut clusters = HashMap::new();

        for entry in glob(&pattern).map_err(|e| anyhow!("Glob pattern error: {}", e))? {
            let path = entry.map_err(|e| anyhow!("Glob entry error: {}", e))?;
            let filename = path.file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("Invalid filename"))?;

            if filename == MAIN_CONFIG || filename == SECRETS_CONFIG {
                continue;
            }

            let cluster_name = filename.strip_suffix(".toml")
                .ok_or_else(|| anyhow!("Invalid config filename: {}", filename))?;

            debug!("Loading cluster config: {}", path.display());

            let content = fs::read_to_string(&path).await
                .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

            let cluster_file: ClusterConfigFile = toml::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;

            clusters.insert(
                cluster_name.to_string(),
                ClusterConfig {
                    name: cluster_name.to_string(),
                    hosts: cluster_file.hosts,
                },
            );
        }

        config.clusters = clusters;

        info!(
            "Loaded Ambari endpoint {}:{} and {} clusters ({} hosts)",
            config.ambari.management_ip,
            config.ambari.port,
            config.clusters.len(),
            config.clusters.values().map(|c| c.hosts.len()).sum::<usize>()
        );

        Ok(config)
    }
}
