//! Test configuration builder for creating test configs programmatically

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct TestConfigBuilder {
    temp_dir: TempDir,
    main_config: MainConfigBuilder,
    secrets: Vec<(String, String)>,
    cluster_configs: HashMap<String, ClusterConfigBuilder>,
}

impl TestConfigBuilder {
    /// Create a new test config builder
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            main_config: MainConfigBuilder::default(),
            secrets: Vec::new(),
            cluster_configs: HashMap::new(),
        }
    }

    /// Configure main settings
    pub fn with_main_config<F>(mut self, f: F) -> Self
    where
        F: FnOnce(MainConfigBuilder) -> MainConfigBuilder,
    {
        self.main_config = f(self.main_config);
        self
    }

    /// Add a user password to secrets.toml
    pub fn with_secret(mut self, username: &str, password: &str) -> Self {
        self.secrets.push((username.to_string(), password.to_string()));
        self
    }

    /// Add a cluster configuration
    pub fn with_cluster<F>(mut self, cluster_name: &str, f: F) -> Self
    where
        F: FnOnce(ClusterConfigBuilder) -> ClusterConfigBuilder,
    {
        let builder = f(ClusterConfigBuilder::default());
        self.cluster_configs.insert(cluster_name.to_string(), builder);
        self
    }

    /// Build and write config files to temp directory
    pub fn build(self) -> TestConfig {
        let config_dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        fs::write(config_dir.join("main.toml"), self.main_config.to_toml())
            .expect("Failed to write main.toml");

        if !self.secrets.is_empty() {
            let mut secrets = String::from("[users]\n");
            for (user, password) in &self.secrets {
                secrets.push_str(&format!("{} = \"{}\"\n", user, password));
            }
            fs::write(config_dir.join("secrets.toml"), secrets).expect("Failed to write secrets.toml");
        }

        for (name, builder) in self.cluster_configs {
            fs::write(config_dir.join(format!("{}.toml", name)), builder.to_toml())
                .expect("Failed to write cluster config");
        }

        TestConfig {
            _temp_dir: self.temp_dir,
            config_dir,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main configuration builder
#[derive(Clone)]
pub struct MainConfigBuilder {
    management_ip: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    interval_seconds: u64,
    timeout_seconds: Option<u64>,
}

impl MainConfigBuilder {
    pub fn management_ip(mut self, ip: &str) -> Self {
        self.management_ip = ip.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn poll_interval(mut self, seconds: u64) -> Self {
        self.interval_seconds = seconds;
        self
    }

    pub fn poll_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = format!(
            "[ambari]\nmanagement_ip = \"{}\"\nport = {}\n",
            self.management_ip, self.port
        );
        if let Some(username) = &self.username {
            toml.push_str(&format!("username = \"{}\"\n", username));
        }
        if let Some(password) = &self.password {
            toml.push_str(&format!("password = \"{}\"\n", password));
        }

        toml.push_str(&format!("\n[polling]\ninterval_seconds = {}\n", self.interval_seconds));
        if let Some(timeout) = self.timeout_seconds {
            toml.push_str(&format!("timeout_seconds = {}\n", timeout));
        }
        toml
    }
}

impl Default for MainConfigBuilder {
    fn default() -> Self {
        Self {
            management_ip: "127.0.0.1".to_string(),
            port: 8080,
            username: None,
            password: None,
            interval_seconds: 5,
            timeout_seconds: None,
        }
    }
}

/// Cluster configuration builder
#[derive(Default)]
pub struct ClusterConfigBuilder {
    hosts: Vec<(String, String, Option<String>)>,
}

impl ClusterConfigBuilder {
    pub fn add_host(mut self, alias: &str, fqdn: &str) -> Self {
        self.hosts.push((alias.to_string(), fqdn.to_string(), None));
        self
    }

    pub fn add_racked_host(mut self, alias: &str, fqdn: &str, rack: &str) -> Self {
        self.hosts
            .push((alias.to_string(), fqdn.to_string(), Some(rack.to_string())));
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = String::new();
        for (alias, fqdn, rack) in &self.hosts {
            toml.push_str(&format!("\n[hosts.{}]\nfqdn = \"{}\"\n", alias, fqdn));
            if let Some(rack) = rack {
                toml.push_str(&format!("rack = \"{}\"\n", rack));
            }
        }
        toml
    }
}

/// Built test configuration with temp directory
pub struct TestConfig {
    _temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestConfig {
    /// Get the config directory path
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    pub fn config_dir_string(&self) -> String {
        self.config_dir.to_string_lossy().to_string()
    }
}
