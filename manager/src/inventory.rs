// File: manager/src/inventory.rs
//! Configured endpoint and hosts, adapted to the client's collaborator traits

use ambari_client::{ClusterHost, ManagementInstance, ReqwestTransportProvider, TransportProvider};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;

/// The management instance named in main.toml, reached over a direct connection
pub struct ConfiguredEndpoint {
    management_ip: String,
    provider: Arc<ReqwestTransportProvider>,
}

impl ConfiguredEndpoint {
    pub fn new(config: &Config) -> Self {
        Self {
            management_ip: config.ambari.management_ip.clone(),
            provider: Arc::new(ReqwestTransportProvider::new()),
        }
    }
}

impl ManagementInstance for ConfiguredEndpoint {
    fn management_ip(&self) -> String {
        self.management_ip.clone()
    }

    fn transport_provider(&self) -> Arc<dyn TransportProvider> {
        self.provider.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredHost {
    pub fqdn: String,
    pub cluster: String,
    pub rack: Option<String>,
}

impl ClusterHost for ConfiguredHost {
    fn fqdn(&self) -> String {
        self.fqdn.clone()
    }

    fn cluster_name(&self) -> String {
        self.cluster.clone()
    }
}

/// Resolve a host by its alias in the cluster file, or take `host` as the FQDN
/// when the cluster file does not list it
pub fn resolve_host(config: &Config, cluster: &str, host: &str) -> Result<ConfiguredHost> {
    let Some(cluster_config) = config.clusters.get(cluster) else {
        debug!("Cluster {} has no config file, using {} as FQDN", cluster, host);
        return Ok(ConfiguredHost {
            fqdn: host.to_string(),
            cluster: cluster.to_string(),
            rack: None,
        });
    };

    if let Some(host_config) = cluster_config.hosts.get(host) {
        return Ok(ConfiguredHost {
            fqdn: host_config.fqdn.clone(),
            cluster: cluster.to_string(),
            rack: host_config.rack.clone(),
        });
    }

    if let Some(host_config) = cluster_config.hosts.values().find(|h| h.fqdn == host) {
        return Ok(ConfiguredHost {
            fqdn: host_config.fqdn.clone(),
            cluster: cluster.to_string(),
            rack: host_config.rack.clone(),
        });
    }

    Err(anyhow!("Host {} is not listed in the config of cluster {}", host, cluster))
}
