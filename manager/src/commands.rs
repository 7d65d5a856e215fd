// File: manager/src/commands.rs
//! Maps CLI subcommands onto client operations
//!
//! Every command produces a JSON value that `main` prints.

use ambari_client::{AmbariClient, RequestId};
use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::path::Path;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::{Commands, CredentialCommands};
use crate::config::Config;
use crate::inventory::resolve_host;

async fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {} as JSON", path.display()))
}

/// Numeric ids go over the wire as numbers, anything else as a string
pub fn parse_request_id(raw: &str) -> RequestId {
    match raw.parse::<u64>() {
        Ok(id) => RequestId::from(id),
        Err(_) => RequestId::from(raw),
    }
}

pub async fn execute(client: &AmbariClient, config: &Config, command: Commands) -> Result<Value> {
    let output = match command {
        Commands::Hosts => serde_json::to_value(client.get_registered_hosts().await?)?,
        Commands::HostInfo { host } => client.get_host_info(&host).await?,
        Commands::Alerts { cluster } => Value::Array(client.get_alerts_data(&cluster).await?),
        Commands::Credential(CredentialCommands::Get { cluster, alias }) => {
            client.get_credential(&cluster, &alias).await?
        }
        Commands::Credential(CredentialCommands::Import { cluster, alias, file }) => {
            let data = read_json(&file).await?;
            client.import_credential(&cluster, &alias, &data).await?;
            json!({"imported": alias})
        }
        Commands::CreateBlueprint { name, file } => {
            let data = read_json(&file).await?;
            client.create_blueprint(&name, &data).await?
        }
        Commands::CreateCluster { name, file, wait } => {
            let data = read_json(&file).await?;
            let request_id = client.create_cluster(&name, &data).await?;
            if wait {
                let status = client.wait_ambari_request(&request_id, &name).await?;
                json!({"request_id": request_id, "status": status})
            } else {
                json!({"request_id": request_id})
            }
        }
        Commands::AddHost { cluster, host } => {
            let host = resolve_host(config, &cluster, &host)?;
            client.add_host_to_cluster(&host).await?;
            if let Some(rack) = &host.rack {
                client.set_rack_info_for_instance(&cluster, &host, rack).await?;
            }
            info!("Host {} added to cluster {}", host.fqdn, cluster);
            json!({"cluster": cluster, "host": host.fqdn})
        }
        Commands::Start { cluster, host, component, state, context } => {
            let host = resolve_host(config, &cluster, &host)?;
            let status = client
                .start_service_on_host(&host, &component, &state, context.as_deref())
                .await?;
            serde_json::to_value(status)?
        }
        Commands::Stop { cluster, host, component } => {
            let host = resolve_host(config, &cluster, &host)?;
            client.stop_process_on_host(&cluster, &host, &component).await?;
            json!({"stopped": component, "host": host.fqdn})
        }
        Commands::RestartService { cluster, service } => {
            client.restart_service(&cluster, &service).await?;
            json!({"restarted": service})
        }
        Commands::Wait { cluster, request_ids } => {
            let ids: Vec<RequestId> = request_ids.iter().map(|raw| parse_request_id(raw)).collect();
            if let [single] = ids.as_slice() {
                serde_json::to_value(client.wait_ambari_request(single, &cluster).await?)?
            } else {
                client.wait_ambari_requests(&ids, &cluster).await?;
                json!({"completed": ids})
            }
        }
        Commands::UpdatePassword { username, old, new } => {
            client.update_user_password(&username, &old, &new).await?;
            json!({"updated": username})
        }
    };

    Ok(output)
}

/// Run a command, abandoning it as soon as `cancel` fires, even while a
/// call to the service is still outstanding
pub async fn execute_cancellable(
    client: &AmbariClient,
    config: &Config,
    command: Commands,
    cancel: &CancellationToken,
) -> Result<Value> {
    tokio::select! {
        result = execute(client, config, command) => result,
        _ = cancel.cancelled() => bail!("Interrupted before the command completed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_id() {
        assert_eq!(parse_request_id("42"), RequestId::from(42));
        assert_eq!(parse_request_id("abc-1"), RequestId::from("abc-1"));
        assert_eq!(parse_request_id("42").as_value(), &json!(42));
    }
}
