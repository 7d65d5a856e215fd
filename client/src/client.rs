// File: client/src/client.rs
//! Request client for the Ambari management API
//!
//! An [`AmbariClient`] is bound to one management instance and port. It owns
//! the transport it acquired at construction and hands it back to the provider
//! when dropped, whichever way the caller's scope ends.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::constants::{self, states};
use crate::envelope::{
    check_response, check_status, decode_request_status, extract_items, req_id, HostRegistration,
    RequestId, RequestStatus,
};
use crate::errors::{AmbariError, Result};
use crate::instance::{ClusterHost, ManagementInstance};
use crate::poller::{PollSettings, RequestPoller, RequestStatusSource};
use crate::transport::{BasicAuth, HttpTransport, TransportProvider, TransportRequest, TransportResponse};

/// Construction options; defaults target port 8080 as admin/admin
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub port: u16,
    pub auth: BasicAuth,
    pub poll: PollSettings,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            port: constants::defaults::PORT,
            auth: BasicAuth::default(),
            poll: PollSettings::default(),
        }
    }
}

pub struct AmbariClient {
    transport: Arc<dyn HttpTransport>,
    provider: Arc<dyn TransportProvider>,
    port: u16,
    base_url: String,
    auth: BasicAuth,
    headers: Vec<(String, String)>,
    poll_settings: PollSettings,
    cancel: Option<CancellationToken>,
}

impl AmbariClient {
    pub fn new<I>(instance: &I, options: ClientOptions) -> Result<Self>
    where
        I: ManagementInstance + ?Sized,
    {
        let provider = instance.transport_provider();
        let transport = provider.acquire(options.port)?;
        let base_url = format!(
            "http://{}:{}{}",
            instance.management_ip(),
            options.port,
            constants::http::API_ROOT
        );

        debug!("Ambari client bound to {}", base_url);

        Ok(Self {
            transport,
            provider,
            port: options.port,
            base_url,
            auth: options.auth,
            headers: vec![(
                constants::http::REQUESTED_BY_HEADER.to_string(),
                constants::http::REQUESTED_BY_VALUE.to_string(),
            )],
            poll_settings: options.poll,
            cancel: None,
        })
    }

    /// Lets callers abort request waits started through this client
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn auth(&self) -> &BasicAuth {
        &self.auth
    }

    pub fn poll_settings(&self) -> &PollSettings {
        &self.poll_settings
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // === Primitive verbs ===

    async fn send(&self, method: Method, path: &str, data: Option<String>) -> Result<TransportResponse> {
        let request = TransportRequest {
            method,
            url: self.url(path),
            body: data,
            verify: constants::http::VERIFY_TLS,
            auth: self.auth.clone(),
            headers: self.headers.clone(),
        };
        debug!("{} {}", request.method, request.url);
        self.transport.execute(request).await
    }

    pub async fn get(&self, path: &str) -> Result<TransportResponse> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, data: Option<String>) -> Result<TransportResponse> {
        self.send(Method::POST, path, data).await
    }

    pub async fn put(&self, path: &str, data: Option<String>) -> Result<TransportResponse> {
        self.send(Method::PUT, path, data).await
    }

    pub async fn delete(&self, path: &str) -> Result<TransportResponse> {
        self.send(Method::DELETE, path, None).await
    }

    async fn post_json(&self, path: &str, data: &Value) -> Result<TransportResponse> {
        self.post(path, Some(serde_json::to_string(data)?)).await
    }

    async fn put_json(&self, path: &str, data: &Value) -> Result<TransportResponse> {
        self.put(path, Some(serde_json::to_string(data)?)).await
    }

    // === Credentials and users ===

    pub async fn import_credential(&self, cluster_name: &str, alias: &str, data: &Value) -> Result<()> {
        let path = format!("/clusters/{}/credentials/{}", cluster_name, alias);
        let resp = self.post_json(&path, data).await?;
        check_status(&resp)
    }

    pub async fn get_credential(&self, cluster_name: &str, alias: &str) -> Result<Value> {
        let path = format!("/clusters/{}/credentials/{}", cluster_name, alias);
        let resp = self.get(&path).await?;
        check_response(&resp)
    }

    pub async fn update_user_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let data = json!({
            "Users": {
                "old_password": old_password,
                "password": new_password
            }
        });
        let resp = self.put_json(&format!("/users/{}", username), &data).await?;
        check_status(&resp)?;
        info!("Password updated for Ambari user {}", username);
        Ok(())
    }

    // === Hosts and alerts ===

    pub async fn get_alerts_data(&self, cluster_name: &str) -> Result<Vec<Value>> {
        let resp = self
            .get(&format!("/clusters/{}/alerts?fields=*", cluster_name))
            .await?;
        Ok(extract_items(&check_response(&resp)?))
    }

    pub async fn get_registered_hosts(&self) -> Result<Vec<HostRegistration>> {
        let resp = self.get("/hosts").await?;
        extract_items(&check_response(&resp)?)
            .into_iter()
            .map(|item| {
                serde_json::from_value(item)
                    .map_err(|e| AmbariError::malformed(format!("invalid host record: {}", e)))
            })
            .collect()
    }

    /// The `Hosts` mapping of one registered host, empty when absent
    pub async fn get_host_info(&self, host_name: &str) -> Result<Value> {
        let resp = self.get(&format!("/hosts/{}", host_name)).await?;
        let body = check_response(&resp)?;
        Ok(body.get("Hosts").cloned().unwrap_or_else(|| json!({})))
    }

    pub async fn add_host_to_cluster<H: ClusterHost + ?Sized>(&self, host: &H) -> Result<()> {
        let path = format!("/clusters/{}/hosts/{}", host.cluster_name(), host.fqdn());
        let resp = self.post(&path, None).await?;
        check_status(&resp)
    }

    pub async fn delete_host<H: ClusterHost + ?Sized>(&self, cluster_name: &str, host: &H) -> Result<()> {
        let resp = self
            .delete(&format!("/clusters/{}/hosts/{}", cluster_name, host.fqdn()))
            .await?;
        check_status(&resp)
    }

    pub async fn set_rack_info_for_instance<H: ClusterHost + ?Sized>(
        &self,
        cluster_name: &str,
        host: &H,
        rack_name: &str,
    ) -> Result<()> {
        let path = format!("/clusters/{}/hosts/{}", cluster_name, host.fqdn());
        let data = json!({"Hosts": {"rack_info": rack_name}});
        let resp = self.put_json(&path, &data).await?;
        check_status(&resp)
    }

    /// Component names installed on a host
    pub async fn list_host_processes<H: ClusterHost + ?Sized>(
        &self,
        cluster_name: &str,
        host: &H,
    ) -> Result<Vec<String>> {
        let resp = self
            .get(&format!("/clusters/{}/hosts/{}", cluster_name, host.fqdn()))
            .await?;
        let body = check_response(&resp)?;

        let components = body
            .get("host_components")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        components
            .iter()
            .map(|component| {
                component["HostRoles"]["component_name"]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| AmbariError::malformed("host component without component_name"))
            })
            .collect()
    }

    // === Blueprints, clusters, stacks ===

    pub async fn create_blueprint(&self, name: &str, data: &Value) -> Result<Value> {
        let resp = self.post_json(&format!("/blueprints/{}", name), data).await?;
        check_response(&resp)
    }

    /// Returns the id of the provisioning request the service started
    #[instrument(skip(self, data))]
    pub async fn create_cluster(&self, name: &str, data: &Value) -> Result<RequestId> {
        let resp = self.post_json(&format!("/clusters/{}", name), data).await?;
        check_status(&resp)?;
        let id = req_id(&resp)?;
        info!("Cluster {} creation started as request {}", name, id);
        Ok(id)
    }

    pub async fn set_up_mirror(
        &self,
        stack_version: &str,
        os_type: &str,
        repo_id: &str,
        repo_url: &str,
    ) -> Result<()> {
        let path = format!(
            "/stacks/HDP/versions/{}/operating_systems/{}/repositories/{}",
            stack_version, os_type, repo_id
        );
        let data = json!({
            "Repositories": {
                "base_url": repo_url,
                "verify_base_url": true
            }
        });
        let resp = self.put_json(&path, &data).await?;
        check_status(&resp)
    }

    // === Component and service lifecycle ===

    fn host_component_path<H: ClusterHost + ?Sized>(cluster_name: &str, host: &H, component: &str) -> String {
        format!(
            "/clusters/{}/hosts/{}/host_components/{}",
            cluster_name,
            host.fqdn(),
            component
        )
    }

    /// Request a state transition for a host component without waiting on it
    pub async fn set_component_state<H: ClusterHost + ?Sized>(
        &self,
        cluster_name: &str,
        host: &H,
        component: &str,
        state: &str,
        context: &str,
    ) -> Result<RequestId> {
        let path = Self::host_component_path(cluster_name, host, component);
        let data = json!({
            "HostRoles": {"state": state},
            "RequestInfo": {"context": context}
        });
        let resp = self.put_json(&path, &data).await?;
        check_status(&resp)?;
        req_id(&resp)
    }

    pub async fn start_service_on_host<H: ClusterHost + ?Sized>(
        &self,
        host: &H,
        component: &str,
        state: &str,
        context: Option<&str>,
    ) -> Result<RequestStatus> {
        let cluster_name = host.cluster_name();
        let context = context.map(str::to_string).unwrap_or_else(|| {
            format!("Starting service {}, moving to state {}", component, state)
        });

        let id = self
            .set_component_state(&cluster_name, host, component, state, &context)
            .await?;
        self.wait_ambari_request(&id, &cluster_name).await
    }

    /// Move a component to INSTALLED unless it already is
    pub async fn stop_process_on_host<H: ClusterHost + ?Sized>(
        &self,
        cluster_name: &str,
        host: &H,
        component: &str,
    ) -> Result<()> {
        let path = Self::host_component_path(cluster_name, host, component);
        let current = check_response(&self.get(&path).await?)?;
        let state = current["HostRoles"]["state"]
            .as_str()
            .ok_or_else(|| AmbariError::malformed(format!("no HostRoles.state for {}", component)))?;

        if state == states::INSTALLED {
            debug!("{} on {} already stopped", component, host.fqdn());
            return Ok(());
        }

        let context = format!("Stopping {}", component);
        let id = self
            .set_component_state(cluster_name, host, component, states::INSTALLED, &context)
            .await?;
        self.wait_ambari_request(&id, cluster_name).await?;
        Ok(())
    }

    pub async fn remove_process_from_host<H: ClusterHost + ?Sized>(
        &self,
        cluster_name: &str,
        host: &H,
        component: &str,
    ) -> Result<()> {
        let path = Self::host_component_path(cluster_name, host, component);
        check_status(&self.delete(&path).await?)
    }

    /// Stop then start a whole service, waiting on both requests
    #[instrument(skip(self))]
    pub async fn restart_service(&self, cluster_name: &str, service_name: &str) -> Result<()> {
        let path = format!("/clusters/{}/services/{}", cluster_name, service_name);

        for state in [states::INSTALLED, states::STARTED] {
            let data = json!({
                "RequestInfo": {"context": format!("Restart {} service", service_name)},
                "Body": {"ServiceInfo": {"state": state}}
            });
            let resp = self.put_json(&path, &data).await?;
            check_status(&resp)?;
            let id = req_id(&resp)?;
            self.wait_ambari_request(&id, cluster_name).await?;
        }

        info!("Service {} restarted on cluster {}", service_name, cluster_name);
        Ok(())
    }

    pub async fn restart_namenode(&self, cluster_name: &str) -> Result<()> {
        self.restart_service(cluster_name, "HDFS").await
    }

    pub async fn restart_resourcemanager(&self, cluster_name: &str) -> Result<()> {
        self.restart_service(cluster_name, "YARN").await
    }

    // === Asynchronous requests ===

    pub async fn check_request_status(
        &self,
        cluster_name: &str,
        request_id: &RequestId,
    ) -> Result<RequestStatus> {
        let resp = self
            .get(&format!("/clusters/{}/requests/{}", cluster_name, request_id))
            .await?;
        decode_request_status(&check_response(&resp)?)
    }

    pub async fn wait_ambari_request(
        &self,
        request_id: &RequestId,
        cluster_name: &str,
    ) -> Result<RequestStatus> {
        RequestPoller::new(self, &self.poll_settings)
            .with_cancellation(self.cancel.as_ref())
            .wait(request_id, cluster_name)
            .await
    }

    pub async fn wait_ambari_requests(&self, request_ids: &[RequestId], cluster_name: &str) -> Result<()> {
        RequestPoller::new(self, &self.poll_settings)
            .with_cancellation(self.cancel.as_ref())
            .wait_all(request_ids, cluster_name)
            .await
    }
}

#[async_trait]
impl RequestStatusSource for AmbariClient {
    async fn check_request_status(
        &self,
        cluster_name: &str,
        request_id: &RequestId,
    ) -> Result<RequestStatus> {
        AmbariClient::check_request_status(self, cluster_name, request_id).await
    }
}

impl Drop for AmbariClient {
    fn drop(&mut self) {
        self.provider.release(self.port);
        debug!("Ambari client for {} released port {}", self.base_url, self.port);
    }
}
