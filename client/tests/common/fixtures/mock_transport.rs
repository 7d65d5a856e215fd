//! Scripted in-memory transport
//!
//! Responses are queued per HTTP method. The last queued response for a
//! method keeps answering once the queue is down to one entry; methods with
//! nothing queued answer 200 with an empty body.

use ambari_client::{
    ClusterHost, HttpTransport, ManagementInstance, Result, TransportProvider, TransportRequest,
    TransportResponse,
};
use async_trait::async_trait;
use reqwest::Method;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<Method, VecDeque<(u16, String)>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response for the given method
    pub fn respond(&self, method: Method, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back((status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn requests_with(&self, method: Method) -> Vec<TransportRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let (status, body) = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(&request.method) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) if queue.len() == 1 => queue.front().cloned().unwrap(),
                _ => (200, String::new()),
            }
        };
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        Ok(TransportResponse::new(url, status, body))
    }
}

/// Provider handing out one shared scripted transport and recording port usage
pub struct MockTransportProvider {
    pub transport: Arc<ScriptedTransport>,
    acquired: Mutex<Vec<u16>>,
    released: Mutex<Vec<u16>>,
}

impl MockTransportProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            transport: ScriptedTransport::new(),
            acquired: Mutex::new(Vec::new()),
            released: Mutex::new(Vec::new()),
        })
    }

    pub fn acquired(&self) -> Vec<u16> {
        self.acquired.lock().unwrap().clone()
    }

    pub fn released(&self) -> Vec<u16> {
        self.released.lock().unwrap().clone()
    }
}

impl TransportProvider for MockTransportProvider {
    fn acquire(&self, port: u16) -> Result<Arc<dyn HttpTransport>> {
        self.acquired.lock().unwrap().push(port);
        Ok(self.transport.clone())
    }

    fn release(&self, port: u16) {
        self.released.lock().unwrap().push(port);
    }
}

/// Management instance double
pub struct TestInstance {
    pub management_ip: String,
    pub provider: Arc<dyn TransportProvider>,
}

impl TestInstance {
    pub fn new(management_ip: &str, provider: Arc<dyn TransportProvider>) -> Self {
        Self {
            management_ip: management_ip.to_string(),
            provider,
        }
    }
}

impl ManagementInstance for TestInstance {
    fn management_ip(&self) -> String {
        self.management_ip.clone()
    }

    fn transport_provider(&self) -> Arc<dyn TransportProvider> {
        self.provider.clone()
    }
}

/// Cluster host double
pub struct TestHost {
    pub fqdn: String,
    pub cluster: String,
}

impl TestHost {
    pub fn new(fqdn: &str, cluster: &str) -> Self {
        Self {
            fqdn: fqdn.to_string(),
            cluster: cluster.to_string(),
        }
    }
}

impl ClusterHost for TestHost {
    fn fqdn(&self) -> String {
        self.fqdn.clone()
    }

    fn cluster_name(&self) -> String {
        self.cluster.clone()
    }
}
