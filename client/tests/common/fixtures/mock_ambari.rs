//! Mock Ambari server for testing
//!
//! Serves the management API endpoints the client talks to without a real
//! Ambari installation. Every mock requires the requested-by header so a
//! request missing it falls through to wiremock's 404.

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockAmbariServer {
    pub server: MockServer,
}

impl MockAmbariServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Host part of the server URI, e.g. `127.0.0.1`
    pub fn management_ip(&self) -> String {
        self.server.address().ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.server.address().port()
    }

    /// Mock cluster creation returning the given request id
    pub async fn mock_create_cluster(&self, cluster: &str, request_id: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/api/v1/clusters/{}", cluster)))
            .and(header("X-Requested-By", "sahara"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "href": format!("http://ambari/api/v1/clusters/{}/requests/{}", cluster, request_id),
                "Requests": {"id": request_id, "status": "Accepted"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the status endpoint answering `status` for the next `times` polls
    pub async fn mock_request_status(
        &self,
        cluster: &str,
        request_id: u64,
        status: &str,
        progress: f64,
        times: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/clusters/{}/requests/{}", cluster, request_id)))
            .and(header("X-Requested-By", "sahara"))
            .respond_with(ResponseTemplate::new(200).set_body_json(request_body(
                request_id, status, progress,
            )))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Mock the registered hosts listing
    pub async fn mock_hosts(&self, host_names: &[&str]) {
        let items: Vec<Value> = host_names
            .iter()
            .map(|name| {
                json!({
                    "href": format!("http://ambari/api/v1/hosts/{}", name),
                    "Hosts": {"host_name": name}
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/api/v1/hosts"))
            .and(header("X-Requested-By", "sahara"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "href": "http://ambari/api/v1/hosts",
                "items": items
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock an error status on any method for a path
    pub async fn mock_error(&self, endpoint: &str, status_code: u16, body: &str) {
        Mock::given(path(endpoint))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}

pub fn request_body(request_id: u64, status: &str, progress: f64) -> Value {
    json!({
        "Requests": {
            "id": request_id,
            "request_context": "Install and start all services",
            "request_status": status,
            "progress_percent": progress
        }
    })
}
