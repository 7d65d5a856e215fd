// File: client/src/instance.rs
//! Collaborator interfaces for instances the client is pointed at

use std::sync::Arc;

use crate::transport::TransportProvider;

/// The instance running the management service
pub trait ManagementInstance {
    fn management_ip(&self) -> String;

    fn transport_provider(&self) -> Arc<dyn TransportProvider>;
}

/// A cluster member, used only to build URL path segments
pub trait ClusterHost {
    /// Fully-qualified host name as registered with the service
    fn fqdn(&self) -> String;

    fn cluster_name(&self) -> String;
}
