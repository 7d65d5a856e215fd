//! This module provides reusable test utilities:
//! - A scripted in-memory transport that records every request
//! - A mock Ambari server for end-to-end tests over reqwest
//! - Instance and host doubles

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_ambari;
pub mod mock_transport;

// Re-export commonly used items
pub use mock_ambari::MockAmbariServer;
pub use mock_transport::{MockTransportProvider, ScriptedTransport, TestHost, TestInstance};
