//! This module provides reusable test utilities:
//! - Test configuration builders writing a config directory to a temp dir

// Allow unused code in test fixtures - they are utilities shared by several test binaries
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod test_config;

// Re-export commonly used items
pub use test_config::TestConfigBuilder;
