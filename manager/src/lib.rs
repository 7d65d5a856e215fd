pub mod cli;
pub mod commands;
pub mod config;
pub mod inventory;

// Re-export commonly used types
pub use config::{Config, ConfigManager};
pub use inventory::{ConfiguredEndpoint, ConfiguredHost};
