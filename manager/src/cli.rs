// File: manager/src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ambari cluster manager: drive the management API from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding main.toml, secrets.toml and per-cluster files
    #[arg(long, value_name = "DIR", default_value = "config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List hosts registered with the management service
    Hosts,

    /// Show the registration record of one host
    HostInfo { host: String },

    /// Show alert items of a cluster
    Alerts { cluster: String },

    /// Manage cluster credentials
    #[command(subcommand)]
    Credential(CredentialCommands),

    /// Register a blueprint from a JSON file
    CreateBlueprint {
        name: String,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Create a cluster from a JSON cluster template
    CreateCluster {
        name: String,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
        /// Block until the provisioning request finishes
        #[arg(long)]
        wait: bool,
    },

    /// Add a host to a cluster
    AddHost { cluster: String, host: String },

    /// Move a host component to a state (STARTED by default) and wait
    Start {
        cluster: String,
        host: String,
        component: String,
        #[arg(long, default_value = "STARTED")]
        state: String,
        #[arg(long)]
        context: Option<String>,
    },

    /// Stop a host component and wait
    Stop {
        cluster: String,
        host: String,
        component: String,
    },

    /// Stop and start a whole service
    RestartService { cluster: String, service: String },

    /// Wait for one or more asynchronous requests
    Wait {
        cluster: String,
        #[arg(required = true)]
        request_ids: Vec<String>,
    },

    /// Change a user's password
    UpdatePassword {
        username: String,
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CredentialCommands {
    /// Fetch a credential
    Get { cluster: String, alias: String },

    /// Import a credential from a JSON file
    Import {
        cluster: String,
        alias: String,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
}
