//! # CLI Argument Definitions
//!
//! Command-line interface built with `clap`. Flags given here take
//! precedence over the config file and `AZPROV_*` environment variables.

use crate::config::ProvisionConfig;
use crate::error::ProvisionError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "azure-provision")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Provision cluster VMs and per-user Azure resources through the az CLI")]
pub struct Cli {
    /// JSON config file overlaid on the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// log4rs configuration file
    #[arg(long, global = true, default_value = "log4rs.yml")]
    pub log_config: PathBuf,

    /// Log the az commands without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Write a JSON report of the submitted resources to this file
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    /// Slots or records provisioned at once (default 1, strictly sequential)
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Deployment region, e.g. eastus
    #[arg(long, global = true)]
    pub region: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Workflows.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a public IP, NIC and VM for each cluster slot
    Cluster {
        /// Identity the resource group and storage account are named after
        #[arg(long)]
        identity: Option<String>,
        /// Number of slots
        #[arg(long)]
        slots: Option<u32>,
    },
    /// Create a resource group, Contributor role assignment and storage account per user
    Tenants {
        /// JSON array of {"user", "userId"} records
        #[arg(long, default_value = "users.json")]
        users: PathBuf,
    },
    /// Create the vnet, subnet, NSG and inbound rules the cluster attaches to
    Network {
        /// Identity the resource group is named after
        #[arg(long)]
        identity: Option<String>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Cluster { .. } => "cluster",
            Command::Tenants { .. } => "tenants",
            Command::Network { .. } => "network",
        }
    }
}

impl Cli {
    /// Defaults, then `--config`, then `AZPROV_*` variables, then flags.
    pub fn resolve_config(&self) -> Result<ProvisionConfig, ProvisionError> {
        let mut config = ProvisionConfig::load(self.config.as_deref())?;
        config.apply_process_env()?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ProvisionConfig) {
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        match &self.command {
            Command::Cluster { identity, slots } => {
                if let Some(identity) = identity {
                    config.cluster_identity = identity.clone();
                }
                if let Some(slots) = slots {
                    config.slot_count = *slots;
                }
            }
            Command::Network { identity } => {
                if let Some(identity) = identity {
                    config.cluster_identity = identity.clone();
                }
            }
            Command::Tenants { .. } => {}
        }
    }
}
