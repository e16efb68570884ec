//! Run configuration.
//!
//! Defaults reproduce the values the provisioning scripts have always used.
//! They are overlaid, in order, by an optional JSON file, `AZPROV_*`
//! environment variables (a `.env` file is loaded by `main`) and CLI flags.

use crate::error::ProvisionError;
use crate::models::{
    default_inbound_rules, ClusterSlot, InboundRule, NamingTemplate, NetworkContext,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest stdout accepted from a single `az` call.
pub const MAX_OUTPUT_BYTES: usize = 500_000;

/// Prefix of the environment variables read by [`ProvisionConfig::apply_env`].
pub const ENV_PREFIX: &str = "AZPROV_";

/// Role granted to each tenant on their own resource group.
pub const DEFAULT_ROLE: &str = "Contributor";

/// Replication SKU of tenant and cluster storage accounts.
pub const DEFAULT_STORAGE_SKU: &str = "Standard_LRS";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Deployment region, e.g. `eastus`.
    pub region: String,
    pub vnet_name: String,
    pub subnet_name: String,
    pub nsg_name: String,
    /// Resource group name pattern, applied to the user (or cluster identity).
    pub rg_template: NamingTemplate,
    /// Storage account name pattern, applied to the user (or cluster identity).
    pub storage_template: NamingTemplate,
    pub vm_size: String,
    pub public_key_path: String,
    pub disk_size_gb: u32,
    /// Image URN `publisher:offer:sku:version`.
    pub image_reference: String,
    pub slot_count: u32,
    pub storage_sku: String,
    pub role: String,
    /// Identity the cluster resource group and storage account are named after.
    pub cluster_identity: String,
    pub vnet_address_prefix: String,
    pub subnet_prefix: String,
    pub inbound_rules: Vec<InboundRule>,
    pub az_binary: String,
    /// Slots or records in flight at once; 1 keeps the run strictly sequential.
    pub concurrency: usize,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        ProvisionConfig {
            region: "eastus".to_string(),
            vnet_name: "vnet_cluster".to_string(),
            subnet_name: "subnet_cluster".to_string(),
            nsg_name: "nsg_cluster".to_string(),
            rg_template: NamingTemplate(String::from("{0}_resources")),
            storage_template: NamingTemplate(String::from("{0}lsmlhse645221")),
            vm_size: "Standard_D12_v2".to_string(),
            public_key_path: "~/.ssh/id_rsa.pub".to_string(),
            disk_size_gb: 5,
            image_reference: "Canonical:UbuntuServer:14.04.4-LTS:latest".to_string(),
            slot_count: 3,
            storage_sku: DEFAULT_STORAGE_SKU.to_string(),
            role: DEFAULT_ROLE.to_string(),
            cluster_identity: "admin".to_string(),
            vnet_address_prefix: "10.0.0.0/16".to_string(),
            subnet_prefix: "10.0.1.0/24".to_string(),
            inbound_rules: default_inbound_rules(),
            az_binary: "az".to_string(),
            concurrency: 1,
        }
    }
}

impl ProvisionConfig {
    /// Defaults, overlaid by the JSON file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ProvisionError> {
        let Some(path) = path else {
            return Ok(ProvisionConfig::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| {
            ProvisionError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut deserializer = serde_json::Deserializer::from_str(&json);
        let config: ProvisionConfig = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| {
                ProvisionError::Config(format!(
                    "{}: path={} error={}",
                    path.display(),
                    e.path(),
                    e.inner()
                ))
            })?;
        log::info!("Using config file: {}", path.display());
        Ok(config)
    }

    /// Overlay `AZPROV_<FIELD>` variables from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ProvisionError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Overlay `AZPROV_<FIELD>` values returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ProvisionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| {
                log::debug!("config override from {key}");
                value
            })
        };

        if let Some(v) = get("REGION") {
            self.region = v;
        }
        if let Some(v) = get("VNET_NAME") {
            self.vnet_name = v;
        }
        if let Some(v) = get("SUBNET_NAME") {
            self.subnet_name = v;
        }
        if let Some(v) = get("NSG_NAME") {
            self.nsg_name = v;
        }
        if let Some(v) = get("RG_TEMPLATE") {
            self.rg_template = NamingTemplate::new(v)?;
        }
        if let Some(v) = get("STORAGE_TEMPLATE") {
            self.storage_template = NamingTemplate::new(v)?;
        }
        if let Some(v) = get("VM_SIZE") {
            self.vm_size = v;
        }
        if let Some(v) = get("PUBLIC_KEY_PATH") {
            self.public_key_path = v;
        }
        if let Some(v) = get("DISK_SIZE_GB") {
            self.disk_size_gb = parse_number("DISK_SIZE_GB", &v)?;
        }
        if let Some(v) = get("IMAGE_REFERENCE") {
            self.image_reference = v;
        }
        if let Some(v) = get("SLOT_COUNT") {
            self.slot_count = parse_number("SLOT_COUNT", &v)?;
        }
        if let Some(v) = get("STORAGE_SKU") {
            self.storage_sku = v;
        }
        if let Some(v) = get("ROLE") {
            self.role = v;
        }
        if let Some(v) = get("CLUSTER_IDENTITY") {
            self.cluster_identity = v;
        }
        if let Some(v) = get("VNET_ADDRESS_PREFIX") {
            self.vnet_address_prefix = v;
        }
        if let Some(v) = get("SUBNET_PREFIX") {
            self.subnet_prefix = v;
        }
        if let Some(v) = get("AZ_BINARY") {
            self.az_binary = v;
        }
        if let Some(v) = get("CONCURRENCY") {
            self.concurrency = parse_number("CONCURRENCY", &v)?;
        }
        Ok(())
    }

    /// Reject settings no run can succeed with.
    pub fn validate(&self) -> Result<(), ProvisionError> {
        if self.concurrency == 0 {
            return Err(ProvisionError::Config("concurrency must be at least 1".to_string()));
        }
        if self.region.trim().is_empty() {
            return Err(ProvisionError::Config("region is empty".to_string()));
        }
        // Slots past 54 would get a malformed or broadcast private address.
        ClusterSlot::range(self.slot_count)?;
        Ok(())
    }

    pub fn network_context(&self) -> NetworkContext {
        NetworkContext {
            region: self.region.clone(),
            vnet_name: self.vnet_name.clone(),
            subnet_name: self.subnet_name.clone(),
            nsg_name: self.nsg_name.clone(),
        }
    }

    /// Resource group holding the cluster and its network.
    pub fn cluster_resource_group(&self) -> String {
        self.rg_template.render(&self.cluster_identity)
    }

    /// Storage account receiving cluster boot diagnostics.
    pub fn cluster_storage_account(&self) -> String {
        self.storage_template.render(&self.cluster_identity)
    }

    /// Public key path with a leading `~/` expanded from `$HOME`.
    pub fn expanded_public_key_path(&self) -> String {
        expand_home(&self.public_key_path, std::env::var("HOME").ok().as_deref())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ProvisionError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        ProvisionError::Config(format!("{ENV_PREFIX}{name}='{value}' is not a number: {e}"))
    })
}

fn expand_home(path: &str, home: Option<&str>) -> String {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => format!("{}/{rest}", home.trim_end_matches('/')),
        _ => path.to_string(),
    }
}
