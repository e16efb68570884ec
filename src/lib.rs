// cargo watch -x 'fmt' -x 'run -- --dry-run tenants --users users.example.json'

pub mod args;
pub mod azure;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;

use args::Command;
use azure::CloudControlPlane;
use config::ProvisionConfig;
use error::ProvisionError;
use models::{load_tenant_records, ProvisionedResource, TenantRecord};
use processing::{ClusterProvisioner, NetworkProvisioner, TenantProvisioner};

/// Run the workflow selected on the command line.
pub async fn run<P: CloudControlPlane>(
    command: &Command,
    config: &ProvisionConfig,
    plane: &P,
) -> Result<Vec<ProvisionedResource>, ProvisionError> {
    match command {
        Command::Cluster { .. } => provision_cluster(config, plane).await,
        Command::Tenants { users } => {
            let records = load_tenant_records(users)?;
            provision_tenants(&records, config, plane).await
        }
        Command::Network { .. } => provision_network(config, plane).await,
    }
}

/// Cluster slots into the resource group named after the cluster identity.
pub async fn provision_cluster<P: CloudControlPlane>(
    config: &ProvisionConfig,
    plane: &P,
) -> Result<Vec<ProvisionedResource>, ProvisionError> {
    ClusterProvisioner::from_config(plane, config)
        .provision(
            &config.cluster_resource_group(),
            &config.network_context(),
            &config.cluster_storage_account(),
            config.slot_count,
        )
        .await
}

pub async fn provision_tenants<P: CloudControlPlane>(
    records: &[TenantRecord],
    config: &ProvisionConfig,
    plane: &P,
) -> Result<Vec<ProvisionedResource>, ProvisionError> {
    TenantProvisioner::from_config(plane, config)
        .provision(records, &config.region)
        .await
}

/// Network context for the cluster, in the cluster resource group.
pub async fn provision_network<P: CloudControlPlane>(
    config: &ProvisionConfig,
    plane: &P,
) -> Result<Vec<ProvisionedResource>, ProvisionError> {
    NetworkProvisioner::from_config(plane, config)
        .provision(&config.cluster_resource_group(), &config.network_context())
        .await
}
