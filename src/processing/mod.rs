//! Provisioning workflows.
//!
//! This module contains the call sequences sent to the control plane:
//! - [`cluster`] - public IP, NIC and VM per cluster slot
//! - [`tenant`] - resource group, role assignment and storage account per user
//! - [`network`] - vnet, subnet, NSG and inbound rules for the cluster

mod cluster;
mod network;
mod tenant;

use crate::error::ProvisionError;
use crate::models::ProvisionedResource;
use futures::{stream, StreamExt, TryStreamExt};
use std::future::Future;

// Re-export public types
pub use cluster::{ClusterProvisioner, MachineSpec};
pub use network::NetworkProvisioner;
pub use tenant::TenantProvisioner;

/// Run `provision` for every unit and concatenate the results in unit order.
///
/// With `concurrency == 1` a unit starts only after the previous one is
/// finished. Above that, up to `concurrency` units are in flight. The first
/// error ends the run either way and pending units are dropped.
pub(crate) async fn run_units<'a, T, F, Fut>(
    units: &'a [T],
    concurrency: usize,
    provision: F,
) -> Result<Vec<ProvisionedResource>, ProvisionError>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = Result<Vec<ProvisionedResource>, ProvisionError>>,
{
    if concurrency <= 1 {
        let mut created = Vec::new();
        for unit in units {
            created.extend(provision(unit).await?);
        }
        return Ok(created);
    }

    let batches: Vec<Vec<ProvisionedResource>> = stream::iter(units.iter().map(provision))
        .buffered(concurrency)
        .try_collect()
        .await?;
    Ok(batches.into_iter().flatten().collect())
}
