//! Cluster provisioning.
//!
//! Each slot gets a public IP, a NIC bound to it inside the existing
//! network, and a VM on that NIC. The three calls of a slot always run
//! in that order since each one references the name created before it.

use super::run_units;
use crate::azure::CloudControlPlane;
use crate::config::ProvisionConfig;
use crate::error::ProvisionError;
use crate::models::{
    ClusterSlot, NetworkContext, NicRequest, ProvisionedResource, PublicIpRequest, ResourceKind,
    VmRequest,
};

/// Fixed machine shape shared by every slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSpec {
    pub size: String,
    pub public_key_path: String,
    pub disk_size_gb: u32,
    pub image: String,
}

impl MachineSpec {
    pub fn from_config(config: &ProvisionConfig) -> Self {
        MachineSpec {
            size: config.vm_size.clone(),
            public_key_path: config.expanded_public_key_path(),
            disk_size_gb: config.disk_size_gb,
            image: config.image_reference.clone(),
        }
    }
}

pub struct ClusterProvisioner<'a, P: CloudControlPlane> {
    plane: &'a P,
    machine: MachineSpec,
    concurrency: usize,
}

impl<'a, P: CloudControlPlane> ClusterProvisioner<'a, P> {
    pub fn new(plane: &'a P, machine: MachineSpec) -> Self {
        ClusterProvisioner {
            plane,
            machine,
            concurrency: 1,
        }
    }

    pub fn from_config(plane: &'a P, config: &ProvisionConfig) -> Self {
        ClusterProvisioner::new(plane, MachineSpec::from_config(config))
            .with_concurrency(config.concurrency)
    }

    /// Slots in flight at once. Values below 1 are treated as 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Provision slots `1..=count` into `resource_group`.
    ///
    /// Stops at the first failed call. Resources created before it are left
    /// in place.
    pub async fn provision(
        &self,
        resource_group: &str,
        network: &NetworkContext,
        storage_account: &str,
        count: u32,
    ) -> Result<Vec<ProvisionedResource>, ProvisionError> {
        let slots = ClusterSlot::range(count)?;
        log::info!("#Start cluster: {count} slot(s) in '{resource_group}'");
        log::debug!(
            "region={region}, vnet={vnet}/{subnet}, nsg={nsg}",
            region = network.region,
            vnet = network.vnet_name,
            subnet = network.subnet_name,
            nsg = network.nsg_name,
        );

        let created = run_units(slots.as_slice(), self.concurrency, |slot| {
            self.provision_slot(slot, resource_group, network, storage_account)
        })
        .await?;

        log::info!(
            "#End cluster: submitted {} resource(s) for {count} slot(s)",
            created.len()
        );
        Ok(created)
    }

    /// Public IP, then NIC, then VM for one slot.
    pub async fn provision_slot(
        &self,
        slot: &ClusterSlot,
        resource_group: &str,
        network: &NetworkContext,
        storage_account: &str,
    ) -> Result<Vec<ProvisionedResource>, ProvisionError> {
        log::info!("{slot}");

        let ip = PublicIpRequest {
            name: slot.ip_name.clone(),
            resource_group: resource_group.to_string(),
        };
        self.plane
            .create_public_ip(&ip)
            .await
            .map_err(|e| ProvisionError::step(ResourceKind::PublicIp, &ip.name, e))?;

        let nic = NicRequest {
            name: slot.nic_name.clone(),
            resource_group: resource_group.to_string(),
            vnet_name: network.vnet_name.clone(),
            subnet_name: network.subnet_name.clone(),
            nsg_name: network.nsg_name.clone(),
            public_ip_name: ip.name.clone(),
            internal_dns_name: slot.dns_name.clone(),
            private_ip: slot.private_ip,
        };
        self.plane
            .create_nic(&nic)
            .await
            .map_err(|e| ProvisionError::step(ResourceKind::NetworkInterface, &nic.name, e))?;

        let vm = VmRequest {
            name: slot.vm_name().to_string(),
            resource_group: resource_group.to_string(),
            region: network.region.clone(),
            nic_name: nic.name.clone(),
            size: self.machine.size.clone(),
            public_key_path: self.machine.public_key_path.clone(),
            disk_size_gb: self.machine.disk_size_gb,
            image: self.machine.image.clone(),
            storage_account: storage_account.to_string(),
        };
        self.plane
            .create_vm(&vm)
            .await
            .map_err(|e| ProvisionError::step(ResourceKind::VirtualMachine, &vm.name, e))?;

        log::info!("slot#{} done: vm '{}' on '{}'", slot.index, vm.name, nic.name);
        Ok(vec![
            ProvisionedResource::new(ResourceKind::PublicIp, ip.name, resource_group),
            ProvisionedResource::new(ResourceKind::NetworkInterface, nic.name, resource_group),
            ProvisionedResource::new(ResourceKind::VirtualMachine, vm.name, resource_group),
        ])
    }
}
