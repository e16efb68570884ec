//! Resource kinds and the parameters submitted for each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Kind of Azure resource a call creates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    PublicIp,
    NetworkInterface,
    VirtualMachine,
    ResourceGroup,
    RoleAssignment,
    StorageAccount,
    VirtualNetwork,
    SecurityGroup,
    SecurityRule,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::PublicIp => "public IP",
            ResourceKind::NetworkInterface => "network interface",
            ResourceKind::VirtualMachine => "virtual machine",
            ResourceKind::ResourceGroup => "resource group",
            ResourceKind::RoleAssignment => "role assignment",
            ResourceKind::StorageAccount => "storage account",
            ResourceKind::VirtualNetwork => "virtual network",
            ResourceKind::SecurityGroup => "network security group",
            ResourceKind::SecurityRule => "security rule",
        };
        f.write_str(name)
    }
}

/// A resource a run submitted, in submission order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedResource {
    pub kind: ResourceKind,
    pub name: String,
    pub resource_group: String,
}

impl ProvisionedResource {
    pub fn new(
        kind: ResourceKind,
        name: impl Into<String>,
        resource_group: impl Into<String>,
    ) -> Self {
        ProvisionedResource {
            kind,
            name: name.into(),
            resource_group: resource_group.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicIpRequest {
    pub name: String,
    pub resource_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicRequest {
    pub name: String,
    pub resource_group: String,
    pub vnet_name: String,
    pub subnet_name: String,
    pub nsg_name: String,
    /// Public IP created earlier for the same slot.
    pub public_ip_name: String,
    pub internal_dns_name: String,
    pub private_ip: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmRequest {
    pub name: String,
    pub resource_group: String,
    pub region: String,
    /// NIC created earlier for the same slot.
    pub nic_name: String,
    pub size: String,
    pub public_key_path: String,
    pub disk_size_gb: u32,
    pub image: String,
    /// Account receiving boot diagnostics.
    pub storage_account: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupRequest {
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignmentRequest {
    pub assignee: String,
    pub role: String,
    pub resource_group: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccountRequest {
    pub name: String,
    pub resource_group: String,
    pub region: String,
    pub sku: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VnetRequest {
    pub name: String,
    pub resource_group: String,
    pub region: String,
    pub address_prefix: String,
    pub subnet_name: String,
    pub subnet_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsgRequest {
    pub name: String,
    pub resource_group: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsgRuleRequest {
    pub name: String,
    pub resource_group: String,
    pub nsg_name: String,
    pub port: u16,
    pub priority: u16,
}
