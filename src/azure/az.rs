//! [`CloudControlPlane`] backed by the `az` command line.

use super::cli;
use super::control_plane::CloudControlPlane;
use crate::error::CliError;
use crate::models::{
    NicRequest, NsgRequest, NsgRuleRequest, PublicIpRequest, ResourceGroupRequest,
    RoleAssignmentRequest, StorageAccountRequest, VmRequest, VnetRequest,
};
use async_trait::async_trait;
use colored::Colorize;

/// Runs `az` for every call, or only logs the command line in dry-run mode.
#[derive(Debug, Clone)]
pub struct AzCli {
    binary: String,
    dry_run: bool,
}

impl AzCli {
    pub fn new(binary: impl Into<String>, dry_run: bool) -> Self {
        AzCli {
            binary: binary.into(),
            dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    async fn az(&self, args: Vec<String>) -> Result<String, CliError> {
        if self.dry_run {
            log::info!(
                "{} {}",
                "dry-run".on_yellow(),
                cli::render_command(&self.binary, &args)
            );
            return Ok(String::new());
        }
        cli::run(&self.binary, &args).await
    }
}

/// Build an owned argument vector from string-ish parts.
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($arg.to_string()),*]
    };
}

#[rustfmt::skip]
pub fn public_ip_args(req: &PublicIpRequest) -> Vec<String> {
    args![
        "network", "public-ip", "create",
        "--resource-group", req.resource_group,
        "--name", req.name,
        "--output", "json",
    ]
}

#[rustfmt::skip]
pub fn nic_args(req: &NicRequest) -> Vec<String> {
    args![
        "network", "nic", "create",
        "--resource-group", req.resource_group,
        "--name", req.name,
        "--vnet-name", req.vnet_name,
        "--subnet", req.subnet_name,
        "--network-security-group", req.nsg_name,
        "--public-ip-address", req.public_ip_name,
        "--internal-dns-name", req.internal_dns_name,
        "--private-ip-address", req.private_ip,
        "--output", "json",
    ]
}

#[rustfmt::skip]
pub fn vm_args(req: &VmRequest) -> Vec<String> {
    args![
        "vm", "create",
        "--resource-group", req.resource_group,
        "--name", req.name,
        "--location", req.region,
        "--nics", req.nic_name,
        "--size", req.size,
        "--ssh-key-values", req.public_key_path,
        "--data-disk-sizes-gb", req.disk_size_gb,
        "--image", req.image,
        "--boot-diagnostics-storage", req.storage_account,
        "--output", "json",
    ]
}

#[rustfmt::skip]
pub fn resource_group_args(req: &ResourceGroupRequest) -> Vec<String> {
    args![
        "group", "create",
        "--name", req.name,
        "--location", req.region,
        "--output", "json",
    ]
}

#[rustfmt::skip]
pub fn role_assignment_args(req: &RoleAssignmentRequest) -> Vec<String> {
    args![
        "role", "assignment", "create",
        "--assignee", req.assignee,
        "--role", req.role,
        "--resource-group", req.resource_group,
        "--output", "json",
    ]
}

#[rustfmt::skip]
pub fn storage_account_args(req: &StorageAccountRequest) -> Vec<String> {
    args![
        "storage", "account", "create",
        "--location", req.region,
        "--name", req.name,
        "--resource-group", req.resource_group,
        "--sku", req.sku,
        "--output", "json",
    ]
}

#[rustfmt::skip]
pub fn vnet_args(req: &VnetRequest) -> Vec<String> {
    args![
        "network", "vnet", "create",
        "--resource-group", req.resource_group,
        "--name", req.name,
        "--location", req.region,
        "--address-prefix", req.address_prefix,
        "--subnet-name", req.subnet_name,
        "--subnet-prefix", req.subnet_prefix,
        "--output", "json",
    ]
}

#[rustfmt::skip]
pub fn nsg_args(req: &NsgRequest) -> Vec<String> {
    args![
        "network", "nsg", "create",
        "--resource-group", req.resource_group,
        "--name", req.name,
        "--location", req.region,
        "--output", "json",
    ]
}

#[rustfmt::skip]
pub fn nsg_rule_args(req: &NsgRuleRequest) -> Vec<String> {
    args![
        "network", "nsg", "rule", "create",
        "--resource-group", req.resource_group,
        "--nsg-name", req.nsg_name,
        "--name", req.name,
        "--priority", req.priority,
        "--direction", "Inbound",
        "--access", "Allow",
        "--protocol", "Tcp",
        "--destination-port-ranges", req.port,
        "--output", "json",
    ]
}

#[async_trait]
impl CloudControlPlane for AzCli {
    async fn create_public_ip(&self, req: &PublicIpRequest) -> Result<String, CliError> {
        self.az(public_ip_args(req)).await
    }

    async fn create_nic(&self, req: &NicRequest) -> Result<String, CliError> {
        self.az(nic_args(req)).await
    }

    async fn create_vm(&self, req: &VmRequest) -> Result<String, CliError> {
        self.az(vm_args(req)).await
    }

    async fn create_resource_group(&self, req: &ResourceGroupRequest) -> Result<String, CliError> {
        self.az(resource_group_args(req)).await
    }

    async fn create_role_assignment(
        &self,
        req: &RoleAssignmentRequest,
    ) -> Result<String, CliError> {
        self.az(role_assignment_args(req)).await
    }

    async fn create_storage_account(
        &self,
        req: &StorageAccountRequest,
    ) -> Result<String, CliError> {
        self.az(storage_account_args(req)).await
    }

    async fn create_vnet(&self, req: &VnetRequest) -> Result<String, CliError> {
        self.az(vnet_args(req)).await
    }

    async fn create_nsg(&self, req: &NsgRequest) -> Result<String, CliError> {
        self.az(nsg_args(req)).await
    }

    async fn create_nsg_rule(&self, req: &NsgRuleRequest) -> Result<String, CliError> {
        self.az(nsg_rule_args(req)).await
    }
}
