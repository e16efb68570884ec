//! The Azure management surface the provisioners talk to.

use crate::error::CliError;
use crate::models::{
    NicRequest, NsgRequest, NsgRuleRequest, PublicIpRequest, ResourceGroupRequest,
    RoleAssignmentRequest, StorageAccountRequest, VmRequest, VnetRequest,
};
use async_trait::async_trait;

/// One create call per resource kind.
///
/// Implementations return the raw response text. Nothing is read back or
/// verified; a call either succeeds or fails with the provider's error.
#[async_trait]
pub trait CloudControlPlane: Send + Sync {
    async fn create_public_ip(&self, req: &PublicIpRequest) -> Result<String, CliError>;

    async fn create_nic(&self, req: &NicRequest) -> Result<String, CliError>;

    async fn create_vm(&self, req: &VmRequest) -> Result<String, CliError>;

    async fn create_resource_group(&self, req: &ResourceGroupRequest) -> Result<String, CliError>;

    async fn create_role_assignment(&self, req: &RoleAssignmentRequest) -> Result<String, CliError>;

    async fn create_storage_account(&self, req: &StorageAccountRequest) -> Result<String, CliError>;

    async fn create_vnet(&self, req: &VnetRequest) -> Result<String, CliError>;

    async fn create_nsg(&self, req: &NsgRequest) -> Result<String, CliError>;

    async fn create_nsg_rule(&self, req: &NsgRuleRequest) -> Result<String, CliError>;
}
