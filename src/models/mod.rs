//! Domain models for provisioning.
//!
//! This module contains the core data structures used throughout the application:
//! - [`NamingTemplate`] - `{0}` name patterns for resource groups and storage accounts
//! - [`ClusterSlot`] - names and private address of one cluster VM
//! - [`TenantRecord`] - a user read from the tenant source
//! - [`NetworkContext`] and [`InboundRule`] - network the cluster lives in
//! - [`ResourceKind`] and the `*Request` types - parameters of each control plane call

mod naming;
mod network;
mod resource;
mod slot;
mod tenant;

// Re-export public types
pub use naming::{is_valid_storage_account_name, NamingTemplate, SLOT};
pub use network::{default_inbound_rules, InboundRule, NetworkContext};
pub use resource::{
    NicRequest, NsgRequest, NsgRuleRequest, ProvisionedResource, PublicIpRequest,
    ResourceGroupRequest, ResourceKind, RoleAssignmentRequest, StorageAccountRequest, VmRequest,
    VnetRequest,
};
pub use slot::ClusterSlot;
pub use tenant::{load_tenant_records, parse_tenant_records, TenantRecord};
