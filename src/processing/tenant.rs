//! Per-user provisioning: resource group, role assignment, storage account.

use super::run_units;
use crate::azure::CloudControlPlane;
use crate::config::{ProvisionConfig, DEFAULT_ROLE, DEFAULT_STORAGE_SKU};
use crate::error::ProvisionError;
use crate::models::{
    is_valid_storage_account_name, NamingTemplate, ProvisionedResource, ResourceGroupRequest,
    ResourceKind, RoleAssignmentRequest, StorageAccountRequest, TenantRecord,
};
use crate::output::print_done;

pub struct TenantProvisioner<'a, P: CloudControlPlane> {
    plane: &'a P,
    rg_template: NamingTemplate,
    storage_template: NamingTemplate,
    role: String,
    storage_sku: String,
    concurrency: usize,
}

impl<'a, P: CloudControlPlane> TenantProvisioner<'a, P> {
    pub fn new(
        plane: &'a P,
        rg_template: NamingTemplate,
        storage_template: NamingTemplate,
    ) -> Self {
        TenantProvisioner {
            plane,
            rg_template,
            storage_template,
            role: DEFAULT_ROLE.to_string(),
            storage_sku: DEFAULT_STORAGE_SKU.to_string(),
            concurrency: 1,
        }
    }

    pub fn from_config(plane: &'a P, config: &ProvisionConfig) -> Self {
        let mut provisioner = TenantProvisioner::new(
            plane,
            config.rg_template.clone(),
            config.storage_template.clone(),
        )
        .with_concurrency(config.concurrency);
        provisioner.role = config.role.clone();
        provisioner.storage_sku = config.storage_sku.clone();
        provisioner
    }

    /// Records in flight at once. Values below 1 are treated as 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn resource_group_name(&self, record: &TenantRecord) -> String {
        self.rg_template.render(&record.user)
    }

    pub fn storage_account_name(&self, record: &TenantRecord) -> String {
        self.storage_template.render(&record.user)
    }

    /// Provision every record in input order, stopping at the first failure.
    pub async fn provision(
        &self,
        records: &[TenantRecord],
        region: &str,
    ) -> Result<Vec<ProvisionedResource>, ProvisionError> {
        log::info!("#Start tenants: {} record(s) in {region}", records.len());

        let created = run_units(records, self.concurrency, |record| {
            self.provision_record(record, region)
        })
        .await?;

        log::info!(
            "#End tenants: submitted {} resource(s) for {} record(s)",
            created.len(),
            records.len()
        );
        Ok(created)
    }

    /// Resource group, then role assignment, then storage account.
    pub async fn provision_record(
        &self,
        record: &TenantRecord,
        region: &str,
    ) -> Result<Vec<ProvisionedResource>, ProvisionError> {
        let rg_name = self.resource_group_name(record);
        log::info!("user '{}' -> resource group '{rg_name}'", record.user);

        let rg = ResourceGroupRequest {
            name: rg_name.clone(),
            region: region.to_string(),
        };
        self.plane
            .create_resource_group(&rg)
            .await
            .map_err(|e| ProvisionError::step(ResourceKind::ResourceGroup, &rg.name, e))?;

        let role = RoleAssignmentRequest {
            assignee: record.user_id.clone(),
            role: self.role.clone(),
            resource_group: rg_name.clone(),
        };
        self.plane
            .create_role_assignment(&role)
            .await
            .map_err(|e| {
                ProvisionError::step(
                    ResourceKind::RoleAssignment,
                    format!("{}:{}", role.role, role.assignee),
                    e,
                )
            })?;

        let stor_name = self.storage_account_name(record);
        if !is_valid_storage_account_name(&stor_name) {
            log::warn!(
                "storage account name '{stor_name}' is not 3-24 lowercase letters and digits"
            );
        }
        let storage = StorageAccountRequest {
            name: stor_name,
            resource_group: rg_name.clone(),
            region: region.to_string(),
            sku: self.storage_sku.clone(),
        };
        self.plane
            .create_storage_account(&storage)
            .await
            .map_err(|e| ProvisionError::step(ResourceKind::StorageAccount, &storage.name, e))?;

        print_done(&record.user);
        let role_name = format!("{}:{}", role.role, role.assignee);
        Ok(vec![
            ProvisionedResource::new(ResourceKind::ResourceGroup, rg.name, &rg_name),
            ProvisionedResource::new(ResourceKind::RoleAssignment, role_name, &rg_name),
            ProvisionedResource::new(ResourceKind::StorageAccount, storage.name, rg_name),
        ])
    }
}
