//! Network the cluster attaches to: vnet with one subnet, NSG and its inbound rules.

use crate::azure::CloudControlPlane;
use crate::config::ProvisionConfig;
use crate::error::ProvisionError;
use crate::models::{
    InboundRule, NetworkContext, NsgRequest, NsgRuleRequest, ProvisionedResource, ResourceKind,
    VnetRequest,
};

pub struct NetworkProvisioner<'a, P: CloudControlPlane> {
    plane: &'a P,
    vnet_address_prefix: String,
    subnet_prefix: String,
    rules: Vec<InboundRule>,
}

impl<'a, P: CloudControlPlane> NetworkProvisioner<'a, P> {
    pub fn new(
        plane: &'a P,
        vnet_address_prefix: impl Into<String>,
        subnet_prefix: impl Into<String>,
        rules: Vec<InboundRule>,
    ) -> Self {
        NetworkProvisioner {
            plane,
            vnet_address_prefix: vnet_address_prefix.into(),
            subnet_prefix: subnet_prefix.into(),
            rules,
        }
    }

    pub fn from_config(plane: &'a P, config: &ProvisionConfig) -> Self {
        NetworkProvisioner::new(
            plane,
            config.vnet_address_prefix.as_str(),
            config.subnet_prefix.as_str(),
            config.inbound_rules.clone(),
        )
    }

    /// Create the vnet/subnet, the NSG, then each rule in order.
    pub async fn provision(
        &self,
        resource_group: &str,
        network: &NetworkContext,
    ) -> Result<Vec<ProvisionedResource>, ProvisionError> {
        log::info!(
            "#Start network: vnet '{}' ({}) subnet '{}' ({}) nsg '{}' in '{resource_group}'",
            network.vnet_name,
            self.vnet_address_prefix,
            network.subnet_name,
            self.subnet_prefix,
            network.nsg_name
        );
        let mut created = Vec::with_capacity(2 + self.rules.len());

        let vnet = VnetRequest {
            name: network.vnet_name.clone(),
            resource_group: resource_group.to_string(),
            region: network.region.clone(),
            address_prefix: self.vnet_address_prefix.clone(),
            subnet_name: network.subnet_name.clone(),
            subnet_prefix: self.subnet_prefix.clone(),
        };
        self.plane
            .create_vnet(&vnet)
            .await
            .map_err(|e| ProvisionError::step(ResourceKind::VirtualNetwork, &vnet.name, e))?;
        created.push(ProvisionedResource::new(
            ResourceKind::VirtualNetwork,
            vnet.name,
            resource_group,
        ));

        let nsg = NsgRequest {
            name: network.nsg_name.clone(),
            resource_group: resource_group.to_string(),
            region: network.region.clone(),
        };
        self.plane
            .create_nsg(&nsg)
            .await
            .map_err(|e| ProvisionError::step(ResourceKind::SecurityGroup, &nsg.name, e))?;
        created.push(ProvisionedResource::new(
            ResourceKind::SecurityGroup,
            nsg.name.as_str(),
            resource_group,
        ));

        for rule in &self.rules {
            let req = NsgRuleRequest {
                name: rule.name.clone(),
                resource_group: resource_group.to_string(),
                nsg_name: nsg.name.clone(),
                port: rule.port,
                priority: rule.priority,
            };
            log::info!(
                "allow inbound tcp/{} as '{}' (priority {})",
                req.port,
                req.name,
                req.priority
            );
            self.plane
                .create_nsg_rule(&req)
                .await
                .map_err(|e| ProvisionError::step(ResourceKind::SecurityRule, &req.name, e))?;
            created.push(ProvisionedResource::new(
                ResourceKind::SecurityRule,
                req.name,
                resource_group,
            ));
        }

        log::info!("#End network: submitted {} resource(s)", created.len());
        Ok(created)
    }
}
