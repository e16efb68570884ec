//! Network context the cluster is placed into.

use serde::{Deserialize, Serialize};

/// Region, vnet, subnet and NSG that cluster NICs attach to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    pub region: String,
    pub vnet_name: String,
    pub subnet_name: String,
    pub nsg_name: String,
}

/// Inbound TCP allow rule on the cluster NSG.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InboundRule {
    pub name: String,
    pub port: u16,
    pub priority: u16,
}

impl InboundRule {
    pub fn new(name: impl Into<String>, port: u16, priority: u16) -> Self {
        InboundRule {
            name: name.into(),
            port,
            priority,
        }
    }
}

/// SSH and Jupyter.
pub fn default_inbound_rules() -> Vec<InboundRule> {
    vec![
        InboundRule::new("allow_ssh", 22, 1000),
        InboundRule::new("allow_jupyter", 9999, 1010),
    ]
}
