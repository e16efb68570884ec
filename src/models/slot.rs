//! Cluster slot naming and addressing.

use crate::error::ProvisionError;
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// Names and private address derived from a slot index.
///
/// Slot `i` yields `ip_cluster{i}`, `nic_cluster{i}`, `cluster{i}` and
/// `10.0.1.2{i}`. The VM takes the DNS name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSlot {
    pub index: u32,
    pub ip_name: String,
    pub nic_name: String,
    pub dns_name: String,
    pub private_ip: Ipv4Addr,
}

impl ClusterSlot {
    pub fn new(index: u32) -> Result<Self, ProvisionError> {
        if index == 0 {
            return Err(ProvisionError::Slot {
                index,
                reason: "slots are numbered from 1".to_string(),
            });
        }
        // The index is appended as text, so only 1..=54 gives a host address.
        let private_ip = format!("10.0.1.2{index}")
            .parse::<Ipv4Addr>()
            .map_err(|e| ProvisionError::Slot {
                index,
                reason: format!("derived private address 10.0.1.2{index} is invalid: {e}"),
            })?;
        if private_ip.octets()[3] == u8::MAX {
            return Err(ProvisionError::Slot {
                index,
                reason: format!("derived private address {private_ip} is the subnet broadcast"),
            });
        }

        Ok(ClusterSlot {
            index,
            ip_name: format!("ip_cluster{index}"),
            nic_name: format!("nic_cluster{index}"),
            dns_name: format!("cluster{index}"),
            private_ip,
        })
    }

    /// Slots `1..=count`, ascending.
    pub fn range(count: u32) -> Result<Vec<ClusterSlot>, ProvisionError> {
        (1..=count).map(ClusterSlot::new).collect()
    }

    pub fn vm_name(&self) -> &str {
        &self.dns_name
    }
}

impl fmt::Display for ClusterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slot#{} {} / {} / {} ({})",
            self.index, self.ip_name, self.nic_name, self.dns_name, self.private_ip
        )
    }
}
