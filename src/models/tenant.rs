//! Tenant records and the JSON file they are read from.

use crate::error::ProvisionError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One user to provision for. Extra fields in the source are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    /// Name substituted into the naming templates.
    pub user: String,
    /// Principal the role is assigned to.
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl TenantRecord {
    pub fn new(user: impl Into<String>, user_id: impl Into<String>) -> Self {
        TenantRecord {
            user: user.into(),
            user_id: user_id.into(),
        }
    }
}

/// Parse a JSON array of `{"user": .., "userId": ..}` records, keeping order.
///
/// The first record missing a field (or carrying a non-string value) fails
/// the whole source; the error carries its JSON path, e.g. `[2]`.
pub fn parse_tenant_records(json: &str) -> Result<Vec<TenantRecord>, ProvisionError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        ProvisionError::MalformedRecord {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    })
}

/// Read tenant records from a file.
pub fn load_tenant_records(path: &Path) -> Result<Vec<TenantRecord>, ProvisionError> {
    let json = std::fs::read_to_string(path).map_err(|source| ProvisionError::TenantSource {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_tenant_records(&json)?;
    log::info!(
        "Read {} tenant record(s) from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}
