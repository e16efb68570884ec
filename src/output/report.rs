//! JSON report of a run.

use crate::error::ProvisionError;
use crate::models::ProvisionedResource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a successful run submitted, and when.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunReport {
    /// `cluster`, `tenants` or `network`.
    pub workflow: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub resources: Vec<ProvisionedResource>,
}

impl RunReport {
    pub fn new(
        workflow: impl Into<String>,
        dry_run: bool,
        started_at: DateTime<Utc>,
        resources: Vec<ProvisionedResource>,
    ) -> Self {
        RunReport {
            workflow: workflow.into(),
            dry_run,
            started_at,
            finished_at: Utc::now(),
            resources,
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), ProvisionError> {
        let to_report_err = |message: String| ProvisionError::Report {
            path: path.to_path_buf(),
            message,
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| to_report_err(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| to_report_err(e.to_string()))?;
        log::info!(
            "Wrote report for {} resource(s) to {}",
            self.resources.len(),
            path.display()
        );
        Ok(())
    }
}
