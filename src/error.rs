//! Error types.
//!
//! [`CliError`] is what the control plane reports for a single call.
//! [`ProvisionError`] is what a whole run fails with.

use crate::models::ResourceKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single `az` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit; `stderr` is kept exactly as the CLI wrote it.
    #[error("{stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("response too large: {0} bytes")]
    TooLarge(usize),

    #[error("invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Failure of a provisioning run.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("creating {kind} '{name}' failed: {source}")]
    Step {
        kind: ResourceKind,
        name: String,
        #[source]
        source: CliError,
    },

    #[error("cannot read tenant source {path}: {source}")]
    TenantSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tenant source at {path}: {message}")]
    MalformedRecord { path: String, message: String },

    #[error("invalid naming template '{template}': {reason}")]
    Template { template: String, reason: String },

    #[error("invalid cluster slot {index}: {reason}")]
    Slot { index: u32, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot write report {path}: {message}")]
    Report { path: PathBuf, message: String },
}

impl ProvisionError {
    pub fn step(kind: ResourceKind, name: impl Into<String>, source: CliError) -> Self {
        ProvisionError::Step {
            kind,
            name: name.into(),
            source,
        }
    }
}
