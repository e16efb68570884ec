//! Azure control plane interaction.
//!
//! This module handles all Azure-related operations:
//! - [`cli`] - Command execution for Azure CLI
//! - [`control_plane`] - The [`CloudControlPlane`] seam the provisioners call
//! - [`az`] - [`AzCli`], the `az`-backed implementation

pub mod az;
mod cli;
mod control_plane;

// Re-export public types and functions
pub use az::AzCli;
pub use cli::{render_command, run};
pub use control_plane::CloudControlPlane;
