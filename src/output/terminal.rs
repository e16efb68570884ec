//! Terminal output utilities.

use crate::models::ProvisionedResource;
use colored::Colorize;

/// Completion marker printed after each tenant record.
pub fn done_marker(user: &str) -> String {
    format!("{user} done")
}

pub fn print_done(user: &str) {
    println!("{}", done_marker(user).green());
}

/// One line per submitted resource, e.g. `"public IP"  ip_cluster1  (admin_resources)`.
pub fn format_resource(resource: &ProvisionedResource) -> String {
    format!(
        "{kind:>24}  {name}  ({rg})",
        kind = format!("\"{}\"", resource.kind),
        name = resource.name,
        rg = resource.resource_group
    )
}

/// Print what a run submitted.
pub fn print_summary(resources: &[ProvisionedResource], dry_run: bool) {
    let verb = if dry_run { "would create" } else { "created" };
    println!(
        "#{}# {verb} {} resource(s)",
        "SUMMARY".on_green(),
        resources.len()
    );
    for resource in resources {
        println!("{}", format_resource(resource));
    }
}
