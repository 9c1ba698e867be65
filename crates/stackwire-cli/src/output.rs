//! Formatted output helpers for CLI commands.
//!
//! Every helper here renders secrets as the placeholder unless the caller
//! passes an explicit reveal flag.

use stackwire_common::constants::SECRET_PLACEHOLDER;
use stackwire_compose::resource::{Descriptor, ResourceKind, Value};
use stackwire_compose::snapshot::Change;

/// Width of the heading rule.
const RULE_WIDTH: usize = 35;

/// Returns the double-line rule printed under headings.
#[must_use]
pub fn rule() -> String {
    "\u{2550}".repeat(RULE_WIDTH)
}

/// Renders an output value; secrets stay masked unless `show_secrets`.
#[must_use]
pub fn format_value(value: &Value, show_secrets: bool) -> String {
    match value {
        Value::Plain(s) => s.clone(),
        Value::Secret(secret) if show_secrets => secret.reveal().clone(),
        Value::Secret(_) => SECRET_PLACEHOLDER.to_owned(),
    }
}

/// Marker shown in front of a resource for a planned change.
#[must_use]
pub const fn change_marker(change: Option<&Change>) -> char {
    match change {
        None | Some(Change::Create(_)) => '+',
        Some(Change::Update { .. }) => '~',
        Some(Change::Delete(_)) => '-',
        Some(Change::Same(_)) => ' ',
    }
}

/// Renders the indented field lines of a descriptor for `plan`.
#[must_use]
pub fn describe(descriptor: &Descriptor) -> Vec<String> {
    let mut lines = Vec::new();
    match &descriptor.kind {
        ResourceKind::RemoteImage { image } => lines.push(format!("image: {image}")),
        ResourceKind::Network { name } => lines.push(format!("name: {name}")),
        ResourceKind::Container {
            name,
            image,
            ports,
            networks_advanced,
            envs,
        } => {
            lines.push(format!("name: {name}"));
            lines.push(format!("image: {image}.repoDigest"));
            for port in ports {
                lines.push(format!("port: {port}"));
            }
            for attachment in networks_advanced {
                if attachment.aliases.is_empty() {
                    lines.push(format!("network: {}", attachment.network));
                } else {
                    lines.push(format!(
                        "network: {} (aliases: {})",
                        attachment.network,
                        attachment.aliases.join(", ")
                    ));
                }
            }
            for env in envs {
                lines.push(format!("env: {env}"));
            }
        }
    }
    if !descriptor.depends_on.is_empty() {
        let deps: Vec<&str> = descriptor.depends_on.iter().map(|d| d.as_str()).collect();
        lines.push(format!("depends on: {}", deps.join(", ")));
    }
    lines
}
