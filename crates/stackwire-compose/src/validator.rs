//! Static checks on a declared stack.
//!
//! Catches undefined references, duplicate names, and cycles before the
//! descriptor set is handed to the external engine.

use std::collections::HashSet;

use stackwire_common::error::{Result, StackwireError};

use crate::resource::{Descriptor, ResourceKind};
use crate::stack::Stack;

/// Validates a stack for semantic correctness.
///
/// # Checks performed
///
/// 1. No duplicate logical names.
/// 2. No two resources of the same type share a physical name.
/// 3. Every reference resolves; container images point at a
///    `docker:RemoteImage` and attachments at a `docker:Network`.
/// 4. The dependency graph is acyclic.
///
/// # Errors
///
/// Returns an error if any check fails.
pub fn validate(stack: &Stack) -> Result<()> {
    tracing::info!(stack = %stack.name, resources = stack.resources.len(), "validating stack");
    check_duplicate_names(stack)?;
    check_duplicate_physical_names(stack)?;
    check_references(stack)?;
    let _ = stack.apply_order()?;
    Ok(())
}

fn check_duplicate_names(stack: &Stack) -> Result<()> {
    let mut seen = HashSet::new();
    for resource in &stack.resources {
        if !seen.insert(&resource.name) {
            return Err(StackwireError::Config {
                message: format!("duplicate resource name: \"{}\"", resource.name),
            });
        }
    }
    Ok(())
}

fn check_duplicate_physical_names(stack: &Stack) -> Result<()> {
    let mut seen = HashSet::new();
    for resource in &stack.resources {
        // Several logical images may pull the same reference.
        if matches!(resource.kind, ResourceKind::RemoteImage { .. }) {
            continue;
        }
        if !seen.insert((resource.kind.type_name(), resource.physical_name())) {
            return Err(StackwireError::Config {
                message: format!(
                    "{} name \"{}\" is declared twice",
                    resource.kind.type_name(),
                    resource.physical_name()
                ),
            });
        }
    }
    Ok(())
}

fn check_references(stack: &Stack) -> Result<()> {
    for resource in &stack.resources {
        for reference in resource.depends_on.iter().chain(resource.implicit_dependencies()) {
            if stack.get(reference).is_none() {
                return Err(StackwireError::NotFound {
                    kind: "resource",
                    id: format!("\"{reference}\" referenced by \"{}\"", resource.name),
                });
            }
        }
        if let ResourceKind::Container {
            image,
            networks_advanced,
            ..
        } = &resource.kind
        {
            expect_kind(stack, resource, image, "docker:RemoteImage")?;
            for attachment in networks_advanced {
                expect_kind(stack, resource, &attachment.network, "docker:Network")?;
            }
        }
    }
    Ok(())
}

fn expect_kind(
    stack: &Stack,
    resource: &Descriptor,
    reference: &stackwire_common::types::ResourceName,
    expected: &str,
) -> Result<()> {
    match stack.get(reference) {
        Some(target) if target.kind.type_name() == expected => Ok(()),
        Some(target) => Err(StackwireError::Config {
            message: format!(
                "\"{}\" expects {expected} for \"{reference}\", found {}",
                resource.name,
                target.kind.type_name()
            ),
        }),
        None => Err(StackwireError::NotFound {
            kind: "resource",
            id: format!("\"{reference}\" referenced by \"{}\"", resource.name),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ContainerBuilder, network, remote_image};
    use stackwire_common::types::{ResourceName, StackName};

    fn empty() -> Stack {
        Stack::new(StackName::new("dev").unwrap())
    }

    #[test]
    fn validate_empty_stack_succeeds() {
        assert!(validate(&empty()).is_ok());
    }

    #[test]
    fn validate_valid_stack_succeeds() {
        let mut stack = empty();
        let image = remote_image("img", "acme/img");
        let net = network("network", "services-dev");
        let container = ContainerBuilder::new("app")
            .name("app-dev")
            .image(&image)
            .network(&net)
            .build()
            .unwrap();
        stack.add(image).unwrap();
        stack.add(net).unwrap();
        stack.add(container).unwrap();
        assert!(validate(&stack).is_ok());
    }

    #[test]
    fn validate_duplicate_logical_name_fails() {
        let mut stack = empty();
        stack.resources.push(network("network", "a"));
        stack.resources.push(network("network", "b"));
        let msg = validate(&stack).unwrap_err().to_string();
        assert!(msg.contains("duplicate resource name"), "got: {msg}");
    }

    #[test]
    fn validate_duplicate_container_name_fails() {
        let mut stack = empty();
        let image = remote_image("img", "acme/img");
        for logical in ["a", "b"] {
            let c = ContainerBuilder::new(logical)
                .name("same-dev")
                .image(&image)
                .build()
                .unwrap();
            stack.add(c).unwrap();
        }
        stack.add(image).unwrap();
        let msg = validate(&stack).unwrap_err().to_string();
        assert!(msg.contains("declared twice"), "got: {msg}");
    }

    #[test]
    fn validate_shared_image_reference_succeeds() {
        let mut stack = empty();
        stack.add(remote_image("a", "acme/img")).unwrap();
        stack.add(remote_image("b", "acme/img")).unwrap();
        assert!(validate(&stack).is_ok());
    }

    #[test]
    fn validate_undefined_reference_fails() {
        let mut stack = empty();
        let ghost = remote_image("ghost", "acme/ghost");
        let c = ContainerBuilder::new("app")
            .name("app-dev")
            .image(&ghost)
            .build()
            .unwrap();
        stack.add(c).unwrap();
        let msg = validate(&stack).unwrap_err().to_string();
        assert!(msg.contains("ghost"), "got: {msg}");
    }

    #[test]
    fn validate_image_pointing_at_network_fails() {
        let mut stack = empty();
        let net = network("network", "services-dev");
        let c = ContainerBuilder::new("app")
            .name("app-dev")
            .image(&net)
            .build()
            .unwrap();
        stack.add(net).unwrap();
        stack.add(c).unwrap();
        let msg = validate(&stack).unwrap_err().to_string();
        assert!(msg.contains("expects docker:RemoteImage"), "got: {msg}");
    }

    #[test]
    fn validate_cycle_fails() {
        let mut stack = empty();
        let image = remote_image("img", "acme/img");
        let mut a = ContainerBuilder::new("a").name("a-dev").image(&image).build().unwrap();
        let mut b = ContainerBuilder::new("b").name("b-dev").image(&image).build().unwrap();
        a.depends_on.push(ResourceName::new("b"));
        b.depends_on.push(ResourceName::new("a"));
        stack.add(image).unwrap();
        stack.add(a).unwrap();
        stack.add(b).unwrap();
        let msg = validate(&stack).unwrap_err().to_string();
        assert!(msg.contains("cyclic"), "got: {msg}");
    }
}
