//! Stack validation against the CloudFormation schemas

use envnet_core::graph::{self, GraphError};
use envnet_core::stack::Stack;

use crate::schemas::get_schema_config;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("{} invalid resource attribute(s):\n{}", .0.len(), .0.join("\n"))]
    Schema(Vec<String>),
}

/// Validate every resource of a stack against its schema, then the dependency graph.
/// Schema failures are collected and reported together.
pub fn validate_stack(stack: &Stack) -> Result<(), ValidationError> {
    let mut all_errors = Vec::new();

    for resource in &stack.resources {
        let Some(config) = get_schema_config(&resource.id.resource_type) else {
            all_errors.push(format!("{}: unknown resource type", resource.id));
            continue;
        };
        if let Err(errors) = config.schema.validate(&resource.attributes) {
            for error in errors {
                all_errors.push(format!("{}: {}", resource.id, error));
            }
        }
    }

    if !all_errors.is_empty() {
        all_errors.sort();
        return Err(ValidationError::Schema(all_errors));
    }

    graph::check(&stack.resources)?;

    log::debug!(
        "Validated {} resources of stack {}",
        stack.resources.len(),
        stack.name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use envnet_core::config::DeploymentConfig;
    use envnet_core::network::{AddressLayout, EnvironmentType, RegionGroup};
    use envnet_core::resource::{Resource, Value};
    use envnet_core::stack;

    fn stack_for(env: EnvironmentType, use_nat_gateway: bool) -> Stack {
        stack::declare(&DeploymentConfig {
            use_nat_gateway,
            ..DeploymentConfig::new(env)
        })
    }

    #[test]
    fn declared_stacks_are_valid() {
        for env in EnvironmentType::ALL {
            for nat in [true, false] {
                validate_stack(&stack_for(env, nat)).unwrap();
            }
        }

        let compact = stack::declare(&DeploymentConfig {
            cidr_group: RegionGroup::Region2,
            address_layout: AddressLayout::Compact,
            ..DeploymentConfig::new(EnvironmentType::Prod)
        });
        validate_stack(&compact).unwrap();
    }

    #[test]
    fn schema_failures_are_collected() {
        let mut stack = stack_for(EnvironmentType::Dev, true);
        stack.resources.push(
            Resource::new("ec2_subnet", "broken_subnet")
                .with_attribute("cidr_block", Value::string("10.40.300.0/25"))
                .with_attribute("colour", Value::string("blue")),
        );
        stack.resources.push(Resource::new("s3_bucket", "bucket"));

        match validate_stack(&stack) {
            Err(ValidationError::Schema(errors)) => {
                assert_eq!(errors.len(), 4, "{:?}", errors);
                assert!(errors.iter().any(|e| {
                    e.contains("ec2_subnet.broken_subnet: Required attribute 'vpc_id'")
                }));
                assert!(errors.iter().any(|e| e.contains("Unknown attribute 'colour'")));
                assert!(errors.iter().any(|e| e == "s3_bucket.bucket: unknown resource type"));
            }
            other => panic!("expected schema errors, got {:?}", other),
        }
    }

    #[test]
    fn read_only_attribute_assignment_is_rejected() {
        let mut stack = stack_for(EnvironmentType::Uat, true);
        stack.resources[0]
            .attributes
            .insert("vpc_id".to_string(), Value::string("vpc-123"));
        let err = validate_stack(&stack).unwrap_err();
        assert!(err.to_string().contains("'vpc_id' is read-only"));
    }

    #[test]
    fn graph_errors_surface() {
        let mut stack = stack_for(EnvironmentType::Test, false);
        stack.resources.retain(|r| r.binding() != "internet_gateway");
        assert!(matches!(
            validate_stack(&stack),
            Err(ValidationError::Graph(GraphError::DanglingReference { .. }))
        ));
    }
}
