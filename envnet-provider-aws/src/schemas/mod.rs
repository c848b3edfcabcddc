//! CloudFormation resource schema definitions

pub mod generated;

pub use generated::AwsSchemaConfig;

use envnet_core::schema::ResourceSchema;

/// Look up the schema config for an envnet resource type (e.g., "ec2_vpc")
pub fn get_schema_config(resource_type: &str) -> Option<AwsSchemaConfig> {
    generated::configs()
        .into_iter()
        .find(|c| c.resource_type_name == resource_type)
}

/// Returns all schemas
pub fn all_schemas() -> Vec<ResourceSchema> {
    generated::configs().into_iter().map(|c| c.schema).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use envnet_core::stack::resource_types;

    #[test]
    fn every_declared_type_has_a_schema() {
        for resource_type in [
            resource_types::VPC,
            resource_types::VPC_CIDR_BLOCK,
            resource_types::SUBNET,
            resource_types::INTERNET_GATEWAY,
            resource_types::VPC_GATEWAY_ATTACHMENT,
            resource_types::ROUTE_TABLE,
            resource_types::ROUTE,
            resource_types::SUBNET_ROUTE_TABLE_ASSOCIATION,
            resource_types::EIP,
            resource_types::NAT_GATEWAY,
        ] {
            let config = get_schema_config(resource_type)
                .unwrap_or_else(|| panic!("no schema for {}", resource_type));
            assert_eq!(config.schema.resource_type, resource_type);
            assert!(config.aws_type_name.starts_with("AWS::EC2::"));
        }
        assert!(get_schema_config("s3_bucket").is_none());
    }

    #[test]
    fn every_attribute_has_provider_name() {
        for schema in all_schemas() {
            for (name, attr) in &schema.attributes {
                assert!(
                    attr.provider_name.is_some(),
                    "{}.{} has no provider name",
                    schema.resource_type,
                    name
                );
            }
        }
    }

    #[test]
    fn tags_flag_matches_schema() {
        for config in generated::configs() {
            assert_eq!(
                config.has_tags,
                config.schema.attributes.contains_key("tags"),
                "{}",
                config.aws_type_name
            );
        }
    }
}
