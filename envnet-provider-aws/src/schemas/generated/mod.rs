//! CloudFormation resource schemas
//!
//! Trimmed to the properties envnet declares or references. Attribute names
//! are snake_case; `provider_name` carries the CloudFormation property name.

use envnet_core::schema::{AttributeType, ResourceSchema};

/// CloudFormation schema configuration
///
/// Combines the ResourceSchema with the CloudFormation metadata the
/// template renderer needs.
pub struct AwsSchemaConfig {
    /// CloudFormation type name (e.g., "AWS::EC2::VPC")
    pub aws_type_name: &'static str,
    /// envnet resource type name (e.g., "ec2_vpc")
    pub resource_type_name: &'static str,
    /// Whether this resource type uses tags
    pub has_tags: bool,
    /// The resource schema with attribute definitions
    pub schema: ResourceSchema,
}

/// Tags type for AWS resources (map form; rendered as a Key/Value list)
pub fn tags_type() -> AttributeType {
    AttributeType::Map(Box::new(AttributeType::String))
}

pub mod eip;
pub mod internet_gateway;
pub mod nat_gateway;
pub mod route;
pub mod route_table;
pub mod subnet;
pub mod subnet_route_table_association;
pub mod vpc;
pub mod vpc_cidr_block;
pub mod vpc_gateway_attachment;

/// Returns all schema configs
pub fn configs() -> Vec<AwsSchemaConfig> {
    vec![
        vpc::ec2_vpc_config(),
        vpc_cidr_block::ec2_vpc_cidr_block_config(),
        subnet::ec2_subnet_config(),
        internet_gateway::ec2_internet_gateway_config(),
        vpc_gateway_attachment::ec2_vpc_gateway_attachment_config(),
        route_table::ec2_route_table_config(),
        route::ec2_route_config(),
        subnet_route_table_association::ec2_subnet_route_table_association_config(),
        eip::ec2_eip_config(),
        nat_gateway::ec2_nat_gateway_config(),
    ]
}
