//! route_table schema definition
//!
//! CloudFormation type: AWS::EC2::RouteTable

use super::AwsSchemaConfig;
use super::tags_type;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the schema config for ec2_route_table (AWS::EC2::RouteTable)
pub fn ec2_route_table_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::RouteTable",
        resource_type_name: "ec2_route_table",
        has_tags: true,
        schema: ResourceSchema::new("ec2_route_table")
        .with_description("Specifies a route table for the specified VPC.")
        .attribute(
            AttributeSchema::new("vpc_id", AttributeType::String)
                .required()
                .with_description("The ID of the VPC.")
                .with_provider_name("VpcId"),
        )
        .attribute(
            AttributeSchema::new("tags", tags_type())
                .with_description("Any tags assigned to the route table.")
                .with_provider_name("Tags"),
        )
        .attribute(
            AttributeSchema::new("route_table_id", AttributeType::String)
                .read_only()
                .with_provider_name("RouteTableId"),
        )
    }
}
