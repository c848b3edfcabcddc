//! subnet_route_table_association schema definition
//!
//! CloudFormation type: AWS::EC2::SubnetRouteTableAssociation

use super::AwsSchemaConfig;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the schema config for ec2_subnet_route_table_association (AWS::EC2::SubnetRouteTableAssociation)
pub fn ec2_subnet_route_table_association_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::SubnetRouteTableAssociation",
        resource_type_name: "ec2_subnet_route_table_association",
        has_tags: false,
        schema: ResourceSchema::new("ec2_subnet_route_table_association")
        .with_description("Associates a subnet with a route table.")
        .attribute(
            AttributeSchema::new("route_table_id", AttributeType::String)
                .required()
                .with_description("The ID of the route table.")
                .with_provider_name("RouteTableId"),
        )
        .attribute(
            AttributeSchema::new("subnet_id", AttributeType::String)
                .required()
                .with_description("The ID of the subnet.")
                .with_provider_name("SubnetId"),
        )
    }
}
