//! route schema definition
//!
//! CloudFormation type: AWS::EC2::Route

use super::AwsSchemaConfig;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

/// Returns the schema config for ec2_route (AWS::EC2::Route)
pub fn ec2_route_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::Route",
        resource_type_name: "ec2_route",
        has_tags: false,
        schema: ResourceSchema::new("ec2_route")
        .with_description("Specifies a route in a route table.")
        .attribute(
            AttributeSchema::new("route_table_id", AttributeType::String)
                .required()
                .with_description("The ID of the route table for the route.")
                .with_provider_name("RouteTableId"),
        )
        .attribute(
            AttributeSchema::new("destination_cidr_block", types::cidr())
                .with_description("The IPv4 CIDR address block used for the destination match.")
                .with_provider_name("DestinationCidrBlock"),
        )
        .attribute(
            AttributeSchema::new("gateway_id", AttributeType::String)
                .with_description("The ID of an internet gateway or virtual private gateway attached to your VPC.")
                .with_provider_name("GatewayId"),
        )
        .attribute(
            AttributeSchema::new("nat_gateway_id", AttributeType::String)
                .with_description("The ID of a NAT gateway.")
                .with_provider_name("NatGatewayId"),
        )
        .attribute(
            AttributeSchema::new("transit_gateway_id", AttributeType::String)
                .with_description("The ID of a transit gateway.")
                .with_provider_name("TransitGatewayId"),
        )
        .attribute(
            AttributeSchema::new("vpc_peering_connection_id", AttributeType::String)
                .with_description("The ID of a VPC peering connection.")
                .with_provider_name("VpcPeeringConnectionId"),
        )
        .attribute(
            AttributeSchema::new("cidr_block", types::cidr())
                .read_only()
                .with_provider_name("CidrBlock"),
        )
    }
}
