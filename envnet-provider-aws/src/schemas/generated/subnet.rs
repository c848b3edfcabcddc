//! subnet schema definition
//!
//! CloudFormation type: AWS::EC2::Subnet

use super::AwsSchemaConfig;
use super::tags_type;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

/// Returns the schema config for ec2_subnet (AWS::EC2::Subnet)
pub fn ec2_subnet_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::Subnet",
        resource_type_name: "ec2_subnet",
        has_tags: true,
        schema: ResourceSchema::new("ec2_subnet")
        .with_description("Specifies a subnet for the specified VPC.")
        .attribute(
            AttributeSchema::new("vpc_id", AttributeType::String)
                .required()
                .with_description("The ID of the VPC the subnet is in.")
                .with_provider_name("VpcId"),
        )
        .attribute(
            AttributeSchema::new("cidr_block", types::cidr())
                .required()
                .with_description("The IPv4 CIDR block assigned to the subnet.")
                .with_provider_name("CidrBlock"),
        )
        .attribute(
            AttributeSchema::new("availability_zone", types::availability_zone())
                .with_description("The Availability Zone of the subnet.")
                .with_provider_name("AvailabilityZone"),
        )
        .attribute(
            AttributeSchema::new("map_public_ip_on_launch", AttributeType::Bool)
                .with_description("Indicates whether instances launched in this subnet receive a public IPv4 address.")
                .with_provider_name("MapPublicIpOnLaunch"),
        )
        .attribute(
            AttributeSchema::new("tags", tags_type())
                .with_description("Any tags assigned to the subnet.")
                .with_provider_name("Tags"),
        )
        .attribute(
            AttributeSchema::new("subnet_id", AttributeType::String)
                .read_only()
                .with_provider_name("SubnetId"),
        )
        .attribute(
            AttributeSchema::new("network_acl_association_id", AttributeType::String)
                .read_only()
                .with_provider_name("NetworkAclAssociationId"),
        )
    }
}
