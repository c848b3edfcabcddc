//! vpc_cidr_block schema definition
//!
//! CloudFormation type: AWS::EC2::VPCCidrBlock

use super::AwsSchemaConfig;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

/// Returns the schema config for ec2_vpc_cidr_block (AWS::EC2::VPCCidrBlock)
pub fn ec2_vpc_cidr_block_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::VPCCidrBlock",
        resource_type_name: "ec2_vpc_cidr_block",
        has_tags: false,
        schema: ResourceSchema::new("ec2_vpc_cidr_block")
        .with_description("Associates a CIDR block with your VPC.")
        .attribute(
            AttributeSchema::new("vpc_id", AttributeType::String)
                .required()
                .with_description("The ID of the VPC.")
                .with_provider_name("VpcId"),
        )
        .attribute(
            AttributeSchema::new("cidr_block", types::cidr())
                .with_description("An IPv4 CIDR block to associate with the VPC.")
                .with_provider_name("CidrBlock"),
        )
        .attribute(
            AttributeSchema::new("ipv4_ipam_pool_id", AttributeType::String)
                .with_description("The ID of an IPv4 IPAM pool you want to use for allocating this VPC's CIDR.")
                .with_provider_name("Ipv4IpamPoolId"),
        )
        .attribute(
            AttributeSchema::new("ipv4_netmask_length", AttributeType::Int)
                .with_description("The netmask length of the IPv4 CIDR you want to allocate from an IPAM pool.")
                .with_provider_name("Ipv4NetmaskLength"),
        )
    }
}
