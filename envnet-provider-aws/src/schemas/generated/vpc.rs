//! vpc schema definition
//!
//! CloudFormation type: AWS::EC2::VPC

use super::AwsSchemaConfig;
use super::tags_type;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

/// Returns the schema config for ec2_vpc (AWS::EC2::VPC)
pub fn ec2_vpc_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::VPC",
        resource_type_name: "ec2_vpc",
        has_tags: true,
        schema: ResourceSchema::new("ec2_vpc")
        .with_description("Specifies a virtual private cloud (VPC).")
        .attribute(
            AttributeSchema::new("cidr_block", types::cidr())
                .required()
                .with_description("The IPv4 network range for the VPC, in CIDR notation.")
                .with_provider_name("CidrBlock"),
        )
        .attribute(
            AttributeSchema::new("enable_dns_hostnames", AttributeType::Bool)
                .with_description("Indicates whether the instances launched in the VPC get DNS hostnames.")
                .with_provider_name("EnableDnsHostnames"),
        )
        .attribute(
            AttributeSchema::new("enable_dns_support", AttributeType::Bool)
                .with_description("Indicates whether DNS resolution is supported for the VPC.")
                .with_provider_name("EnableDnsSupport"),
        )
        .attribute(
            AttributeSchema::new("instance_tenancy", AttributeType::Enum(vec![
                "default".to_string(),
                "dedicated".to_string(),
                "host".to_string(),
            ]))
                .with_description("The allowed tenancy of instances launched into the VPC.")
                .with_provider_name("InstanceTenancy"),
        )
        .attribute(
            AttributeSchema::new("tags", tags_type())
                .with_description("The tags for the VPC.")
                .with_provider_name("Tags"),
        )
        .attribute(
            AttributeSchema::new("vpc_id", AttributeType::String)
                .read_only()
                .with_provider_name("VpcId"),
        )
        .attribute(
            AttributeSchema::new("default_security_group", AttributeType::String)
                .read_only()
                .with_provider_name("DefaultSecurityGroup"),
        )
        .attribute(
            AttributeSchema::new("default_network_acl", AttributeType::String)
                .read_only()
                .with_provider_name("DefaultNetworkAcl"),
        )
    }
}
