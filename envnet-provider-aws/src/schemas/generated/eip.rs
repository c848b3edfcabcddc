//! eip schema definition
//!
//! CloudFormation type: AWS::EC2::EIP

use super::AwsSchemaConfig;
use super::tags_type;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the schema config for ec2_eip (AWS::EC2::EIP)
pub fn ec2_eip_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::EIP",
        resource_type_name: "ec2_eip",
        has_tags: true,
        schema: ResourceSchema::new("ec2_eip")
        .with_description("Specifies an Elastic IP (EIP) address.")
        .attribute(
            AttributeSchema::new("domain", AttributeType::Enum(vec![
                "vpc".to_string(),
                "standard".to_string(),
            ]))
                .with_description("The network (``vpc``).")
                .with_provider_name("Domain"),
        )
        .attribute(
            AttributeSchema::new("network_border_group", AttributeType::String)
                .with_description("A unique set of zones from which AWS advertises IP addresses.")
                .with_provider_name("NetworkBorderGroup"),
        )
        .attribute(
            AttributeSchema::new("tags", tags_type())
                .with_description("Any tags assigned to the Elastic IP address.")
                .with_provider_name("Tags"),
        )
        .attribute(
            AttributeSchema::new("allocation_id", AttributeType::String)
                .read_only()
                .with_provider_name("AllocationId"),
        )
        .attribute(
            AttributeSchema::new("public_ip", AttributeType::String)
                .read_only()
                .with_provider_name("PublicIp"),
        )
    }
}
