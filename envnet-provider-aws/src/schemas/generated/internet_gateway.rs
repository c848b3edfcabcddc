//! internet_gateway schema definition
//!
//! CloudFormation type: AWS::EC2::InternetGateway

use super::AwsSchemaConfig;
use super::tags_type;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the schema config for ec2_internet_gateway (AWS::EC2::InternetGateway)
pub fn ec2_internet_gateway_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::InternetGateway",
        resource_type_name: "ec2_internet_gateway",
        has_tags: true,
        schema: ResourceSchema::new("ec2_internet_gateway")
        .with_description("Allocates an internet gateway for use with a VPC.")
        .attribute(
            AttributeSchema::new("tags", tags_type())
                .with_description("Any tags to assign to the internet gateway.")
                .with_provider_name("Tags"),
        )
        .attribute(
            AttributeSchema::new("internet_gateway_id", AttributeType::String)
                .read_only()
                .with_provider_name("InternetGatewayId"),
        )
    }
}
