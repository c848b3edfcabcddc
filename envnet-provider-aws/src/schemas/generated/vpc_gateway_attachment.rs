//! vpc_gateway_attachment schema definition
//!
//! CloudFormation type: AWS::EC2::VPCGatewayAttachment

use super::AwsSchemaConfig;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the schema config for ec2_vpc_gateway_attachment (AWS::EC2::VPCGatewayAttachment)
pub fn ec2_vpc_gateway_attachment_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::VPCGatewayAttachment",
        resource_type_name: "ec2_vpc_gateway_attachment",
        has_tags: false,
        schema: ResourceSchema::new("ec2_vpc_gateway_attachment")
        .with_description("Attaches an internet gateway, or a virtual private gateway to a VPC.")
        .attribute(
            AttributeSchema::new("vpc_id", AttributeType::String)
                .required()
                .with_description("The ID of the VPC.")
                .with_provider_name("VpcId"),
        )
        .attribute(
            AttributeSchema::new("internet_gateway_id", AttributeType::String)
                .with_description("The ID of the internet gateway.")
                .with_provider_name("InternetGatewayId"),
        )
        .attribute(
            AttributeSchema::new("vpn_gateway_id", AttributeType::String)
                .with_description("The ID of the virtual private gateway.")
                .with_provider_name("VpnGatewayId"),
        )
    }
}
