//! nat_gateway schema definition
//!
//! CloudFormation type: AWS::EC2::NatGateway

use super::AwsSchemaConfig;
use super::tags_type;
use envnet_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

/// Returns the schema config for ec2_nat_gateway (AWS::EC2::NatGateway)
pub fn ec2_nat_gateway_config() -> AwsSchemaConfig {
    AwsSchemaConfig {
        aws_type_name: "AWS::EC2::NatGateway",
        resource_type_name: "ec2_nat_gateway",
        has_tags: true,
        schema: ResourceSchema::new("ec2_nat_gateway")
        .with_description("Specifies a network address translation (NAT) gateway in the specified subnet.")
        .attribute(
            AttributeSchema::new("subnet_id", AttributeType::String)
                .required()
                .with_description("The ID of the subnet in which the NAT gateway is located.")
                .with_provider_name("SubnetId"),
        )
        .attribute(
            AttributeSchema::new("allocation_id", AttributeType::String)
                .with_description("The allocation ID of the Elastic IP address associated with the NAT gateway.")
                .with_provider_name("AllocationId"),
        )
        .attribute(
            AttributeSchema::new("connectivity_type", AttributeType::Enum(vec![
                "public".to_string(),
                "private".to_string(),
            ]))
                .with_description("Indicates whether the NAT gateway supports public or private connectivity.")
                .with_provider_name("ConnectivityType"),
        )
        .attribute(
            AttributeSchema::new("tags", tags_type())
                .with_description("The tags for the NAT gateway.")
                .with_provider_name("Tags"),
        )
        .attribute(
            AttributeSchema::new("nat_gateway_id", AttributeType::String)
                .read_only()
                .with_provider_name("NatGatewayId"),
        )
    }
}
