//! CloudFormation template rendering
//!
//! Maps declared resources onto CloudFormation: binding names become
//! UpperCamelCase logical ids, attributes are renamed via the schema's
//! `provider_name`, and references become `Ref` / `Fn::GetAtt`.

use std::collections::HashMap;

use heck::ToUpperCamelCase;
use serde::Serialize;
use serde_json::json;

use envnet_core::network::{AddressLayout, EnvironmentType, RegionGroup};
use envnet_core::resource::{Resource, Value};
use envnet_core::stack::Stack;

use crate::schemas::{AwsSchemaConfig, generated};

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";
pub const MANIFEST_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Resource type {resource_type} has no attribute '{attribute}'")]
    UnknownAttribute {
        resource_type: String,
        attribute: String,
    },

    #[error("Reference to undeclared binding '{0}'")]
    UndeclaredBinding(String),
}

/// CloudFormation logical id for a binding name (e.g., "public_subnet_a" -> "PublicSubnetA")
pub fn logical_id(binding: &str) -> String {
    binding.to_upper_camel_case()
}

/// File name of a stack's template
pub fn template_file_name(stack: &Stack) -> String {
    format!("{}.template.json", stack.name)
}

/// Schema configs plus the binding -> resource type index of one stack
struct Renderer<'a> {
    configs: HashMap<&'static str, AwsSchemaConfig>,
    types_by_binding: HashMap<&'a str, &'a str>,
}

impl<'a> Renderer<'a> {
    fn new(stack: &'a Stack) -> Self {
        Self {
            configs: generated::configs()
                .into_iter()
                .map(|c| (c.resource_type_name, c))
                .collect(),
            types_by_binding: stack
                .resources
                .iter()
                .map(|r| (r.binding(), r.id.resource_type.as_str()))
                .collect(),
        }
    }

    fn config(&self, resource_type: &str) -> Result<&AwsSchemaConfig, RenderError> {
        self.configs
            .get(resource_type)
            .ok_or_else(|| RenderError::UnknownResourceType(resource_type.to_string()))
    }

    fn provider_name<'c>(
        config: &'c AwsSchemaConfig,
        attribute: &str,
    ) -> Result<&'c str, RenderError> {
        config
            .schema
            .attributes
            .get(attribute)
            .and_then(|a| a.provider_name.as_deref())
            .ok_or_else(|| RenderError::UnknownAttribute {
                resource_type: config.resource_type_name.to_string(),
                attribute: attribute.to_string(),
            })
    }

    fn resource(&self, resource: &Resource) -> Result<serde_json::Value, RenderError> {
        let config = self.config(&resource.id.resource_type)?;

        let mut properties = serde_json::Map::new();
        for (name, value) in &resource.attributes {
            let aws_name = Self::provider_name(config, name)?;
            let aws_value = if name == "tags" && config.has_tags {
                json!(build_tags(value))
            } else {
                self.value(value)?
            };
            properties.insert(aws_name.to_string(), aws_value);
        }

        let mut rendered = serde_json::Map::new();
        rendered.insert("Type".to_string(), json!(config.aws_type_name));
        rendered.insert("Properties".to_string(), serde_json::Value::Object(properties));

        if !resource.depends_on.is_empty() {
            let mut depends_on = Vec::new();
            for binding in &resource.depends_on {
                if !self.types_by_binding.contains_key(binding.as_str()) {
                    return Err(RenderError::UndeclaredBinding(binding.clone()));
                }
                depends_on.push(logical_id(binding));
            }
            rendered.insert("DependsOn".to_string(), json!(depends_on));
        }

        Ok(serde_json::Value::Object(rendered))
    }

    fn value(&self, value: &Value) -> Result<serde_json::Value, RenderError> {
        Ok(match value {
            Value::String(s) => json!(s),
            Value::Bool(b) => json!(b),
            Value::Int(i) => json!(i),
            Value::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|v| self.value(v))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(map) => {
                let mut object = serde_json::Map::new();
                for (k, v) in map {
                    object.insert(k.clone(), self.value(v)?);
                }
                serde_json::Value::Object(object)
            }
            Value::ResourceRef(binding, attribute) => self.reference(binding, attribute)?,
        })
    }

    /// `id` renders as `Ref`; anything else as `Fn::GetAtt` on the provider name
    fn reference(&self, binding: &str, attribute: &str) -> Result<serde_json::Value, RenderError> {
        let resource_type = self
            .types_by_binding
            .get(binding)
            .ok_or_else(|| RenderError::UndeclaredBinding(binding.to_string()))?;

        if attribute == "id" {
            return Ok(json!({ "Ref": logical_id(binding) }));
        }

        let config = self.config(resource_type)?;
        let aws_name = Self::provider_name(config, attribute)?;
        Ok(json!({ "Fn::GetAtt": [logical_id(binding), aws_name] }))
    }
}

/// Build a CloudFormation tag list, sorted by key
fn build_tags(user_tags: &Value) -> Vec<serde_json::Value> {
    let mut tags = Vec::new();
    if let Value::Map(user_tags) = user_tags {
        let mut keys: Vec<&String> = user_tags.keys().collect();
        keys.sort();
        for key in keys {
            if let Some(Value::String(v)) = user_tags.get(key) {
                tags.push(json!({"Key": key, "Value": v}));
            }
        }
    }
    tags
}

/// Render a stack as a CloudFormation template
pub fn render_template(stack: &Stack) -> Result<serde_json::Value, RenderError> {
    let renderer = Renderer::new(stack);

    let mut resources = serde_json::Map::new();
    for resource in &stack.resources {
        resources.insert(logical_id(resource.binding()), renderer.resource(resource)?);
    }

    let mut outputs = serde_json::Map::new();
    for output in &stack.outputs {
        outputs.insert(
            output.name.clone(),
            json!({
                "Description": output.description,
                "Value": renderer.value(&output.value)?,
                "Export": { "Name": format!("{}-{}", stack.name, output.name) },
            }),
        );
    }

    log::debug!(
        "Rendered {} resources and {} outputs for stack {}",
        resources.len(),
        outputs.len(),
        stack.name
    );

    Ok(json!({
        "AWSTemplateFormatVersion": TEMPLATE_FORMAT_VERSION,
        "Description": stack.description,
        "Resources": resources,
        "Outputs": outputs,
    }))
}

/// Deployment manifest handed to the provisioning engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub stack_name: String,
    pub account: String,
    pub region: String,
    pub template_file: String,
    pub environment: ManifestEnvironment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEnvironment {
    pub env_type: EnvironmentType,
    pub cidr_group: RegionGroup,
    pub address_layout: AddressLayout,
    pub use_nat_gateway: bool,
    pub vpc_cidr_block: String,
}

pub fn render_manifest(stack: &Stack) -> Manifest {
    Manifest {
        version: MANIFEST_VERSION.to_string(),
        stack_name: stack.name.clone(),
        account: stack.config.account_id.clone(),
        region: stack.config.deploy_region.clone(),
        template_file: template_file_name(stack),
        environment: ManifestEnvironment {
            env_type: stack.config.env_type,
            cidr_group: stack.config.cidr_group,
            address_layout: stack.config.address_layout,
            use_nat_gateway: stack.config.use_nat_gateway,
            vpc_cidr_block: stack.network.primary_block.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envnet_core::config::DeploymentConfig;
    use envnet_core::stack;

    fn stack_for(env: EnvironmentType, use_nat_gateway: bool) -> Stack {
        stack::declare(&DeploymentConfig {
            use_nat_gateway,
            ..DeploymentConfig::new(env)
        })
    }

    fn collect_refs(value: &serde_json::Value, refs: &mut Vec<String>) {
        match value {
            serde_json::Value::Object(map) => {
                if let Some(serde_json::Value::String(target)) = map.get("Ref") {
                    refs.push(target.clone());
                }
                if let Some(serde_json::Value::Array(parts)) = map.get("Fn::GetAtt")
                    && let Some(serde_json::Value::String(target)) = parts.first()
                {
                    refs.push(target.clone());
                }
                for v in map.values() {
                    collect_refs(v, refs);
                }
            }
            serde_json::Value::Array(items) => {
                for v in items {
                    collect_refs(v, refs);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn logical_ids_are_upper_camel_case() {
        assert_eq!(logical_id("vpc"), "Vpc");
        assert_eq!(logical_id("public_subnet_a"), "PublicSubnetA");
        assert_eq!(logical_id("igw_attachment"), "IgwAttachment");
    }

    #[test]
    fn renders_prod_template() {
        let template = render_template(&stack_for(EnvironmentType::Prod, true)).unwrap();
        assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");

        let vpc = &template["Resources"]["Vpc"];
        assert_eq!(vpc["Type"], "AWS::EC2::VPC");
        assert_eq!(vpc["Properties"]["CidrBlock"], "10.10.0.0/16");
        assert_eq!(vpc["Properties"]["EnableDnsSupport"], true);

        let subnet = &template["Resources"]["PublicSubnetA"];
        assert_eq!(subnet["Type"], "AWS::EC2::Subnet");
        assert_eq!(subnet["Properties"]["VpcId"], json!({"Ref": "Vpc"}));
        assert_eq!(subnet["Properties"]["CidrBlock"], "10.10.60.0/25");
        assert_eq!(subnet["Properties"]["AvailabilityZone"], "us-east-1a");
        assert_eq!(subnet["Properties"]["MapPublicIpOnLaunch"], true);

        let nat = &template["Resources"]["NatGateway"];
        assert_eq!(
            nat["Properties"]["AllocationId"],
            json!({"Fn::GetAtt": ["NatEip", "AllocationId"]})
        );
        assert_eq!(nat["Properties"]["SubnetId"], json!({"Ref": "PublicSubnetA"}));

        let route = &template["Resources"]["PublicDefaultRoute"];
        assert_eq!(route["DependsOn"], json!(["IgwAttachment"]));
        assert_eq!(route["Properties"]["GatewayId"], json!({"Ref": "InternetGateway"}));
        assert_eq!(template["Resources"]["NatEip"]["Properties"]["Domain"], "vpc");

        assert_eq!(
            template["Outputs"]["VpcCidrBlock"]["Value"],
            json!({"Fn::GetAtt": ["Vpc", "CidrBlock"]})
        );
        assert_eq!(
            template["Outputs"]["NatGatewayId"]["Export"]["Name"],
            "EnvVpcStack-NatGatewayId"
        );
    }

    #[test]
    fn tags_render_as_sorted_key_value_list() {
        let template = render_template(&stack_for(EnvironmentType::Dev, true)).unwrap();
        assert_eq!(
            template["Resources"]["PrivateSubnetB"]["Properties"]["Tags"],
            json!([
                {"Key": "CidrGroup", "Value": "region1"},
                {"Key": "Environment", "Value": "dev"},
                {"Key": "Name", "Value": "dev-private-subnet-b"},
            ])
        );
        assert!(template["Resources"]["IgwAttachment"]["Properties"].get("Tags").is_none());
    }

    #[test]
    fn every_reference_targets_a_declared_logical_id() {
        for env in EnvironmentType::ALL {
            for nat in [true, false] {
                let template = render_template(&stack_for(env, nat)).unwrap();
                let resources = template["Resources"].as_object().unwrap();
                let mut refs = Vec::new();
                collect_refs(&template, &mut refs);
                for target in refs {
                    assert!(resources.contains_key(&target), "{} not declared", target);
                }
                for resource in resources.values() {
                    let aws_type = resource["Type"].as_str().unwrap();
                    assert!(generated::configs().iter().any(|c| c.aws_type_name == aws_type));
                }
            }
        }
    }

    #[test]
    fn without_nat_no_nat_resources_are_rendered() {
        let template = render_template(&stack_for(EnvironmentType::Shared, false)).unwrap();
        let resources = template["Resources"].as_object().unwrap();
        assert!(!resources.contains_key("NatGateway"));
        assert!(!resources.contains_key("NatEip"));
        assert!(!resources.contains_key("PrivateDefaultRoute"));
        assert!(template["Outputs"].get("NatGatewayId").is_none());
        assert_eq!(resources.len(), 14);
    }

    #[test]
    fn unknown_type_and_attribute_are_errors() {
        let mut stack = stack_for(EnvironmentType::Dev, true);
        stack.resources.push(Resource::new("s3_bucket", "bucket"));
        assert_eq!(
            render_template(&stack),
            Err(RenderError::UnknownResourceType("s3_bucket".to_string()))
        );

        let mut stack = stack_for(EnvironmentType::Dev, true);
        stack.outputs[0].value = Value::attribute("vpc", "colour");
        assert_eq!(
            render_template(&stack),
            Err(RenderError::UnknownAttribute {
                resource_type: "ec2_vpc".to_string(),
                attribute: "colour".to_string(),
            })
        );
    }

    #[test]
    fn manifest_names_template_and_target() {
        let mut config = DeploymentConfig::new(EnvironmentType::Uat);
        config.account_id = "123456789012".to_string();
        config.deploy_region = "eu-west-1".to_string();
        config.stack_name = "UatNetwork".to_string();
        let manifest = render_manifest(&stack::declare(&config));

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["stackName"], "UatNetwork");
        assert_eq!(json["account"], "123456789012");
        assert_eq!(json["region"], "eu-west-1");
        assert_eq!(json["templateFile"], "UatNetwork.template.json");
        assert_eq!(json["environment"]["envType"], "uat");
        assert_eq!(json["environment"]["cidrGroup"], "region1");
        assert_eq!(json["environment"]["addressLayout"], "wide");
        assert_eq!(json["environment"]["useNatGateway"], true);
        assert_eq!(json["environment"]["vpcCidrBlock"], "10.20.0.0/16");
    }
}
