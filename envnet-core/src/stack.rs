//! Stack - The declared resource graph of one environment VPC
//!
//! [`declare`] maps a [`DeploymentConfig`] and its [`NetworkPlan`] onto
//! resource declarations. Nothing here talks to a provider; rendering and
//! deployment happen downstream.

use heck::ToUpperCamelCase;

use crate::config::DeploymentConfig;
use crate::network::{NetworkPlan, SubnetPlan, SubnetTier, Zone};
use crate::resource::{Resource, Value};

/// Resource type names
pub mod resource_types {
    pub const VPC: &str = "ec2_vpc";
    pub const VPC_CIDR_BLOCK: &str = "ec2_vpc_cidr_block";
    pub const SUBNET: &str = "ec2_subnet";
    pub const INTERNET_GATEWAY: &str = "ec2_internet_gateway";
    pub const VPC_GATEWAY_ATTACHMENT: &str = "ec2_vpc_gateway_attachment";
    pub const ROUTE_TABLE: &str = "ec2_route_table";
    pub const ROUTE: &str = "ec2_route";
    pub const SUBNET_ROUTE_TABLE_ASSOCIATION: &str = "ec2_subnet_route_table_association";
    pub const EIP: &str = "ec2_eip";
    pub const NAT_GATEWAY: &str = "ec2_nat_gateway";
}

/// Fixed binding names
pub mod bindings {
    pub const VPC: &str = "vpc";
    pub const ADDITIONAL_CIDR: &str = "vpc_additional_cidr";
    pub const INTERNET_GATEWAY: &str = "internet_gateway";
    pub const IGW_ATTACHMENT: &str = "igw_attachment";
    pub const PUBLIC_ROUTE_TABLE: &str = "public_route_table";
    pub const PUBLIC_DEFAULT_ROUTE: &str = "public_default_route";
    pub const PRIVATE_ROUTE_TABLE: &str = "private_route_table";
    pub const PRIVATE_DEFAULT_ROUTE: &str = "private_default_route";
    pub const NAT_EIP: &str = "nat_eip";
    pub const NAT_GATEWAY: &str = "nat_gateway";
}

const ANY_IPV4: &str = "0.0.0.0/0";

/// A stack output exported to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: String,
    pub description: String,
    pub value: Value,
}

/// Declared resources plus the inputs they were derived from
#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub description: String,
    pub config: DeploymentConfig,
    pub network: NetworkPlan,
    pub resources: Vec<Resource>,
    pub outputs: Vec<Output>,
}

impl Stack {
    pub fn resource(&self, binding: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.binding() == binding)
    }

    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources
            .iter()
            .filter(move |r| r.id.resource_type == resource_type)
    }

    pub fn has_nat_gateway(&self) -> bool {
        self.resource(bindings::NAT_GATEWAY).is_some()
    }
}

/// Declare the stack for a config, resolving its network plan first
pub fn declare(config: &DeploymentConfig) -> Stack {
    declare_with_plan(config, config.network_plan())
}

pub fn declare_with_plan(config: &DeploymentConfig, network: NetworkPlan) -> Stack {
    let mut resources = Vec::new();
    let tags = TagSet::new(config);

    resources.push(
        tags.apply(Resource::new(resource_types::VPC, bindings::VPC), "vpc")
            .with_attribute("cidr_block", Value::string(network.primary_block.to_string()))
            .with_attribute("enable_dns_support", Value::Bool(true))
            .with_attribute("enable_dns_hostnames", Value::Bool(true)),
    );

    let additional_association = network.has_distinct_additional_block();
    if additional_association {
        resources.push(
            Resource::new(resource_types::VPC_CIDR_BLOCK, bindings::ADDITIONAL_CIDR)
                .with_attribute("vpc_id", Value::reference(bindings::VPC))
                .with_attribute(
                    "cidr_block",
                    Value::string(network.additional_block.to_string()),
                ),
        );
    } else {
        log::debug!(
            "Additional block {} equals the primary block; skipping association",
            network.additional_block
        );
    }

    resources.push(tags.apply(
        Resource::new(resource_types::INTERNET_GATEWAY, bindings::INTERNET_GATEWAY),
        "igw",
    ));
    resources.push(
        Resource::new(resource_types::VPC_GATEWAY_ATTACHMENT, bindings::IGW_ATTACHMENT)
            .with_attribute("vpc_id", Value::reference(bindings::VPC))
            .with_attribute(
                "internet_gateway_id",
                Value::reference(bindings::INTERNET_GATEWAY),
            ),
    );

    for subnet in &network.subnets {
        let mut resource = subnet_resource(config, subnet, &tags);
        if subnet.tier == SubnetTier::Private && additional_association {
            resource = resource.with_dependency(bindings::ADDITIONAL_CIDR);
        }
        resources.push(resource);
    }

    // Public tier
    resources.push(route_table(bindings::PUBLIC_ROUTE_TABLE, "public-rt", &tags));
    resources.push(
        default_route(bindings::PUBLIC_DEFAULT_ROUTE, bindings::PUBLIC_ROUTE_TABLE)
            .with_attribute("gateway_id", Value::reference(bindings::INTERNET_GATEWAY))
            .with_dependency(bindings::IGW_ATTACHMENT),
    );
    for subnet in network.subnets_in(SubnetTier::Public) {
        resources.push(association(subnet, bindings::PUBLIC_ROUTE_TABLE));
    }

    // NAT gateway lives in public subnet A
    if config.use_nat_gateway {
        let anchor = network.subnet(SubnetTier::Public, Zone::A);
        resources.push(
            tags.apply(Resource::new(resource_types::EIP, bindings::NAT_EIP), "nat-eip")
                .with_attribute("domain", Value::string("vpc"))
                .with_dependency(bindings::IGW_ATTACHMENT),
        );
        resources.push(
            tags.apply(
                Resource::new(resource_types::NAT_GATEWAY, bindings::NAT_GATEWAY),
                "nat-gateway",
            )
            .with_attribute("subnet_id", Value::reference(anchor.binding()))
            .with_attribute(
                "allocation_id",
                Value::attribute(bindings::NAT_EIP, "allocation_id"),
            ),
        );
    }

    // Private tier
    resources.push(route_table(
        bindings::PRIVATE_ROUTE_TABLE,
        "private-rt",
        &tags,
    ));
    if config.use_nat_gateway {
        resources.push(
            default_route(bindings::PRIVATE_DEFAULT_ROUTE, bindings::PRIVATE_ROUTE_TABLE)
                .with_attribute("nat_gateway_id", Value::reference(bindings::NAT_GATEWAY)),
        );
    } else {
        log::info!("NAT gateway disabled; private subnets get no default route");
    }
    for subnet in network.subnets_in(SubnetTier::Private) {
        resources.push(association(subnet, bindings::PRIVATE_ROUTE_TABLE));
    }

    let outputs = outputs(&network, config.use_nat_gateway);

    log::debug!(
        "Declared {} resources and {} outputs for stack {}",
        resources.len(),
        outputs.len(),
        config.stack_name
    );

    Stack {
        name: config.stack_name.clone(),
        description: format!(
            "{} VPC for {} ({} layout, NAT gateway {})",
            config.env_type,
            config.cidr_group,
            config.address_layout,
            if config.use_nat_gateway {
                "enabled"
            } else {
                "disabled"
            }
        ),
        config: config.clone(),
        network,
        resources,
        outputs,
    }
}

/// Tags shared by every taggable resource of one stack
struct TagSet<'a> {
    config: &'a DeploymentConfig,
}

impl<'a> TagSet<'a> {
    fn new(config: &'a DeploymentConfig) -> Self {
        Self { config }
    }

    /// Tag a resource with `Name = {env}-{role}` plus the environment tags
    fn apply(&self, resource: Resource, role: &str) -> Resource {
        resource
            .with_tag("Name", format!("{}-{}", self.config.env_type, role))
            .with_tag("Environment", self.config.env_type.as_str())
            .with_tag("CidrGroup", self.config.cidr_group.as_str())
    }
}

fn subnet_resource(config: &DeploymentConfig, subnet: &SubnetPlan, tags: &TagSet) -> Resource {
    tags.apply(
        Resource::new(resource_types::SUBNET, subnet.binding()),
        &subnet.role(),
    )
    .with_attribute("vpc_id", Value::reference(bindings::VPC))
    .with_attribute("cidr_block", Value::string(subnet.cidr.to_string()))
    .with_attribute(
        "availability_zone",
        Value::string(config.availability_zone(subnet.zone)),
    )
    .with_attribute(
        "map_public_ip_on_launch",
        Value::Bool(subnet.tier == SubnetTier::Public),
    )
}

fn route_table(binding: &str, role: &str, tags: &TagSet) -> Resource {
    tags.apply(Resource::new(resource_types::ROUTE_TABLE, binding), role)
        .with_attribute("vpc_id", Value::reference(bindings::VPC))
}

fn default_route(binding: &str, route_table: &str) -> Resource {
    Resource::new(resource_types::ROUTE, binding)
        .with_attribute("route_table_id", Value::reference(route_table))
        .with_attribute("destination_cidr_block", Value::string(ANY_IPV4))
}

fn association(subnet: &SubnetPlan, route_table: &str) -> Resource {
    Resource::new(
        resource_types::SUBNET_ROUTE_TABLE_ASSOCIATION,
        format!("{}_route_table_association", subnet.binding()),
    )
    .with_attribute("subnet_id", Value::reference(subnet.binding()))
    .with_attribute("route_table_id", Value::reference(route_table))
}

fn outputs(network: &NetworkPlan, use_nat_gateway: bool) -> Vec<Output> {
    let mut outputs = vec![
        Output {
            name: "VpcId".to_string(),
            description: "ID of the VPC".to_string(),
            value: Value::reference(bindings::VPC),
        },
        Output {
            name: "VpcCidrBlock".to_string(),
            description: "Primary CIDR block of the VPC".to_string(),
            value: Value::attribute(bindings::VPC, "cidr_block"),
        },
    ];
    for subnet in &network.subnets {
        outputs.push(Output {
            name: format!("{}Id", subnet.binding().to_upper_camel_case()),
            description: format!("ID of {} ({})", subnet.role(), subnet.cidr),
            value: Value::reference(subnet.binding()),
        });
    }
    if use_nat_gateway {
        outputs.push(Output {
            name: "NatGatewayId".to_string(),
            description: "ID of the NAT gateway".to_string(),
            value: Value::reference(bindings::NAT_GATEWAY),
        });
    }
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{AddressLayout, EnvironmentType, RegionGroup};

    fn config(env_type: EnvironmentType, use_nat_gateway: bool) -> DeploymentConfig {
        DeploymentConfig {
            use_nat_gateway,
            ..DeploymentConfig::new(env_type)
        }
    }

    #[test]
    fn declares_full_graph_with_nat() {
        let stack = declare(&config(EnvironmentType::Prod, true));

        assert_eq!(stack.resources_of_type(resource_types::VPC).count(), 1);
        assert_eq!(stack.resources_of_type(resource_types::SUBNET).count(), 4);
        assert_eq!(stack.resources_of_type(resource_types::INTERNET_GATEWAY).count(), 1);
        assert_eq!(stack.resources_of_type(resource_types::ROUTE_TABLE).count(), 2);
        assert_eq!(stack.resources_of_type(resource_types::ROUTE).count(), 2);
        assert_eq!(
            stack
                .resources_of_type(resource_types::SUBNET_ROUTE_TABLE_ASSOCIATION)
                .count(),
            4
        );
        assert_eq!(stack.resources_of_type(resource_types::NAT_GATEWAY).count(), 1);
        assert_eq!(stack.resources_of_type(resource_types::EIP).count(), 1);
        assert!(stack.has_nat_gateway());

        let vpc = stack.resource(bindings::VPC).unwrap();
        assert_eq!(vpc.get("cidr_block"), Some(&Value::string("10.10.0.0/16")));
    }

    #[test]
    fn without_nat_private_routes_have_no_default() {
        let stack = declare(&config(EnvironmentType::Dev, false));

        assert!(!stack.has_nat_gateway());
        assert!(stack.resource(bindings::NAT_EIP).is_none());
        assert!(stack.resource(bindings::PRIVATE_DEFAULT_ROUTE).is_none());
        assert!(stack.resource(bindings::PRIVATE_ROUTE_TABLE).is_some());
        assert_eq!(stack.resources_of_type(resource_types::ROUTE).count(), 1);

        let routes_to_private_table = stack
            .resources_of_type(resource_types::ROUTE)
            .filter(|r| {
                r.get("route_table_id") == Some(&Value::reference(bindings::PRIVATE_ROUTE_TABLE))
            })
            .count();
        assert_eq!(routes_to_private_table, 0);
        assert!(!stack.outputs.iter().any(|o| o.name == "NatGatewayId"));
    }

    #[test]
    fn nat_gateway_is_anchored_in_public_subnet_a() {
        let stack = declare(&config(EnvironmentType::Uat, true));
        let nat = stack.resource(bindings::NAT_GATEWAY).unwrap();
        assert_eq!(nat.get("subnet_id"), Some(&Value::reference("public_subnet_a")));
        assert_eq!(
            nat.get("allocation_id"),
            Some(&Value::attribute(bindings::NAT_EIP, "allocation_id"))
        );

        let route = stack.resource(bindings::PRIVATE_DEFAULT_ROUTE).unwrap();
        assert_eq!(route.get("nat_gateway_id"), Some(&Value::reference(bindings::NAT_GATEWAY)));
        assert_eq!(route.get("destination_cidr_block"), Some(&Value::string("0.0.0.0/0")));
    }

    #[test]
    fn subnets_get_zone_and_public_ip_settings() {
        let mut cfg = config(EnvironmentType::Test, true);
        cfg.deploy_region = "eu-west-1".to_string();
        let stack = declare(&cfg);

        let public_b = stack.resource("public_subnet_b").unwrap();
        assert_eq!(public_b.get("availability_zone"), Some(&Value::string("eu-west-1b")));
        assert_eq!(public_b.get("map_public_ip_on_launch"), Some(&Value::Bool(true)));
        assert_eq!(public_b.get("cidr_block"), Some(&Value::string("10.30.60.128/25")));

        let private_a = stack.resource("private_subnet_a").unwrap();
        assert_eq!(private_a.get("availability_zone"), Some(&Value::string("eu-west-1a")));
        assert_eq!(private_a.get("map_public_ip_on_launch"), Some(&Value::Bool(false)));
        assert_eq!(private_a.get("cidr_block"), Some(&Value::string("10.30.70.0/25")));
    }

    #[test]
    fn name_tags_follow_env_and_role() {
        let stack = declare(&config(EnvironmentType::Prod, true));
        assert_eq!(
            stack.resource("public_subnet_a").unwrap().tag("Name"),
            Some("prod-public-subnet-a")
        );
        assert_eq!(stack.resource(bindings::VPC).unwrap().tag("Name"), Some("prod-vpc"));
        assert_eq!(
            stack.resource(bindings::NAT_GATEWAY).unwrap().tag("Name"),
            Some("prod-nat-gateway")
        );
        assert_eq!(stack.resource(bindings::VPC).unwrap().tag("CidrGroup"), Some("region1"));
        // Attachments, routes and associations are not taggable
        assert!(stack.resource(bindings::IGW_ATTACHMENT).unwrap().get("tags").is_none());
    }

    #[test]
    fn additional_cidr_only_declared_when_distinct() {
        let wide = declare(&config(EnvironmentType::Shared, true));
        assert!(wide.resource(bindings::ADDITIONAL_CIDR).is_none());
        assert!(wide.resource("private_subnet_a").unwrap().depends_on.is_empty());

        let mut cfg = config(EnvironmentType::Shared, true);
        cfg.cidr_group = RegionGroup::Region2;
        cfg.address_layout = AddressLayout::Compact;
        let compact = declare(&cfg);
        let assoc = compact.resource(bindings::ADDITIONAL_CIDR).unwrap();
        assert_eq!(assoc.get("cidr_block"), Some(&Value::string("10.150.70.0/23")));
        assert_eq!(
            compact.resource("private_subnet_b").unwrap().depends_on,
            vec![bindings::ADDITIONAL_CIDR.to_string()]
        );
        assert!(compact.resource("public_subnet_b").unwrap().depends_on.is_empty());
    }

    #[test]
    fn outputs_cover_vpc_and_subnets() {
        let stack = declare(&config(EnvironmentType::Dev, true));
        let names: Vec<&str> = stack.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "VpcId",
                "VpcCidrBlock",
                "PublicSubnetAId",
                "PublicSubnetBId",
                "PrivateSubnetAId",
                "PrivateSubnetBId",
                "NatGatewayId"
            ]
        );
        assert!(stack.description.contains("dev VPC for region1"));
    }
}
