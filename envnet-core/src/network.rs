//! Network resolver - CIDR allocation for an environment
//!
//! Every (region group, environment type) pair owns a two-octet prefix. The
//! VPC blocks and the four subnets are fixed offsets within that prefix:
//!
//! | block             | wide layout             | compact layout          |
//! |-------------------|-------------------------|-------------------------|
//! | primary           | `{primary}.0.0/16`      | `{primary}.60.0/23`     |
//! | additional        | `{additional}.0.0/16`   | `{additional}.70.0/23`  |
//! | public subnet A   | `{primary}.60.0/25`     | same                    |
//! | public subnet B   | `{primary}.60.128/25`   | same                    |
//! | private subnet A  | `{additional}.70.0/25`  | same                    |
//! | private subnet B  | `{additional}.70.128/25`| same                    |

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::Serialize;

use crate::cidr::Cidr;
use crate::config::ConfigError;

const PUBLIC_SUBNET_OCTET: u8 = 60;
const PRIVATE_SUBNET_OCTET: u8 = 70;
const SUBNET_PREFIX_LEN: u8 = 25;
const ZONE_B_OFFSET: u8 = 128;
const WIDE_BLOCK_PREFIX_LEN: u8 = 16;
const COMPACT_BLOCK_PREFIX_LEN: u8 = 23;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentType {
    Prod,
    Uat,
    Test,
    Dev,
    Shared,
}

impl EnvironmentType {
    pub const ALL: [EnvironmentType; 5] = [
        EnvironmentType::Prod,
        EnvironmentType::Uat,
        EnvironmentType::Test,
        EnvironmentType::Dev,
        EnvironmentType::Shared,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentType::Prod => "prod",
            EnvironmentType::Uat => "uat",
            EnvironmentType::Test => "test",
            EnvironmentType::Dev => "dev",
            EnvironmentType::Shared => "shared",
        }
    }

    pub fn accepted() -> Vec<String> {
        Self::ALL.iter().map(|e| e.as_str().to_string()).collect()
    }
}

impl fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnsupportedEnvType {
                value: s.to_string(),
                accepted: Self::accepted(),
            })
    }
}

/// Group of regions sharing one address plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionGroup {
    #[default]
    Region1,
    Region2,
}

impl RegionGroup {
    pub const ALL: [RegionGroup; 2] = [RegionGroup::Region1, RegionGroup::Region2];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionGroup::Region1 => "region1",
            RegionGroup::Region2 => "region2",
        }
    }
}

impl fmt::Display for RegionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionGroup {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnsupportedCidrGroup {
                value: s.to_string(),
                accepted: Self::ALL.iter().map(|g| g.as_str().to_string()).collect(),
            })
    }
}

/// Sizing of the two VPC blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressLayout {
    /// Each block spans the whole `/16` of its prefix
    #[default]
    Wide,
    /// Each block is the `/23` around its subnets
    Compact,
}

impl AddressLayout {
    pub const ALL: [AddressLayout; 2] = [AddressLayout::Wide, AddressLayout::Compact];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressLayout::Wide => "wide",
            AddressLayout::Compact => "compact",
        }
    }
}

impl fmt::Display for AddressLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnsupportedLayout {
                value: s.to_string(),
                accepted: Self::ALL.iter().map(|l| l.as_str().to_string()).collect(),
            })
    }
}

/// First two octets of an address plan (e.g., "10.10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix(pub u8, pub u8);

impl Prefix {
    fn block(&self, third: u8, fourth: u8, len: u8) -> Cidr {
        Cidr::truncate(Ipv4Addr::new(self.0, self.1, third, fourth), len)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Prefixes allocated to one environment in one region group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CidrAllocation {
    pub primary: Prefix,
    /// Address space of the private subnets
    pub additional: Prefix,
}

/// (region1 prefix, region2 prefix) of an environment
const fn region_prefixes(env_type: EnvironmentType) -> (Prefix, Prefix) {
    match env_type {
        EnvironmentType::Prod => (Prefix(10, 10), Prefix(10, 100)),
        EnvironmentType::Uat => (Prefix(10, 20), Prefix(10, 120)),
        EnvironmentType::Test => (Prefix(10, 30), Prefix(10, 130)),
        EnvironmentType::Dev => (Prefix(10, 40), Prefix(10, 140)),
        EnvironmentType::Shared => (Prefix(10, 50), Prefix(10, 150)),
    }
}

/// Look up the prefixes of an environment. Both blocks share one prefix.
pub fn allocation(env_type: EnvironmentType, group: RegionGroup) -> CidrAllocation {
    let (region1, region2) = region_prefixes(env_type);
    let prefix = match group {
        RegionGroup::Region1 => region1,
        RegionGroup::Region2 => region2,
    };
    CidrAllocation {
        primary: prefix,
        additional: prefix,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubnetTier {
    Public,
    Private,
}

impl SubnetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetTier::Public => "public",
            SubnetTier::Private => "private",
        }
    }
}

/// Availability zone slot within a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    A,
    B,
}

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::A, Zone::B];

    /// Letter appended to the region name
    pub fn suffix(&self) -> char {
        match self {
            Zone::A => 'a',
            Zone::B => 'b',
        }
    }
}

/// One resolved subnet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetPlan {
    pub tier: SubnetTier,
    pub zone: Zone,
    pub cidr: Cidr,
}

impl SubnetPlan {
    /// Binding name, e.g. "public_subnet_a"
    pub fn binding(&self) -> String {
        format!("{}_subnet_{}", self.tier.as_str(), self.zone.suffix())
    }

    /// Role used in name tags, e.g. "public-subnet-a"
    pub fn role(&self) -> String {
        format!("{}-subnet-{}", self.tier.as_str(), self.zone.suffix())
    }
}

/// Address plan of one environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPlan {
    pub env_type: EnvironmentType,
    pub cidr_group: RegionGroup,
    pub layout: AddressLayout,
    pub allocation: CidrAllocation,
    pub primary_block: Cidr,
    pub additional_block: Cidr,
    /// Public A, public B, private A, private B
    pub subnets: [SubnetPlan; 4],
}

impl NetworkPlan {
    pub fn subnet(&self, tier: SubnetTier, zone: Zone) -> &SubnetPlan {
        let index = match (tier, zone) {
            (SubnetTier::Public, Zone::A) => 0,
            (SubnetTier::Public, Zone::B) => 1,
            (SubnetTier::Private, Zone::A) => 2,
            (SubnetTier::Private, Zone::B) => 3,
        };
        &self.subnets[index]
    }

    pub fn subnets_in(&self, tier: SubnetTier) -> impl Iterator<Item = &SubnetPlan> {
        self.subnets.iter().filter(move |s| s.tier == tier)
    }

    /// Block a subnet tier is carved from
    pub fn block_for(&self, tier: SubnetTier) -> &Cidr {
        match tier {
            SubnetTier::Public => &self.primary_block,
            SubnetTier::Private => &self.additional_block,
        }
    }

    /// Whether the additional block must be associated with the VPC separately.
    /// False when it is the primary block itself.
    pub fn has_distinct_additional_block(&self) -> bool {
        self.additional_block != self.primary_block
    }
}

/// Resolve the network plan with the default (wide) layout
pub fn resolve(env_type: EnvironmentType, group: RegionGroup) -> NetworkPlan {
    resolve_with_layout(env_type, group, AddressLayout::default())
}

pub fn resolve_with_layout(
    env_type: EnvironmentType,
    group: RegionGroup,
    layout: AddressLayout,
) -> NetworkPlan {
    let allocation = allocation(env_type, group);
    let (primary_block, additional_block) = match layout {
        AddressLayout::Wide => (
            allocation.primary.block(0, 0, WIDE_BLOCK_PREFIX_LEN),
            allocation.additional.block(0, 0, WIDE_BLOCK_PREFIX_LEN),
        ),
        AddressLayout::Compact => (
            allocation
                .primary
                .block(PUBLIC_SUBNET_OCTET, 0, COMPACT_BLOCK_PREFIX_LEN),
            allocation
                .additional
                .block(PRIVATE_SUBNET_OCTET, 0, COMPACT_BLOCK_PREFIX_LEN),
        ),
    };

    let subnet = |tier: SubnetTier, zone: Zone| {
        let (prefix, octet) = match tier {
            SubnetTier::Public => (allocation.primary, PUBLIC_SUBNET_OCTET),
            SubnetTier::Private => (allocation.additional, PRIVATE_SUBNET_OCTET),
        };
        let fourth = match zone {
            Zone::A => 0,
            Zone::B => ZONE_B_OFFSET,
        };
        SubnetPlan {
            tier,
            zone,
            cidr: prefix.block(octet, fourth, SUBNET_PREFIX_LEN),
        }
    };

    let plan = NetworkPlan {
        env_type,
        cidr_group: group,
        layout,
        allocation,
        primary_block,
        additional_block,
        subnets: [
            subnet(SubnetTier::Public, Zone::A),
            subnet(SubnetTier::Public, Zone::B),
            subnet(SubnetTier::Private, Zone::A),
            subnet(SubnetTier::Private, Zone::B),
        ],
    };
    log::debug!(
        "Resolved {}/{} ({} layout): primary {}, additional {}",
        env_type,
        group,
        layout,
        plan.primary_block,
        plan.additional_block
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidr(s: &str) -> Cidr {
        s.parse().unwrap()
    }

    const EXPECTED_PREFIXES: [(EnvironmentType, &str, &str); 5] = [
        (EnvironmentType::Prod, "10.10", "10.100"),
        (EnvironmentType::Uat, "10.20", "10.120"),
        (EnvironmentType::Test, "10.30", "10.130"),
        (EnvironmentType::Dev, "10.40", "10.140"),
        (EnvironmentType::Shared, "10.50", "10.150"),
    ];

    #[test]
    fn every_combination_resolves_documented_prefixes() {
        for (env, region1, region2) in EXPECTED_PREFIXES {
            let groups = [(RegionGroup::Region1, region1), (RegionGroup::Region2, region2)];
            for (group, expected) in groups {
                let plan = resolve(env, group);
                let context = format!("{}/{}", env, group);
                assert_eq!(plan.allocation.primary.to_string(), expected, "{}", context);
                assert_eq!(plan.allocation.additional.to_string(), expected, "{}", context);
                assert_eq!(plan.primary_block, cidr(&format!("{}.0.0/16", expected)));
                assert_eq!(plan.additional_block, cidr(&format!("{}.0.0/16", expected)));
            }
        }
    }

    #[test]
    fn subnets_stay_inside_their_block_without_overlap() {
        for layout in AddressLayout::ALL {
            for env in EnvironmentType::ALL {
                for group in RegionGroup::ALL {
                    let plan = resolve_with_layout(env, group, layout);
                    let primary_16 = plan.allocation.primary.block(0, 0, 16);
                    let additional_16 = plan.allocation.additional.block(0, 0, 16);

                    for subnet in &plan.subnets {
                        let block = plan.block_for(subnet.tier);
                        assert!(block.contains(&subnet.cidr), "{} not in {}", subnet.cidr, block);
                        let space = match subnet.tier {
                            SubnetTier::Public => &primary_16,
                            SubnetTier::Private => &additional_16,
                        };
                        assert!(space.contains(&subnet.cidr));
                        assert_eq!(subnet.cidr.prefix_len(), 25);
                    }

                    for (i, a) in plan.subnets.iter().enumerate() {
                        for b in plan.subnets.iter().skip(i + 1) {
                            assert!(!a.cidr.overlaps(&b.cidr), "{} overlaps {}", a.cidr, b.cidr);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn prod_region1_scenario() {
        let plan = resolve(EnvironmentType::Prod, RegionGroup::Region1);
        assert_eq!(plan.allocation.primary, Prefix(10, 10));
        assert_eq!(plan.subnet(SubnetTier::Public, Zone::A).cidr, cidr("10.10.60.0/25"));
        assert_eq!(plan.subnet(SubnetTier::Public, Zone::B).cidr, cidr("10.10.60.128/25"));
        assert_eq!(plan.subnet(SubnetTier::Private, Zone::A).cidr, cidr("10.10.70.0/25"));
        assert_eq!(plan.subnet(SubnetTier::Private, Zone::B).cidr, cidr("10.10.70.128/25"));
    }

    #[test]
    fn dev_region2_scenario() {
        let plan = resolve(EnvironmentType::Dev, RegionGroup::Region2);
        assert_eq!(plan.allocation.primary.to_string(), "10.140");
        assert_eq!(plan.subnet(SubnetTier::Private, Zone::A).cidr, cidr("10.140.70.0/25"));
        assert_eq!(plan.subnet(SubnetTier::Private, Zone::B).cidr, cidr("10.140.70.128/25"));
    }

    #[test]
    fn compact_layout_uses_slash_23_blocks() {
        let plan = resolve_with_layout(
            EnvironmentType::Uat,
            RegionGroup::Region1,
            AddressLayout::Compact,
        );
        assert_eq!(plan.primary_block, cidr("10.20.60.0/23"));
        assert_eq!(plan.additional_block, cidr("10.20.70.0/23"));
        assert!(plan.has_distinct_additional_block());

        let wide = resolve(EnvironmentType::Uat, RegionGroup::Region1);
        assert!(!wide.has_distinct_additional_block());
        assert_eq!(wide.subnets, plan.subnets);
    }

    #[test]
    fn region_groups_never_share_a_prefix() {
        for env in EnvironmentType::ALL {
            let region1 = allocation(env, RegionGroup::Region1);
            let region2 = allocation(env, RegionGroup::Region2);
            assert_ne!(region1.primary, region2.primary, "{}", env);
            for other in EnvironmentType::ALL.into_iter().filter(|o| *o != env) {
                assert_ne!(region1.primary, allocation(other, RegionGroup::Region1).primary);
                assert_ne!(region2.primary, allocation(other, RegionGroup::Region2).primary);
            }
        }
    }

    #[test]
    fn subnet_names() {
        let plan = resolve(EnvironmentType::Test, RegionGroup::Region1);
        let names: Vec<String> = plan.subnets.iter().map(|s| s.binding()).collect();
        assert_eq!(
            names,
            vec!["public_subnet_a", "public_subnet_b", "private_subnet_a", "private_subnet_b"]
        );
        assert_eq!(plan.subnet(SubnetTier::Private, Zone::B).role(), "private-subnet-b");
        assert_eq!(plan.subnets_in(SubnetTier::Public).count(), 2);
    }
}
