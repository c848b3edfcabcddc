//! Deployment configuration
//!
//! The provisioning engine hands each invocation a flat key/value context
//! (`-c envType=prod`, or the `context` object of a `cdk.json`). This module
//! turns that context into a typed [`DeploymentConfig`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::network::{self, AddressLayout, EnvironmentType, NetworkPlan, RegionGroup, Zone};

pub const DEFAULT_ACCOUNT_ID: &str = "YOUR_ACCOUNT_ID";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_STACK_NAME: &str = "EnvVpcStack";

/// Context keys understood by [`DeploymentConfig::from_context`]
pub mod keys {
    pub const ENV_TYPE: &str = "envType";
    pub const CIDR_GROUP: &str = "cidrGroup";
    pub const USE_NAT_GATEWAY: &str = "useNatGateway";
    pub const ACCOUNT_ID: &str = "accountId";
    pub const DEPLOY_REGION: &str = "deployRegion";
    pub const STACK_NAME: &str = "stackName";
    pub const ADDRESS_LAYOUT: &str = "addressLayout";
}

/// Invalid configuration. Always fatal: nothing is declared once this is raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Invalid configuration: missing context variable 'envType' (expected one of: {})",
        accepted.join(", ")
    )]
    MissingEnvType { accepted: Vec<String> },

    #[error(
        "Invalid configuration: unsupported envType '{value}' (expected one of: {})",
        accepted.join(", ")
    )]
    UnsupportedEnvType { value: String, accepted: Vec<String> },

    #[error(
        "Invalid configuration: unsupported cidrGroup '{value}' (expected one of: {})",
        accepted.join(", ")
    )]
    UnsupportedCidrGroup { value: String, accepted: Vec<String> },

    #[error(
        "Invalid configuration: unsupported addressLayout '{value}' (expected one of: {})",
        accepted.join(", ")
    )]
    UnsupportedLayout { value: String, accepted: Vec<String> },

    #[error("Invalid configuration: malformed context entry '{0}' (expected KEY=VALUE)")]
    MalformedEntry(String),

    #[error("Invalid configuration: malformed context file: {0}")]
    MalformedContextFile(String),
}

/// Engine-supplied key/value parameters for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a key. Empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// Look up a key as given, including empty values
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a context from `KEY=VALUE` entries
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ctx = Self::new();
        for entry in entries {
            let (key, value) = parse_entry(entry.as_ref())?;
            ctx.insert(key, value);
        }
        Ok(ctx)
    }

    /// Parse a JSON context document.
    ///
    /// Accepts either a `cdk.json`-style document with a top-level `context`
    /// object or a flat object. Scalars are stored in their string form;
    /// nested values are skipped.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let doc: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| ConfigError::MalformedContextFile(e.to_string()))?;

        let object = match doc.get("context") {
            Some(inner) => inner,
            None => &doc,
        }
        .as_object()
        .ok_or_else(|| {
            ConfigError::MalformedContextFile("expected a JSON object".to_string())
        })?;

        let mut ctx = Self::new();
        for (key, value) in object {
            match value {
                serde_json::Value::String(s) => ctx.insert(key.clone(), s.clone()),
                serde_json::Value::Bool(b) => ctx.insert(key.clone(), b.to_string()),
                serde_json::Value::Number(n) => ctx.insert(key.clone(), n.to_string()),
                serde_json::Value::Null => {}
                _ => log::debug!("Skipping non-scalar context value '{}'", key),
            }
        }
        Ok(ctx)
    }

    /// Overlay `other` on top of this context; keys in `other` win
    pub fn merge(&mut self, other: Context) {
        self.values.extend(other.values);
    }
}

/// Split a `KEY=VALUE` entry
pub fn parse_entry(entry: &str) -> Result<(String, String), ConfigError> {
    match entry.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::MalformedEntry(entry.to_string())),
    }
}

/// Parsed deployment parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    pub env_type: EnvironmentType,
    pub cidr_group: RegionGroup,
    pub use_nat_gateway: bool,
    pub account_id: String,
    pub deploy_region: String,
    pub stack_name: String,
    pub address_layout: AddressLayout,
}

impl DeploymentConfig {
    /// Build a config with defaults for everything but the environment type
    pub fn new(env_type: EnvironmentType) -> Self {
        Self {
            env_type,
            cidr_group: RegionGroup::default(),
            use_nat_gateway: true,
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            deploy_region: DEFAULT_REGION.to_string(),
            stack_name: DEFAULT_STACK_NAME.to_string(),
            address_layout: AddressLayout::default(),
        }
    }

    pub fn from_context(ctx: &Context) -> Result<Self, ConfigError> {
        let env_type = match ctx.get(keys::ENV_TYPE) {
            Some(value) => value.parse::<EnvironmentType>()?,
            None => {
                return Err(ConfigError::MissingEnvType {
                    accepted: EnvironmentType::accepted(),
                });
            }
        };

        let cidr_group = match ctx.get(keys::CIDR_GROUP) {
            Some(value) => value.parse::<RegionGroup>()?,
            None => RegionGroup::default(),
        };

        let address_layout = match ctx.get(keys::ADDRESS_LAYOUT) {
            Some(value) => value.parse::<AddressLayout>()?,
            None => AddressLayout::default(),
        };

        // Only a missing key defaults to true; an empty value disables NAT
        let use_nat_gateway = ctx
            .get_raw(keys::USE_NAT_GATEWAY)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let account_id = ctx
            .get(keys::ACCOUNT_ID)
            .unwrap_or(DEFAULT_ACCOUNT_ID)
            .trim()
            .to_string();
        if account_id != DEFAULT_ACCOUNT_ID && !is_account_id(&account_id) {
            log::warn!("accountId '{}' is not a 12-digit AWS account id", account_id);
        }

        let deploy_region =
            normalize_region(ctx.get(keys::DEPLOY_REGION).unwrap_or(DEFAULT_REGION));
        if !is_region_name(&deploy_region) {
            log::warn!("deployRegion '{}' does not look like an AWS region", deploy_region);
        }

        let stack_name = ctx
            .get(keys::STACK_NAME)
            .unwrap_or(DEFAULT_STACK_NAME)
            .trim()
            .to_string();

        let config = Self {
            env_type,
            cidr_group,
            use_nat_gateway,
            account_id,
            deploy_region,
            stack_name,
            address_layout,
        };
        log::debug!("Resolved deployment config: {:?}", config);
        Ok(config)
    }

    /// Availability zone name for a zone letter, assuming `{region}{letter}` naming
    pub fn availability_zone(&self, zone: Zone) -> String {
        format!("{}{}", self.deploy_region, zone.suffix())
    }

    pub fn network_plan(&self) -> NetworkPlan {
        network::resolve_with_layout(self.env_type, self.cidr_group, self.address_layout)
    }
}

/// Normalize region value (e.g., "aws.Region.ap_northeast_1" -> "ap-northeast-1")
pub fn normalize_region(s: &str) -> String {
    let region_part = if s.contains('.') {
        s.split('.').next_back().unwrap_or(s)
    } else {
        s
    };
    region_part.trim().to_ascii_lowercase().replace('_', "-")
}

static ACCOUNT_ID_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{12}$").ok());

static REGION_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d+$").ok());

fn is_account_id(s: &str) -> bool {
    ACCOUNT_ID_REGEX.as_ref().is_some_and(|re| re.is_match(s))
}

fn is_region_name(s: &str) -> bool {
    REGION_REGEX.as_ref().is_some_and(|re| re.is_match(s))
}
